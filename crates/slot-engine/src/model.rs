//! Participants, availability intervals and matched slots.
//!
//! Dates and times are held as `chrono` naive values. Their serialized forms are
//! the canonical zero-padded `YYYY-MM-DD` and `HH:MM:SS` strings, so textual and
//! chronological ordering agree for every value this crate produces.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationKind};

/// Opaque participant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The fixed role a participant plays in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The requester whose one-hour slots are matched.
    Candidate,
    /// A reviewer whose windows must cover the candidate's slot.
    Interviewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Candidate => f.write_str("candidate"),
            Role::Interviewer => f.write_str("interviewer"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "candidate" => Ok(Role::Candidate),
            "interviewer" => Ok(Role::Interviewer),
            other => Err(format!(
                "unknown role '{}', expected 'candidate' or 'interviewer'",
                other
            )),
        }
    }
}

/// A participant as seen by the engine: an id, a role and an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A proposed availability window, parsed from wire input but not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewInterval {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl NewInterval {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            date,
            start_time,
            end_time,
        }
    }

    /// Parse wire input: `date` as `YYYY-MM-DD`, times as 24-hour `HH:MM`.
    ///
    /// A one-digit hour (`9:00`) is accepted. Minutes are parsed but not required
    /// to be zero here; hour alignment is checked by [`crate::validator::validate`]
    /// so that it is reported in its proper order among the admission checks.
    ///
    /// # Errors
    /// `MalformedDate` when the date is not a real `YYYY-MM-DD` calendar day.
    /// `MalformedTime` when either time is not a valid `H:MM`/`HH:MM` value.
    pub fn parse(date: &str, start_time: &str, end_time: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            date: parse_date(date)?,
            start_time: parse_time(start_time)?,
            end_time: parse_time(end_time)?,
        })
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let malformed = || {
        ValidationError::new(
            ValidationKind::MalformedDate,
            format!("'{}' is not a YYYY-MM-DD date", raw),
        )
    };
    // chrono accepts unpadded fields; the wire format is fixed-width.
    if raw.len() != 10 {
        return Err(malformed());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| malformed())
}

fn parse_time(raw: &str) -> Result<NaiveTime, ValidationError> {
    let malformed = || {
        ValidationError::new(
            ValidationKind::MalformedTime,
            format!("'{}' is not a 24-hour HH:MM time", raw),
        )
    };
    let (hour, minute) = raw.split_once(':').ok_or_else(malformed)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(1..=2).contains(&hour.len()) || minute.len() != 2 || !all_digits(hour) || !all_digits(minute)
    {
        return Err(malformed());
    }
    let hour: u32 = hour.parse().map_err(|_| malformed())?;
    let minute: u32 = minute.parse().map_err(|_| malformed())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(malformed)
}

/// A stored availability window owned by exactly one participant.
///
/// The owner is referenced by id only; listing a participant's intervals goes
/// through [`crate::store::IntervalStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInterval {
    pub participant_id: ParticipantId,
    pub role: Role,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilityInterval {
    pub fn new(participant_id: ParticipantId, role: Role, window: NewInterval) -> Self {
        Self {
            participant_id,
            role,
            date: window.date,
            start_time: window.start_time,
            end_time: window.end_time,
        }
    }

    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }

    pub fn is_hour_aligned(&self) -> bool {
        is_on_the_hour(self.start_time) && is_on_the_hour(self.end_time)
    }

    /// Half-open overlap on the same date: `s1 < e2 && e1 > s2`.
    ///
    /// Intervals that only touch (one ends when the other starts) do not overlap.
    pub fn overlaps(&self, other: &AvailabilityInterval) -> bool {
        self.date == other.date
            && self.start_time < other.end_time
            && self.end_time > other.start_time
    }

    /// True when this window fully contains `other` on the same date.
    pub fn covers(&self, other: &AvailabilityInterval) -> bool {
        self.date == other.date
            && self.start_time <= other.start_time
            && self.end_time >= other.end_time
    }

    pub fn sort_key(&self) -> (NaiveDate, NaiveTime) {
        (self.date, self.start_time)
    }

    pub fn to_slot(&self) -> TimeSlot {
        TimeSlot {
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

fn is_on_the_hour(time: NaiveTime) -> bool {
    time.minute() == 0 && time.second() == 0 && time.nanosecond() == 0
}

/// A matched meeting slot. Carries no owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}
