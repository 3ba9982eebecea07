//! Admission checks for a new availability interval.
//!
//! One validator serves both roles. Checks run in a fixed order and stop at the
//! first failure:
//!
//! 1. both times on the hour (`MalformedTime`)
//! 2. `start < end` (`InvertedRange`)
//! 3. candidates only: exactly one hour (`InvalidDuration`)
//! 4. no same-date overlap with the participant's existing intervals (`Overlap`)
//!
//! Adjacent intervals (one ends exactly when the other starts) do not overlap.

use chrono::TimeDelta;

use crate::error::{ValidationError, ValidationKind};
use crate::model::{AvailabilityInterval, Role};

/// Decide whether `candidate` may be stored next to `existing`.
///
/// `existing` should be a fresh read of the same participant's intervals. Any
/// entries on other dates are ignored. This function has no side effects; the
/// caller inserts only on `Ok`.
pub fn validate(
    candidate: &AvailabilityInterval,
    existing: &[AvailabilityInterval],
) -> Result<(), ValidationError> {
    if !candidate.is_hour_aligned() {
        return Err(ValidationError::new(
            ValidationKind::MalformedTime,
            format!(
                "times must be at the start of an hour (HH:00), got {}-{}",
                candidate.start_time.format("%H:%M"),
                candidate.end_time.format("%H:%M")
            ),
        ));
    }

    if candidate.start_time >= candidate.end_time {
        return Err(ValidationError::new(
            ValidationKind::InvertedRange,
            format!(
                "start time {} must be before end time {}",
                candidate.start_time, candidate.end_time
            ),
        ));
    }

    if candidate.role == Role::Candidate && candidate.duration() != TimeDelta::hours(1) {
        return Err(ValidationError::new(
            ValidationKind::InvalidDuration,
            format!(
                "candidate slots must be exactly 1 hour, got {} minutes",
                candidate.duration().num_minutes()
            ),
        ));
    }

    if let Some(clash) = find_overlap(candidate, existing) {
        return Err(ValidationError::new(
            ValidationKind::Overlap,
            format!(
                "{} {}-{} overlaps existing interval {}-{}",
                candidate.date,
                candidate.start_time,
                candidate.end_time,
                clash.start_time,
                clash.end_time
            ),
        ));
    }

    Ok(())
}

/// First interval in `existing` that overlaps `candidate` on the same date.
pub fn find_overlap<'a>(
    candidate: &AvailabilityInterval,
    existing: &'a [AvailabilityInterval],
) -> Option<&'a AvailabilityInterval> {
    existing.iter().find(|other| candidate.overlaps(other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewInterval;
    use chrono::{NaiveDate, NaiveTime};

    fn interval(role: Role, start: (u32, u32), end: (u32, u32)) -> AvailabilityInterval {
        AvailabilityInterval::new(
            "p1".into(),
            role,
            NewInterval::new(
                NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
                NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
                NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            ),
        )
    }

    #[test]
    fn alignment_is_checked_before_ordering() {
        // Inverted and misaligned: the format check wins.
        let err = validate(&interval(Role::Interviewer, (11, 30), (10, 0)), &[]).unwrap_err();
        assert_eq!(err.kind, ValidationKind::MalformedTime);
    }

    #[test]
    fn ordering_is_checked_before_duration() {
        let err = validate(&interval(Role::Candidate, (12, 0), (10, 0)), &[]).unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvertedRange);
    }

    #[test]
    fn duration_is_checked_before_overlap() {
        let existing = vec![interval(Role::Candidate, (9, 0), (10, 0))];
        let err = validate(&interval(Role::Candidate, (9, 0), (11, 0)), &existing).unwrap_err();
        assert_eq!(err.kind, ValidationKind::InvalidDuration);
    }
}
