//! Multi-party slot matching.
//!
//! A candidate interval becomes a slot when every named interviewer has at least
//! one interval on the same date that fully contains it. Interviewer windows may
//! be longer than an hour and a single window may cover several candidate
//! intervals.
//!
//! [`match_slots`] is the pure computation. [`find_available_slots`] resolves ids,
//! performs the two store reads, then delegates to it.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{NotFoundError, Result, ValidationError, ValidationKind};
use crate::model::{AvailabilityInterval, ParticipantId, Role, TimeSlot};
use crate::participants::ParticipantLookup;
use crate::store::IntervalStore;

/// Outcome for a single candidate interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDecision<'a> {
    /// Every interviewer covers the interval.
    Matched,
    /// The first interviewer (in request order) with no covering interval.
    Uncovered { reviewer: &'a ParticipantId },
}

/// Hooks called at fixed points of a match. Observers never affect the result.
pub trait MatchObserver: Send + Sync {
    fn match_started(&self, _requester: &ParticipantId, _reviewers: &[ParticipantId]) {}

    fn interval_decided(&self, _interval: &AvailabilityInterval, _decision: SlotDecision<'_>) {}

    fn match_finished(&self, _requester: &ParticipantId, _slots: &[TimeSlot]) {}
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

/// Emits `tracing` events: `info` at start and end, `debug` per decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn match_started(&self, requester: &ParticipantId, reviewers: &[ParticipantId]) {
        tracing::info!(%requester, reviewers = reviewers.len(), "matching slots");
    }

    fn interval_decided(&self, interval: &AvailabilityInterval, decision: SlotDecision<'_>) {
        match decision {
            SlotDecision::Matched => tracing::debug!(
                date = %interval.date,
                start = %interval.start_time,
                end = %interval.end_time,
                "all interviewers available"
            ),
            SlotDecision::Uncovered { reviewer } => tracing::debug!(
                date = %interval.date,
                start = %interval.start_time,
                end = %interval.end_time,
                %reviewer,
                "interviewer not available"
            ),
        }
    }

    fn match_finished(&self, requester: &ParticipantId, slots: &[TimeSlot]) {
        tracing::info!(%requester, slots = slots.len(), "matching finished");
    }
}

/// Drop repeated ids, keeping the first occurrence of each.
pub fn dedup_reviewers(reviewers: &[ParticipantId]) -> Vec<ParticipantId> {
    let mut seen = BTreeSet::new();
    reviewers
        .iter()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

/// Intersect candidate intervals with each reviewer's intervals.
///
/// Reviewers are checked in the given order and checking stops at the first one
/// that does not cover the interval. A reviewer missing from
/// `reviewer_intervals` covers nothing. The result is sorted by
/// `(date, start_time)`.
pub fn match_slots(
    requester_intervals: &[AvailabilityInterval],
    reviewers: &[ParticipantId],
    reviewer_intervals: &BTreeMap<ParticipantId, Vec<AvailabilityInterval>>,
    observer: &dyn MatchObserver,
) -> Vec<TimeSlot> {
    let mut slots = Vec::new();

    for requested in requester_intervals {
        let uncovered = reviewers.iter().find(|reviewer| {
            !reviewer_intervals
                .get(*reviewer)
                .is_some_and(|owned| owned.iter().any(|window| window.covers(requested)))
        });

        match uncovered {
            Some(reviewer) => {
                observer.interval_decided(requested, SlotDecision::Uncovered { reviewer })
            }
            None => {
                observer.interval_decided(requested, SlotDecision::Matched);
                slots.push(requested.to_slot());
            }
        }
    }

    slots.sort_by_key(|slot| (slot.date, slot.start_time));
    slots
}

/// Find the slots where `requester` and every one of `reviewers` are free.
///
/// Ids are resolved before any interval is read, so an unknown id fails the
/// whole request without computing partial results or notifying `observer`.
/// Duplicate reviewer ids are treated as one reviewer.
///
/// # Errors
/// - `EmptyReviewers` validation error when `reviewers` is empty.
/// - [`NotFoundError::Requester`] when the requester is unknown or not a candidate.
/// - [`NotFoundError::Reviewers`] listing every reviewer id that is unknown or
///   not an interviewer.
/// - Storage errors from either collaborator, unchanged.
pub fn find_available_slots<S, P>(
    store: &S,
    lookup: &P,
    requester: &ParticipantId,
    reviewers: &[ParticipantId],
    observer: &dyn MatchObserver,
) -> Result<Vec<TimeSlot>>
where
    S: IntervalStore + ?Sized,
    P: ParticipantLookup + ?Sized,
{
    let reviewers = dedup_reviewers(reviewers);
    if reviewers.is_empty() {
        return Err(ValidationError::new(
            ValidationKind::EmptyReviewers,
            "at least one interviewer is required",
        )
        .into());
    }

    match lookup.find_by_id(requester)? {
        Some(participant) if participant.role == Role::Candidate => {}
        _ => return Err(NotFoundError::Requester(requester.clone()).into()),
    }

    let resolved = lookup.find_many_by_ids_and_role(&reviewers, Role::Interviewer)?;
    if resolved.len() != reviewers.len() {
        let found: BTreeSet<&ParticipantId> = resolved.iter().map(|p| &p.id).collect();
        let missing = reviewers
            .iter()
            .filter(|id| !found.contains(id))
            .cloned()
            .collect();
        return Err(NotFoundError::Reviewers(missing).into());
    }
    observer.match_started(requester, &reviewers);

    let requester_intervals = store.query_by_participant(requester, Some(Role::Candidate))?;
    let reviewer_intervals = store.query_by_participants(&reviewers, Role::Interviewer)?;

    let slots = match_slots(
        &requester_intervals,
        &reviewers,
        &reviewer_intervals,
        observer,
    );
    observer.match_finished(requester, &slots);
    Ok(slots)
}
