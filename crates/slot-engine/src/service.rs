//! The two exposed operations, wired to their collaborators.

use crate::error::{NotFoundError, Result, SlotError, StorageError, ValidationError, ValidationKind};
use crate::matcher::{self, MatchObserver, TracingObserver};
use crate::model::{AvailabilityInterval, NewInterval, ParticipantId, TimeSlot};
use crate::participants::ParticipantLookup;
use crate::store::IntervalStore;
use crate::validator;

/// Availability registration and slot matching over a store and a lookup.
///
/// Safe to share across threads; every call is an independent unit of work.
pub struct Scheduler<S, P> {
    store: S,
    lookup: P,
    observer: Box<dyn MatchObserver>,
}

impl<S: IntervalStore, P: ParticipantLookup> Scheduler<S, P> {
    pub fn new(store: S, lookup: P) -> Self {
        Self::with_observer(store, lookup, TracingObserver)
    }

    pub fn with_observer(store: S, lookup: P, observer: impl MatchObserver + 'static) -> Self {
        Self {
            store,
            lookup,
            observer: Box::new(observer),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn lookup(&self) -> &P {
        &self.lookup
    }

    pub fn into_parts(self) -> (S, P) {
        (self.store, self.lookup)
    }

    /// Validate and store a new availability window for `participant`.
    ///
    /// The interval takes the owner's role. Validation runs against a fresh read
    /// of the owner's intervals; a conflicting insert committed by a concurrent
    /// writer after that read is still reported as `Overlap`.
    pub fn add_availability(
        &self,
        participant: &ParticipantId,
        window: NewInterval,
    ) -> Result<AvailabilityInterval> {
        let owner = self
            .lookup
            .find_by_id(participant)?
            .ok_or_else(|| NotFoundError::Participant(participant.clone()))?;

        let interval = AvailabilityInterval::new(owner.id, owner.role, window);
        let existing = self.store.query_by_participant(participant, None)?;

        if let Err(err) = validator::validate(&interval, &existing) {
            tracing::warn!(%participant, kind = %err.kind, "availability rejected");
            return Err(err.into());
        }

        match self.store.insert(interval) {
            Ok(stored) => {
                tracing::debug!(
                    %participant,
                    date = %stored.date,
                    start = %stored.start_time,
                    end = %stored.end_time,
                    "availability stored"
                );
                Ok(stored)
            }
            Err(StorageError::Conflict { participant, date }) => {
                tracing::warn!(%participant, %date, "concurrent overlapping insert");
                Err(ValidationError::new(
                    ValidationKind::Overlap,
                    format!("interval on {} overlaps one stored concurrently", date),
                )
                .into())
            }
            Err(err) => Err(SlotError::Storage(err)),
        }
    }

    /// Every interval owned by `participant`, ordered by `(date, start_time)`.
    pub fn list_availability(&self, participant: &ParticipantId) -> Result<Vec<AvailabilityInterval>> {
        if self.lookup.find_by_id(participant)?.is_none() {
            return Err(NotFoundError::Participant(participant.clone()).into());
        }
        Ok(self.store.query_by_participant(participant, None)?)
    }

    /// See [`matcher::find_available_slots`].
    pub fn find_available_slots(
        &self,
        requester: &ParticipantId,
        reviewers: &[ParticipantId],
    ) -> Result<Vec<TimeSlot>> {
        matcher::find_available_slots(
            &self.store,
            &self.lookup,
            requester,
            reviewers,
            self.observer.as_ref(),
        )
    }
}
