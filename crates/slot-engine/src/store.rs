//! Interval storage.
//!
//! [`IntervalStore`] is the seam to whatever persists availability. The bundled
//! [`InMemoryIntervalStore`] keeps each participant's intervals sorted by
//! `(date, start_time)` and makes insertion an atomic check-and-insert, so two
//! writers racing on the same participant cannot both commit overlapping
//! intervals.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::StorageError;
use crate::model::{AvailabilityInterval, ParticipantId, Role};

/// Storage for availability intervals, keyed by owner.
///
/// Every query returns intervals ordered by `(date, start_time)` ascending.
/// Implementations must reject an insert that overlaps an interval already
/// stored for the same participant and date with [`StorageError::Conflict`]
/// (a unique constraint or a locking insert both satisfy this).
pub trait IntervalStore: Send + Sync {
    fn insert(&self, interval: AvailabilityInterval) -> Result<AvailabilityInterval, StorageError>;

    fn query_by_participant(
        &self,
        participant: &ParticipantId,
        role: Option<Role>,
    ) -> Result<Vec<AvailabilityInterval>, StorageError>;

    /// Batched fetch for matching, grouped by owner. Ids with no intervals of
    /// `role` map to an empty list.
    fn query_by_participants(
        &self,
        participants: &[ParticipantId],
        role: Role,
    ) -> Result<BTreeMap<ParticipantId, Vec<AvailabilityInterval>>, StorageError>;

    /// Every stored interval of `role`, across all participants.
    fn query_by_role(&self, role: Role) -> Result<Vec<AvailabilityInterval>, StorageError>;
}

#[derive(Debug, Default)]
pub struct InMemoryIntervalStore {
    intervals: RwLock<BTreeMap<ParticipantId, Vec<AvailabilityInterval>>>,
}

impl InMemoryIntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored intervals, grouped by participant id then `(date, start_time)`.
    pub fn snapshot(&self) -> Result<Vec<AvailabilityInterval>, StorageError> {
        let guard = self.intervals.read().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.values().flatten().cloned().collect())
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        let guard = self.intervals.read().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.values().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

fn filter_role(intervals: &[AvailabilityInterval], role: Option<Role>) -> Vec<AvailabilityInterval> {
    intervals
        .iter()
        .filter(|i| role.is_none_or(|r| i.role == r))
        .cloned()
        .collect()
}

impl IntervalStore for InMemoryIntervalStore {
    fn insert(&self, interval: AvailabilityInterval) -> Result<AvailabilityInterval, StorageError> {
        let mut guard = self.intervals.write().map_err(|_| StorageError::Poisoned)?;
        let owned = guard.entry(interval.participant_id.clone()).or_default();

        // The overlap check is repeated under the write lock; a concurrent
        // writer may have committed since the caller validated.
        if owned.iter().any(|existing| existing.overlaps(&interval)) {
            return Err(StorageError::Conflict {
                participant: interval.participant_id.clone(),
                date: interval.date,
            });
        }

        let at = owned.partition_point(|existing| existing.sort_key() <= interval.sort_key());
        owned.insert(at, interval.clone());
        Ok(interval)
    }

    fn query_by_participant(
        &self,
        participant: &ParticipantId,
        role: Option<Role>,
    ) -> Result<Vec<AvailabilityInterval>, StorageError> {
        let guard = self.intervals.read().map_err(|_| StorageError::Poisoned)?;
        Ok(guard
            .get(participant)
            .map(|owned| filter_role(owned, role))
            .unwrap_or_default())
    }

    fn query_by_participants(
        &self,
        participants: &[ParticipantId],
        role: Role,
    ) -> Result<BTreeMap<ParticipantId, Vec<AvailabilityInterval>>, StorageError> {
        let guard = self.intervals.read().map_err(|_| StorageError::Poisoned)?;
        Ok(participants
            .iter()
            .map(|id| {
                let owned = guard
                    .get(id)
                    .map(|owned| filter_role(owned, Some(role)))
                    .unwrap_or_default();
                (id.clone(), owned)
            })
            .collect())
    }

    fn query_by_role(&self, role: Role) -> Result<Vec<AvailabilityInterval>, StorageError> {
        let guard = self.intervals.read().map_err(|_| StorageError::Poisoned)?;
        let mut all: Vec<AvailabilityInterval> = guard
            .values()
            .flat_map(|owned| filter_role(owned, Some(role)))
            .collect();
        // Stable sort keeps participant-id order within equal keys.
        all.sort_by_key(AvailabilityInterval::sort_key);
        Ok(all)
    }
}
