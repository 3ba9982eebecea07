//! Participant resolution.
//!
//! The engine never owns participant records; it only asks a
//! [`ParticipantLookup`] whether an id exists and which role it has.
//! [`ParticipantDirectory`] is an in-memory lookup for the CLI and tests.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{SlotError, StorageError, ValidationError, ValidationKind};
use crate::model::{Participant, ParticipantId, Role};

pub trait ParticipantLookup: Send + Sync {
    fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, StorageError>;

    /// Participants among `ids` that exist and have `role`.
    ///
    /// The result may be shorter than `ids`; callers detect the shortfall.
    fn find_many_by_ids_and_role(
        &self,
        ids: &[ParticipantId],
        role: Role,
    ) -> Result<Vec<Participant>, StorageError>;
}

#[derive(Debug, Default)]
pub struct ParticipantDirectory {
    participants: RwLock<BTreeMap<ParticipantId, Participant>>,
}

impl ParticipantDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant. Ids are unique and non-blank; re-registering an id
    /// is an error.
    pub fn register(&self, participant: Participant) -> Result<Participant, SlotError> {
        if participant.id.as_str().trim().is_empty() {
            return Err(ValidationError::new(
                ValidationKind::BlankId,
                "participant id must not be empty",
            )
            .into());
        }
        let mut guard = self
            .participants
            .write()
            .map_err(|_| StorageError::Poisoned)?;
        if guard.contains_key(&participant.id) {
            return Err(SlotError::DuplicateParticipant(participant.id));
        }
        guard.insert(participant.id.clone(), participant.clone());
        Ok(participant)
    }

    /// All participants ordered by id.
    pub fn list(&self) -> Result<Vec<Participant>, StorageError> {
        let guard = self
            .participants
            .read()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(guard.values().cloned().collect())
    }
}

impl ParticipantLookup for ParticipantDirectory {
    fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, StorageError> {
        let guard = self
            .participants
            .read()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn find_many_by_ids_and_role(
        &self,
        ids: &[ParticipantId],
        role: Role,
    ) -> Result<Vec<Participant>, StorageError> {
        let guard = self
            .participants
            .read()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(ids
            .iter()
            .filter_map(|id| guard.get(id))
            .filter(|p| p.role == role)
            .cloned()
            .collect())
    }
}
