//! Error types for slot-engine operations.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::model::ParticipantId;

/// Why a proposed interval (or match request) was refused before any write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValidationKind {
    MalformedDate,
    MalformedTime,
    InvertedRange,
    InvalidDuration,
    Overlap,
    EmptyReviewers,
    BlankId,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationKind::MalformedDate => "malformed date",
            ValidationKind::MalformedTime => "malformed time",
            ValidationKind::InvertedRange => "inverted range",
            ValidationKind::InvalidDuration => "invalid duration",
            ValidationKind::Overlap => "overlap",
            ValidationKind::EmptyReviewers => "empty reviewers",
            ValidationKind::BlankId => "blank id",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct ValidationError {
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// An identifier that did not resolve through the participant lookup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("participant {0} not found")]
    Participant(ParticipantId),

    /// The requester is unknown or is not a candidate.
    #[error("candidate {0} not found")]
    Requester(ParticipantId),

    /// Reviewer ids that are unknown or not interviewers.
    #[error("interviewers not found: {}", join_ids(.0))]
    Reviewers(Vec<ParticipantId>),
}

fn join_ids(ids: &[ParticipantId]) -> String {
    ids.iter()
        .map(ParticipantId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Infrastructure failures from the interval store or participant directory.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The atomic check-and-insert found an overlapping interval that was
    /// committed after the caller's read.
    #[error("conflicting interval for participant {participant} on {date}")]
    Conflict {
        participant: ParticipantId,
        date: NaiveDate,
    },

    #[error("store lock poisoned")]
    Poisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger format error: {0}")]
    Format(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SlotError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("participant {0} is already registered")]
    DuplicateParticipant(ParticipantId),
}

impl SlotError {
    /// The validation kind, when this is a validation failure.
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            SlotError::Validation(err) => Some(err.kind),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
