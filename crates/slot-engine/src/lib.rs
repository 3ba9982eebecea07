//! # slot-engine
//!
//! Availability intervals and multi-party interview slot matching.
//!
//! Candidates register one-hour windows they are free; interviewers register
//! windows of any length. A candidate window is a matching slot when every
//! requested interviewer has a window on the same date that fully contains it.
//!
//! ## Modules
//!
//! - [`model`] — participants, intervals, slots and wire parsing
//! - [`validator`] — admission checks (alignment, ordering, duration, overlap)
//! - [`store`] — interval storage trait and in-memory implementation
//! - [`participants`] — participant lookup trait and in-memory directory
//! - [`matcher`] — the slot-matching algorithm and its observer hooks
//! - [`service`] — [`Scheduler`], the exposed write and match operations
//! - [`ledger`] — JSON persistence for the in-memory collaborators
//! - [`error`] — Error types

pub mod error;
pub mod ledger;
pub mod matcher;
pub mod model;
pub mod participants;
pub mod service;
pub mod store;
pub mod validator;

pub use error::{NotFoundError, SlotError, StorageError, ValidationError, ValidationKind};
pub use ledger::{Ledger, LedgerFile};
pub use matcher::{find_available_slots, match_slots, MatchObserver, NoopObserver, TracingObserver};
pub use model::{AvailabilityInterval, NewInterval, Participant, ParticipantId, Role, TimeSlot};
pub use participants::{ParticipantDirectory, ParticipantLookup};
pub use service::Scheduler;
pub use store::{InMemoryIntervalStore, IntervalStore};
pub use validator::validate;
