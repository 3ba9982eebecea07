//! JSON persistence for the in-memory directory and store.
//!
//! Loading replays every interval through the validator, so a hand-edited
//! ledger cannot smuggle in an interval that the write path would refuse.
//!
//! A read-modify-write cycle must go through [`LedgerFile`], which holds an
//! exclusive lock on a `<ledger>.lock` sidecar for its whole lifetime. Saves
//! write a temporary file in the same directory and rename it over the ledger,
//! so readers see either the old or the new contents, never a partial write.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{NotFoundError, Result, StorageError};
use crate::model::{AvailabilityInterval, Participant};
use crate::participants::{ParticipantDirectory, ParticipantLookup};
use crate::store::{InMemoryIntervalStore, IntervalStore};
use crate::validator;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub intervals: Vec<AvailabilityInterval>,
}

impl Ledger {
    /// Read a ledger file. A missing file is an empty ledger.
    pub fn load(path: &Path) -> std::result::Result<Self, StorageError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Atomically replace the file at `path` with this ledger.
    ///
    /// Does not lock; concurrent writers must coordinate through [`LedgerFile`].
    pub fn save(&self, path: &Path) -> std::result::Result<(), StorageError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|err| StorageError::Io(err.error))?;
        Ok(())
    }

    pub fn capture(
        directory: &ParticipantDirectory,
        store: &InMemoryIntervalStore,
    ) -> std::result::Result<Self, StorageError> {
        Ok(Self {
            participants: directory.list()?,
            intervals: store.snapshot()?,
        })
    }

    /// Rebuild the directory and store, re-checking every interval.
    ///
    /// # Errors
    /// Duplicate participant ids, intervals whose owner is unknown, and
    /// intervals the validator refuses are all reported as the write path
    /// would report them.
    pub fn restore(self) -> Result<(ParticipantDirectory, InMemoryIntervalStore)> {
        let directory = ParticipantDirectory::new();
        for participant in self.participants {
            directory.register(participant)?;
        }

        let store = InMemoryIntervalStore::new();
        for interval in self.intervals {
            let owner = directory
                .find_by_id(&interval.participant_id)?
                .ok_or_else(|| NotFoundError::Participant(interval.participant_id.clone()))?;
            let interval = AvailabilityInterval {
                role: owner.role,
                ..interval
            };
            let existing = store.query_by_participant(&interval.participant_id, None)?;
            validator::validate(&interval, &existing)?;
            store.insert(interval)?;
        }

        Ok((directory, store))
    }
}

/// Exclusive handle on a ledger path for one load → modify → commit cycle.
///
/// The lock is released when the handle is dropped (or the process exits).
#[derive(Debug)]
pub struct LedgerFile {
    path: PathBuf,
    _lock: File,
}

impl LedgerFile {
    /// Block until no other [`LedgerFile`] holds `path`, then take it.
    pub fn open(path: &Path) -> std::result::Result<Self, StorageError> {
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path(path))?;
        lock.lock()?;
        tracing::trace!(path = %path.display(), "ledger lock acquired");
        Ok(Self {
            path: path.to_path_buf(),
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> std::result::Result<Ledger, StorageError> {
        Ledger::load(&self.path)
    }

    pub fn commit(&self, ledger: &Ledger) -> std::result::Result<(), StorageError> {
        ledger.save(&self.path)
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
