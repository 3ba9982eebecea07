//! Tests for ledger persistence.

use std::path::Path;
use std::thread;

use slot_engine::model::{NewInterval, Participant, Role};
use slot_engine::{
    InMemoryIntervalStore, Ledger, LedgerFile, NoopObserver, NotFoundError, ParticipantDirectory,
    Scheduler, SlotError, ValidationKind,
};

/// Helper: one locked load → add → commit cycle, as a CLI invocation runs it.
fn add_under_lock(path: &Path, who: &str, date: &str, start: &str, end: &str) {
    let file = LedgerFile::open(path).unwrap();
    let (directory, store) = file.load().unwrap().restore().unwrap();
    let s = Scheduler::with_observer(store, directory, NoopObserver);
    s.add_availability(&who.into(), NewInterval::parse(date, start, end).unwrap())
        .unwrap();
    file.commit(&Ledger::capture(s.lookup(), s.store()).unwrap())
        .unwrap();
}

#[test]
fn missing_file_loads_as_empty_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Ledger::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(ledger, Ledger::default());
}

#[test]
fn saved_state_restores_and_still_matches() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let directory = ParticipantDirectory::new();
    directory
        .register(Participant::new("c", Role::Candidate))
        .unwrap();
    directory
        .register(Participant::new("i", Role::Interviewer).with_name("Ivy"))
        .unwrap();
    let s = Scheduler::with_observer(InMemoryIntervalStore::new(), directory, NoopObserver);
    s.add_availability(&"c".into(), NewInterval::parse("2025-05-03", "09:00", "10:00").unwrap())
        .unwrap();
    s.add_availability(&"i".into(), NewInterval::parse("2025-05-03", "08:00", "18:00").unwrap())
        .unwrap();
    Ledger::capture(s.lookup(), s.store())
        .unwrap()
        .save(&path)
        .unwrap();

    let (directory, store) = Ledger::load(&path).unwrap().restore().unwrap();
    assert_eq!(directory.list().unwrap().len(), 2);
    let restored = Scheduler::with_observer(store, directory, NoopObserver);
    let slots = restored
        .find_available_slots(&"c".into(), &["i".into()])
        .unwrap();
    assert_eq!(slots.len(), 1);
}

#[test]
fn overlapping_intervals_in_file_are_refused() {
    let raw = r#"{
        "participants": [{"id": "i", "role": "interviewer"}],
        "intervals": [
            {"participantId": "i", "role": "interviewer", "date": "2025-05-03", "startTime": "09:00:00", "endTime": "12:00:00"},
            {"participantId": "i", "role": "interviewer", "date": "2025-05-03", "startTime": "11:00:00", "endTime": "13:00:00"}
        ]
    }"#;
    let ledger: Ledger = serde_json::from_str(raw).unwrap();
    let err = ledger.restore().unwrap_err();
    assert_eq!(err.validation_kind(), Some(ValidationKind::Overlap));
}

#[test]
fn interval_with_unknown_owner_is_refused() {
    let raw = r#"{
        "intervals": [
            {"participantId": "x", "role": "candidate", "date": "2025-05-03", "startTime": "09:00:00", "endTime": "10:00:00"}
        ]
    }"#;
    let ledger: Ledger = serde_json::from_str(raw).unwrap();
    let err = ledger.restore().unwrap_err();
    assert!(matches!(err, SlotError::NotFound(NotFoundError::Participant(_))));
}

#[test]
fn stored_role_is_replaced_by_owner_role() {
    // A candidate interval mislabelled as interviewer still gets the one-hour rule.
    let raw = r#"{
        "participants": [{"id": "c", "role": "candidate"}],
        "intervals": [
            {"participantId": "c", "role": "interviewer", "date": "2025-05-03", "startTime": "09:00:00", "endTime": "12:00:00"}
        ]
    }"#;
    let ledger: Ledger = serde_json::from_str(raw).unwrap();
    let err = ledger.restore().unwrap_err();
    assert_eq!(err.validation_kind(), Some(ValidationKind::InvalidDuration));
}

// ─────────────────────────────────────────────────────────────────────────────
// Concurrent writers and atomic replacement
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn concurrent_locked_adds_all_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    Ledger {
        participants: vec![Participant::new("i", Role::Interviewer)],
        intervals: vec![],
    }
    .save(&path)
    .unwrap();

    let days: Vec<String> = (1..=8).map(|d| format!("2025-05-{d:02}")).collect();
    thread::scope(|scope| {
        for day in &days {
            let path = &path;
            scope.spawn(move || add_under_lock(path, "i", day, "09:00", "17:00"));
        }
    });

    let saved = Ledger::load(&path).unwrap();
    assert_eq!(saved.intervals.len(), days.len());
    assert_eq!(saved.participants.len(), 1);
}

#[test]
fn lock_is_released_when_handle_drops() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");

    let first = LedgerFile::open(&path).unwrap();
    drop(first);
    let second = LedgerFile::open(&path).unwrap();
    assert_eq!(second.path(), path.as_path());
    assert_eq!(second.load().unwrap(), Ledger::default());
}

#[test]
fn save_replaces_longer_file_completely() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    let many = Ledger {
        participants: (0..20)
            .map(|n| Participant::new(format!("i{n}"), Role::Interviewer))
            .collect(),
        intervals: vec![],
    };
    many.save(&path).unwrap();

    let few = Ledger {
        participants: vec![Participant::new("c", Role::Candidate)],
        intervals: vec![],
    };
    few.save(&path).unwrap();

    assert_eq!(Ledger::load(&path).unwrap(), few);
}

#[test]
fn commit_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.json");
    let file = LedgerFile::open(&path).unwrap();
    file.commit(&Ledger::default()).unwrap();
    file.commit(&Ledger::default()).unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["ledger.json", "ledger.json.lock"]);
}
