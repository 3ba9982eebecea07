//! Slot matching benchmarks.
//!
//! Run with: `cargo bench --bench matching -p slot-engine`

use std::collections::BTreeMap;
use std::hint::black_box;

use chrono::{NaiveDate, NaiveTime};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use slot_engine::model::{AvailabilityInterval, NewInterval, ParticipantId, Role};
use slot_engine::{match_slots, NoopObserver};

fn window(owner: &ParticipantId, role: Role, day: u32, start: u32, end: u32) -> AvailabilityInterval {
    AvailabilityInterval::new(
        owner.clone(),
        role,
        NewInterval::new(
            NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(end, 0, 0).unwrap(),
        ),
    )
}

/// A working week of hourly candidate slots against `reviewers` interviewers,
/// each free in two windows per day.
fn week(reviewers: usize) -> (
    Vec<AvailabilityInterval>,
    Vec<ParticipantId>,
    BTreeMap<ParticipantId, Vec<AvailabilityInterval>>,
) {
    let candidate = ParticipantId::new("cand");
    let requested: Vec<_> = (5..10)
        .flat_map(|day| (8..18).map(move |hour| (day, hour)))
        .map(|(day, hour)| window(&candidate, Role::Candidate, day, hour, hour + 1))
        .collect();

    let ids: Vec<_> = (0..reviewers)
        .map(|i| ParticipantId::new(format!("int-{i}")))
        .collect();
    let grouped = ids
        .iter()
        .map(|id| {
            let owned = (5..10)
                .flat_map(|day| {
                    [
                        window(id, Role::Interviewer, day, 9, 12),
                        window(id, Role::Interviewer, day, 13, 17),
                    ]
                })
                .collect();
            (id.clone(), owned)
        })
        .collect();

    (requested, ids, grouped)
}

fn bench_match_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_slots");
    for reviewers in [1usize, 3, 10] {
        let (requested, ids, grouped) = week(reviewers);
        group.bench_with_input(BenchmarkId::from_parameter(reviewers), &reviewers, |b, _| {
            b.iter(|| {
                match_slots(
                    black_box(&requested),
                    black_box(&ids),
                    black_box(&grouped),
                    &NoopObserver,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_match_slots);
criterion_main!(benches);
