//! # Aggregation Benchmarks
//!
//! Performance benchmarks for the skillboard-core views.
//!
//! Run with: `cargo bench -p skillboard-core`

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use skillboard_core::{
    MemoryStore, NewAssessment, NewSkill, NewSnapshot, NewTeamMember, SkillLevel, SkillStore,
    growth_per_skill, monthly_report, skill_matrix, team_stats, top_skills, weekly_comparison,
};
use std::hint::black_box;

/// A team of `members` people, `skills` skills and `weeks` fully assessed snapshots.
fn create_board(members: usize, skills: usize, weeks: usize) -> MemoryStore {
    let mut store = MemoryStore::new();
    let member_ids: Vec<_> = (0..members)
        .map(|i| {
            store
                .create_team_member(NewTeamMember {
                    name: format!("Member {}", i),
                    role: "Engineer".into(),
                    initials: "M".into(),
                    avatar_color: "#4f46e5".into(),
                })
                .expect("member")
                .id
        })
        .collect();
    let skill_ids: Vec<_> = (0..skills)
        .map(|i| {
            store
                .create_skill(NewSkill {
                    name: format!("Skill {}", i),
                    icon: "code".into(),
                    icon_color: "#f59e0b".into(),
                })
                .expect("skill")
                .id
        })
        .collect();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    for week in 0..weeks {
        let snapshot = store
            .create_snapshot(
                NewSnapshot {
                    week_of: start + Duration::weeks(week as i64),
                },
                week + 1 == weeks,
            )
            .expect("snapshot")
            .id;
        for (m, member) in member_ids.iter().enumerate() {
            for (s, skill) in skill_ids.iter().enumerate() {
                let level = SkillLevel::ALL[(m + s + week) % SkillLevel::ALL.len()];
                store
                    .upsert_assessment(NewAssessment {
                        team_member_id: *member,
                        skill_id: *skill,
                        snapshot_id: snapshot,
                        level,
                    })
                    .expect("assessment");
            }
        }
    }
    store
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_views(c: &mut Criterion) {
    let mut group = c.benchmark_group("views");

    for size in [10, 50] {
        let store = create_board(size, size, 8);

        group.bench_with_input(BenchmarkId::new("skill_matrix", size), &store, |b, store| {
            b.iter(|| skill_matrix(black_box(store)).expect("matrix"));
        });
        group.bench_with_input(
            BenchmarkId::new("weekly_comparison", size),
            &store,
            |b, store| {
                b.iter(|| weekly_comparison(black_box(store)).expect("comparison"));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("growth_per_skill", size),
            &store,
            |b, store| {
                b.iter(|| growth_per_skill(black_box(store)).expect("growth"));
            },
        );
        group.bench_with_input(BenchmarkId::new("team_stats", size), &store, |b, store| {
            b.iter(|| team_stats(black_box(store)).expect("stats"));
        });
        group.bench_with_input(BenchmarkId::new("top_skills", size), &store, |b, store| {
            b.iter(|| top_skills(black_box(store)).expect("top"));
        });
    }

    group.finish();
}

fn bench_reports(c: &mut Criterion) {
    let store = create_board(25, 25, 12);
    let now = Utc
        .with_ymd_and_hms(2024, 3, 25, 12, 0, 0)
        .single()
        .expect("timestamp");

    c.bench_function("monthly_report", |b| {
        b.iter(|| monthly_report(black_box(&store), black_box(now)).expect("report"));
    });
}

fn bench_upsert(c: &mut Criterion) {
    c.bench_function("upsert_existing_assessment", |b| {
        let mut store = create_board(10, 10, 1);
        let row = store.assessments().expect("rows")[0].clone();
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let level = if flip {
                SkillLevel::Expert
            } else {
                SkillLevel::Unknown
            };
            store
                .upsert_assessment(NewAssessment {
                    team_member_id: row.team_member_id,
                    skill_id: row.skill_id,
                    snapshot_id: row.snapshot_id,
                    level,
                })
                .expect("upsert")
        });
    });
}

criterion_group!(benches, bench_views, bench_reports, bench_upsert);
criterion_main!(benches);
