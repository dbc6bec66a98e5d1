//! # skillboard-core
//!
//! The deterministic engine behind Skillboard, a team skill-tracking board.
//!
//! This crate records per-member, per-skill proficiency levels across weekly
//! snapshots and derives the views a dashboard renders from them: the skill
//! matrix, week-over-week comparison, growth history, team statistics, ranked
//! skills and weekly/monthly reports.
//!
//! ## Layers
//!
//! - `types` and `validation`: the data model and write-input checks
//! - `store` and `storage`: the `SkillStore` contract, in memory and on redb
//! - `aggregate` and `report`: read-only views over any `SkillStore`
//! - `board`: one backend plus its views, the entry point for the app
//!
//! ## Constraints
//!
//! - No async, no network, no logging: callers decide how to surface errors
//! - No floating point: averages are fixed-point tenths (`Tenths`)

// =============================================================================
// MODULES
// =============================================================================

pub mod aggregate;
pub mod board;
pub mod decimal;
pub mod primitives;
pub mod report;
pub mod seed;
pub mod storage;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AssessmentFields, AssessmentId, AssessmentKey, AssessmentPatch, EntityKind, FieldError,
    MemberId, NewAssessment, NewSkill, NewSnapshot, NewTeamMember, Setting, Skill,
    SkillAssessment, SkillFields, SkillId, SkillLevel, SkillPatch, SkillboardError,
    SnapshotFields, SnapshotId, TeamMember, TeamMemberFields, TeamMemberPatch, WeeklySnapshot,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use aggregate::{
    GrowthPerSkill, SkillMatrix, TeamStats, TopSkill, WeeklyComparison, growth_per_skill,
    skill_matrix, team_stats, top_skills, weekly_comparison,
};
pub use board::{Board, BoardSummary, StorageBackend};
pub use decimal::Tenths;
pub use report::{
    ReportKind, ReportPeriod, SkillProgress, TeamReport, monthly_report, weekly_report,
};
pub use seed::{SeedSummary, load_demo_data};
pub use storage::RedbStore;
pub use store::{IdCounters, MemoryStore, SkillStore};
