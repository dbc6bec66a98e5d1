//! # Board Module
//!
//! A `Board` owns one storage backend and exposes the store together with
//! the aggregation and report views computed over it.
//!
//! ## Storage Backends
//!
//! - `InMemory`: `MemoryStore` (fast, volatile)
//! - `Persistent`: `RedbStore` (disk-backed, ACID)

use crate::aggregate::{
    self, GrowthPerSkill, SkillMatrix, TeamStats, TopSkill, WeeklyComparison,
};
use crate::report::{self, TeamReport};
use crate::seed::{self, SeedSummary};
use crate::storage::RedbStore;
use crate::{MemoryStore, SkillStore, SkillboardError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Storage backend for a Board.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

/// Row counts and the current week, for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub team_members: usize,
    pub skills: usize,
    pub snapshots: usize,
    pub assessments: usize,
    pub current_week: Option<NaiveDate>,
}

/// The skill board: a store plus the views derived from it.
///
/// Board does not implement Clone; a redb handle cannot be duplicated.
#[derive(Debug, Default)]
pub struct Board {
    backend: StorageBackend,
}

impl Board {
    /// Create a new empty board with in-memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board over an existing in-memory store.
    #[must_use]
    pub fn with_store(store: MemoryStore) -> Self {
        Self {
            backend: StorageBackend::InMemory(store),
        }
    }

    /// Create a board with persistent redb storage at `path`.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, SkillboardError> {
        Ok(Self {
            backend: StorageBackend::Persistent(RedbStore::open(path)?),
        })
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    /// Get a reference to the storage backend.
    #[must_use]
    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// The store, whichever backend holds it.
    pub fn store(&self) -> &dyn SkillStore {
        match &self.backend {
            StorageBackend::InMemory(store) => store,
            StorageBackend::Persistent(store) => store,
        }
    }

    /// Mutable access to the store.
    pub fn store_mut(&mut self) -> &mut dyn SkillStore {
        match &mut self.backend {
            StorageBackend::InMemory(store) => store,
            StorageBackend::Persistent(store) => store,
        }
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    pub fn skill_matrix(&self) -> Result<SkillMatrix, SkillboardError> {
        aggregate::skill_matrix(self.store())
    }

    pub fn weekly_comparison(&self) -> Result<WeeklyComparison, SkillboardError> {
        aggregate::weekly_comparison(self.store())
    }

    pub fn growth_per_skill(&self) -> Result<GrowthPerSkill, SkillboardError> {
        aggregate::growth_per_skill(self.store())
    }

    pub fn team_stats(&self) -> Result<TeamStats, SkillboardError> {
        aggregate::team_stats(self.store())
    }

    pub fn top_skills(&self) -> Result<Vec<TopSkill>, SkillboardError> {
        aggregate::top_skills(self.store())
    }

    pub fn weekly_report(&self, now: DateTime<Utc>) -> Result<TeamReport, SkillboardError> {
        report::weekly_report(self.store(), now)
    }

    pub fn monthly_report(&self, now: DateTime<Utc>) -> Result<TeamReport, SkillboardError> {
        report::monthly_report(self.store(), now)
    }

    /// Load the demo team. Fails unless the board is empty.
    pub fn seed_demo(&mut self, today: NaiveDate) -> Result<SeedSummary, SkillboardError> {
        seed::load_demo_data(self.store_mut(), today)
    }

    /// Counts of every entity kind plus the current week.
    pub fn summary(&self) -> Result<BoardSummary, SkillboardError> {
        let store = self.store();
        Ok(BoardSummary {
            team_members: store.team_members()?.len(),
            skills: store.skills()?.len(),
            snapshots: store.snapshots()?.len(),
            assessments: store.assessments()?.len(),
            current_week: store.current_snapshot()?.map(|s| s.week_of),
        })
    }
}
