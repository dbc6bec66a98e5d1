//! # Aggregation Engine
//!
//! Read-only views derived from the raw rows of a `SkillStore`.
//!
//! Every view recomputes from the store on each call. When there is no
//! current snapshot the views degrade to empty or zero output; that state is
//! never an error.
//!
//! ## Averages
//!
//! Per-skill averages divide by the team size, not by the number of rows,
//! so a missing assessment counts as level 0. A skill with no rows at all in
//! a snapshot averages to exactly 0. The team-wide average is a flat mean
//! over every row of the snapshot.

mod comparison;
mod growth;
mod matrix;
mod ranking;
mod stats;

pub use comparison::{WeeklyComparison, weekly_comparison};
pub use growth::{GrowthPerSkill, growth_per_skill};
pub use matrix::{SkillMatrix, skill_matrix};
pub use ranking::{TopSkill, top_skills};
pub use stats::{TeamStats, team_stats};

use crate::{SkillAssessment, SkillId, SkillStore, SkillboardError, Tenths, WeeklySnapshot};
use std::collections::BTreeMap;

/// Level totals of one snapshot, per skill and overall.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct LevelTotals {
    /// skill -> (sum of levels, number of rows)
    by_skill: BTreeMap<SkillId, (u64, u64)>,
    sum: u64,
    rows: u64,
}

impl LevelTotals {
    pub(crate) fn from_rows(rows: &[SkillAssessment]) -> Self {
        let mut totals = Self::default();
        for row in rows {
            let level = u64::from(row.level.value());
            let entry = totals.by_skill.entry(row.skill_id).or_insert((0, 0));
            entry.0 += level;
            entry.1 += 1;
            totals.sum += level;
            totals.rows += 1;
        }
        totals
    }

    /// Load the totals of `snapshot`, or empty totals when there is none.
    pub(crate) fn load<S: SkillStore + ?Sized>(
        store: &S,
        snapshot: Option<&WeeklySnapshot>,
    ) -> Result<Self, SkillboardError> {
        match snapshot {
            Some(snapshot) => Ok(Self::from_rows(&store.assessments_by_snapshot(snapshot.id)?)),
            None => Ok(Self::default()),
        }
    }

    /// Team-size denominated average of one skill.
    pub(crate) fn skill_average(&self, skill: SkillId, team_size: usize) -> Tenths {
        match self.by_skill.get(&skill) {
            Some(&(sum, rows)) if rows > 0 => Tenths::average(sum, team_size as u64),
            _ => Tenths::ZERO,
        }
    }

    /// Flat mean over every row.
    pub(crate) fn flat_mean(&self) -> Tenths {
        Tenths::average(self.sum, self.rows)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows == 0
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssessmentId, MemberId, SkillLevel, SnapshotId};

    fn row(skill: u64, level: SkillLevel) -> SkillAssessment {
        SkillAssessment {
            id: AssessmentId(1),
            team_member_id: MemberId(1),
            skill_id: SkillId(skill),
            snapshot_id: SnapshotId(1),
            level,
        }
    }

    #[test]
    fn skill_average_uses_team_size() {
        let totals = LevelTotals::from_rows(&[
            row(1, SkillLevel::Expert),
            row(1, SkillLevel::BasicKnowledge),
        ]);
        assert_eq!(totals.skill_average(SkillId(1), 3), Tenths::from_tenths(13));
        assert_eq!(totals.skill_average(SkillId(2), 3), Tenths::ZERO);
    }

    #[test]
    fn flat_mean_uses_row_count() {
        let totals = LevelTotals::from_rows(&[
            row(1, SkillLevel::Expert),
            row(2, SkillLevel::BasicKnowledge),
        ]);
        assert_eq!(totals.flat_mean(), Tenths::from_whole(2));
        assert!(LevelTotals::default().flat_mean().is_zero());
        assert!(LevelTotals::default().is_empty());
    }

    #[test]
    fn unassessed_skill_is_zero_even_with_empty_team() {
        let totals = LevelTotals::from_rows(&[row(1, SkillLevel::Unknown)]);
        assert_eq!(totals.skill_average(SkillId(1), 0), Tenths::ZERO);
    }
}
