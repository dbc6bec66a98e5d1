//! Team-wide headline numbers.

use super::LevelTotals;
use crate::{MemberId, SkillId, SkillLevel, SkillStore, SkillboardError, Tenths};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Headline statistics for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub team_size: usize,
    pub total_skills: usize,
    /// Flat mean over every current-week row.
    pub avg_skill_level: Tenths,
    /// Skills where at least one member moved up.
    pub growth_areas: usize,
    /// Skills, not already growth areas, where someone stayed below Expert.
    pub stagnant_areas: usize,
    /// Current flat mean minus previous flat mean.
    pub avg_skill_level_change: Tenths,
}

/// Compute team statistics for the current snapshot.
pub fn team_stats<S: SkillStore + ?Sized>(store: &S) -> Result<TeamStats, SkillboardError> {
    let team_size = store.team_members()?.len();
    let total_skills = store.skills()?.len();

    let mut stats = TeamStats {
        team_size,
        total_skills,
        avg_skill_level: Tenths::ZERO,
        growth_areas: 0,
        stagnant_areas: 0,
        avg_skill_level_change: Tenths::ZERO,
    };

    let Some(current) = store.current_snapshot()? else {
        return Ok(stats);
    };
    let current_rows = store.assessments_by_snapshot(current.id)?;
    stats.avg_skill_level = LevelTotals::from_rows(&current_rows).flat_mean();

    let Some(previous) = store.previous_snapshot()? else {
        return Ok(stats);
    };
    let previous_rows = store.assessments_by_snapshot(previous.id)?;
    let previous_totals = LevelTotals::from_rows(&previous_rows);
    if !previous_totals.is_empty() {
        stats.avg_skill_level_change = stats.avg_skill_level.minus(previous_totals.flat_mean());
    }

    let before: BTreeMap<(MemberId, SkillId), SkillLevel> = previous_rows
        .iter()
        .map(|a| ((a.team_member_id, a.skill_id), a.level))
        .collect();

    let mut grown = BTreeSet::new();
    let mut flat = BTreeSet::new();
    for row in &current_rows {
        // Members without a previous row for this skill are not judged.
        let Some(&was) = before.get(&(row.team_member_id, row.skill_id)) else {
            continue;
        };
        if row.level > was {
            grown.insert(row.skill_id);
        } else if row.level == was && row.level < SkillLevel::Expert {
            flat.insert(row.skill_id);
        }
    }

    stats.growth_areas = grown.len();
    stats.stagnant_areas = flat.difference(&grown).count();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::team;

    #[test]
    fn growth_wins_over_stagnation() {
        let mut t = team(3, &["X"]);
        let previous = t.snapshot(1, false);
        let current = t.snapshot(8, true);
        t.assess_all(0, previous, &[1, 1, 1]);
        t.assess_all(0, current, &[2, 1, 1]);

        let stats = team_stats(&t.store).expect("stats");
        assert_eq!(stats.growth_areas, 1);
        assert_eq!(stats.stagnant_areas, 0);
    }

    #[test]
    fn experts_holding_level_are_not_stagnant() {
        let mut t = team(2, &["X", "Y"]);
        let previous = t.snapshot(1, false);
        let current = t.snapshot(8, true);
        t.assess_all(0, previous, &[3, 3]);
        t.assess_all(0, current, &[3, 3]);
        t.assess_all(1, previous, &[2, 1]);
        t.assess_all(1, current, &[2, 0]);

        let stats = team_stats(&t.store).expect("stats");
        assert_eq!(stats.growth_areas, 0);
        assert_eq!(stats.stagnant_areas, 1);
    }

    #[test]
    fn only_members_assessed_twice_are_judged() {
        let mut t = team(2, &["X"]);
        let previous = t.snapshot(1, false);
        let current = t.snapshot(8, true);
        t.assess(0, 0, previous, 1);
        // Member 1 is new this week; their level is not growth.
        t.assess(1, 0, current, 3);

        let stats = team_stats(&t.store).expect("stats");
        assert_eq!(stats.growth_areas, 0);
        assert_eq!(stats.stagnant_areas, 0);
    }

    #[test]
    fn average_is_flat_over_rows() {
        let mut t = team(3, &["X", "Y"]);
        let previous = t.snapshot(1, false);
        let current = t.snapshot(8, true);
        t.assess(0, 0, previous, 1);
        t.assess(0, 0, current, 3);
        t.assess(1, 1, current, 1);
        t.assess(2, 1, current, 1);

        let stats = team_stats(&t.store).expect("stats");
        assert_eq!(stats.team_size, 3);
        assert_eq!(stats.total_skills, 2);
        // (3 + 1 + 1) / 3 rows
        assert_eq!(stats.avg_skill_level, Tenths::from_tenths(17));
        assert_eq!(stats.avg_skill_level_change, Tenths::from_tenths(7));
    }

    #[test]
    fn no_current_snapshot_gives_zeros() {
        let t = team(4, &["X"]);
        let stats = team_stats(&t.store).expect("stats");
        assert_eq!(stats.team_size, 4);
        assert!(stats.avg_skill_level.is_zero());
        assert_eq!(stats.growth_areas + stats.stagnant_areas, 0);
        assert!(stats.avg_skill_level_change.is_zero());
    }
}
