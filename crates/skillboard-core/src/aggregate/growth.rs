//! Average level per skill over the most recent snapshots.

use super::LevelTotals;
use crate::primitives::GROWTH_HISTORY_SNAPSHOTS;
use crate::{Skill, SkillId, SkillStore, SkillboardError, Tenths, WeeklySnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Growth history, oldest snapshot first.
///
/// `data[skill][i]` is the average for `snapshots[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthPerSkill {
    pub skills: Vec<Skill>,
    pub snapshots: Vec<WeeklySnapshot>,
    pub data: BTreeMap<SkillId, Vec<Tenths>>,
}

/// Per-skill averages over the last `GROWTH_HISTORY_SNAPSHOTS` snapshots.
pub fn growth_per_skill<S: SkillStore + ?Sized>(
    store: &S,
) -> Result<GrowthPerSkill, SkillboardError> {
    let skills = store.skills()?;
    let team_size = store.team_members()?.len();

    // Newest first from the store; flipped for display.
    let mut snapshots: Vec<WeeklySnapshot> = store
        .snapshots()?
        .into_iter()
        .take(GROWTH_HISTORY_SNAPSHOTS)
        .collect();
    snapshots.reverse();

    let totals = snapshots
        .iter()
        .map(|s| LevelTotals::load(store, Some(s)))
        .collect::<Result<Vec<_>, _>>()?;

    let data = skills
        .iter()
        .map(|skill| {
            let series = totals
                .iter()
                .map(|t| t.skill_average(skill.id, team_size))
                .collect();
            (skill.id, series)
        })
        .collect();

    Ok(GrowthPerSkill {
        skills,
        snapshots,
        data,
    })
}
