//! Skills ranked by current average level.

use super::LevelTotals;
use crate::{SkillId, SkillStore, SkillboardError, Tenths};
use serde::{Deserialize, Serialize};

/// One ranked skill.
///
/// `growth` is the *percentage* change of the average since the previous
/// snapshot, 0 when the previous average was 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSkill {
    pub id: SkillId,
    pub name: String,
    pub icon: String,
    pub icon_color: String,
    pub average_level: Tenths,
    pub growth: Tenths,
}

/// All skills, highest current average first. Empty without a current snapshot.
pub fn top_skills<S: SkillStore + ?Sized>(store: &S) -> Result<Vec<TopSkill>, SkillboardError> {
    let Some(current) = store.current_snapshot()? else {
        return Ok(Vec::new());
    };
    let previous = store.previous_snapshot()?;
    let team_size = store.team_members()?.len();

    let now = LevelTotals::load(store, Some(&current))?;
    let before = LevelTotals::load(store, previous.as_ref())?;

    let mut ranked: Vec<TopSkill> = store
        .skills()?
        .into_iter()
        .map(|skill| {
            let average_level = now.skill_average(skill.id, team_size);
            let previous_level = before.skill_average(skill.id, team_size);
            TopSkill {
                id: skill.id,
                name: skill.name,
                icon: skill.icon,
                icon_color: skill.icon_color,
                average_level,
                growth: Tenths::percent_change(average_level, previous_level),
            }
        })
        .collect();

    // Stable: ties keep skill order.
    ranked.sort_by(|a, b| b.average_level.cmp(&a.average_level));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::team;

    #[test]
    fn sorted_by_average_descending() {
        let mut t = team(2, &["A", "B", "C"]);
        let current = t.snapshot(8, true);
        t.assess_all(0, current, &[1, 1]);
        t.assess_all(1, current, &[3, 2]);
        t.assess_all(2, current, &[1, 1]);

        let names: Vec<String> = top_skills(&t.store)
            .expect("top")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn growth_is_percentage_of_previous() {
        let mut t = team(3, &["X"]);
        let previous = t.snapshot(1, false);
        let current = t.snapshot(8, true);
        t.assess_all(0, previous, &[1, 1, 1]);
        t.assess_all(0, current, &[2, 1, 1]);

        let top = top_skills(&t.store).expect("top");
        assert_eq!(top[0].average_level, Tenths::from_tenths(13));
        assert_eq!(top[0].growth, Tenths::from_whole(30));
    }

    #[test]
    fn growth_from_nothing_is_zero() {
        let mut t = team(2, &["X"]);
        t.snapshot(1, false);
        let current = t.snapshot(8, true);
        t.assess_all(0, current, &[3, 2]);

        let top = top_skills(&t.store).expect("top");
        assert_eq!(top[0].average_level, Tenths::from_tenths(25));
        assert!(top[0].growth.is_zero());
    }

    #[test]
    fn empty_without_current_snapshot() {
        let mut t = team(2, &["X"]);
        t.snapshot(1, false);
        assert!(top_skills(&t.store).expect("top").is_empty());
    }
}
