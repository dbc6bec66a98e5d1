//! Current week vs. previous week, per skill.

use super::LevelTotals;
use crate::{Skill, SkillStore, SkillboardError, Tenths};
use serde::{Deserialize, Serialize};

/// Per-skill averages for the current and previous snapshot.
///
/// `current_week[i]` and `previous_week[i]` belong to `skills[i]`. Both
/// arrays are empty when there is no current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyComparison {
    pub skills: Vec<Skill>,
    pub current_week: Vec<Tenths>,
    pub previous_week: Vec<Tenths>,
}

/// Compare the current snapshot with the previous one.
pub fn weekly_comparison<S: SkillStore + ?Sized>(
    store: &S,
) -> Result<WeeklyComparison, SkillboardError> {
    let skills = store.skills()?;
    let Some(current) = store.current_snapshot()? else {
        return Ok(WeeklyComparison {
            skills,
            current_week: Vec::new(),
            previous_week: Vec::new(),
        });
    };
    let previous = store.previous_snapshot()?;
    let team_size = store.team_members()?.len();

    let now = LevelTotals::load(store, Some(&current))?;
    let before = LevelTotals::load(store, previous.as_ref())?;

    let current_week = skills
        .iter()
        .map(|s| now.skill_average(s.id, team_size))
        .collect();
    let previous_week = skills
        .iter()
        .map(|s| before.skill_average(s.id, team_size))
        .collect();

    Ok(WeeklyComparison {
        skills,
        current_week,
        previous_week,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::fixtures::team;

    #[test]
    fn missing_assessment_counts_as_zero() {
        let mut t = team(3, &["X"]);
        let current = t.snapshot(8, true);
        t.assess(0, 0, current, 3);
        t.assess(1, 0, current, 1);

        let cmp = weekly_comparison(&t.store).expect("comparison");
        assert_eq!(cmp.current_week, vec![Tenths::from_tenths(13)]);
        assert_eq!(cmp.previous_week, vec![Tenths::ZERO]);
    }

    #[test]
    fn pairs_current_with_previous_week() {
        let mut t = team(3, &["X", "Y"]);
        let previous = t.snapshot(1, false);
        let current = t.snapshot(8, true);
        t.assess_all(0, previous, &[1, 1, 1]);
        t.assess_all(0, current, &[2, 1, 1]);

        let cmp = weekly_comparison(&t.store).expect("comparison");
        assert_eq!(
            cmp.current_week,
            vec![Tenths::from_tenths(13), Tenths::ZERO]
        );
        assert_eq!(
            cmp.previous_week,
            vec![Tenths::from_whole(1), Tenths::ZERO]
        );
    }

    #[test]
    fn previous_is_by_date_not_insertion() {
        let mut t = team(1, &["X"]);
        let older = t.snapshot(1, false);
        let current = t.snapshot(15, true);
        // Created last, but dated after the current week.
        let later = t.snapshot(22, false);
        t.assess(0, 0, older, 1);
        t.assess(0, 0, current, 2);
        t.assess(0, 0, later, 3);

        let cmp = weekly_comparison(&t.store).expect("comparison");
        assert_eq!(cmp.previous_week, vec![Tenths::from_whole(1)]);
    }

    #[test]
    fn no_current_snapshot_gives_empty_weeks() {
        let t = team(2, &["X"]);
        let cmp = weekly_comparison(&t.store).expect("comparison");
        assert_eq!(cmp.skills.len(), 1);
        assert!(cmp.current_week.is_empty());
        assert!(cmp.previous_week.is_empty());
    }
}
