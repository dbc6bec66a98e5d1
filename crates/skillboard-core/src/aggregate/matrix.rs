//! Skill matrix: the level of every member in every skill for the current week.

use crate::{
    MemberId, Skill, SkillId, SkillLevel, SkillStore, SkillboardError, TeamMember,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Members, skills and a `member -> skill -> level` grid.
///
/// With a current snapshot the grid is complete (missing pairs are
/// `Unknown`). Without one the grid is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatrix {
    pub members: Vec<TeamMember>,
    pub skills: Vec<Skill>,
    pub assessments: BTreeMap<MemberId, BTreeMap<SkillId, SkillLevel>>,
}

impl SkillMatrix {
    /// Level of one pair, `Unknown` when absent.
    #[must_use]
    pub fn level(&self, member: MemberId, skill: SkillId) -> SkillLevel {
        self.assessments
            .get(&member)
            .and_then(|row| row.get(&skill))
            .copied()
            .unwrap_or(SkillLevel::Unknown)
    }
}

/// Build the matrix for the current snapshot.
pub fn skill_matrix<S: SkillStore + ?Sized>(store: &S) -> Result<SkillMatrix, SkillboardError> {
    let members = store.team_members()?;
    let skills = store.skills()?;
    let Some(current) = store.current_snapshot()? else {
        return Ok(SkillMatrix {
            members,
            skills,
            assessments: BTreeMap::new(),
        });
    };

    let recorded: BTreeMap<(MemberId, SkillId), SkillLevel> = store
        .assessments_by_snapshot(current.id)?
        .into_iter()
        .map(|a| ((a.team_member_id, a.skill_id), a.level))
        .collect();

    let assessments = members
        .iter()
        .map(|member| {
            let row = skills
                .iter()
                .map(|skill| {
                    let level = recorded
                        .get(&(member.id, skill.id))
                        .copied()
                        .unwrap_or(SkillLevel::Unknown);
                    (skill.id, level)
                })
                .collect();
            (member.id, row)
        })
        .collect();

    Ok(SkillMatrix {
        members,
        skills,
        assessments,
    })
}
