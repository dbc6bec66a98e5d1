//! # Demo Data
//!
//! A small three-person team with two weeks of assessments, used to
//! populate a fresh store for demos and local development.

use crate::{
    EntityKind, NewAssessment, NewSkill, NewSnapshot, NewTeamMember, SkillLevel, SkillStore,
    SkillboardError,
};
use chrono::{Duration, NaiveDate};

/// (name, role, initials, avatar color)
const MEMBERS: [(&str, &str, &str, &str); 3] = [
    ("John Doe", "Frontend Developer", "JD", "#4f46e5"),
    ("Jane Smith", "Backend Developer", "JS", "#06b6d4"),
    ("Bob Johnson", "Product Manager", "BJ", "#ec4899"),
];

/// (name, icon, icon color)
const SKILLS: [(&str, &str, &str); 7] = [
    ("JavaScript", "code-s-slash-line", "#f59e0b"),
    ("TypeScript", "code-s-slash-line", "#3b82f6"),
    ("React", "reactjs-line", "#06b6d4"),
    ("Node.js", "nodejs-line", "#10b981"),
    ("Python", "python-line", "#6366f1"),
    ("SQL", "database-2-line", "#8b5cf6"),
    ("Communication", "discuss-line", "#ec4899"),
];

/// Levels per member, in `SKILLS` order, one week ago.
const PREVIOUS_LEVELS: [[u8; 7]; 3] = [
    [3, 2, 3, 1, 0, 1, 2],
    [2, 2, 1, 3, 3, 3, 2],
    [1, 0, 1, 0, 1, 1, 3],
];

/// Levels per member, in `SKILLS` order, this week.
const CURRENT_LEVELS: [[u8; 7]; 3] = [
    [3, 3, 3, 2, 1, 1, 2],
    [2, 2, 2, 3, 3, 3, 3],
    [2, 1, 2, 1, 1, 2, 3],
];

/// What `load_demo_data` created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub members: usize,
    pub skills: usize,
    pub snapshots: usize,
    pub assessments: usize,
}

/// Populate an empty store with the demo team.
///
/// The current snapshot is dated `today`, the previous one a week earlier.
pub fn load_demo_data<S: SkillStore + ?Sized>(
    store: &mut S,
    today: NaiveDate,
) -> Result<SeedSummary, SkillboardError> {
    if !store.is_empty()? {
        return Err(SkillboardError::invalid(
            EntityKind::TeamMember,
            "store",
            "demo data can only be loaded into an empty store",
        ));
    }

    let mut members = Vec::with_capacity(MEMBERS.len());
    for (name, role, initials, color) in MEMBERS {
        let member = store.create_team_member(NewTeamMember {
            name: name.to_string(),
            role: role.to_string(),
            initials: initials.to_string(),
            avatar_color: color.to_string(),
        })?;
        members.push(member.id);
    }

    let mut skills = Vec::with_capacity(SKILLS.len());
    for (name, icon, color) in SKILLS {
        let skill = store.create_skill(NewSkill {
            name: name.to_string(),
            icon: icon.to_string(),
            icon_color: color.to_string(),
        })?;
        skills.push(skill.id);
    }

    let previous = store.create_snapshot(
        NewSnapshot {
            week_of: today - Duration::days(7),
        },
        false,
    )?;
    let current = store.create_snapshot(NewSnapshot { week_of: today }, true)?;

    let mut assessments = 0;
    for (snapshot, table) in [(previous.id, PREVIOUS_LEVELS), (current.id, CURRENT_LEVELS)] {
        for (member, levels) in members.iter().zip(table) {
            for (skill, level) in skills.iter().zip(levels) {
                store.upsert_assessment(NewAssessment {
                    team_member_id: *member,
                    skill_id: *skill,
                    snapshot_id: snapshot,
                    level: SkillLevel::try_from(level)?,
                })?;
                assessments += 1;
            }
        }
    }

    Ok(SeedSummary {
        members: members.len(),
        skills: skills.len(),
        snapshots: 2,
        assessments,
    })
}
