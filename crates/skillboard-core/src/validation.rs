//! # Validation Module
//!
//! Turns raw write input (`*Fields`, every field optional) into validated
//! values before any store is touched.
//!
//! - Creation requires every mandatory field
//! - Updates check only the fields that are present
//! - All problems of one input are reported together as `FieldError`s
//!
//! Referential checks (does member 7 exist?) happen inside the store's write.

use crate::primitives::{
    MAX_COLOR_LENGTH, MAX_ICON_LENGTH, MAX_INITIALS_LENGTH, MAX_NAME_LENGTH,
    MAX_SETTING_KEY_LENGTH,
};
use crate::{
    AssessmentFields, AssessmentPatch, EntityKind, FieldError, MemberId, NewAssessment, NewSkill,
    NewSnapshot, NewTeamMember, SkillFields, SkillId, SkillLevel, SkillPatch, SkillboardError,
    SnapshotFields, SnapshotId, TeamMemberFields, TeamMemberPatch,
};
use chrono::{DateTime, NaiveDate};

/// Accumulates field errors for one input.
struct FieldCheck {
    kind: EntityKind,
    errors: Vec<FieldError>,
}

impl FieldCheck {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            errors: Vec::new(),
        }
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// A present text value must be non-blank and at most `max` characters.
    fn text(&mut self, field: &str, value: Option<&String>, max: usize) -> Option<String> {
        let trimmed = value?.trim();
        if trimmed.is_empty() {
            self.reject(field, "must not be empty");
            return None;
        }
        if trimmed.chars().count() > max {
            self.reject(field, format!("must be at most {} characters", max));
            return None;
        }
        Some(trimmed.to_string())
    }

    fn required_text(&mut self, field: &str, value: Option<&String>, max: usize) -> Option<String> {
        if value.is_none() {
            self.reject(field, "is required");
            return None;
        }
        self.text(field, value, max)
    }

    fn id(&mut self, field: &str, value: Option<u64>) -> Option<u64> {
        match value? {
            0 => {
                self.reject(field, "must be a positive id");
                None
            }
            id => Some(id),
        }
    }

    fn required_id(&mut self, field: &str, value: Option<u64>) -> Option<u64> {
        if value.is_none() {
            self.reject(field, "is required");
            return None;
        }
        self.id(field, value)
    }

    fn level(&mut self, value: Option<i64>) -> Option<SkillLevel> {
        let raw = value?;
        let level = SkillLevel::from_i64(raw);
        if level.is_none() {
            self.reject("level", "must be one of 0, 1, 2, 3");
        }
        level
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, SkillboardError> {
        match value {
            Some(v) if self.errors.is_empty() => Ok(v),
            _ => Err(SkillboardError::ValidationFailed {
                kind: self.kind,
                errors: self.errors,
            }),
        }
    }
}

/// Parse a `weekOf` value: a plain date or an RFC 3339 timestamp (UTC date).
#[must_use]
pub fn parse_week_of(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.to_utc().date_naive())
        })
}

/// Validated team member for creation.
pub fn new_team_member(fields: &TeamMemberFields) -> Result<NewTeamMember, SkillboardError> {
    let mut check = FieldCheck::new(EntityKind::TeamMember);
    let name = check.required_text("name", fields.name.as_ref(), MAX_NAME_LENGTH);
    let role = check.required_text("role", fields.role.as_ref(), MAX_NAME_LENGTH);
    let initials = check.required_text("initials", fields.initials.as_ref(), MAX_INITIALS_LENGTH);
    let avatar_color =
        check.required_text("avatarColor", fields.avatar_color.as_ref(), MAX_COLOR_LENGTH);

    let member = match (name, role, initials, avatar_color) {
        (Some(name), Some(role), Some(initials), Some(avatar_color)) => Some(NewTeamMember {
            name,
            role,
            initials,
            avatar_color,
        }),
        _ => None,
    };
    check.finish(member)
}

/// Validated partial update of a team member.
pub fn team_member_patch(fields: &TeamMemberFields) -> Result<TeamMemberPatch, SkillboardError> {
    let mut check = FieldCheck::new(EntityKind::TeamMember);
    let patch = TeamMemberPatch {
        name: check.text("name", fields.name.as_ref(), MAX_NAME_LENGTH),
        role: check.text("role", fields.role.as_ref(), MAX_NAME_LENGTH),
        initials: check.text("initials", fields.initials.as_ref(), MAX_INITIALS_LENGTH),
        avatar_color: check.text("avatarColor", fields.avatar_color.as_ref(), MAX_COLOR_LENGTH),
    };
    check.finish(Some(patch))
}

/// Validated skill for creation.
pub fn new_skill(fields: &SkillFields) -> Result<NewSkill, SkillboardError> {
    let mut check = FieldCheck::new(EntityKind::Skill);
    let name = check.required_text("name", fields.name.as_ref(), MAX_NAME_LENGTH);
    let icon = check.required_text("icon", fields.icon.as_ref(), MAX_ICON_LENGTH);
    let icon_color =
        check.required_text("iconColor", fields.icon_color.as_ref(), MAX_COLOR_LENGTH);

    let skill = match (name, icon, icon_color) {
        (Some(name), Some(icon), Some(icon_color)) => Some(NewSkill {
            name,
            icon,
            icon_color,
        }),
        _ => None,
    };
    check.finish(skill)
}

/// Validated partial update of a skill.
pub fn skill_patch(fields: &SkillFields) -> Result<SkillPatch, SkillboardError> {
    let mut check = FieldCheck::new(EntityKind::Skill);
    let patch = SkillPatch {
        name: check.text("name", fields.name.as_ref(), MAX_NAME_LENGTH),
        icon: check.text("icon", fields.icon.as_ref(), MAX_ICON_LENGTH),
        icon_color: check.text("iconColor", fields.icon_color.as_ref(), MAX_COLOR_LENGTH),
    };
    check.finish(Some(patch))
}

/// Validated snapshot. Used for creation and for moving a snapshot's week.
pub fn new_snapshot(fields: &SnapshotFields) -> Result<NewSnapshot, SkillboardError> {
    let mut check = FieldCheck::new(EntityKind::Snapshot);
    let week_of = match fields.week_of.as_deref() {
        None => {
            check.reject("weekOf", "is required");
            None
        }
        Some(raw) => {
            let parsed = parse_week_of(raw);
            if parsed.is_none() {
                check.reject("weekOf", "must be a date (YYYY-MM-DD) or RFC 3339 timestamp");
            }
            parsed
        }
    };
    check.finish(week_of.map(|week_of| NewSnapshot { week_of }))
}

/// Validated assessment for upsert. `level` defaults to Unknown.
pub fn new_assessment(fields: &AssessmentFields) -> Result<NewAssessment, SkillboardError> {
    let mut check = FieldCheck::new(EntityKind::Assessment);
    let member = check.required_id("teamMemberId", fields.team_member_id);
    let skill = check.required_id("skillId", fields.skill_id);
    let snapshot = check.required_id("snapshotId", fields.snapshot_id);
    let level = match fields.level {
        None => Some(SkillLevel::Unknown),
        present => check.level(present),
    };

    let assessment = match (member, skill, snapshot, level) {
        (Some(member), Some(skill), Some(snapshot), Some(level)) => Some(NewAssessment {
            team_member_id: MemberId(member),
            skill_id: SkillId(skill),
            snapshot_id: SnapshotId(snapshot),
            level,
        }),
        _ => None,
    };
    check.finish(assessment)
}

/// Validated partial update of an assessment.
pub fn assessment_patch(fields: &AssessmentFields) -> Result<AssessmentPatch, SkillboardError> {
    let mut check = FieldCheck::new(EntityKind::Assessment);
    let patch = AssessmentPatch {
        team_member_id: check.id("teamMemberId", fields.team_member_id).map(MemberId),
        skill_id: check.id("skillId", fields.skill_id).map(SkillId),
        snapshot_id: check.id("snapshotId", fields.snapshot_id).map(SnapshotId),
        level: check.level(fields.level),
    };
    check.finish(Some(patch))
}

/// Validated settings key.
pub fn setting_key(key: &str) -> Result<String, SkillboardError> {
    let mut check = FieldCheck::new(EntityKind::Setting);
    let owned = key.to_string();
    let key = check.required_text("key", Some(&owned), MAX_SETTING_KEY_LENGTH);
    check.finish(key)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(err: &SkillboardError) -> Vec<String> {
        match err {
            SkillboardError::ValidationFailed { errors, .. } => {
                errors.iter().map(|e| e.field.clone()).collect()
            }
            other => vec![format!("unexpected: {}", other)],
        }
    }

    #[test]
    fn team_member_requires_all_fields() {
        let err = new_team_member(&TeamMemberFields::default()).expect_err("must fail");
        assert_eq!(
            field_names(&err),
            vec!["name", "role", "initials", "avatarColor"]
        );
    }

    #[test]
    fn team_member_fields_are_trimmed() {
        let fields = TeamMemberFields {
            name: Some("  Ada Lovelace ".into()),
            role: Some("Engineer".into()),
            initials: Some("AL".into()),
            avatar_color: Some("#4f46e5".into()),
        };
        let member = new_team_member(&fields).expect("valid");
        assert_eq!(member.name, "Ada Lovelace");
    }

    #[test]
    fn initials_have_a_length_limit() {
        let fields = TeamMemberFields {
            initials: Some("ABCDE".into()),
            ..TeamMemberFields::default()
        };
        let err = team_member_patch(&fields).expect_err("too long");
        assert_eq!(field_names(&err), vec!["initials"]);
    }

    #[test]
    fn empty_patch_is_valid() {
        let patch = skill_patch(&SkillFields::default()).expect("valid");
        assert_eq!(patch, SkillPatch::default());
    }

    #[test]
    fn blank_skill_name_is_rejected() {
        let fields = SkillFields {
            name: Some("   ".into()),
            icon: Some("code".into()),
            icon_color: Some("#fff".into()),
        };
        let err = new_skill(&fields).expect_err("blank");
        assert_eq!(field_names(&err), vec!["name"]);
    }

    #[test]
    fn assessment_level_outside_range_is_rejected() {
        for level in [-1, 4, 99] {
            let fields = AssessmentFields {
                team_member_id: Some(1),
                skill_id: Some(1),
                snapshot_id: Some(1),
                level: Some(level),
            };
            let err = new_assessment(&fields).expect_err("out of range");
            assert_eq!(field_names(&err), vec!["level"]);
        }
    }

    #[test]
    fn assessment_level_defaults_to_unknown() {
        let fields = AssessmentFields {
            team_member_id: Some(1),
            skill_id: Some(2),
            snapshot_id: Some(3),
            level: None,
        };
        let assessment = new_assessment(&fields).expect("valid");
        assert_eq!(assessment.level, SkillLevel::Unknown);
        assert_eq!(assessment.skill_id, SkillId(2));
    }

    #[test]
    fn assessment_requires_references() {
        let fields = AssessmentFields {
            level: Some(2),
            snapshot_id: Some(0),
            ..AssessmentFields::default()
        };
        let err = new_assessment(&fields).expect_err("missing ids");
        assert_eq!(
            field_names(&err),
            vec!["teamMemberId", "skillId", "snapshotId"]
        );
    }

    #[test]
    fn week_of_accepts_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 4);
        assert_eq!(parse_week_of("2024-03-04"), expected);
        assert_eq!(parse_week_of("2024-03-04T10:00:00Z"), expected);
        assert_eq!(parse_week_of("last week"), None);
    }

    #[test]
    fn snapshot_requires_week_of() {
        let err = new_snapshot(&SnapshotFields::default()).expect_err("missing");
        assert_eq!(field_names(&err), vec!["weekOf"]);

        let bad = SnapshotFields {
            week_of: Some("2024-13-40".into()),
        };
        assert!(new_snapshot(&bad).is_err());
    }

    #[test]
    fn setting_key_must_not_be_blank() {
        assert!(setting_key(" ").is_err());
        assert_eq!(setting_key("theme").expect("valid"), "theme");
    }
}
