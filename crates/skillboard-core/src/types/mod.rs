//! # Core Type Definitions
//!
//! This module contains the data model shared by every layer:
//! - Entity identifiers (`MemberId`, `SkillId`, `SnapshotId`, `AssessmentId`)
//! - Proficiency levels (`SkillLevel`)
//! - Stored entities (`TeamMember`, `Skill`, `WeeklySnapshot`, `SkillAssessment`, `Setting`)
//! - Write inputs (`*Fields` for raw input, `New*` for validated creations)
//! - Error types (`SkillboardError`, `FieldError`)
//!
//! ## Wire Format
//!
//! Entities serialize with camelCase field names. Identifiers are transparent
//! integers and `SkillLevel` is its ordinal (0-3).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

/// Identifier of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(pub u64);

/// Identifier of a weekly snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(pub u64);

/// Identifier of a single skill assessment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(pub u64);

// =============================================================================
// SKILL LEVEL
// =============================================================================

/// Ordinal proficiency of one member in one skill.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum SkillLevel {
    #[default]
    Unknown = 0,
    BasicKnowledge = 1,
    HandsOnExperience = 2,
    Expert = 3,
}

impl SkillLevel {
    /// All levels in ascending order.
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Unknown,
        SkillLevel::BasicKnowledge,
        SkillLevel::HandsOnExperience,
        SkillLevel::Expert,
    ];

    /// The ordinal value (0-3).
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Human-readable label shown on the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SkillLevel::Unknown => "Unknown",
            SkillLevel::BasicKnowledge => "Basic Knowledge",
            SkillLevel::HandsOnExperience => "Hands-on Experience",
            SkillLevel::Expert => "Expert",
        }
    }

    /// Convert an arbitrary integer into a level, if it is in range.
    #[must_use]
    pub fn from_i64(value: i64) -> Option<Self> {
        u8::try_from(value)
            .ok()
            .and_then(|v| Self::try_from(v).ok())
    }
}

impl TryFrom<u8> for SkillLevel {
    type Error = SkillboardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SkillLevel::Unknown),
            1 => Ok(SkillLevel::BasicKnowledge),
            2 => Ok(SkillLevel::HandsOnExperience),
            3 => Ok(SkillLevel::Expert),
            other => Err(SkillboardError::SerializationError(format!(
                "skill level {} is outside 0..=3",
                other
            ))),
        }
    }
}

impl From<SkillLevel> for u8 {
    fn from(level: SkillLevel) -> Self {
        level.value()
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// ENTITIES
// =============================================================================

/// A person whose skills are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub role: String,
    pub initials: String,
    pub avatar_color: String,
}

/// A tracked skill. Names are unique across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub icon: String,
    pub icon_color: String,
}

/// A point-in-time grouping of assessments, one per week.
///
/// At most one snapshot has `is_current_week == true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySnapshot {
    pub id: SnapshotId,
    pub week_of: NaiveDate,
    pub is_current_week: bool,
}

/// A (member, skill, snapshot) → level record.
///
/// Unique per (member, skill, snapshot) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillAssessment {
    pub id: AssessmentId,
    pub team_member_id: MemberId,
    pub skill_id: SkillId,
    pub snapshot_id: SnapshotId,
    pub level: SkillLevel,
}

impl SkillAssessment {
    /// The uniqueness key of this row.
    #[must_use]
    pub fn key(&self) -> AssessmentKey {
        AssessmentKey {
            team_member_id: self.team_member_id,
            skill_id: self.skill_id,
            snapshot_id: self.snapshot_id,
        }
    }
}

/// The (member, skill, snapshot) triple that identifies an assessment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssessmentKey {
    pub team_member_id: MemberId,
    pub skill_id: SkillId,
    pub snapshot_id: SnapshotId,
}

/// A key → arbitrary JSON value configuration entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: serde_json::Value,
}

// =============================================================================
// RAW INPUT (every field optional)
// =============================================================================

/// Raw team member fields, used for both creation and partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamMemberFields {
    pub name: Option<String>,
    pub role: Option<String>,
    pub initials: Option<String>,
    pub avatar_color: Option<String>,
}

/// Raw skill fields, used for both creation and partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillFields {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub icon_color: Option<String>,
}

/// Raw snapshot fields. `week_of` is parsed during validation so that a bad
/// date surfaces as a field error rather than a malformed body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotFields {
    pub week_of: Option<String>,
}

/// Raw assessment fields, used for both upsert and partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentFields {
    pub team_member_id: Option<u64>,
    pub skill_id: Option<u64>,
    pub snapshot_id: Option<u64>,
    pub level: Option<i64>,
}

// =============================================================================
// VALIDATED INPUT
// =============================================================================

/// A validated team member ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeamMember {
    pub name: String,
    pub role: String,
    pub initials: String,
    pub avatar_color: String,
}

/// A validated partial update of a team member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamMemberPatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub initials: Option<String>,
    pub avatar_color: Option<String>,
}

impl TeamMemberPatch {
    /// Apply the present fields to an existing member.
    pub fn apply(self, member: &mut TeamMember) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(role) = self.role {
            member.role = role;
        }
        if let Some(initials) = self.initials {
            member.initials = initials;
        }
        if let Some(color) = self.avatar_color {
            member.avatar_color = color;
        }
    }
}

/// A validated skill ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSkill {
    pub name: String,
    pub icon: String,
    pub icon_color: String,
}

/// A validated partial update of a skill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub icon_color: Option<String>,
}

impl SkillPatch {
    /// Apply the present fields to an existing skill.
    pub fn apply(self, skill: &mut Skill) {
        if let Some(name) = self.name {
            skill.name = name;
        }
        if let Some(icon) = self.icon {
            skill.icon = icon;
        }
        if let Some(color) = self.icon_color {
            skill.icon_color = color;
        }
    }
}

/// A validated snapshot ready to be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewSnapshot {
    pub week_of: NaiveDate,
}

/// A validated assessment. Creation upserts on the (member, skill, snapshot) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAssessment {
    pub team_member_id: MemberId,
    pub skill_id: SkillId,
    pub snapshot_id: SnapshotId,
    pub level: SkillLevel,
}

impl NewAssessment {
    /// The uniqueness key this assessment will occupy.
    #[must_use]
    pub fn key(&self) -> AssessmentKey {
        AssessmentKey {
            team_member_id: self.team_member_id,
            skill_id: self.skill_id,
            snapshot_id: self.snapshot_id,
        }
    }
}

/// A validated partial update of an assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssessmentPatch {
    pub team_member_id: Option<MemberId>,
    pub skill_id: Option<SkillId>,
    pub snapshot_id: Option<SnapshotId>,
    pub level: Option<SkillLevel>,
}

impl AssessmentPatch {
    /// The row as it would look after the patch.
    #[must_use]
    pub fn applied_to(&self, existing: &SkillAssessment) -> SkillAssessment {
        SkillAssessment {
            id: existing.id,
            team_member_id: self.team_member_id.unwrap_or(existing.team_member_id),
            skill_id: self.skill_id.unwrap_or(existing.skill_id),
            snapshot_id: self.snapshot_id.unwrap_or(existing.snapshot_id),
            level: self.level.unwrap_or(existing.level),
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// The kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    TeamMember,
    Skill,
    Snapshot,
    Assessment,
    Setting,
}

impl EntityKind {
    /// Lowercase human name ("team member", "skill", ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::TeamMember => "team member",
            EntityKind::Skill => "skill",
            EntityKind::Snapshot => "snapshot",
            EntityKind::Assessment => "assessment",
            EntityKind::Setting => "setting",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Wire name of the offending field (camelCase), or `body`.
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur in Skillboard.
///
/// "No current snapshot" is never an error; aggregates return empty views.
#[derive(Debug, Error)]
pub enum SkillboardError {
    /// The referenced entity does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: String },

    /// Input failed validation; every offending field is listed.
    #[error("invalid {kind} data: {} field error(s)", errors.len())]
    ValidationFailed {
        kind: EntityKind,
        errors: Vec<FieldError>,
    },

    /// The storage engine failed.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl SkillboardError {
    /// Shorthand for a missing entity.
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Shorthand for a single-field validation failure.
    pub fn invalid(
        kind: EntityKind,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ValidationFailed {
            kind,
            errors: vec![FieldError::new(field, message)],
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
