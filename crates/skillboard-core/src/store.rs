//! # Store Module
//!
//! The persistence contract for Skillboard and its in-memory implementation.
//!
//! `SkillStore` is implemented by both `MemoryStore` (this module) and
//! `RedbStore` (`storage` module). Aggregation and reporting only ever see
//! the trait, so both backends produce identical views.
//!
//! ## Write Invariants
//!
//! - At most one snapshot is current; creating a current snapshot clears the
//!   old flag in the same write.
//! - At most one assessment per (member, skill, snapshot); creating a
//!   duplicate updates the existing row's level.
//! - Deleting a member, skill or snapshot deletes its assessments.
//! - Skill names are unique.

use crate::{
    AssessmentId, AssessmentKey, AssessmentPatch, EntityKind, FieldError, MemberId,
    NewAssessment, NewSkill, NewSnapshot, NewTeamMember, Setting, Skill, SkillAssessment, SkillId,
    SkillPatch, SkillboardError, SnapshotId, TeamMember, TeamMemberPatch, WeeklySnapshot,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// SKILLSTORE TRAIT
// =============================================================================

/// The persistence operations the engine relies on.
///
/// Every write is atomic from the caller's perspective: either the whole
/// operation (including cascades and flag flips) is visible, or none of it.
pub trait SkillStore {
    /// All team members, ordered by id.
    fn team_members(&self) -> Result<Vec<TeamMember>, SkillboardError>;

    /// A single team member.
    fn team_member(&self, id: MemberId) -> Result<Option<TeamMember>, SkillboardError>;

    /// Insert a team member and assign it an id.
    fn create_team_member(&mut self, member: NewTeamMember)
    -> Result<TeamMember, SkillboardError>;

    /// Apply a partial update. Returns `None` if the member does not exist.
    fn update_team_member(
        &mut self,
        id: MemberId,
        patch: TeamMemberPatch,
    ) -> Result<Option<TeamMember>, SkillboardError>;

    /// Delete a member and all of its assessments. Returns whether it existed.
    fn delete_team_member(&mut self, id: MemberId) -> Result<bool, SkillboardError>;

    /// All skills, ordered by id.
    fn skills(&self) -> Result<Vec<Skill>, SkillboardError>;

    /// A single skill.
    fn skill(&self, id: SkillId) -> Result<Option<Skill>, SkillboardError>;

    /// Insert a skill. Fails validation if the name is taken.
    fn create_skill(&mut self, skill: NewSkill) -> Result<Skill, SkillboardError>;

    /// Apply a partial update. Returns `None` if the skill does not exist.
    fn update_skill(
        &mut self,
        id: SkillId,
        patch: SkillPatch,
    ) -> Result<Option<Skill>, SkillboardError>;

    /// Delete a skill and all of its assessments. Returns whether it existed.
    fn delete_skill(&mut self, id: SkillId) -> Result<bool, SkillboardError>;

    /// All snapshots, `week_of` descending (ties: id descending).
    fn snapshots(&self) -> Result<Vec<WeeklySnapshot>, SkillboardError>;

    /// A single snapshot.
    fn snapshot(&self, id: SnapshotId) -> Result<Option<WeeklySnapshot>, SkillboardError>;

    /// The snapshot flagged as the current week, if any.
    fn current_snapshot(&self) -> Result<Option<WeeklySnapshot>, SkillboardError>;

    /// Insert a snapshot. With `set_current`, the previous current snapshot
    /// loses its flag in the same write.
    fn create_snapshot(
        &mut self,
        snapshot: NewSnapshot,
        set_current: bool,
    ) -> Result<WeeklySnapshot, SkillboardError>;

    /// Move a snapshot to another week. Returns `None` if it does not exist.
    fn update_snapshot(
        &mut self,
        id: SnapshotId,
        snapshot: NewSnapshot,
    ) -> Result<Option<WeeklySnapshot>, SkillboardError>;

    /// Delete a snapshot and all of its assessments. Returns whether it existed.
    fn delete_snapshot(&mut self, id: SnapshotId) -> Result<bool, SkillboardError>;

    /// All assessments, ordered by id.
    fn assessments(&self) -> Result<Vec<SkillAssessment>, SkillboardError>;

    /// Insert an assessment, or update the level of the row already holding
    /// the same (member, skill, snapshot) key.
    fn upsert_assessment(
        &mut self,
        assessment: NewAssessment,
    ) -> Result<SkillAssessment, SkillboardError>;

    /// Apply a partial update. Returns `None` if the assessment does not exist.
    fn update_assessment(
        &mut self,
        id: AssessmentId,
        patch: AssessmentPatch,
    ) -> Result<Option<SkillAssessment>, SkillboardError>;

    /// All settings, ordered by key.
    fn settings(&self) -> Result<Vec<Setting>, SkillboardError>;

    /// A single setting.
    fn setting(&self, key: &str) -> Result<Option<Setting>, SkillboardError>;

    /// Insert or replace a setting.
    fn put_setting(
        &mut self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<Setting, SkillboardError>;

    // -------------------------------------------------------------------------
    // Provided reads
    // -------------------------------------------------------------------------

    /// The snapshot with the latest `week_of` strictly before the current one.
    fn previous_snapshot(&self) -> Result<Option<WeeklySnapshot>, SkillboardError> {
        let Some(current) = self.current_snapshot()? else {
            return Ok(None);
        };
        Ok(self
            .snapshots()?
            .into_iter()
            .find(|s| s.week_of < current.week_of))
    }

    /// The most recent snapshot (by `week_of`) that is not flagged current.
    fn latest_non_current_snapshot(&self) -> Result<Option<WeeklySnapshot>, SkillboardError> {
        Ok(self
            .snapshots()?
            .into_iter()
            .find(|s| !s.is_current_week))
    }

    /// Assessments recorded in one snapshot.
    fn assessments_by_snapshot(
        &self,
        snapshot: SnapshotId,
    ) -> Result<Vec<SkillAssessment>, SkillboardError> {
        Ok(self
            .assessments()?
            .into_iter()
            .filter(|a| a.snapshot_id == snapshot)
            .collect())
    }

    /// Assessments of one team member across all snapshots.
    fn assessments_by_team_member(
        &self,
        member: MemberId,
    ) -> Result<Vec<SkillAssessment>, SkillboardError> {
        Ok(self
            .assessments()?
            .into_iter()
            .filter(|a| a.team_member_id == member)
            .collect())
    }

    /// True when no member, skill or snapshot has been stored yet.
    fn is_empty(&self) -> Result<bool, SkillboardError> {
        Ok(self.team_members()?.is_empty()
            && self.skills()?.is_empty()
            && self.snapshots()?.is_empty())
    }
}

// =============================================================================
// SHARED HELPERS
// =============================================================================

/// Last assigned id per entity kind. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    pub member: u64,
    pub skill: u64,
    pub snapshot: u64,
    pub assessment: u64,
}

impl IdCounters {
    /// Advance a counter and return the new id.
    pub fn next(counter: &mut u64) -> u64 {
        *counter = counter.saturating_add(1);
        *counter
    }
}

/// Order snapshots newest week first.
pub(crate) fn sort_snapshots(snapshots: &mut [WeeklySnapshot]) {
    snapshots.sort_by(|a, b| b.week_of.cmp(&a.week_of).then(b.id.cmp(&a.id)));
}

/// Validation error for a skill name that is already taken.
pub(crate) fn duplicate_skill_name(name: &str) -> SkillboardError {
    SkillboardError::invalid(
        EntityKind::Skill,
        "name",
        format!("a skill named '{}' already exists", name),
    )
}

/// Validation error for an assessment slot that is already occupied.
pub(crate) fn duplicate_assessment(existing: AssessmentId) -> SkillboardError {
    SkillboardError::invalid(
        EntityKind::Assessment,
        "snapshotId",
        format!(
            "assessment {} already covers this member, skill and snapshot",
            existing.0
        ),
    )
}

/// Collect missing-reference errors for an assessment key.
pub(crate) fn reference_errors(
    key: &AssessmentKey,
    member_exists: bool,
    skill_exists: bool,
    snapshot_exists: bool,
) -> Result<(), SkillboardError> {
    let mut errors = Vec::new();
    if !member_exists {
        errors.push(FieldError::new(
            "teamMemberId",
            format!("team member {} does not exist", key.team_member_id.0),
        ));
    }
    if !skill_exists {
        errors.push(FieldError::new(
            "skillId",
            format!("skill {} does not exist", key.skill_id.0),
        ));
    }
    if !snapshot_exists {
        errors.push(FieldError::new(
            "snapshotId",
            format!("snapshot {} does not exist", key.snapshot_id.0),
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SkillboardError::ValidationFailed {
            kind: EntityKind::Assessment,
            errors,
        })
    }
}

// =============================================================================
// IN-MEMORY IMPLEMENTATION
// =============================================================================

/// Volatile store backed by `BTreeMap`s for deterministic ordering.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    members: BTreeMap<MemberId, TeamMember>,
    skills: BTreeMap<SkillId, Skill>,
    snapshots: BTreeMap<SnapshotId, WeeklySnapshot>,
    assessments: BTreeMap<AssessmentId, SkillAssessment>,
    /// (member, skill, snapshot) -> assessment row
    assessment_index: BTreeMap<AssessmentKey, AssessmentId>,
    settings: BTreeMap<String, serde_json::Value>,
    counters: IdCounters,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn skill_name_taken(&self, name: &str, except: Option<SkillId>) -> bool {
        self.skills
            .values()
            .any(|s| s.name == name && Some(s.id) != except)
    }

    fn check_references(&self, key: &AssessmentKey) -> Result<(), SkillboardError> {
        reference_errors(
            key,
            self.members.contains_key(&key.team_member_id),
            self.skills.contains_key(&key.skill_id),
            self.snapshots.contains_key(&key.snapshot_id),
        )
    }

    /// Drop every assessment matching `predicate`, keeping the index in sync.
    fn remove_assessments_where(&mut self, predicate: impl Fn(&SkillAssessment) -> bool) {
        let doomed: Vec<SkillAssessment> = self
            .assessments
            .values()
            .filter(|a| predicate(a))
            .cloned()
            .collect();
        for assessment in doomed {
            self.assessments.remove(&assessment.id);
            self.assessment_index.remove(&assessment.key());
        }
    }
}

impl SkillStore for MemoryStore {
    fn team_members(&self) -> Result<Vec<TeamMember>, SkillboardError> {
        Ok(self.members.values().cloned().collect())
    }

    fn team_member(&self, id: MemberId) -> Result<Option<TeamMember>, SkillboardError> {
        Ok(self.members.get(&id).cloned())
    }

    fn create_team_member(
        &mut self,
        member: NewTeamMember,
    ) -> Result<TeamMember, SkillboardError> {
        let id = MemberId(IdCounters::next(&mut self.counters.member));
        let stored = TeamMember {
            id,
            name: member.name,
            role: member.role,
            initials: member.initials,
            avatar_color: member.avatar_color,
        };
        self.members.insert(id, stored.clone());
        Ok(stored)
    }

    fn update_team_member(
        &mut self,
        id: MemberId,
        patch: TeamMemberPatch,
    ) -> Result<Option<TeamMember>, SkillboardError> {
        Ok(self.members.get_mut(&id).map(|member| {
            patch.apply(member);
            member.clone()
        }))
    }

    fn delete_team_member(&mut self, id: MemberId) -> Result<bool, SkillboardError> {
        if self.members.remove(&id).is_none() {
            return Ok(false);
        }
        self.remove_assessments_where(|a| a.team_member_id == id);
        Ok(true)
    }

    fn skills(&self) -> Result<Vec<Skill>, SkillboardError> {
        Ok(self.skills.values().cloned().collect())
    }

    fn skill(&self, id: SkillId) -> Result<Option<Skill>, SkillboardError> {
        Ok(self.skills.get(&id).cloned())
    }

    fn create_skill(&mut self, skill: NewSkill) -> Result<Skill, SkillboardError> {
        if self.skill_name_taken(&skill.name, None) {
            return Err(duplicate_skill_name(&skill.name));
        }
        let id = SkillId(IdCounters::next(&mut self.counters.skill));
        let stored = Skill {
            id,
            name: skill.name,
            icon: skill.icon,
            icon_color: skill.icon_color,
        };
        self.skills.insert(id, stored.clone());
        Ok(stored)
    }

    fn update_skill(
        &mut self,
        id: SkillId,
        patch: SkillPatch,
    ) -> Result<Option<Skill>, SkillboardError> {
        if !self.skills.contains_key(&id) {
            return Ok(None);
        }
        if let Some(name) = patch.name.as_deref()
            && self.skill_name_taken(name, Some(id))
        {
            return Err(duplicate_skill_name(name));
        }
        Ok(self.skills.get_mut(&id).map(|skill| {
            patch.apply(skill);
            skill.clone()
        }))
    }

    fn delete_skill(&mut self, id: SkillId) -> Result<bool, SkillboardError> {
        if self.skills.remove(&id).is_none() {
            return Ok(false);
        }
        self.remove_assessments_where(|a| a.skill_id == id);
        Ok(true)
    }

    fn snapshots(&self) -> Result<Vec<WeeklySnapshot>, SkillboardError> {
        let mut snapshots: Vec<WeeklySnapshot> = self.snapshots.values().cloned().collect();
        sort_snapshots(&mut snapshots);
        Ok(snapshots)
    }

    fn snapshot(&self, id: SnapshotId) -> Result<Option<WeeklySnapshot>, SkillboardError> {
        Ok(self.snapshots.get(&id).cloned())
    }

    fn current_snapshot(&self) -> Result<Option<WeeklySnapshot>, SkillboardError> {
        Ok(self
            .snapshots
            .values()
            .find(|s| s.is_current_week)
            .cloned())
    }

    fn create_snapshot(
        &mut self,
        snapshot: NewSnapshot,
        set_current: bool,
    ) -> Result<WeeklySnapshot, SkillboardError> {
        if set_current {
            for existing in self.snapshots.values_mut() {
                existing.is_current_week = false;
            }
        }
        let id = SnapshotId(IdCounters::next(&mut self.counters.snapshot));
        let stored = WeeklySnapshot {
            id,
            week_of: snapshot.week_of,
            is_current_week: set_current,
        };
        self.snapshots.insert(id, stored.clone());
        Ok(stored)
    }

    fn update_snapshot(
        &mut self,
        id: SnapshotId,
        snapshot: NewSnapshot,
    ) -> Result<Option<WeeklySnapshot>, SkillboardError> {
        Ok(self.snapshots.get_mut(&id).map(|existing| {
            existing.week_of = snapshot.week_of;
            existing.clone()
        }))
    }

    fn delete_snapshot(&mut self, id: SnapshotId) -> Result<bool, SkillboardError> {
        if self.snapshots.remove(&id).is_none() {
            return Ok(false);
        }
        self.remove_assessments_where(|a| a.snapshot_id == id);
        Ok(true)
    }

    fn assessments(&self) -> Result<Vec<SkillAssessment>, SkillboardError> {
        Ok(self.assessments.values().cloned().collect())
    }

    fn upsert_assessment(
        &mut self,
        assessment: NewAssessment,
    ) -> Result<SkillAssessment, SkillboardError> {
        let key = assessment.key();
        self.check_references(&key)?;

        if let Some(existing_id) = self.assessment_index.get(&key).copied()
            && let Some(existing) = self.assessments.get_mut(&existing_id)
        {
            existing.level = assessment.level;
            return Ok(existing.clone());
        }

        let id = AssessmentId(IdCounters::next(&mut self.counters.assessment));
        let stored = SkillAssessment {
            id,
            team_member_id: assessment.team_member_id,
            skill_id: assessment.skill_id,
            snapshot_id: assessment.snapshot_id,
            level: assessment.level,
        };
        self.assessments.insert(id, stored.clone());
        self.assessment_index.insert(key, id);
        Ok(stored)
    }

    fn update_assessment(
        &mut self,
        id: AssessmentId,
        patch: AssessmentPatch,
    ) -> Result<Option<SkillAssessment>, SkillboardError> {
        let Some(existing) = self.assessments.get(&id).cloned() else {
            return Ok(None);
        };
        let updated = patch.applied_to(&existing);
        let new_key = updated.key();
        let old_key = existing.key();

        if new_key != old_key {
            self.check_references(&new_key)?;
            if let Some(other) = self.assessment_index.get(&new_key) {
                return Err(duplicate_assessment(*other));
            }
            self.assessment_index.remove(&old_key);
            self.assessment_index.insert(new_key, id);
        }
        self.assessments.insert(id, updated.clone());
        Ok(Some(updated))
    }

    fn settings(&self) -> Result<Vec<Setting>, SkillboardError> {
        Ok(self
            .settings
            .iter()
            .map(|(key, value)| Setting {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn setting(&self, key: &str) -> Result<Option<Setting>, SkillboardError> {
        Ok(self.settings.get(key).map(|value| Setting {
            key: key.to_string(),
            value: value.clone(),
        }))
    }

    fn put_setting(
        &mut self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<Setting, SkillboardError> {
        self.settings.insert(key.to_string(), value.clone());
        Ok(Setting {
            key: key.to_string(),
            value,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::SkillLevel;
    use chrono::NaiveDate;

    fn member(store: &mut MemoryStore, name: &str) -> TeamMember {
        store
            .create_team_member(NewTeamMember {
                name: name.to_string(),
                role: "Engineer".to_string(),
                initials: name[..1].to_string(),
                avatar_color: "#4f46e5".to_string(),
            })
            .expect("member")
    }

    fn skill(store: &mut MemoryStore, name: &str) -> Skill {
        store
            .create_skill(NewSkill {
                name: name.to_string(),
                icon: "code".to_string(),
                icon_color: "#f59e0b".to_string(),
            })
            .expect("skill")
    }

    fn week(day: u32) -> NewSnapshot {
        NewSnapshot {
            week_of: NaiveDate::from_ymd_opt(2024, 1, day).expect("date"),
        }
    }

    #[test]
    fn ids_start_at_one_and_are_not_reused() {
        let mut store = MemoryStore::new();
        let a = member(&mut store, "Ada");
        assert_eq!(a.id, MemberId(1));
        assert!(store.delete_team_member(a.id).expect("delete"));
        let b = member(&mut store, "Bob");
        assert_eq!(b.id, MemberId(2));
    }

    #[test]
    fn duplicate_assessment_updates_level() {
        let mut store = MemoryStore::new();
        let m = member(&mut store, "Ada");
        let s = skill(&mut store, "Rust");
        let snap = store.create_snapshot(week(1), true).expect("snapshot");

        let input = NewAssessment {
            team_member_id: m.id,
            skill_id: s.id,
            snapshot_id: snap.id,
            level: SkillLevel::BasicKnowledge,
        };
        let first = store.upsert_assessment(input).expect("first");
        let second = store
            .upsert_assessment(NewAssessment {
                level: SkillLevel::Expert,
                ..input
            })
            .expect("second");

        assert_eq!(first.id, second.id);
        let all = store.assessments().expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].level, SkillLevel::Expert);
    }

    #[test]
    fn new_current_snapshot_clears_old_flag() {
        let mut store = MemoryStore::new();
        store.create_snapshot(week(1), true).expect("first");
        let second = store.create_snapshot(week(8), true).expect("second");

        let current: Vec<_> = store
            .snapshots()
            .expect("list")
            .into_iter()
            .filter(|s| s.is_current_week)
            .collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].id, second.id);
    }

    #[test]
    fn previous_snapshot_uses_week_order_not_insertion_order() {
        let mut store = MemoryStore::new();
        let older = store.create_snapshot(week(1), false).expect("older");
        // Inserted later but dated after the current week.
        store.create_snapshot(week(22), false).expect("future");
        store.create_snapshot(week(15), true).expect("current");

        let previous = store.previous_snapshot().expect("previous");
        assert_eq!(previous.map(|s| s.id), Some(older.id));

        let latest_other = store.latest_non_current_snapshot().expect("latest");
        assert_eq!(latest_other.map(|s| s.week_of.to_string()), Some("2024-01-22".into()));
    }

    #[test]
    fn deleting_member_cascades_to_assessments() {
        let mut store = MemoryStore::new();
        let ada = member(&mut store, "Ada");
        let bob = member(&mut store, "Bob");
        let s = skill(&mut store, "Rust");
        let snap = store.create_snapshot(week(1), true).expect("snapshot");
        for m in [&ada, &bob] {
            store
                .upsert_assessment(NewAssessment {
                    team_member_id: m.id,
                    skill_id: s.id,
                    snapshot_id: snap.id,
                    level: SkillLevel::Expert,
                })
                .expect("assess");
        }

        assert!(store.delete_team_member(ada.id).expect("delete"));
        let remaining = store.assessments().expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].team_member_id, bob.id);

        // The freed slot can be assessed again without colliding.
        assert!(store.assessments_by_team_member(ada.id).expect("by member").is_empty());
    }

    #[test]
    fn assessment_for_missing_references_is_rejected() {
        let mut store = MemoryStore::new();
        let err = store
            .upsert_assessment(NewAssessment {
                team_member_id: MemberId(9),
                skill_id: SkillId(9),
                snapshot_id: SnapshotId(9),
                level: SkillLevel::Expert,
            })
            .expect_err("dangling");
        match err {
            SkillboardError::ValidationFailed { errors, .. } => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn skill_names_are_unique() {
        let mut store = MemoryStore::new();
        skill(&mut store, "Rust");
        let go = skill(&mut store, "Go");
        assert!(
            store
                .create_skill(NewSkill {
                    name: "Rust".into(),
                    icon: "x".into(),
                    icon_color: "#000".into(),
                })
                .is_err()
        );
        let rename = SkillPatch {
            name: Some("Rust".into()),
            ..SkillPatch::default()
        };
        assert!(store.update_skill(go.id, rename).is_err());
    }

    #[test]
    fn moving_assessment_onto_occupied_slot_is_rejected() {
        let mut store = MemoryStore::new();
        let m = member(&mut store, "Ada");
        let rust = skill(&mut store, "Rust");
        let go = skill(&mut store, "Go");
        let snap = store.create_snapshot(week(1), true).expect("snapshot");
        let base = NewAssessment {
            team_member_id: m.id,
            skill_id: rust.id,
            snapshot_id: snap.id,
            level: SkillLevel::Expert,
        };
        store.upsert_assessment(base).expect("rust");
        let go_row = store
            .upsert_assessment(NewAssessment {
                skill_id: go.id,
                ..base
            })
            .expect("go");

        let patch = AssessmentPatch {
            skill_id: Some(rust.id),
            ..AssessmentPatch::default()
        };
        assert!(store.update_assessment(go_row.id, patch).is_err());
        assert!(
            store
                .update_assessment(AssessmentId(99), AssessmentPatch::default())
                .expect("update")
                .is_none()
        );
    }

    #[test]
    fn settings_are_replaced_by_key() {
        let mut store = MemoryStore::new();
        store
            .put_setting("theme", serde_json::json!("dark"))
            .expect("put");
        store
            .put_setting("theme", serde_json::json!({"mode": "light"}))
            .expect("replace");
        let setting = store.setting("theme").expect("get").expect("present");
        assert_eq!(setting.value, serde_json::json!({"mode": "light"}));
        assert_eq!(store.settings().expect("list").len(), 1);
        assert!(store.setting("missing").expect("get").is_none());
    }
}
