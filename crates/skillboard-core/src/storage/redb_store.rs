//! # redb-backed Store
//!
//! A disk-backed `SkillStore` using the redb embedded database.
//!
//! Every mutating operation runs in a single write transaction, so cascades
//! and current-week flag flips are committed together or not at all.
//! Entity rows are postcard-encoded; settings are stored as JSON bytes
//! because their values are free-form.

use crate::store::{
    IdCounters, SkillStore, duplicate_assessment, duplicate_skill_name, reference_errors,
    sort_snapshots,
};
use crate::{
    AssessmentId, AssessmentKey, AssessmentPatch, MemberId, NewAssessment, NewSkill, NewSnapshot,
    NewTeamMember, Setting, Skill, SkillAssessment, SkillId, SkillPatch, SkillboardError,
    SnapshotId, TeamMember, TeamMemberPatch, WeeklySnapshot,
};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

/// id -> postcard-encoded entity
type Rows = TableDefinition<'static, u64, &'static [u8]>;

const MEMBERS: Rows = TableDefinition::new("members");
const SKILLS: Rows = TableDefinition::new("skills");
const SNAPSHOTS: Rows = TableDefinition::new("snapshots");
const ASSESSMENTS: Rows = TableDefinition::new("assessments");

/// Unique skill name -> skill id
const SKILL_NAMES: TableDefinition<&str, u64> = TableDefinition::new("skill_names");

/// (member, skill, snapshot) -> assessment id
const ASSESSMENT_KEYS: TableDefinition<(u64, u64, u64), u64> =
    TableDefinition::new("assessment_keys");

/// Setting key -> JSON-encoded value
const SETTINGS: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

/// Counter name -> last assigned id
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const LAST_MEMBER_ID: &str = "last_member_id";
const LAST_SKILL_ID: &str = "last_skill_id";
const LAST_SNAPSHOT_ID: &str = "last_snapshot_id";
const LAST_ASSESSMENT_ID: &str = "last_assessment_id";

fn db_err(e: impl std::fmt::Display) -> SkillboardError {
    SkillboardError::StorageError(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, SkillboardError> {
    postcard::to_allocvec(value).map_err(|e| SkillboardError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SkillboardError> {
    postcard::from_bytes(bytes).map_err(|e| SkillboardError::SerializationError(e.to_string()))
}

fn key_tuple(key: &AssessmentKey) -> (u64, u64, u64) {
    (key.team_member_id.0, key.skill_id.0, key.snapshot_id.0)
}

/// A disk-backed skill store.
///
/// Id counters are cached in memory and only advanced after a successful
/// commit.
pub struct RedbStore {
    db: Database,
    counters: IdCounters,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SkillboardError> {
        let db =
            Database::create(path.as_ref()).map_err(|e| SkillboardError::IoError(e.to_string()))?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(db_err)?;
            write_txn.open_table(MEMBERS).map_err(db_err)?;
            write_txn.open_table(SKILLS).map_err(db_err)?;
            write_txn.open_table(SNAPSHOTS).map_err(db_err)?;
            write_txn.open_table(ASSESSMENTS).map_err(db_err)?;
            write_txn.open_table(SKILL_NAMES).map_err(db_err)?;
            write_txn.open_table(ASSESSMENT_KEYS).map_err(db_err)?;
            write_txn.open_table(SETTINGS).map_err(db_err)?;
            write_txn.open_table(METADATA).map_err(db_err)?;
            write_txn.commit().map_err(db_err)?;
        }

        let counters = {
            let read_txn = db.begin_read().map_err(db_err)?;
            let table = read_txn.open_table(METADATA).map_err(db_err)?;
            let load = |name: &str| -> Result<u64, SkillboardError> {
                Ok(table.get(name).map_err(db_err)?.map(|v| v.value()).unwrap_or(0))
            };
            IdCounters {
                member: load(LAST_MEMBER_ID)?,
                skill: load(LAST_SKILL_ID)?,
                snapshot: load(LAST_SNAPSHOT_ID)?,
                assessment: load(LAST_ASSESSMENT_ID)?,
            }
        };

        Ok(Self { db, counters })
    }

    /// Run `body` inside a write transaction and commit it.
    ///
    /// An error from `body` drops the transaction, which aborts it.
    fn write<R>(
        &self,
        body: impl FnOnce(&WriteTransaction) -> Result<R, SkillboardError>,
    ) -> Result<R, SkillboardError> {
        let txn = self.db.begin_write().map_err(db_err)?;
        let out = body(&txn)?;
        txn.commit().map_err(db_err)?;
        Ok(out)
    }

    fn load_all<T: DeserializeOwned>(&self, rows: Rows) -> Result<Vec<T>, SkillboardError> {
        let txn = self.db.begin_read().map_err(db_err)?;
        let table = txn.open_table(rows).map_err(db_err)?;
        let mut out = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (_, value) = entry.map_err(db_err)?;
            out.push(decode(value.value())?);
        }
        Ok(out)
    }

    fn load_one<T: DeserializeOwned>(&self, rows: Rows, id: u64) -> Result<Option<T>, SkillboardError> {
        let txn = self.db.begin_read().map_err(db_err)?;
        let table = txn.open_table(rows).map_err(db_err)?;
        let found = table.get(id).map_err(db_err)?;
        found.map(|bytes| decode(bytes.value())).transpose()
    }
}

// -----------------------------------------------------------------------------
// Lookups inside an open write transaction
// -----------------------------------------------------------------------------

fn get_row<T: DeserializeOwned>(
    txn: &WriteTransaction,
    rows: Rows,
    id: u64,
) -> Result<Option<T>, SkillboardError> {
    let table = txn.open_table(rows).map_err(db_err)?;
    let found = table.get(id).map_err(db_err)?;
    found.map(|bytes| decode(bytes.value())).transpose()
}

fn row_exists(txn: &WriteTransaction, rows: Rows, id: u64) -> Result<bool, SkillboardError> {
    let table = txn.open_table(rows).map_err(db_err)?;
    let found = table.get(id).map_err(db_err)?.is_some();
    Ok(found)
}

fn check_references(txn: &WriteTransaction, key: &AssessmentKey) -> Result<(), SkillboardError> {
    reference_errors(
        key,
        row_exists(txn, MEMBERS, key.team_member_id.0)?,
        row_exists(txn, SKILLS, key.skill_id.0)?,
        row_exists(txn, SNAPSHOTS, key.snapshot_id.0)?,
    )
}

fn assessment_at(
    txn: &WriteTransaction,
    key: &AssessmentKey,
) -> Result<Option<AssessmentId>, SkillboardError> {
    let table = txn.open_table(ASSESSMENT_KEYS).map_err(db_err)?;
    let found = table
        .get(key_tuple(key))
        .map_err(db_err)?
        .map(|v| AssessmentId(v.value()));
    Ok(found)
}

fn skill_name_owner(
    txn: &WriteTransaction,
    name: &str,
) -> Result<Option<SkillId>, SkillboardError> {
    let table = txn.open_table(SKILL_NAMES).map_err(db_err)?;
    let found = table.get(name).map_err(db_err)?.map(|v| SkillId(v.value()));
    Ok(found)
}

/// Put one encoded row inside an open write transaction.
fn put_row<T: Serialize>(
    txn: &WriteTransaction,
    rows: Rows,
    id: u64,
    value: &T,
) -> Result<(), SkillboardError> {
    let bytes = encode(value)?;
    let mut table = txn.open_table(rows).map_err(db_err)?;
    table.insert(id, bytes.as_slice()).map_err(db_err)?;
    Ok(())
}

/// Remove one row, returning whether it existed.
fn remove_row(txn: &WriteTransaction, rows: Rows, id: u64) -> Result<bool, SkillboardError> {
    let mut table = txn.open_table(rows).map_err(db_err)?;
    let removed = table.remove(id).map_err(db_err)?.is_some();
    Ok(removed)
}

fn save_counter(txn: &WriteTransaction, name: &str, value: u64) -> Result<(), SkillboardError> {
    let mut table = txn.open_table(METADATA).map_err(db_err)?;
    table.insert(name, value).map_err(db_err)?;
    Ok(())
}

/// Delete every assessment matching `predicate`, keeping the key index in sync.
fn remove_assessments_where(
    txn: &WriteTransaction,
    predicate: impl Fn(&SkillAssessment) -> bool,
) -> Result<(), SkillboardError> {
    let mut rows = txn.open_table(ASSESSMENTS).map_err(db_err)?;
    let mut keys = txn.open_table(ASSESSMENT_KEYS).map_err(db_err)?;

    let mut doomed = Vec::new();
    for entry in rows.iter().map_err(db_err)? {
        let (_, value) = entry.map_err(db_err)?;
        let assessment: SkillAssessment = decode(value.value())?;
        if predicate(&assessment) {
            doomed.push(assessment);
        }
    }
    for assessment in &doomed {
        rows.remove(assessment.id.0).map_err(db_err)?;
        keys.remove(key_tuple(&assessment.key())).map_err(db_err)?;
    }
    Ok(())
}

// =============================================================================
// SKILLSTORE TRAIT IMPLEMENTATION
// =============================================================================

impl SkillStore for RedbStore {
    fn team_members(&self) -> Result<Vec<TeamMember>, SkillboardError> {
        self.load_all(MEMBERS)
    }

    fn team_member(&self, id: MemberId) -> Result<Option<TeamMember>, SkillboardError> {
        self.load_one(MEMBERS, id.0)
    }

    fn create_team_member(
        &mut self,
        member: NewTeamMember,
    ) -> Result<TeamMember, SkillboardError> {
        let id = MemberId(self.counters.member.saturating_add(1));
        let stored = TeamMember {
            id,
            name: member.name,
            role: member.role,
            initials: member.initials,
            avatar_color: member.avatar_color,
        };
        self.write(|txn| {
            put_row(txn, MEMBERS, id.0, &stored)?;
            save_counter(txn, LAST_MEMBER_ID, id.0)
        })?;
        self.counters.member = id.0;
        Ok(stored)
    }

    fn update_team_member(
        &mut self,
        id: MemberId,
        patch: TeamMemberPatch,
    ) -> Result<Option<TeamMember>, SkillboardError> {
        let Some(mut member) = self.team_member(id)? else {
            return Ok(None);
        };
        patch.apply(&mut member);
        self.write(|txn| put_row(txn, MEMBERS, id.0, &member))?;
        Ok(Some(member))
    }

    fn delete_team_member(&mut self, id: MemberId) -> Result<bool, SkillboardError> {
        self.write(|txn| {
            if !remove_row(txn, MEMBERS, id.0)? {
                return Ok(false);
            }
            remove_assessments_where(txn, |a| a.team_member_id == id)?;
            Ok(true)
        })
    }

    fn skills(&self) -> Result<Vec<Skill>, SkillboardError> {
        self.load_all(SKILLS)
    }

    fn skill(&self, id: SkillId) -> Result<Option<Skill>, SkillboardError> {
        self.load_one(SKILLS, id.0)
    }

    fn create_skill(&mut self, skill: NewSkill) -> Result<Skill, SkillboardError> {
        let id = SkillId(self.counters.skill.saturating_add(1));
        let stored = Skill {
            id,
            name: skill.name,
            icon: skill.icon,
            icon_color: skill.icon_color,
        };
        self.write(|txn| {
            if skill_name_owner(txn, &stored.name)?.is_some() {
                return Err(duplicate_skill_name(&stored.name));
            }
            put_row(txn, SKILLS, id.0, &stored)?;
            let mut names = txn.open_table(SKILL_NAMES).map_err(db_err)?;
            names.insert(stored.name.as_str(), id.0).map_err(db_err)?;
            drop(names);
            save_counter(txn, LAST_SKILL_ID, id.0)
        })?;
        self.counters.skill = id.0;
        Ok(stored)
    }

    fn update_skill(
        &mut self,
        id: SkillId,
        patch: SkillPatch,
    ) -> Result<Option<Skill>, SkillboardError> {
        let Some(mut skill) = self.skill(id)? else {
            return Ok(None);
        };
        let old_name = skill.name.clone();
        patch.apply(&mut skill);
        self.write(|txn| {
            if skill.name != old_name
                && let Some(owner) = skill_name_owner(txn, &skill.name)?
                && owner != id
            {
                return Err(duplicate_skill_name(&skill.name));
            }
            put_row(txn, SKILLS, id.0, &skill)?;
            if skill.name != old_name {
                let mut names = txn.open_table(SKILL_NAMES).map_err(db_err)?;
                names.remove(old_name.as_str()).map_err(db_err)?;
                names.insert(skill.name.as_str(), id.0).map_err(db_err)?;
            }
            Ok(())
        })?;
        Ok(Some(skill))
    }

    fn delete_skill(&mut self, id: SkillId) -> Result<bool, SkillboardError> {
        let Some(skill) = self.skill(id)? else {
            return Ok(false);
        };
        self.write(|txn| {
            remove_row(txn, SKILLS, id.0)?;
            let mut names = txn.open_table(SKILL_NAMES).map_err(db_err)?;
            names.remove(skill.name.as_str()).map_err(db_err)?;
            drop(names);
            remove_assessments_where(txn, |a| a.skill_id == id)?;
            Ok(true)
        })
    }

    fn snapshots(&self) -> Result<Vec<WeeklySnapshot>, SkillboardError> {
        let mut snapshots: Vec<WeeklySnapshot> = self.load_all(SNAPSHOTS)?;
        sort_snapshots(&mut snapshots);
        Ok(snapshots)
    }

    fn snapshot(&self, id: SnapshotId) -> Result<Option<WeeklySnapshot>, SkillboardError> {
        self.load_one(SNAPSHOTS, id.0)
    }

    fn current_snapshot(&self) -> Result<Option<WeeklySnapshot>, SkillboardError> {
        let snapshots: Vec<WeeklySnapshot> = self.load_all(SNAPSHOTS)?;
        Ok(snapshots.into_iter().find(|s| s.is_current_week))
    }

    fn create_snapshot(
        &mut self,
        snapshot: NewSnapshot,
        set_current: bool,
    ) -> Result<WeeklySnapshot, SkillboardError> {
        let id = SnapshotId(self.counters.snapshot.saturating_add(1));
        let stored = WeeklySnapshot {
            id,
            week_of: snapshot.week_of,
            is_current_week: set_current,
        };
        let demoted: Vec<WeeklySnapshot> = if set_current {
            self.load_all::<WeeklySnapshot>(SNAPSHOTS)?
                .into_iter()
                .filter(|s| s.is_current_week)
                .map(|s| WeeklySnapshot {
                    is_current_week: false,
                    ..s
                })
                .collect()
        } else {
            Vec::new()
        };
        self.write(|txn| {
            for old in &demoted {
                put_row(txn, SNAPSHOTS, old.id.0, old)?;
            }
            put_row(txn, SNAPSHOTS, id.0, &stored)?;
            save_counter(txn, LAST_SNAPSHOT_ID, id.0)
        })?;
        self.counters.snapshot = id.0;
        Ok(stored)
    }

    fn update_snapshot(
        &mut self,
        id: SnapshotId,
        snapshot: NewSnapshot,
    ) -> Result<Option<WeeklySnapshot>, SkillboardError> {
        let Some(mut existing) = self.snapshot(id)? else {
            return Ok(None);
        };
        existing.week_of = snapshot.week_of;
        self.write(|txn| put_row(txn, SNAPSHOTS, id.0, &existing))?;
        Ok(Some(existing))
    }

    fn delete_snapshot(&mut self, id: SnapshotId) -> Result<bool, SkillboardError> {
        self.write(|txn| {
            if !remove_row(txn, SNAPSHOTS, id.0)? {
                return Ok(false);
            }
            remove_assessments_where(txn, |a| a.snapshot_id == id)?;
            Ok(true)
        })
    }

    fn assessments(&self) -> Result<Vec<SkillAssessment>, SkillboardError> {
        self.load_all(ASSESSMENTS)
    }

    fn upsert_assessment(
        &mut self,
        assessment: NewAssessment,
    ) -> Result<SkillAssessment, SkillboardError> {
        let key = assessment.key();
        let next_id = AssessmentId(self.counters.assessment.saturating_add(1));
        let (stored, inserted) = self.write(|txn| {
            check_references(txn, &key)?;

            if let Some(existing_id) = assessment_at(txn, &key)?
                && let Some(mut existing) =
                    get_row::<SkillAssessment>(txn, ASSESSMENTS, existing_id.0)?
            {
                existing.level = assessment.level;
                put_row(txn, ASSESSMENTS, existing_id.0, &existing)?;
                return Ok((existing, false));
            }

            let stored = SkillAssessment {
                id: next_id,
                team_member_id: assessment.team_member_id,
                skill_id: assessment.skill_id,
                snapshot_id: assessment.snapshot_id,
                level: assessment.level,
            };
            put_row(txn, ASSESSMENTS, next_id.0, &stored)?;
            let mut keys = txn.open_table(ASSESSMENT_KEYS).map_err(db_err)?;
            keys.insert(key_tuple(&key), next_id.0).map_err(db_err)?;
            drop(keys);
            save_counter(txn, LAST_ASSESSMENT_ID, next_id.0)?;
            Ok((stored, true))
        })?;
        if inserted {
            self.counters.assessment = next_id.0;
        }
        Ok(stored)
    }

    fn update_assessment(
        &mut self,
        id: AssessmentId,
        patch: AssessmentPatch,
    ) -> Result<Option<SkillAssessment>, SkillboardError> {
        self.write(|txn| {
            let Some(existing) = get_row::<SkillAssessment>(txn, ASSESSMENTS, id.0)? else {
                return Ok(None);
            };
            let updated = patch.applied_to(&existing);
            let old_key = existing.key();
            let new_key = updated.key();

            if new_key != old_key {
                check_references(txn, &new_key)?;
                if let Some(other) = assessment_at(txn, &new_key)? {
                    return Err(duplicate_assessment(other));
                }
            }
            put_row(txn, ASSESSMENTS, id.0, &updated)?;
            if new_key != old_key {
                let mut keys = txn.open_table(ASSESSMENT_KEYS).map_err(db_err)?;
                keys.remove(key_tuple(&old_key)).map_err(db_err)?;
                keys.insert(key_tuple(&new_key), id.0).map_err(db_err)?;
            }
            Ok(Some(updated))
        })
    }

    fn settings(&self) -> Result<Vec<Setting>, SkillboardError> {
        let txn = self.db.begin_read().map_err(db_err)?;
        let table = txn.open_table(SETTINGS).map_err(db_err)?;
        let mut settings = Vec::new();
        for entry in table.iter().map_err(db_err)? {
            let (key, value) = entry.map_err(db_err)?;
            let value = serde_json::from_slice(value.value())
                .map_err(|e| SkillboardError::SerializationError(e.to_string()))?;
            settings.push(Setting {
                key: key.value().to_string(),
                value,
            });
        }
        Ok(settings)
    }

    fn setting(&self, key: &str) -> Result<Option<Setting>, SkillboardError> {
        let txn = self.db.begin_read().map_err(db_err)?;
        let table = txn.open_table(SETTINGS).map_err(db_err)?;
        let Some(bytes) = table.get(key).map_err(db_err)? else {
            return Ok(None);
        };
        let value = serde_json::from_slice(bytes.value())
            .map_err(|e| SkillboardError::SerializationError(e.to_string()))?;
        Ok(Some(Setting {
            key: key.to_string(),
            value,
        }))
    }

    fn put_setting(
        &mut self,
        key: &str,
        value: serde_json::Value,
    ) -> Result<Setting, SkillboardError> {
        let bytes = serde_json::to_vec(&value)
            .map_err(|e| SkillboardError::SerializationError(e.to_string()))?;
        self.write(|txn| {
            let mut table = txn.open_table(SETTINGS).map_err(db_err)?;
            table.insert(key, bytes.as_slice()).map_err(db_err)?;
            Ok(())
        })?;
        Ok(Setting {
            key: key.to_string(),
            value,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::SkillLevel;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).expect("date")
    }

    fn populate(store: &mut RedbStore) -> SkillAssessment {
        let member = store
            .create_team_member(NewTeamMember {
                name: "Ada".into(),
                role: "Engineer".into(),
                initials: "AL".into(),
                avatar_color: "#4f46e5".into(),
            })
            .expect("member");
        let skill = store
            .create_skill(NewSkill {
                name: "Rust".into(),
                icon: "code-s-slash-line".into(),
                icon_color: "#f59e0b".into(),
            })
            .expect("skill");
        let snapshot = store
            .create_snapshot(NewSnapshot { week_of: date(4) }, true)
            .expect("snapshot");
        store
            .upsert_assessment(NewAssessment {
                team_member_id: member.id,
                skill_id: skill.id,
                snapshot_id: snapshot.id,
                level: SkillLevel::HandsOnExperience,
            })
            .expect("assessment")
    }

    #[test]
    fn basic_operations() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("test.redb")).expect("open db");

        let assessment = populate(&mut store);
        assert_eq!(assessment.id, AssessmentId(1));
        assert_eq!(store.team_members().expect("members").len(), 1);
        assert_eq!(store.skills().expect("skills").len(), 1);
        assert_eq!(
            store.assessments_by_snapshot(assessment.snapshot_id).expect("by snapshot"),
            vec![assessment]
        );
    }

    #[test]
    fn persistence() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("test.redb");

        {
            let mut store = RedbStore::open(&db_path).expect("open db");
            populate(&mut store);
            store
                .put_setting("theme", serde_json::json!({"dark": true}))
                .expect("setting");
        }

        {
            let mut store = RedbStore::open(&db_path).expect("reopen db");
            assert_eq!(store.assessments().expect("assessments").len(), 1);
            let current = store.current_snapshot().expect("current").expect("some");
            assert_eq!(current.week_of, date(4));
            assert_eq!(
                store.setting("theme").expect("setting").map(|s| s.value),
                Some(serde_json::json!({"dark": true}))
            );

            // Counters survive the reopen, so ids keep increasing.
            let next = store
                .create_snapshot(NewSnapshot { week_of: date(11) }, true)
                .expect("snapshot");
            assert_eq!(next.id, SnapshotId(2));
            let flagged: Vec<_> = store
                .snapshots()
                .expect("snapshots")
                .into_iter()
                .filter(|s| s.is_current_week)
                .collect();
            assert_eq!(flagged.len(), 1);
            assert_eq!(flagged[0].id, next.id);
        }
    }

    #[test]
    fn upsert_keeps_single_row() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("test.redb")).expect("open db");
        let first = populate(&mut store);

        let again = store
            .upsert_assessment(NewAssessment {
                team_member_id: first.team_member_id,
                skill_id: first.skill_id,
                snapshot_id: first.snapshot_id,
                level: SkillLevel::Expert,
            })
            .expect("upsert");
        assert_eq!(again.id, first.id);
        assert_eq!(again.level, SkillLevel::Expert);
        assert_eq!(store.assessments().expect("assessments").len(), 1);
    }

    #[test]
    fn delete_skill_cascades_and_frees_name() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("test.redb")).expect("open db");
        let assessment = populate(&mut store);

        assert!(store.delete_skill(assessment.skill_id).expect("delete"));
        assert!(!store.delete_skill(assessment.skill_id).expect("delete again"));
        assert!(store.assessments().expect("assessments").is_empty());

        let recreated = store
            .create_skill(NewSkill {
                name: "Rust".into(),
                icon: "code".into(),
                icon_color: "#000".into(),
            })
            .expect("name is free again");
        assert_eq!(recreated.id, SkillId(2));
    }

    #[test]
    fn rename_onto_existing_skill_is_rejected() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("test.redb")).expect("open db");
        populate(&mut store);
        let go = store
            .create_skill(NewSkill {
                name: "Go".into(),
                icon: "code".into(),
                icon_color: "#000".into(),
            })
            .expect("skill");

        let err = store
            .update_skill(
                go.id,
                SkillPatch {
                    name: Some("Rust".into()),
                    ..SkillPatch::default()
                },
            )
            .expect_err("duplicate");
        assert!(matches!(err, SkillboardError::ValidationFailed { .. }));

        let renamed = store
            .update_skill(
                go.id,
                SkillPatch {
                    name: Some("Golang".into()),
                    ..SkillPatch::default()
                },
            )
            .expect("rename")
            .expect("exists");
        assert_eq!(renamed.name, "Golang");
        let owner = store.write(|txn| skill_name_owner(txn, "Go")).expect("lookup");
        assert!(owner.is_none());
    }

    #[test]
    fn delete_snapshot_cascades() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("test.redb")).expect("open db");
        let assessment = populate(&mut store);

        assert!(store.delete_snapshot(assessment.snapshot_id).expect("delete"));
        assert!(store.assessments().expect("assessments").is_empty());
        assert!(store.current_snapshot().expect("current").is_none());
        let indexed = store
            .write(|txn| assessment_at(txn, &assessment.key()))
            .expect("index");
        assert!(indexed.is_none());
    }

    #[test]
    fn rejected_writes_leave_no_trace() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("test.redb")).expect("open db");
        let first = populate(&mut store);

        let err = store
            .upsert_assessment(NewAssessment {
                team_member_id: first.team_member_id,
                skill_id: first.skill_id,
                snapshot_id: SnapshotId(99),
                level: SkillLevel::Expert,
            })
            .expect_err("unknown snapshot");
        assert!(matches!(err, SkillboardError::ValidationFailed { .. }));

        let err = store
            .update_assessment(
                first.id,
                AssessmentPatch {
                    team_member_id: Some(MemberId(42)),
                    ..AssessmentPatch::default()
                },
            )
            .expect_err("unknown member");
        assert!(matches!(err, SkillboardError::ValidationFailed { .. }));
        assert_eq!(store.assessments().expect("rows"), vec![first.clone()]);

        // The id counter only moves on commit.
        let second_week = store
            .create_snapshot(NewSnapshot { week_of: date(11) }, false)
            .expect("snapshot");
        let second = store
            .upsert_assessment(NewAssessment {
                team_member_id: first.team_member_id,
                skill_id: first.skill_id,
                snapshot_id: second_week.id,
                level: SkillLevel::Expert,
            })
            .expect("assessment");
        assert_eq!(second.id, AssessmentId(first.id.0 + 1));
    }
}
