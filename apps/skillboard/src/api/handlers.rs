//! # API Endpoint Handlers
//!
//! CRUD handlers for team members, skills, snapshots, assessments and
//! settings. Input goes through `skillboard_core::validation` before the
//! store is touched; reads take the board's read lock, writes its write lock.

use super::{
    AppState,
    error::ApiError,
    types::{AssessmentQuery, HealthResponse, SettingBody, SnapshotQuery},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use skillboard_core::{
    AssessmentFields, AssessmentId, EntityKind, MemberId, Setting, Skill, SkillAssessment,
    SkillFields, SkillId, SnapshotFields, SnapshotId, TeamMember, TeamMemberFields,
    WeeklySnapshot, validation,
};

type ApiResult<T> = Result<T, ApiError>;

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    Ok(payload?.0)
}

fn id(path: Result<Path<u64>, PathRejection>) -> ApiResult<u64> {
    Ok(path?.0)
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// TEAM MEMBERS
// =============================================================================

pub async fn list_team_members(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    let board = state.board.read().await;
    Ok(Json(board.store().team_members()?))
}

pub async fn get_team_member(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<TeamMember>> {
    let member_id = MemberId(id(path)?);
    let board = state.board.read().await;
    board
        .store()
        .team_member(member_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::TeamMember))
}

pub async fn create_team_member(
    State(state): State<AppState>,
    payload: Result<Json<TeamMemberFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    let member = validation::new_team_member(&body(payload)?)?;
    let mut board = state.board.write().await;
    let created = board.store_mut().create_team_member(member)?;
    tracing::info!(id = created.id.0, "Team member created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_team_member(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<TeamMemberFields>, JsonRejection>,
) -> ApiResult<Json<TeamMember>> {
    let member_id = MemberId(id(path)?);
    let patch = validation::team_member_patch(&body(payload)?)?;
    let mut board = state.board.write().await;
    board
        .store_mut()
        .update_team_member(member_id, patch)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::TeamMember))
}

pub async fn delete_team_member(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let member_id = MemberId(id(path)?);
    let mut board = state.board.write().await;
    if board.store_mut().delete_team_member(member_id)? {
        tracing::info!(id = member_id.0, "Team member deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(EntityKind::TeamMember))
    }
}

// =============================================================================
// SKILLS
// =============================================================================

pub async fn list_skills(State(state): State<AppState>) -> ApiResult<Json<Vec<Skill>>> {
    let board = state.board.read().await;
    Ok(Json(board.store().skills()?))
}

pub async fn get_skill(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Skill>> {
    let skill_id = SkillId(id(path)?);
    let board = state.board.read().await;
    board
        .store()
        .skill(skill_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::Skill))
}

pub async fn create_skill(
    State(state): State<AppState>,
    payload: Result<Json<SkillFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Skill>)> {
    let skill = validation::new_skill(&body(payload)?)?;
    let mut board = state.board.write().await;
    let created = board.store_mut().create_skill(skill)?;
    tracing::info!(id = created.id.0, name = %created.name, "Skill created");
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_skill(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<SkillFields>, JsonRejection>,
) -> ApiResult<Json<Skill>> {
    let skill_id = SkillId(id(path)?);
    let patch = validation::skill_patch(&body(payload)?)?;
    let mut board = state.board.write().await;
    board
        .store_mut()
        .update_skill(skill_id, patch)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::Skill))
}

pub async fn delete_skill(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let skill_id = SkillId(id(path)?);
    let mut board = state.board.write().await;
    if board.store_mut().delete_skill(skill_id)? {
        tracing::info!(id = skill_id.0, "Skill deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(EntityKind::Skill))
    }
}

// =============================================================================
// SNAPSHOTS
// =============================================================================

pub async fn list_snapshots(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<WeeklySnapshot>>> {
    let board = state.board.read().await;
    Ok(Json(board.store().snapshots()?))
}

pub async fn current_snapshot(State(state): State<AppState>) -> ApiResult<Json<WeeklySnapshot>> {
    let board = state.board.read().await;
    board
        .store()
        .current_snapshot()?
        .map(Json)
        .ok_or_else(|| ApiError::missing("No current snapshot found"))
}

pub async fn previous_snapshot(State(state): State<AppState>) -> ApiResult<Json<WeeklySnapshot>> {
    let board = state.board.read().await;
    board
        .store()
        .previous_snapshot()?
        .map(Json)
        .ok_or_else(|| ApiError::missing("No previous snapshot found"))
}

pub async fn get_snapshot(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<WeeklySnapshot>> {
    let snapshot_id = SnapshotId(id(path)?);
    let board = state.board.read().await;
    board
        .store()
        .snapshot(snapshot_id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::Snapshot))
}

pub async fn create_snapshot(
    State(state): State<AppState>,
    query: Result<Query<SnapshotQuery>, QueryRejection>,
    payload: Result<Json<SnapshotFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<WeeklySnapshot>)> {
    let Query(query) = query?;
    let snapshot = validation::new_snapshot(&body(payload)?)?;
    let mut board = state.board.write().await;
    let created = board
        .store_mut()
        .create_snapshot(snapshot, query.set_current)?;
    tracing::info!(
        id = created.id.0,
        week_of = %created.week_of,
        current = created.is_current_week,
        "Snapshot created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_snapshot(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<SnapshotFields>, JsonRejection>,
) -> ApiResult<Json<WeeklySnapshot>> {
    let snapshot_id = SnapshotId(id(path)?);
    let snapshot = validation::new_snapshot(&body(payload)?)?;
    let mut board = state.board.write().await;
    board
        .store_mut()
        .update_snapshot(snapshot_id, snapshot)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::Snapshot))
}

pub async fn delete_snapshot(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let snapshot_id = SnapshotId(id(path)?);
    let mut board = state.board.write().await;
    if board.store_mut().delete_snapshot(snapshot_id)? {
        tracing::info!(id = snapshot_id.0, "Snapshot deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(EntityKind::Snapshot))
    }
}

// =============================================================================
// ASSESSMENTS
// =============================================================================

pub async fn list_assessments(
    State(state): State<AppState>,
    query: Result<Query<AssessmentQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<SkillAssessment>>> {
    let Query(query) = query?;
    let board = state.board.read().await;
    let rows = board
        .store()
        .assessments()?
        .into_iter()
        .filter(|a| query.snapshot_id.is_none_or(|s| a.snapshot_id.0 == s))
        .filter(|a| query.team_member_id.is_none_or(|m| a.team_member_id.0 == m))
        .collect();
    Ok(Json(rows))
}

pub async fn assessments_by_snapshot(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Vec<SkillAssessment>>> {
    let snapshot_id = SnapshotId(id(path)?);
    let board = state.board.read().await;
    Ok(Json(board.store().assessments_by_snapshot(snapshot_id)?))
}

pub async fn assessments_by_team_member(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Vec<SkillAssessment>>> {
    let member_id = MemberId(id(path)?);
    let board = state.board.read().await;
    Ok(Json(board.store().assessments_by_team_member(member_id)?))
}

/// Create, or update the level of the row already holding the same key.
pub async fn upsert_assessment(
    State(state): State<AppState>,
    payload: Result<Json<AssessmentFields>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SkillAssessment>)> {
    let assessment = validation::new_assessment(&body(payload)?)?;
    let mut board = state.board.write().await;
    let saved = board.store_mut().upsert_assessment(assessment)?;
    tracing::debug!(id = saved.id.0, level = saved.level.value(), "Assessment saved");
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update_assessment(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<AssessmentFields>, JsonRejection>,
) -> ApiResult<Json<SkillAssessment>> {
    let assessment_id = AssessmentId(id(path)?);
    let patch = validation::assessment_patch(&body(payload)?)?;
    let mut board = state.board.write().await;
    board
        .store_mut()
        .update_assessment(assessment_id, patch)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::Assessment))
}

// =============================================================================
// SETTINGS
// =============================================================================

pub async fn list_settings(State(state): State<AppState>) -> ApiResult<Json<Vec<Setting>>> {
    let board = state.board.read().await;
    Ok(Json(board.store().settings()?))
}

pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<Setting>> {
    let board = state.board.read().await;
    board
        .store()
        .setting(&key)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(EntityKind::Setting))
}

pub async fn put_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
    payload: Result<Json<SettingBody>, JsonRejection>,
) -> ApiResult<Json<Setting>> {
    let key = validation::setting_key(&key)?;
    let SettingBody { value } = body(payload)?;
    let mut board = state.board.write().await;
    let saved = board.store_mut().put_setting(&key, value)?;
    tracing::info!(key = %saved.key, "Setting saved");
    Ok(Json(saved))
}
