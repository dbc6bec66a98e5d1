//! # Dashboard View Handlers
//!
//! Read-only aggregates and reports. Each runs against a consistent view of
//! the board under its read lock.

use super::{AppState, error::ApiError};
use axum::{Json, extract::State};
use chrono::Utc;
use skillboard_core::{
    GrowthPerSkill, SkillMatrix, TeamReport, TeamStats, TopSkill, WeeklyComparison,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn skill_matrix(State(state): State<AppState>) -> ApiResult<SkillMatrix> {
    Ok(Json(state.board.read().await.skill_matrix()?))
}

pub async fn weekly_comparison(State(state): State<AppState>) -> ApiResult<WeeklyComparison> {
    Ok(Json(state.board.read().await.weekly_comparison()?))
}

pub async fn growth_per_skill(State(state): State<AppState>) -> ApiResult<GrowthPerSkill> {
    Ok(Json(state.board.read().await.growth_per_skill()?))
}

pub async fn team_stats(State(state): State<AppState>) -> ApiResult<TeamStats> {
    Ok(Json(state.board.read().await.team_stats()?))
}

pub async fn top_skills(State(state): State<AppState>) -> ApiResult<Vec<TopSkill>> {
    Ok(Json(state.board.read().await.top_skills()?))
}

/// Report over the last 7 days, stamped with the request time.
pub async fn weekly_report(State(state): State<AppState>) -> ApiResult<TeamReport> {
    let report = state.board.read().await.weekly_report(Utc::now())?;
    Ok(Json(report))
}

/// Report over the last 30 days, stamped with the request time.
pub async fn monthly_report(State(state): State<AppState>) -> ApiResult<TeamReport> {
    let report = state.board.read().await.monthly_report(Utc::now())?;
    Ok(Json(report))
}
