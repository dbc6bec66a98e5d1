//! # Report Generator
//!
//! Weekly and monthly team reports composed from the aggregation helpers.
//!
//! A report compares the current snapshot with a baseline snapshot and
//! measures per-skill growth as the *absolute* change of the team-size
//! denominated average (unlike `top_skills`, which reports a percentage).
//!
//! - Weekly baseline: the most recent snapshot not flagged current.
//! - Monthly baseline: the oldest snapshot of a window holding the current
//!   snapshot and up to four snapshots dated on or before it.
//!
//! Every snapshot of the window contributes one point to each skill's
//! `history`, oldest first, so the weeks between baseline and current show
//! up in the report.
//!
//! Skills whose average went down appear in neither `highest_growth` nor
//! `no_progress`.

use crate::aggregate::LevelTotals;
use crate::primitives::{
    MONTHLY_PERIOD_DAYS, MONTHLY_SNAPSHOT_WINDOW, REPORT_HIGHEST_GROWTH, REPORT_NO_PROGRESS,
    REPORT_TOP_SKILLS, WEEKLY_PERIOD_DAYS,
};
use crate::{SkillId, SkillStore, SkillboardError, Tenths, WeeklySnapshot};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which report was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Weekly,
    Monthly,
}

impl ReportKind {
    /// Length of the reporting period.
    #[must_use]
    pub fn period(self) -> Duration {
        match self {
            ReportKind::Weekly => Duration::days(WEEKLY_PERIOD_DAYS),
            ReportKind::Monthly => Duration::days(MONTHLY_PERIOD_DAYS),
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportKind::Weekly => f.write_str("weekly"),
            ReportKind::Monthly => f.write_str("monthly"),
        }
    }
}

/// The time window a report covers, ending at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One skill's standing in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProgress {
    pub id: SkillId,
    pub name: String,
    pub icon: String,
    pub icon_color: String,
    pub average_level: Tenths,
    pub previous_level: Tenths,
    /// `average_level - previous_level`
    pub growth: Tenths,
    /// Average per covered snapshot, aligned with `TeamReport::weeks`.
    pub history: Vec<Tenths>,
}

/// A generated team report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamReport {
    pub kind: ReportKind,
    pub generated_at: DateTime<Utc>,
    pub period: ReportPeriod,
    /// Snapshots that fed the report (current plus baseline window).
    pub snapshots_covered: usize,
    /// `week_of` of each covered snapshot: baseline first, current last.
    pub weeks: Vec<NaiveDate>,
    pub team_size: usize,
    pub total_skills: usize,
    pub avg_skill_level: Tenths,
    /// Skills with positive growth.
    pub growth_areas: usize,
    /// Skills with exactly zero growth.
    pub stagnant_areas: usize,
    pub top_skills: Vec<SkillProgress>,
    pub highest_growth: Vec<SkillProgress>,
    pub no_progress: Vec<SkillProgress>,
}

/// Current week against the latest non-current snapshot.
pub fn weekly_report<S: SkillStore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
) -> Result<TeamReport, SkillboardError> {
    let Some(current) = store.current_snapshot()? else {
        return build(store, ReportKind::Weekly, now, Vec::new());
    };
    let mut window = Vec::with_capacity(2);
    window.extend(store.latest_non_current_snapshot()?);
    window.push(current);
    build(store, ReportKind::Weekly, now, window)
}

/// Current week against the start of a trailing window of snapshots.
pub fn monthly_report<S: SkillStore + ?Sized>(
    store: &S,
    now: DateTime<Utc>,
) -> Result<TeamReport, SkillboardError> {
    let Some(current) = store.current_snapshot()? else {
        return build(store, ReportKind::Monthly, now, Vec::new());
    };
    let mut window: Vec<WeeklySnapshot> = store
        .snapshots()?
        .into_iter()
        .filter(|s| s.id != current.id && s.week_of <= current.week_of)
        .take(MONTHLY_SNAPSHOT_WINDOW - 1)
        .collect();
    // Listed newest first; reports read oldest first.
    window.reverse();
    window.push(current);
    build(store, ReportKind::Monthly, now, window)
}

/// `window` starts with the baseline (when there is one) and ends with the
/// current snapshot.
fn build<S: SkillStore + ?Sized>(
    store: &S,
    kind: ReportKind,
    now: DateTime<Utc>,
    window: Vec<WeeklySnapshot>,
) -> Result<TeamReport, SkillboardError> {
    let team_size = store.team_members()?.len();
    let skills = store.skills()?;

    let mut report = TeamReport {
        kind,
        generated_at: now,
        period: ReportPeriod {
            start: now - kind.period(),
            end: now,
        },
        snapshots_covered: window.len(),
        weeks: window.iter().map(|s| s.week_of).collect(),
        team_size,
        total_skills: skills.len(),
        avg_skill_level: Tenths::ZERO,
        growth_areas: 0,
        stagnant_areas: 0,
        top_skills: Vec::new(),
        highest_growth: Vec::new(),
        no_progress: Vec::new(),
    };
    let totals = window
        .iter()
        .map(|snapshot| LevelTotals::load(store, Some(snapshot)))
        .collect::<Result<Vec<_>, _>>()?;
    let Some((now_totals, earlier)) = totals.split_last() else {
        return Ok(report);
    };
    let empty = LevelTotals::default();
    let base_totals = earlier.first().unwrap_or(&empty);
    report.avg_skill_level = now_totals.flat_mean();

    let progress: Vec<SkillProgress> = skills
        .into_iter()
        .map(|skill| {
            let average_level = now_totals.skill_average(skill.id, team_size);
            let previous_level = base_totals.skill_average(skill.id, team_size);
            SkillProgress {
                id: skill.id,
                name: skill.name,
                icon: skill.icon,
                icon_color: skill.icon_color,
                average_level,
                previous_level,
                growth: average_level.minus(previous_level),
                history: totals
                    .iter()
                    .map(|t| t.skill_average(skill.id, team_size))
                    .collect(),
            }
        })
        .collect();

    report.growth_areas = progress.iter().filter(|p| p.growth.is_positive()).count();
    report.stagnant_areas = progress.iter().filter(|p| p.growth.is_zero()).count();

    let mut top = progress.clone();
    top.sort_by(|a, b| b.average_level.cmp(&a.average_level));
    top.truncate(REPORT_TOP_SKILLS);

    let mut growing: Vec<SkillProgress> = progress
        .iter()
        .filter(|p| p.growth.is_positive())
        .cloned()
        .collect();
    growing.sort_by(|a, b| b.growth.cmp(&a.growth));
    growing.truncate(REPORT_HIGHEST_GROWTH);

    let mut flat: Vec<SkillProgress> = progress
        .into_iter()
        .filter(|p| p.growth.is_zero())
        .collect();
    flat.sort_by(|a, b| a.average_level.cmp(&b.average_level));
    flat.truncate(REPORT_NO_PROGRESS);

    report.top_skills = top;
    report.highest_growth = growing;
    report.no_progress = flat;
    Ok(report)
}
