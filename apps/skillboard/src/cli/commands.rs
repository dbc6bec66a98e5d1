//! # CLI Command Implementations
//!
//! Each command opens the board described by the resolved [`Config`],
//! does its work, and prints either a human-readable table or, with
//! `--json-mode`, the same data as pretty JSON.

use crate::api;
use crate::config::{Backend, Config};
use chrono::{Local, Utc};
use serde::Serialize;
use skillboard_core::{Board, ReportKind, SkillboardError, TeamReport};

// =============================================================================
// BOARD ACCESS
// =============================================================================

/// Open the configured backend.
pub fn open_board(config: &Config) -> Result<Board, SkillboardError> {
    match config.storage.backend {
        Backend::Redb => Board::with_redb(&config.storage.database),
        Backend::Memory => Ok(Board::new()),
    }
}

/// Load the demo team into an empty board when `storage.seed_demo` is set.
/// Returns whether anything was written.
pub fn seed_on_start(config: &Config, board: &mut Board) -> Result<bool, SkillboardError> {
    if !config.storage.seed_demo || !board.store().is_empty()? {
        return Ok(false);
    }

    let summary = board.seed_demo(Local::now().date_naive())?;
    tracing::info!(
        members = summary.members,
        skills = summary.skills,
        assessments = summary.assessments,
        "Demo data loaded"
    );
    Ok(true)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), SkillboardError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| SkillboardError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

fn describe_storage(config: &Config) -> String {
    match config.storage.backend {
        Backend::Redb => format!("redb ({})", config.storage.database.display()),
        Backend::Memory => "memory".to_string(),
    }
}

// =============================================================================
// SERVER
// =============================================================================

pub async fn cmd_server(config: &Config) -> Result<(), SkillboardError> {
    let mut board = open_board(config)?;
    seed_on_start(config, &mut board)?;

    println!("Skillboard Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:    {}", config.server.addr());
    println!("  Storage:    {}", describe_storage(config));
    println!(
        "  Rate limit: {}",
        match config.server.rate_limit {
            0 => "disabled".to_string(),
            rps => format!("{} requests/second", rps),
        }
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /health               - Health check");
    println!("  *    /api/team-members     - Team members");
    println!("  *    /api/skills           - Skills");
    println!("  *    /api/snapshots        - Weekly snapshots");
    println!("  *    /api/assessments      - Skill assessments");
    println!("  GET  /api/skill-matrix     - Current skill matrix");
    println!("  GET  /api/team-stats       - Team statistics");
    println!("  GET  /api/reports/{{kind}}   - Weekly or monthly report");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.server, board).await
}

// =============================================================================
// INIT / SEED
// =============================================================================

pub fn cmd_init(config: &Config, force: bool) -> Result<(), SkillboardError> {
    if config.storage.backend == Backend::Memory {
        println!("Memory backend needs no initialization");
        return Ok(());
    }

    let path = &config.storage.database;
    if path.exists() {
        if !force {
            return Err(SkillboardError::IoError(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(path).map_err(|e| {
            SkillboardError::IoError(format!("Cannot remove '{}': {}", path.display(), e))
        })?;
    }

    Board::with_redb(path)?;
    println!("Initialized new redb database at {}", path.display());
    Ok(())
}

pub fn cmd_seed(config: &Config, json_mode: bool) -> Result<(), SkillboardError> {
    let mut board = open_board(config)?;
    let summary = board.seed_demo(Local::now().date_naive())?;

    if json_mode {
        return print_json(&serde_json::json!({
            "members": summary.members,
            "skills": summary.skills,
            "snapshots": summary.snapshots,
            "assessments": summary.assessments,
        }));
    }

    println!("Demo data loaded into {}", describe_storage(config));
    println!("  Team members: {}", summary.members);
    println!("  Skills:       {}", summary.skills);
    println!("  Snapshots:    {}", summary.snapshots);
    println!("  Assessments:  {}", summary.assessments);
    Ok(())
}

// =============================================================================
// STATUS
// =============================================================================

pub fn cmd_status(config: &Config, json_mode: bool) -> Result<(), SkillboardError> {
    let board = open_board(config)?;
    let summary = board.summary()?;

    if json_mode {
        return print_json(&serde_json::json!({
            "backend": config.storage.backend,
            "database": config.storage.database.to_string_lossy(),
            "summary": summary,
        }));
    }

    println!("Skillboard Status");
    println!("=================");
    println!("Storage: {}", describe_storage(config));
    println!();
    println!("Team members: {}", summary.team_members);
    println!("Skills:       {}", summary.skills);
    println!("Snapshots:    {}", summary.snapshots);
    println!("Assessments:  {}", summary.assessments);
    match summary.current_week {
        Some(week) => println!("Current week: {}", week),
        None => println!("Current week: none"),
    }
    Ok(())
}

// =============================================================================
// MATRIX
// =============================================================================

pub fn cmd_matrix(config: &Config, json_mode: bool) -> Result<(), SkillboardError> {
    let board = open_board(config)?;
    let matrix = board.skill_matrix()?;

    if json_mode {
        return print_json(&matrix);
    }

    if matrix.assessments.is_empty() {
        println!("No current snapshot; nothing to show.");
        return Ok(());
    }

    let name_width = matrix
        .members
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Member".len());

    let mut header = format!("{:<width$}", "Member", width = name_width);
    for skill in &matrix.skills {
        header.push_str(&format!(" | {}", skill.name));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.chars().count()));

    for member in &matrix.members {
        let mut row = format!("{:<width$}", member.name, width = name_width);
        for skill in &matrix.skills {
            let level = matrix.level(member.id, skill.id).value();
            row.push_str(&format!(
                " | {:^width$}",
                level,
                width = skill.name.chars().count()
            ));
        }
        println!("{}", row);
    }
    println!();
    println!("Levels: 0 Unknown, 1 Basic Knowledge, 2 Hands-on Experience, 3 Expert");
    Ok(())
}

// =============================================================================
// STATS
// =============================================================================

pub fn cmd_stats(config: &Config, json_mode: bool) -> Result<(), SkillboardError> {
    let board = open_board(config)?;
    let stats = board.team_stats()?;
    let top = board.top_skills()?;

    if json_mode {
        return print_json(&serde_json::json!({ "stats": stats, "topSkills": top }));
    }

    println!("Team Statistics");
    println!("===============");
    println!("Team size:          {}", stats.team_size);
    println!("Skills tracked:     {}", stats.total_skills);
    println!("Average level:      {}", stats.avg_skill_level);
    println!("Change vs previous: {}", stats.avg_skill_level_change);
    println!("Growth areas:       {}", stats.growth_areas);
    println!("Stagnant areas:     {}", stats.stagnant_areas);

    if !top.is_empty() {
        println!();
        println!("Top Skills");
        println!("----------");
        for (rank, skill) in top.iter().enumerate() {
            println!(
                "{:>2}. {:<24} avg {}  growth {}%",
                rank + 1,
                skill.name,
                skill.average_level,
                skill.growth
            );
        }
    }
    Ok(())
}

// =============================================================================
// REPORT
// =============================================================================

pub fn cmd_report(
    config: &Config,
    kind: ReportKind,
    json_mode: bool,
) -> Result<(), SkillboardError> {
    let board = open_board(config)?;
    let now = Utc::now();
    let report = match kind {
        ReportKind::Weekly => board.weekly_report(now)?,
        ReportKind::Monthly => board.monthly_report(now)?,
    };

    if json_mode {
        return print_json(&report);
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &TeamReport) {
    let title = match report.kind {
        ReportKind::Weekly => "Weekly Team Report",
        ReportKind::Monthly => "Monthly Team Report",
    };
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
    println!(
        "Period:    {} to {}",
        report.period.start.date_naive(),
        report.period.end.date_naive()
    );
    println!("Snapshots: {}", report.snapshots_covered);
    println!("Team size: {}", report.team_size);
    println!("Skills:    {}", report.total_skills);
    println!("Average:   {}", report.avg_skill_level);
    println!(
        "Growth areas: {}, stagnant areas: {}",
        report.growth_areas, report.stagnant_areas
    );

    let sections = [
        ("Top skills", &report.top_skills),
        ("Highest growth", &report.highest_growth),
        ("No progress", &report.no_progress),
    ];
    for (heading, skills) in sections {
        if skills.is_empty() {
            continue;
        }
        println!();
        println!("{}:", heading);
        for skill in skills {
            let trend: Vec<String> = skill.history.iter().map(ToString::to_string).collect();
            println!(
                "  - {:<24} {} (was {}, growth {}) [{}]",
                skill.name,
                skill.average_level,
                skill.previous_level,
                skill.growth,
                trend.join(" -> ")
            );
        }
    }
}
