//! # Skillboard CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `init` - Create an empty database
//! - `seed` - Load the demo team into an empty database
//! - `status` - Show entity counts and the current week
//! - `matrix` - Print the current skill matrix
//! - `stats` - Print team statistics and top skills
//! - `report` - Print a weekly or monthly report

mod commands;

use crate::config::{Backend, Config};
use clap::{Parser, Subcommand, ValueEnum};
use skillboard_core::{ReportKind, SkillboardError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Skillboard - team skill tracking dashboard
///
/// Records who knows what, week by week, and serves the views a dashboard needs.
#[derive(Parser, Debug)]
#[command(name = "skillboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./skillboard.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the redb database
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Storage backend
    #[arg(short = 'B', long, global = true, value_enum)]
    pub backend: Option<Backend>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Load the demo team if the board is empty
        #[arg(long)]
        seed_demo: bool,
    },

    /// Initialize a new empty database
    Init {
        /// Replace an existing database
        #[arg(short, long)]
        force: bool,
    },

    /// Load the demo team into an empty database
    Seed,

    /// Show board status
    Status,

    /// Print the current skill matrix
    Matrix,

    /// Print team statistics and the top skills
    Stats,

    /// Print a team report
    Report {
        #[arg(value_enum, default_value = "weekly")]
        kind: ReportArg,
    },
}

/// Report period selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportArg {
    Weekly,
    Monthly,
}

impl From<ReportArg> for ReportKind {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Weekly => ReportKind::Weekly,
            ReportArg::Monthly => ReportKind::Monthly,
        }
    }
}

impl Cli {
    /// File and environment configuration with this invocation's flags on top.
    pub fn resolve_config(&self) -> Result<Config, SkillboardError> {
        let mut config = Config::from_environment(self.config.as_deref())?;
        self.apply_flags(&mut config);
        Ok(config)
    }

    /// Overlay global and subcommand flags onto `config`.
    pub fn apply_flags(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.storage.database = database.clone();
        }
        if let Some(backend) = self.backend {
            config.storage.backend = backend;
        }
        if let Some(Commands::Server {
            host,
            port,
            seed_demo,
        }) = &self.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if *seed_demo {
                config.storage.seed_demo = true;
            }
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), SkillboardError> {
    let config = cli.resolve_config()?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { .. }) => cmd_server(&config).await,
        Some(Commands::Init { force }) => cmd_init(&config, force),
        Some(Commands::Seed) => cmd_seed(&config, json_mode),
        Some(Commands::Matrix) => cmd_matrix(&config, json_mode),
        Some(Commands::Stats) => cmd_stats(&config, json_mode),
        Some(Commands::Report { kind }) => cmd_report(&config, kind.into(), json_mode),
        Some(Commands::Status) | None => cmd_status(&config, json_mode),
    }
}
