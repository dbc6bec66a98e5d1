//! # Skillboard - Team Skill Tracking Dashboard
//!
//! The main binary: serves the dashboard API and exposes the board on the
//! command line.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │            apps/skillboard (THE BINARY)        │
//! │                                                │
//! │   ┌─────────────┐          ┌─────────────┐     │
//! │   │    CLI      │          │  HTTP API   │     │
//! │   │   (clap)    │          │   (axum)    │     │
//! │   └──────┬──────┘          └──────┬──────┘     │
//! │          └──────────┬─────────────┘            │
//! │                     ▼                          │
//! │           ┌───────────────────┐                │
//! │           │  skillboard-core  │                │
//! │           │ (store + views)   │                │
//! │           └───────────────────┘                │
//! └────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server with the demo team in memory
//! skillboard -B memory server --seed-demo
//!
//! # CLI operations
//! skillboard init
//! skillboard seed
//! skillboard matrix
//! skillboard report monthly --json-mode
//! ```

use clap::Parser;
use skillboard::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // SKILLBOARD_LOG_FORMAT=json switches to machine-parseable output.
    let log_format =
        std::env::var("SKILLBOARD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "skillboard=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Skillboard startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─┐┬┌─┬┬  ┬  ┌┐ ┌─┐┌─┐┬─┐┌┬┐
  └─┐├┴┐││  │  ├┴┐│ │├─┤├┬┘ ││
  └─┘┴ ┴┴┴─┘┴─┘└─┘└─┘┴ ┴┴└──┴┘

  Team Skill Tracking v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
