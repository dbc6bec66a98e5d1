//! # Skillboard
//!
//! The HTTP server and CLI around `skillboard-core`.
//!
//! - `api`: axum router, handlers and middleware
//! - `cli`: clap commands
//! - `config`: layered TOML/environment configuration

pub mod api;
pub mod cli;
pub mod config;
