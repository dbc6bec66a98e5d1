//! # Storage Module
//!
//! Disk-backed persistence for Skillboard.

mod redb_store;

pub use redb_store::RedbStore;
