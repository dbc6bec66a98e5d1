//! # API Request/Response Types
//!
//! JSON shapes specific to the HTTP surface. Entities and views serialize
//! straight from `skillboard-core`.

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// QUERY STRINGS
// =============================================================================

/// `POST /api/snapshots?setCurrent=true`
///
/// Only the literal `true` sets the flag; any other value reads as `false`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotQuery {
    #[serde(deserialize_with = "only_true")]
    pub set_current: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseFlag {
    Bool(bool),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn only_true<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match LooseFlag::deserialize(deserializer)? {
        LooseFlag::Bool(flag) => flag,
        LooseFlag::Text(text) => text == "true",
        LooseFlag::Other(_) => false,
    })
}

/// `GET /api/assessments?snapshotId=&teamMemberId=`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentQuery {
    pub snapshot_id: Option<u64>,
    pub team_member_id: Option<u64>,
}

// =============================================================================
// SETTINGS
// =============================================================================

/// `PUT /api/settings/{key}` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingBody {
    pub value: serde_json::Value,
}
