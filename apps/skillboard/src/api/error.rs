//! # API Errors
//!
//! Maps engine errors onto HTTP responses. Every error body has a `message`;
//! validation failures also list the offending fields under `errors`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use skillboard_core::{EntityKind, FieldError, SkillboardError};

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// An error a handler can return directly.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// 404 with the entity's display name, e.g. "Team member not found".
    pub fn not_found(kind: EntityKind) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                message: format!("{} not found", capitalize(kind.name())),
                errors: None,
            },
        }
    }

    /// 404 with a custom message.
    pub fn missing(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody {
                message: message.into(),
                errors: None,
            },
        }
    }

    /// 400 listing field errors.
    pub fn invalid(kind: EntityKind, errors: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: format!("Invalid {} data", kind.name()),
                errors: Some(errors),
            },
        }
    }

    /// 500 with a generic message. The cause goes to the log only.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!("Request failed: {}", cause);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                message: "Internal server error".to_string(),
                errors: None,
            },
        }
    }

    /// The HTTP status this error maps to.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<SkillboardError> for ApiError {
    fn from(err: SkillboardError) -> Self {
        match err {
            SkillboardError::NotFound { kind, .. } => Self::not_found(kind),
            SkillboardError::ValidationFailed { kind, errors } => Self::invalid(kind, errors),
            other => Self::internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Oversized bodies keep their 413; every other rejection is a bad body.
        let status = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self {
            status,
            body: ErrorBody {
                message: "Invalid request body".to_string(),
                errors: Some(vec![FieldError::new("body", rejection.body_text())]),
            },
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: "Invalid query string".to_string(),
                errors: Some(vec![FieldError::new("query", rejection.body_text())]),
            },
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                message: "Invalid path parameter".to_string(),
                errors: Some(vec![FieldError::new("id", rejection.body_text())]),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity() {
        let err = ApiError::from(SkillboardError::not_found(EntityKind::TeamMember, 9));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body.message, "Team member not found");
        assert!(err.body.errors.is_none());
    }

    #[test]
    fn validation_lists_fields() {
        let err = ApiError::from(SkillboardError::invalid(EntityKind::Skill, "name", "is required"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body.message, "Invalid skill data");
        let errors = err.body.errors.unwrap_or_default();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
    }

    #[test]
    fn storage_failures_are_opaque() {
        let err = ApiError::from(SkillboardError::StorageError("disk on fire".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.message, "Internal server error");
    }
}
