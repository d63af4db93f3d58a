//! Shared API types
//!
//! The JSON error envelope used across all endpoints, plus small parsing
//! helpers for query/path parameters.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;

use crate::domain::EngineError;
use crate::utils::time::parse_date;

/// Parse an optional `YYYY-MM-DD` string parameter
pub fn parse_date_param(s: &Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    match s {
        Some(raw) => parse_date(raw).map(Some).ok_or_else(|| {
            ApiError::bad_request(
                "INVALID_DATE",
                format!("Invalid date: {}. Use YYYY-MM-DD format.", raw),
            )
        }),
        None => Ok(None),
    }
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    Forbidden { code: String, message: String },
    Conflict { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Forbidden {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn conflict(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_sqlite(e: crate::data::SqliteError) -> Self {
        tracing::error!(error = %e, "SQLite error");
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }

    /// Map the engine's error taxonomy onto HTTP semantics
    pub fn from_engine(e: EngineError) -> Self {
        match e {
            EngineError::InvalidMood(_) => Self::bad_request("INVALID_MOOD", e.to_string()),
            EngineError::InvalidDuration(_) => Self::bad_request("INVALID_DURATION", e.to_string()),
            EngineError::InvalidAmount(_) => Self::bad_request("INVALID_AMOUNT", e.to_string()),
            EngineError::InvalidTarget(_) => Self::bad_request("INVALID_TARGET", e.to_string()),
            EngineError::InvalidReward(_) => Self::bad_request("INVALID_REWARD", e.to_string()),
            EngineError::InvalidDateRange => {
                Self::bad_request("INVALID_DATE_RANGE", e.to_string())
            }
            EngineError::NotFound(_) => Self::not_found("NOT_FOUND", e.to_string()),
            EngineError::NotAMember => Self::forbidden("NOT_A_MEMBER", e.to_string()),
            EngineError::InsufficientRole => Self::forbidden("INSUFFICIENT_ROLE", e.to_string()),
            EngineError::NotActive => Self::conflict("GOAL_NOT_ACTIVE", e.to_string()),
            EngineError::Database(e) => Self::from_sqlite(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::Forbidden { code, message } => {
                (StatusCode::FORBIDDEN, "forbidden", code, message)
            }
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_param() {
        assert_eq!(parse_date_param(&None).unwrap(), None);
        assert_eq!(
            parse_date_param(&Some("2025-06-15".to_string())).unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 15)
        );
        assert!(parse_date_param(&Some("15/06/2025".to_string())).is_err());
    }

    #[test]
    fn test_engine_error_mapping() {
        assert!(matches!(
            ApiError::from_engine(EngineError::InvalidMood(9)),
            ApiError::BadRequest { .. }
        ));
        assert!(matches!(
            ApiError::from_engine(EngineError::NotFound("habit")),
            ApiError::NotFound { .. }
        ));
        assert!(matches!(
            ApiError::from_engine(EngineError::NotAMember),
            ApiError::Forbidden { .. }
        ));
        assert!(matches!(
            ApiError::from_engine(EngineError::NotActive),
            ApiError::Conflict { .. }
        ));
    }
}
