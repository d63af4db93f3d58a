//! Resolved-identity extractor
//!
//! Authentication happens upstream (gateway/identity provider); this server
//! receives the already-resolved numeric user id in the `x-tally-user`
//! header and only verifies the user exists and is active. Credentials are
//! never re-validated here.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::types::ApiError;
use crate::core::constants::HEADER_USER_ID;
use crate::data::SqliteService;
use crate::data::sqlite::repositories::user;

/// Route state that can hand out the database service (for `AuthUser`)
pub trait HasDatabase {
    fn database(&self) -> &Arc<SqliteService>;
}

/// The authenticated caller, as resolved by the upstream identity layer
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub display_name: Option<String>,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: HasDatabase + Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(HEADER_USER_ID)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::unauthorized(
                    "MISSING_USER",
                    format!("Missing {} header", HEADER_USER_ID),
                )
            })?;

        let user_id: i64 = raw.parse().map_err(|_| {
            ApiError::unauthorized(
                "INVALID_USER",
                format!("{} must be a numeric user id", HEADER_USER_ID),
            )
        })?;

        let user = user::get_user(state.database().pool(), user_id)
            .await
            .map_err(ApiError::from_sqlite)?
            .ok_or_else(|| ApiError::unauthorized("UNKNOWN_USER", "Unknown user"))?;

        if !user.is_active {
            return Err(ApiError::forbidden("USER_INACTIVE", "User is deactivated"));
        }

        Ok(Self {
            id: user.id,
            display_name: user.display_name,
        })
    }
}
