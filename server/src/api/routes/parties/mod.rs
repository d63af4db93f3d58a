//! Party API endpoints
//!
//! Membership gates every read: only active members see a party's details,
//! members, or leaderboard.

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use types::{
    CreatePartyRequest, JoinPartyRequest, JoinPartyResponse, LeaderboardResponse,
    LeavePartyResponse, MembersResponse,
};

use crate::api::auth::{AuthUser, HasDatabase};
use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::core::constants::DEFAULT_MAX_MEMBERS;
use crate::data::SqliteService;
use crate::data::sqlite::repositories::party;
use crate::data::types::PartyRow;

/// Shared state for Party API endpoints
#[derive(Clone)]
pub struct PartiesApiState {
    pub database: Arc<SqliteService>,
}

impl HasDatabase for PartiesApiState {
    fn database(&self) -> &Arc<SqliteService> {
        &self.database
    }
}

/// Build Party API routes
pub fn routes(database: Arc<SqliteService>) -> Router<()> {
    let state = PartiesApiState { database };

    Router::new()
        .route("/", post(create_party))
        .route("/join", post(join_party))
        .route("/{party_id}", get(get_party))
        .route("/{party_id}/leave", post(leave_party))
        .route("/{party_id}/members", get(list_members))
        .route("/{party_id}/leaderboard", get(leaderboard))
        .with_state(state)
}

/// Require an active membership before exposing party data
async fn require_member(
    state: &PartiesApiState,
    party_id: i64,
    user_id: i64,
) -> Result<(), ApiError> {
    party::membership(state.database.pool(), party_id, user_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .filter(|m| m.is_active)
        .map(|_| ())
        .ok_or_else(|| {
            ApiError::forbidden("NOT_A_MEMBER", "user is not an active member of this party")
        })
}

/// Create a party; the creator becomes its leader
#[utoipa::path(
    post,
    path = "/api/v1/parties",
    tag = "parties",
    request_body = CreatePartyRequest,
    responses(
        (status = 201, description = "Party created", body = PartyRow),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_party(
    State(state): State<PartiesApiState>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<CreatePartyRequest>,
) -> Result<(StatusCode, Json<PartyRow>), ApiError> {
    let row = party::create_party_atomic(
        state.database.pool(),
        user.id,
        &party::NewParty {
            name: &body.name,
            description: body.description.as_deref(),
            is_public: body.is_public,
            max_members: body.max_members.unwrap_or(DEFAULT_MAX_MEMBERS),
        },
    )
    .await
    .map_err(ApiError::from_sqlite)?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// Fetch a party (members only)
#[utoipa::path(
    get,
    path = "/api/v1/parties/{party_id}",
    tag = "parties",
    params(
        ("party_id" = i64, Path, description = "Party ID")
    ),
    responses(
        (status = 200, description = "Party", body = PartyRow),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_party(
    State(state): State<PartiesApiState>,
    user: AuthUser,
    Path(party_id): Path<i64>,
) -> Result<Json<PartyRow>, ApiError> {
    let row = party::get_party(state.database.pool(), party_id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("NOT_FOUND", "party not found"))?;

    require_member(&state, party_id, user.id).await?;

    Ok(Json(row))
}

/// Join a party by invite code
#[utoipa::path(
    post,
    path = "/api/v1/parties/join",
    tag = "parties",
    request_body = JoinPartyRequest,
    responses(
        (status = 200, description = "Joined", body = JoinPartyResponse),
        (status = 404, description = "Unknown invite code"),
        (status = 409, description = "Party is full")
    )
)]
pub async fn join_party(
    State(state): State<PartiesApiState>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<JoinPartyRequest>,
) -> Result<Json<JoinPartyResponse>, ApiError> {
    let outcome = party::join_party_atomic(state.database.pool(), &body.invite_code, user.id)
        .await
        .map_err(ApiError::from_sqlite)?;

    match outcome {
        party::JoinOutcome::Joined(membership) => Ok(Json(JoinPartyResponse { membership })),
        party::JoinOutcome::NotFound => {
            Err(ApiError::not_found("NOT_FOUND", "unknown invite code"))
        }
        party::JoinOutcome::Full => Err(ApiError::conflict("PARTY_FULL", "party is full")),
    }
}

/// Leave a party (contribution history is kept)
#[utoipa::path(
    post,
    path = "/api/v1/parties/{party_id}/leave",
    tag = "parties",
    params(
        ("party_id" = i64, Path, description = "Party ID")
    ),
    responses(
        (status = 200, description = "Left party", body = LeavePartyResponse),
        (status = 404, description = "Not a member")
    )
)]
pub async fn leave_party(
    State(state): State<PartiesApiState>,
    user: AuthUser,
    Path(party_id): Path<i64>,
) -> Result<Json<LeavePartyResponse>, ApiError> {
    let left = party::leave_party(state.database.pool(), party_id, user.id)
        .await
        .map_err(ApiError::from_sqlite)?;

    if !left {
        return Err(ApiError::not_found("NOT_FOUND", "membership not found"));
    }

    Ok(Json(LeavePartyResponse { left }))
}

/// List a party's active members (members only)
#[utoipa::path(
    get,
    path = "/api/v1/parties/{party_id}/members",
    tag = "parties",
    params(
        ("party_id" = i64, Path, description = "Party ID")
    ),
    responses(
        (status = 200, description = "Member list", body = MembersResponse),
        (status = 403, description = "Not a member")
    )
)]
pub async fn list_members(
    State(state): State<PartiesApiState>,
    user: AuthUser,
    Path(party_id): Path<i64>,
) -> Result<Json<MembersResponse>, ApiError> {
    require_member(&state, party_id, user.id).await?;

    let members = party::list_members(state.database.pool(), party_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(MembersResponse { members }))
}

/// Contribution leaderboard, highest first (members only)
#[utoipa::path(
    get,
    path = "/api/v1/parties/{party_id}/leaderboard",
    tag = "parties",
    params(
        ("party_id" = i64, Path, description = "Party ID")
    ),
    responses(
        (status = 200, description = "Leaderboard", body = LeaderboardResponse),
        (status = 403, description = "Not a member")
    )
)]
pub async fn leaderboard(
    State(state): State<PartiesApiState>,
    user: AuthUser,
    Path(party_id): Path<i64>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    require_member(&state, party_id, user.id).await?;

    let leaderboard = party::leaderboard(state.database.pool(), party_id)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(LeaderboardResponse { leaderboard }))
}
