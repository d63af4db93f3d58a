//! Party goal API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use types::{ContributeRequest, CreateGoalRequest, GoalDto, ListGoalsQuery};

use crate::api::auth::{AuthUser, HasDatabase};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, parse_date_param};
use crate::data::SqliteService;
use crate::data::types::GoalStatus;
use crate::domain::GoalLedger;
use crate::domain::goals::{GoalDraft, GoalProgress};

/// Shared state for goal API endpoints
#[derive(Clone)]
pub struct GoalsApiState {
    pub database: Arc<SqliteService>,
    pub ledger: Arc<GoalLedger>,
}

impl HasDatabase for GoalsApiState {
    fn database(&self) -> &Arc<SqliteService> {
        &self.database
    }
}

/// Build party-scoped goal routes (merged into the `/parties` router)
pub fn party_routes(database: Arc<SqliteService>, ledger: Arc<GoalLedger>) -> Router<()> {
    let state = GoalsApiState { database, ledger };

    Router::new()
        .route("/{party_id}/goals", get(list_goals).post(create_goal))
        .with_state(state)
}

/// Build goal API routes (nested at `/goals`)
pub fn routes(database: Arc<SqliteService>, ledger: Arc<GoalLedger>) -> Router<()> {
    let state = GoalsApiState { database, ledger };

    Router::new()
        .route("/{goal_id}", get(get_goal))
        .route("/{goal_id}/contribute", post(contribute))
        .route("/{goal_id}/cancel", post(cancel_goal))
        .with_state(state)
}

/// Create a goal for a party (officer role or above)
#[utoipa::path(
    post,
    path = "/api/v1/parties/{party_id}/goals",
    tag = "goals",
    request_body = CreateGoalRequest,
    params(
        ("party_id" = i64, Path, description = "Party ID")
    ),
    responses(
        (status = 201, description = "Goal created", body = GoalDto),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Not a member or insufficient role")
    )
)]
pub async fn create_goal(
    State(state): State<GoalsApiState>,
    user: AuthUser,
    Path(party_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<CreateGoalRequest>,
) -> Result<(StatusCode, Json<GoalDto>), ApiError> {
    let starts_on = parse_date_param(&body.starts_on)?;
    let ends_on = parse_date_param(&body.ends_on)?;

    let goal = state
        .ledger
        .create_goal(
            user.id,
            party_id,
            GoalDraft {
                title: body.title,
                description: body.description,
                target_value: body.target_value,
                reward_points: body.reward_points,
                starts_on,
                ends_on,
            },
        )
        .await
        .map_err(ApiError::from_engine)?;

    Ok((StatusCode::CREATED, Json(goal.into())))
}

/// List a party's goals, active first (members only)
#[utoipa::path(
    get,
    path = "/api/v1/parties/{party_id}/goals",
    tag = "goals",
    params(
        ("party_id" = i64, Path, description = "Party ID"),
        ("status" = Option<String>, Query, description = "Filter: active, completed, failed, cancelled")
    ),
    responses(
        (status = 200, description = "Goal list", body = [GoalDto]),
        (status = 403, description = "Not a member")
    )
)]
pub async fn list_goals(
    State(state): State<GoalsApiState>,
    user: AuthUser,
    Path(party_id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<ListGoalsQuery>,
) -> Result<Json<Vec<GoalDto>>, ApiError> {
    let status = match &query.status {
        Some(raw) => Some(GoalStatus::parse(raw).ok_or_else(|| {
            ApiError::bad_request(
                "INVALID_STATUS",
                "status must be one of: active, completed, failed, cancelled",
            )
        })?),
        None => None,
    };

    let goals = state
        .ledger
        .list_goals(user.id, party_id, status)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(goals.into_iter().map(GoalDto::from).collect()))
}

/// Fetch one goal (members only)
#[utoipa::path(
    get,
    path = "/api/v1/goals/{goal_id}",
    tag = "goals",
    params(
        ("goal_id" = i64, Path, description = "Goal ID")
    ),
    responses(
        (status = 200, description = "Goal", body = GoalDto),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_goal(
    State(state): State<GoalsApiState>,
    user: AuthUser,
    Path(goal_id): Path<i64>,
) -> Result<Json<GoalDto>, ApiError> {
    let goal = state
        .ledger
        .get_goal(user.id, goal_id)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(goal.into()))
}

/// Contribute to an active goal
///
/// Crossing the target completes the goal and credits the reward exactly
/// once; the caller's contribution counter always moves by `amount`.
#[utoipa::path(
    post,
    path = "/api/v1/goals/{goal_id}/contribute",
    tag = "goals",
    request_body = ContributeRequest,
    params(
        ("goal_id" = i64, Path, description = "Goal ID")
    ),
    responses(
        (status = 200, description = "Contribution applied", body = GoalProgress),
        (status = 400, description = "Invalid amount"),
        (status = 403, description = "Not a member"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Goal is not active")
    )
)]
pub async fn contribute(
    State(state): State<GoalsApiState>,
    user: AuthUser,
    Path(goal_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<ContributeRequest>,
) -> Result<Json<GoalProgress>, ApiError> {
    let progress = state
        .ledger
        .contribute(user.id, goal_id, body.amount)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(progress))
}

/// Cancel an active goal (creator or party leader)
#[utoipa::path(
    post,
    path = "/api/v1/goals/{goal_id}/cancel",
    tag = "goals",
    params(
        ("goal_id" = i64, Path, description = "Goal ID")
    ),
    responses(
        (status = 200, description = "Goal cancelled", body = GoalDto),
        (status = 403, description = "Insufficient role"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Goal is not active")
    )
)]
pub async fn cancel_goal(
    State(state): State<GoalsApiState>,
    user: AuthUser,
    Path(goal_id): Path<i64>,
) -> Result<Json<GoalDto>, ApiError> {
    let goal = state
        .ledger
        .cancel(user.id, goal_id)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(goal.into()))
}
