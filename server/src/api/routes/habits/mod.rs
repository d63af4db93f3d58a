//! Habit API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use types::{CreateHabitRequest, DeactivateResponse, ListHabitsQuery, UpdateHabitRequest, weekdays_to_csv};

use crate::api::auth::{AuthUser, HasDatabase};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::data::SqliteService;
use crate::data::types::{HabitCadence, HabitRow};
use crate::data::sqlite::repositories::habit;
use crate::domain::HabitTracker;
use crate::domain::tracker::HabitStats;

/// Shared state for Habit API endpoints
#[derive(Clone)]
pub struct HabitsApiState {
    pub database: Arc<SqliteService>,
    pub tracker: Arc<HabitTracker>,
}

impl HasDatabase for HabitsApiState {
    fn database(&self) -> &Arc<SqliteService> {
        &self.database
    }
}

/// Build Habit API routes
pub fn routes(database: Arc<SqliteService>, tracker: Arc<HabitTracker>) -> Router<()> {
    let state = HabitsApiState { database, tracker };

    Router::new()
        .route("/", get(list_habits).post(create_habit))
        .route("/at-risk", get(at_risk_habits))
        .route(
            "/{habit_id}",
            get(get_habit).patch(update_habit).delete(deactivate_habit),
        )
        .route("/{habit_id}/stats", get(habit_stats))
        .with_state(state)
}

/// Cadence/custom-days consistency shared by create and update
fn check_custom_days(
    cadence: HabitCadence,
    custom_days: Option<&Vec<u8>>,
) -> Result<(), ApiError> {
    if cadence == HabitCadence::Custom && custom_days.is_none() {
        return Err(ApiError::bad_request(
            "CUSTOM_DAYS_REQUIRED",
            "cadence 'custom' requires custom_days",
        ));
    }
    Ok(())
}

/// Create a habit
#[utoipa::path(
    post,
    path = "/api/v1/habits",
    tag = "habits",
    request_body = CreateHabitRequest,
    responses(
        (status = 201, description = "Habit created", body = HabitRow),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_habit(
    State(state): State<HabitsApiState>,
    user: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateHabitRequest>,
) -> Result<(StatusCode, Json<HabitRow>), ApiError> {
    check_custom_days(body.cadence, body.custom_days.as_ref())?;
    let custom_days = body.custom_days.as_deref().map(weekdays_to_csv);

    let row = habit::create_habit(
        state.database.pool(),
        user.id,
        &habit::NewHabit {
            title: &body.title,
            description: body.description.as_deref(),
            cadence: body.cadence,
            custom_days: custom_days.as_deref(),
            party_id: body.party_id,
        },
    )
    .await
    .map_err(ApiError::from_sqlite)?;

    Ok((StatusCode::CREATED, Json(row)))
}

/// List the caller's habits
#[utoipa::path(
    get,
    path = "/api/v1/habits",
    tag = "habits",
    params(
        ("include_inactive" = Option<bool>, Query, description = "Include deactivated habits")
    ),
    responses(
        (status = 200, description = "Habit list", body = [HabitRow])
    )
)]
pub async fn list_habits(
    State(state): State<HabitsApiState>,
    user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ListHabitsQuery>,
) -> Result<Json<Vec<HabitRow>>, ApiError> {
    let rows = habit::list_for_user(state.database.pool(), user.id, query.include_inactive)
        .await
        .map_err(ApiError::from_sqlite)?;

    Ok(Json(rows))
}

/// Fetch one habit
#[utoipa::path(
    get,
    path = "/api/v1/habits/{habit_id}",
    tag = "habits",
    params(
        ("habit_id" = i64, Path, description = "Habit ID")
    ),
    responses(
        (status = 200, description = "Habit", body = HabitRow),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_habit(
    State(state): State<HabitsApiState>,
    user: AuthUser,
    Path(habit_id): Path<i64>,
) -> Result<Json<HabitRow>, ApiError> {
    let row = habit::get_owned_habit(state.database.pool(), habit_id, user.id)
        .await
        .map_err(ApiError::from_sqlite)?
        .ok_or_else(|| ApiError::not_found("NOT_FOUND", "habit not found"))?;

    Ok(Json(row))
}

/// Update habit fields (streak columns are not editable here)
#[utoipa::path(
    patch,
    path = "/api/v1/habits/{habit_id}",
    tag = "habits",
    request_body = UpdateHabitRequest,
    params(
        ("habit_id" = i64, Path, description = "Habit ID")
    ),
    responses(
        (status = 200, description = "Updated habit", body = HabitRow),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_habit(
    State(state): State<HabitsApiState>,
    user: AuthUser,
    Path(habit_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<UpdateHabitRequest>,
) -> Result<Json<HabitRow>, ApiError> {
    if let Some(cadence) = body.cadence {
        check_custom_days(cadence, body.custom_days.as_ref())?;
    }
    let custom_days = body.custom_days.as_deref().map(weekdays_to_csv);

    let row = habit::update_habit(
        state.database.pool(),
        habit_id,
        user.id,
        &habit::HabitPatch {
            title: body.title.as_deref(),
            description: body.description.as_deref().map(Some),
            cadence: body.cadence,
            custom_days: custom_days.as_deref().map(Some),
            party_id: body.party_id.map(Some),
            is_active: body.is_active,
        },
    )
    .await
    .map_err(ApiError::from_sqlite)?
    .ok_or_else(|| ApiError::not_found("NOT_FOUND", "habit not found"))?;

    Ok(Json(row))
}

/// Soft-delete a habit (history stays queryable)
#[utoipa::path(
    delete,
    path = "/api/v1/habits/{habit_id}",
    tag = "habits",
    params(
        ("habit_id" = i64, Path, description = "Habit ID")
    ),
    responses(
        (status = 200, description = "Habit deactivated", body = DeactivateResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn deactivate_habit(
    State(state): State<HabitsApiState>,
    user: AuthUser,
    Path(habit_id): Path<i64>,
) -> Result<Json<DeactivateResponse>, ApiError> {
    let deactivated = habit::deactivate(state.database.pool(), habit_id, user.id)
        .await
        .map_err(ApiError::from_sqlite)?;

    if !deactivated {
        return Err(ApiError::not_found("NOT_FOUND", "habit not found"));
    }

    Ok(Json(DeactivateResponse { deactivated }))
}

/// Streaks, completion rates, and the week strip for one habit
#[utoipa::path(
    get,
    path = "/api/v1/habits/{habit_id}/stats",
    tag = "habits",
    params(
        ("habit_id" = i64, Path, description = "Habit ID")
    ),
    responses(
        (status = 200, description = "Habit statistics", body = HabitStats),
        (status = 404, description = "Not found")
    )
)]
pub async fn habit_stats(
    State(state): State<HabitsApiState>,
    user: AuthUser,
    Path(habit_id): Path<i64>,
) -> Result<Json<HabitStats>, ApiError> {
    let stats = state
        .tracker
        .stats(user.id, habit_id)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(stats))
}

/// Habits whose active streak lapses unless completed today
#[utoipa::path(
    get,
    path = "/api/v1/habits/at-risk",
    tag = "habits",
    responses(
        (status = 200, description = "At-risk habits", body = [HabitRow])
    )
)]
pub async fn at_risk_habits(
    State(state): State<HabitsApiState>,
    user: AuthUser,
) -> Result<Json<Vec<HabitRow>>, ApiError> {
    let rows = state
        .tracker
        .at_risk(user.id)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(rows))
}
