//! Completion log API endpoints

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use types::{DeleteLogResponse, ListLogsQuery, LogCompletionRequest, LogResponse};

use crate::api::auth::{AuthUser, HasDatabase};
use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::{ApiError, parse_date_param};
use crate::data::SqliteService;
use crate::data::types::HabitLogRow;
use crate::domain::HabitTracker;
use crate::domain::tracker::{DailySummary, NewLog};

/// Shared state for log API endpoints
#[derive(Clone)]
pub struct LogsApiState {
    pub database: Arc<SqliteService>,
    pub tracker: Arc<HabitTracker>,
}

impl HasDatabase for LogsApiState {
    fn database(&self) -> &Arc<SqliteService> {
        &self.database
    }
}

/// Build habit-scoped log routes (merged into the `/habits` router)
pub fn habit_routes(database: Arc<SqliteService>, tracker: Arc<HabitTracker>) -> Router<()> {
    let state = LogsApiState { database, tracker };

    Router::new()
        .route("/{habit_id}/logs", get(list_logs).post(log_completion))
        .with_state(state)
}

/// Build log API routes (nested at `/logs`)
pub fn routes(database: Arc<SqliteService>, tracker: Arc<HabitTracker>) -> Router<()> {
    let state = LogsApiState { database, tracker };

    Router::new()
        .route("/{log_id}", get(get_log).delete(delete_log))
        .route("/summary/{date}", get(daily_summary))
        .with_state(state)
}

/// Record or amend a day's completion entry
#[utoipa::path(
    post,
    path = "/api/v1/habits/{habit_id}/logs",
    tag = "logs",
    request_body = LogCompletionRequest,
    params(
        ("habit_id" = i64, Path, description = "Habit ID")
    ),
    responses(
        (status = 200, description = "Completion logged", body = LogResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Habit not found")
    )
)]
pub async fn log_completion(
    State(state): State<LogsApiState>,
    user: AuthUser,
    Path(habit_id): Path<i64>,
    ValidatedJson(body): ValidatedJson<LogCompletionRequest>,
) -> Result<Json<LogResponse>, ApiError> {
    let date = parse_date_param(&body.date)?;

    let (log, totals) = state
        .tracker
        .log_completion(
            user.id,
            habit_id,
            NewLog {
                date,
                completed: body.completed,
                note: body.note,
                mood: body.mood,
                duration_minutes: body.duration_minutes,
            },
        )
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(LogResponse {
        log,
        current_streak: totals.current,
        longest_streak: totals.longest,
    }))
}

/// List a habit's log history, newest first
#[utoipa::path(
    get,
    path = "/api/v1/habits/{habit_id}/logs",
    tag = "logs",
    params(
        ("habit_id" = i64, Path, description = "Habit ID"),
        ("from" = Option<String>, Query, description = "Inclusive start date (YYYY-MM-DD)"),
        ("to" = Option<String>, Query, description = "Inclusive end date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Log history", body = [HabitLogRow]),
        (status = 404, description = "Habit not found")
    )
)]
pub async fn list_logs(
    State(state): State<LogsApiState>,
    user: AuthUser,
    Path(habit_id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<ListLogsQuery>,
) -> Result<Json<Vec<HabitLogRow>>, ApiError> {
    let from = parse_date_param(&query.from)?;
    let to = parse_date_param(&query.to)?;

    let rows = state
        .tracker
        .list_logs(user.id, habit_id, from, to)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(rows))
}

/// Fetch one log entry
#[utoipa::path(
    get,
    path = "/api/v1/logs/{log_id}",
    tag = "logs",
    params(
        ("log_id" = i64, Path, description = "Log ID")
    ),
    responses(
        (status = 200, description = "Log entry", body = HabitLogRow),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_log(
    State(state): State<LogsApiState>,
    user: AuthUser,
    Path(log_id): Path<i64>,
) -> Result<Json<HabitLogRow>, ApiError> {
    let row = state
        .tracker
        .get_log(user.id, log_id)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(row))
}

/// Delete a log entry; cached streaks reflect the removal
#[utoipa::path(
    delete,
    path = "/api/v1/logs/{log_id}",
    tag = "logs",
    params(
        ("log_id" = i64, Path, description = "Log ID")
    ),
    responses(
        (status = 200, description = "Log deleted", body = DeleteLogResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_log(
    State(state): State<LogsApiState>,
    user: AuthUser,
    Path(log_id): Path<i64>,
) -> Result<Json<DeleteLogResponse>, ApiError> {
    let totals = state
        .tracker
        .delete_log(user.id, log_id)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(DeleteLogResponse {
        deleted: true,
        current_streak: totals.current,
        longest_streak: totals.longest,
    }))
}

/// Per-date completion summary across all active habits
#[utoipa::path(
    get,
    path = "/api/v1/logs/summary/{date}",
    tag = "logs",
    params(
        ("date" = String, Path, description = "Calendar date (YYYY-MM-DD), or 'today'")
    ),
    responses(
        (status = 200, description = "Daily summary", body = DailySummary),
        (status = 400, description = "Invalid date")
    )
)]
pub async fn daily_summary(
    State(state): State<LogsApiState>,
    user: AuthUser,
    Path(date): Path<String>,
) -> Result<Json<DailySummary>, ApiError> {
    let date = if date == "today" {
        None
    } else {
        parse_date_param(&Some(date))?
    };

    let summary = state
        .tracker
        .daily_summary(user.id, date)
        .await
        .map_err(ApiError::from_engine)?;

    Ok(Json(summary))
}
