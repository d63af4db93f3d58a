//! Completion log API request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::constants::MAX_NOTE_LEN;
use crate::data::types::HabitLogRow;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LogCompletionRequest {
    /// Calendar date (`YYYY-MM-DD`); defaults to today
    pub date: Option<String>,
    pub completed: bool,
    #[validate(length(max = MAX_NOTE_LEN, message = "Note must be at most 2000 characters"))]
    pub note: Option<String>,
    /// Mood rating, 1-5
    pub mood: Option<i64>,
    pub duration_minutes: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListLogsQuery {
    /// Inclusive start date (`YYYY-MM-DD`)
    pub from: Option<String>,
    /// Inclusive end date (`YYYY-MM-DD`)
    pub to: Option<String>,
}

/// A log entry together with the habit's refreshed streak fields
#[derive(Debug, Serialize, ToSchema)]
pub struct LogResponse {
    pub log: HabitLogRow,
    pub current_streak: i64,
    pub longest_streak: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteLogResponse {
    pub deleted: bool,
    pub current_streak: i64,
    pub longest_streak: i64,
}
