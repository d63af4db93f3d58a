//! Habit API request/response types

use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::core::constants::MAX_TITLE_LEN;
use crate::data::types::HabitCadence;

/// Weekday list for custom cadences (0 = Monday .. 6 = Sunday)
fn validate_weekdays(days: &Vec<u8>) -> Result<(), ValidationError> {
    if days.is_empty() {
        return Err(ValidationError::new("weekdays_empty")
            .with_message("custom_days cannot be empty".into()));
    }
    if days.iter().any(|&d| d > 6) {
        return Err(ValidationError::new("weekdays_range")
            .with_message("custom_days entries must be 0-6".into()));
    }
    Ok(())
}

/// Serialize weekdays in their stored comma-separated form
pub fn weekdays_to_csv(days: &[u8]) -> String {
    days.iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LEN, message = "Title must be 1-100 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub cadence: HabitCadence,
    #[validate(custom(function = validate_weekdays))]
    pub custom_days: Option<Vec<u8>>,
    pub party_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LEN, message = "Title must be 1-100 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub cadence: Option<HabitCadence>,
    #[validate(custom(function = validate_weekdays))]
    pub custom_days: Option<Vec<u8>>,
    pub party_id: Option<i64>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListHabitsQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct DeactivateResponse {
    pub deactivated: bool,
}
