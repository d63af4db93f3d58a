//! Party goal API request/response types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::constants::MAX_TITLE_LEN;
use crate::data::types::PartyGoalRow;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGoalRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LEN, message = "Title must be 1-100 characters"))]
    pub title: String,
    pub description: Option<String>,
    /// Positive numeric target
    pub target_value: i64,
    #[serde(default)]
    pub reward_points: i64,
    /// Start date (`YYYY-MM-DD`); defaults to today
    pub starts_on: Option<String>,
    /// Optional deadline (`YYYY-MM-DD`); lapsing marks the goal failed
    pub ends_on: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContributeRequest {
    /// Positive amount added to the goal's progress
    pub amount: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ListGoalsQuery {
    /// Filter by status: active, completed, failed, or cancelled
    pub status: Option<String>,
}

/// A goal with its derived progress percentage
#[derive(Debug, Serialize, ToSchema)]
pub struct GoalDto {
    #[serde(flatten)]
    pub goal: PartyGoalRow,
    pub progress_percentage: f64,
}

impl From<PartyGoalRow> for GoalDto {
    fn from(goal: PartyGoalRow) -> Self {
        let progress_percentage = goal.progress_percentage();
        Self {
            goal,
            progress_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_dto_serializes_flat() {
        let dto = GoalDto::from(PartyGoalRow {
            id: 7,
            party_id: 1,
            created_by: 1,
            title: "goal".to_string(),
            description: None,
            target_value: 10,
            current_value: 5,
            status: "active".to_string(),
            reward_points: 0,
            starts_on: "2025-01-01".to_string(),
            ends_on: None,
            created_at: 0,
            updated_at: 0,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["progress_percentage"], 50.0);
    }
}
