//! OpenAPI specification

use axum::Json;
use axum::response::IntoResponse;
use utoipa::OpenApi;

use crate::api::routes::{goals, habits, health, logs, parties};
use crate::data::types::{
    DailySummaryRow, GoalStatus, HabitCadence, HabitLogRow, HabitRow, LeaderboardEntry,
    MemberWithUser, MembershipRow, PartyGoalRow, PartyRole, PartyRow,
};
use crate::domain::goals::GoalProgress;
use crate::domain::streaks::DayCompletion;
use crate::domain::tracker::{DailySummary, HabitStats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tally API",
        version = env!("CARGO_PKG_VERSION"),
        description = "Habit tracking with streaks and shared party goals"
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "habits", description = "Habit management and statistics"),
        (name = "logs", description = "Daily completion logging"),
        (name = "parties", description = "Party membership"),
        (name = "goals", description = "Shared party goals and contributions")
    ),
    paths(
        // Health
        health::health,
        // Habits
        habits::create_habit,
        habits::list_habits,
        habits::get_habit,
        habits::update_habit,
        habits::deactivate_habit,
        habits::habit_stats,
        habits::at_risk_habits,
        // Logs
        logs::log_completion,
        logs::list_logs,
        logs::get_log,
        logs::delete_log,
        logs::daily_summary,
        // Parties
        parties::create_party,
        parties::get_party,
        parties::join_party,
        parties::leave_party,
        parties::list_members,
        parties::leaderboard,
        // Goals
        goals::create_goal,
        goals::list_goals,
        goals::get_goal,
        goals::contribute,
        goals::cancel_goal,
    ),
    components(schemas(
        // Health
        health::HealthResponse,
        // Rows and enums
        HabitRow,
        HabitLogRow,
        PartyRow,
        PartyGoalRow,
        MembershipRow,
        MemberWithUser,
        LeaderboardEntry,
        DailySummaryRow,
        HabitCadence,
        GoalStatus,
        PartyRole,
        // Habits
        habits::types::CreateHabitRequest,
        habits::types::UpdateHabitRequest,
        habits::types::DeactivateResponse,
        HabitStats,
        DayCompletion,
        // Logs
        logs::types::LogCompletionRequest,
        logs::types::LogResponse,
        logs::types::DeleteLogResponse,
        DailySummary,
        // Parties
        parties::types::CreatePartyRequest,
        parties::types::JoinPartyRequest,
        parties::types::JoinPartyResponse,
        parties::types::LeavePartyResponse,
        parties::types::MembersResponse,
        parties::types::LeaderboardResponse,
        // Goals
        goals::types::CreateGoalRequest,
        goals::types::ContributeRequest,
        goals::types::GoalDto,
        GoalProgress,
    ))
)]
pub struct ApiDoc;

/// Serve the OpenAPI document
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Tally API");
        assert!(doc.paths.paths.contains_key("/api/v1/health"));
        assert!(doc.paths.paths.contains_key("/api/v1/habits"));
        assert!(
            doc.paths
                .paths
                .contains_key("/api/v1/goals/{goal_id}/contribute")
        );
    }
}
