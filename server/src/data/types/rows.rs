//! Row structs for the transactional store
//!
//! These map 1:1 onto table rows and are serialized directly in API
//! responses where the shapes line up. Calendar dates stay in their stored
//! `YYYY-MM-DD` text form; enum-backed columns stay as strings here and are
//! interpreted through the typed accessors.

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::{GoalStatus, HabitCadence, PartyRole};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct UserRow {
    pub id: i64,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PartyRow {
    pub id: i64,
    pub creator_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub invite_code: String,
    pub is_public: bool,
    pub max_members: i64,
    pub total_points: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MembershipRow {
    pub party_id: i64,
    pub user_id: i64,
    pub role: String,
    pub contribution_points: i64,
    pub is_active: bool,
    pub joined_at: i64,
}

impl MembershipRow {
    pub fn role(&self) -> PartyRole {
        PartyRole::parse(&self.role).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct HabitRow {
    pub id: i64,
    pub user_id: i64,
    pub party_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub cadence: String,
    pub custom_days: Option<String>,
    pub is_active: bool,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl HabitRow {
    pub fn cadence(&self) -> HabitCadence {
        HabitCadence::parse(&self.cadence).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct HabitLogRow {
    pub id: i64,
    pub habit_id: i64,
    pub user_id: i64,
    /// Calendar date this entry is for (`YYYY-MM-DD`), unique per habit
    pub log_date: String,
    pub completed: bool,
    /// Set iff `completed` is true (stamped on the false->true transition)
    pub completed_at: Option<i64>,
    pub note: Option<String>,
    pub mood: Option<i64>,
    pub duration_minutes: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PartyGoalRow {
    pub id: i64,
    pub party_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub target_value: i64,
    pub current_value: i64,
    pub status: String,
    pub reward_points: i64,
    pub starts_on: String,
    pub ends_on: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PartyGoalRow {
    pub fn status(&self) -> GoalStatus {
        GoalStatus::parse(&self.status).unwrap_or_default()
    }

    /// Progress toward the target, capped at 100
    pub fn progress_percentage(&self) -> f64 {
        if self.target_value <= 0 {
            return 0.0;
        }
        (self.current_value as f64 / self.target_value as f64 * 100.0).min(100.0)
    }
}

/// Party member joined with user display info
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MemberWithUser {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub role: String,
    pub contribution_points: i64,
    pub joined_at: i64,
}

/// One entry of a party's contribution leaderboard
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub display_name: Option<String>,
    pub contribution_points: i64,
}

/// One habit's completion state within a daily summary
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DailySummaryRow {
    pub habit_id: i64,
    pub title: String,
    pub completed: bool,
    pub log_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(current: i64, target: i64) -> PartyGoalRow {
        PartyGoalRow {
            id: 1,
            party_id: 1,
            created_by: 1,
            title: "goal".to_string(),
            description: None,
            target_value: target,
            current_value: current,
            status: "active".to_string(),
            reward_points: 0,
            starts_on: "2025-01-01".to_string(),
            ends_on: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_progress_percentage_basic() {
        assert_eq!(goal(0, 100).progress_percentage(), 0.0);
        assert_eq!(goal(50, 100).progress_percentage(), 50.0);
        assert_eq!(goal(100, 100).progress_percentage(), 100.0);
    }

    #[test]
    fn test_progress_percentage_capped_at_100() {
        assert_eq!(goal(150, 100).progress_percentage(), 100.0);
    }

    #[test]
    fn test_progress_percentage_zero_target() {
        // CHECK(target_value > 0) makes this unreachable from the store
        assert_eq!(goal(10, 0).progress_percentage(), 0.0);
    }

    #[test]
    fn test_goal_status_accessor() {
        let mut g = goal(0, 100);
        assert_eq!(g.status(), GoalStatus::Active);
        g.status = "completed".to_string();
        assert_eq!(g.status(), GoalStatus::Completed);
    }
}
