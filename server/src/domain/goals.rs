//! Group goal ledger
//!
//! Shared numeric targets funded by member contributions. The increment,
//! the exactly-once completion transition, the party reward credit, and the
//! member contribution counter all commit in one repository transaction;
//! this service owns validation, membership/role checks, and the expiry
//! sweep background task.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use utoipa::ToSchema;

use super::EngineError;
use crate::data::SqliteService;
use crate::data::sqlite::repositories::{party, party_goal};
use crate::data::types::{GoalStatus, PartyGoalRow, PartyRole};
use crate::utils::time::today_utc;

/// Fields for creating a goal, as submitted by the client
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub target_value: i64,
    pub reward_points: i64,
    /// Defaults to today
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

/// Result of a contribution
#[derive(Debug, Serialize, ToSchema)]
pub struct GoalProgress {
    pub goal_id: i64,
    pub current_value: i64,
    pub target_value: i64,
    pub status: GoalStatus,
    /// Progress toward the target, capped at 100
    pub progress_percentage: f64,
    /// True iff this contribution crossed the threshold
    pub completed_now: bool,
}

/// Group goal ledger service
pub struct GoalLedger {
    db: Arc<SqliteService>,
}

impl GoalLedger {
    pub fn new(db: Arc<SqliteService>) -> Self {
        Self { db }
    }

    /// Active membership lookup shared by all goal operations
    async fn require_member(
        &self,
        party_id: i64,
        user_id: i64,
    ) -> Result<crate::data::types::MembershipRow, EngineError> {
        party::membership(self.db.pool(), party_id, user_id)
            .await?
            .filter(|m| m.is_active)
            .ok_or(EngineError::NotAMember)
    }

    /// Create a goal; requires officer role or above
    pub async fn create_goal(
        &self,
        user_id: i64,
        party_id: i64,
        draft: GoalDraft,
    ) -> Result<PartyGoalRow, EngineError> {
        if draft.target_value <= 0 {
            return Err(EngineError::InvalidTarget(draft.target_value));
        }
        if draft.reward_points < 0 {
            return Err(EngineError::InvalidReward(draft.reward_points));
        }

        let pool = self.db.pool();
        party::get_party(pool, party_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(EngineError::NotFound("party"))?;

        let member = self.require_member(party_id, user_id).await?;
        if !member.role().has_min_role(PartyRole::Officer) {
            return Err(EngineError::InsufficientRole);
        }

        let starts_on = draft.starts_on.unwrap_or_else(today_utc);
        if let Some(ends_on) = draft.ends_on
            && ends_on < starts_on
        {
            return Err(EngineError::InvalidDateRange);
        }

        let row = party_goal::create_goal(
            pool,
            party_id,
            user_id,
            &party_goal::NewGoal {
                title: &draft.title,
                description: draft.description.as_deref(),
                target_value: draft.target_value,
                reward_points: draft.reward_points,
                starts_on,
                ends_on: draft.ends_on,
            },
        )
        .await?;

        Ok(row)
    }

    /// List a party's goals (members only)
    pub async fn list_goals(
        &self,
        user_id: i64,
        party_id: i64,
        status: Option<GoalStatus>,
    ) -> Result<Vec<PartyGoalRow>, EngineError> {
        self.require_member(party_id, user_id).await?;
        Ok(party_goal::list_for_party(self.db.pool(), party_id, status).await?)
    }

    /// Fetch one goal (members only)
    pub async fn get_goal(&self, user_id: i64, goal_id: i64) -> Result<PartyGoalRow, EngineError> {
        let goal = party_goal::get_goal(self.db.pool(), goal_id)
            .await?
            .ok_or(EngineError::NotFound("goal"))?;
        self.require_member(goal.party_id, user_id).await?;
        Ok(goal)
    }

    /// Apply a member's contribution to an active goal
    pub async fn contribute(
        &self,
        user_id: i64,
        goal_id: i64,
        amount: i64,
    ) -> Result<GoalProgress, EngineError> {
        if amount <= 0 {
            return Err(EngineError::InvalidAmount(amount));
        }

        let pool = self.db.pool();
        let goal = party_goal::get_goal(pool, goal_id)
            .await?
            .ok_or(EngineError::NotFound("goal"))?;
        if goal.status() != GoalStatus::Active {
            return Err(EngineError::NotActive);
        }
        self.require_member(goal.party_id, user_id).await?;

        // Status is re-checked inside the transaction; the pre-check above
        // only produces a friendlier error without taking the write lock
        match party_goal::contribute_atomic(pool, goal_id, user_id, amount).await? {
            party_goal::ContributionOutcome::Applied { goal, completed_now } => Ok(GoalProgress {
                goal_id: goal.id,
                current_value: goal.current_value,
                target_value: goal.target_value,
                status: goal.status(),
                progress_percentage: goal.progress_percentage(),
                completed_now,
            }),
            party_goal::ContributionOutcome::NotFound => Err(EngineError::NotFound("goal")),
            party_goal::ContributionOutcome::NotActive => Err(EngineError::NotActive),
        }
    }

    /// Cancel an active goal; allowed for the creator or a party leader
    pub async fn cancel(&self, user_id: i64, goal_id: i64) -> Result<PartyGoalRow, EngineError> {
        let pool = self.db.pool();
        let goal = party_goal::get_goal(pool, goal_id)
            .await?
            .ok_or(EngineError::NotFound("goal"))?;

        let member = self.require_member(goal.party_id, user_id).await?;
        if goal.created_by != user_id && !member.role().has_min_role(PartyRole::Leader) {
            return Err(EngineError::InsufficientRole);
        }

        if !party_goal::cancel_goal(pool, goal_id).await? {
            return Err(EngineError::NotActive);
        }

        party_goal::get_goal(pool, goal_id)
            .await?
            .ok_or(EngineError::NotFound("goal"))
    }

    /// Fail active goals whose deadline has lapsed; returns the count
    pub async fn expire_overdue(&self, today: NaiveDate) -> Result<u64, EngineError> {
        let swept = party_goal::expire_overdue(self.db.pool(), today).await?;
        if swept > 0 {
            tracing::info!(swept, "Expired overdue goals");
        }
        Ok(swept)
    }

    /// Periodic expiry sweep; returns None when disabled (interval 0)
    pub fn start_sweep_task(
        self: &Arc<Self>,
        interval_minutes: u64,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Option<JoinHandle<()>> {
        if interval_minutes == 0 {
            tracing::debug!("Goal expiry sweep disabled");
            return None;
        }

        let ledger = Arc::clone(self);
        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_minutes * 60));
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("Goal expiry sweep shutting down");
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        if let Err(e) = ledger.expire_overdue(today_utc()).await {
                            tracing::warn!("Goal expiry sweep failed: {}", e);
                        }
                    }
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::party::NewParty;
    use crate::data::sqlite::repositories::user::insert_user;
    use crate::data::sqlite::test_pool;
    use chrono::Days;

    async fn make_ledger() -> GoalLedger {
        let pool = test_pool().await;
        GoalLedger::new(Arc::new(SqliteService::from_pool(pool)))
    }

    async fn make_party(ledger: &GoalLedger) -> i64 {
        party::create_party_atomic(
            ledger.db.pool(),
            1,
            &NewParty {
                name: "Testers",
                description: None,
                is_public: false,
                max_members: 50,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn draft(target: i64, reward: i64) -> GoalDraft {
        GoalDraft {
            title: "Run 100 miles".to_string(),
            description: None,
            target_value: target,
            reward_points: reward,
            starts_on: None,
            ends_on: None,
        }
    }

    async fn join_as_member(ledger: &GoalLedger, party_id: i64) -> i64 {
        let pool = ledger.db.pool();
        let user = insert_user(pool, None).await.unwrap();
        let code: String = sqlx::query_scalar("SELECT invite_code FROM parties WHERE id = ?")
            .bind(party_id)
            .fetch_one(pool)
            .await
            .unwrap();
        party::join_party_atomic(pool, &code, user.id).await.unwrap();
        user.id
    }

    #[tokio::test]
    async fn test_create_goal_requires_officer() {
        let ledger = make_ledger().await;
        let party_id = make_party(&ledger).await;
        let member = join_as_member(&ledger, party_id).await;

        // Creator is the leader
        let goal = ledger.create_goal(1, party_id, draft(100, 10)).await.unwrap();
        assert_eq!(goal.status(), GoalStatus::Active);

        let err = ledger
            .create_goal(member, party_id, draft(100, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientRole));
    }

    #[tokio::test]
    async fn test_create_goal_validation() {
        let ledger = make_ledger().await;
        let party_id = make_party(&ledger).await;

        assert!(matches!(
            ledger.create_goal(1, party_id, draft(0, 0)).await.unwrap_err(),
            EngineError::InvalidTarget(0)
        ));
        assert!(matches!(
            ledger.create_goal(1, party_id, draft(10, -1)).await.unwrap_err(),
            EngineError::InvalidReward(-1)
        ));

        let today = today_utc();
        let backwards = GoalDraft {
            starts_on: Some(today),
            ends_on: Some(today - Days::new(1)),
            ..draft(10, 0)
        };
        assert!(matches!(
            ledger.create_goal(1, party_id, backwards).await.unwrap_err(),
            EngineError::InvalidDateRange
        ));
    }

    #[tokio::test]
    async fn test_contribute_happy_path_and_terminal_rejection() {
        let ledger = make_ledger().await;
        let party_id = make_party(&ledger).await;
        let goal = ledger.create_goal(1, party_id, draft(100, 25)).await.unwrap();

        let progress = ledger.contribute(1, goal.id, 95).await.unwrap();
        assert_eq!(progress.current_value, 95);
        assert_eq!(progress.status, GoalStatus::Active);
        assert!(!progress.completed_now);
        assert_eq!(progress.progress_percentage, 95.0);

        let progress = ledger.contribute(1, goal.id, 10).await.unwrap();
        assert_eq!(progress.current_value, 105);
        assert_eq!(progress.status, GoalStatus::Completed);
        assert!(progress.completed_now);
        assert_eq!(progress.progress_percentage, 100.0);

        let err = ledger.contribute(1, goal.id, 5).await.unwrap_err();
        assert!(matches!(err, EngineError::NotActive));
    }

    #[tokio::test]
    async fn test_contribute_rejections() {
        let ledger = make_ledger().await;
        let party_id = make_party(&ledger).await;
        let goal = ledger.create_goal(1, party_id, draft(100, 0)).await.unwrap();

        assert!(matches!(
            ledger.contribute(1, goal.id, 0).await.unwrap_err(),
            EngineError::InvalidAmount(0)
        ));
        assert!(matches!(
            ledger.contribute(1, goal.id, -5).await.unwrap_err(),
            EngineError::InvalidAmount(-5)
        ));
        assert!(matches!(
            ledger.contribute(1, 999, 5).await.unwrap_err(),
            EngineError::NotFound("goal")
        ));

        // A non-member cannot contribute
        let outsider = insert_user(ledger.db.pool(), None).await.unwrap();
        assert!(matches!(
            ledger.contribute(outsider.id, goal.id, 5).await.unwrap_err(),
            EngineError::NotAMember
        ));

        // A member who left cannot contribute
        let former = join_as_member(&ledger, party_id).await;
        party::leave_party(ledger.db.pool(), party_id, former).await.unwrap();
        assert!(matches!(
            ledger.contribute(former, goal.id, 5).await.unwrap_err(),
            EngineError::NotAMember
        ));
    }

    #[tokio::test]
    async fn test_cancel_permissions() {
        let ledger = make_ledger().await;
        let party_id = make_party(&ledger).await;
        let goal = ledger.create_goal(1, party_id, draft(100, 0)).await.unwrap();
        let member = join_as_member(&ledger, party_id).await;

        let err = ledger.cancel(member, goal.id).await.unwrap_err();
        assert!(matches!(err, EngineError::InsufficientRole));

        let cancelled = ledger.cancel(1, goal.id).await.unwrap();
        assert_eq!(cancelled.status(), GoalStatus::Cancelled);

        // Terminal states stay terminal
        let err = ledger.cancel(1, goal.id).await.unwrap_err();
        assert!(matches!(err, EngineError::NotActive));
    }

    #[tokio::test]
    async fn test_list_goals_members_only() {
        let ledger = make_ledger().await;
        let party_id = make_party(&ledger).await;
        ledger.create_goal(1, party_id, draft(100, 0)).await.unwrap();

        let outsider = insert_user(ledger.db.pool(), None).await.unwrap();
        assert!(matches!(
            ledger.list_goals(outsider.id, party_id, None).await.unwrap_err(),
            EngineError::NotAMember
        ));

        let goals = ledger.list_goals(1, party_id, None).await.unwrap();
        assert_eq!(goals.len(), 1);
    }

    #[tokio::test]
    async fn test_expire_overdue_service() {
        let ledger = make_ledger().await;
        let party_id = make_party(&ledger).await;
        let today = today_utc();

        ledger
            .create_goal(
                1,
                party_id,
                GoalDraft {
                    starts_on: Some(today - Days::new(10)),
                    ends_on: Some(today - Days::new(1)),
                    ..draft(100, 0)
                },
            )
            .await
            .unwrap();

        assert_eq!(ledger.expire_overdue(today).await.unwrap(), 1);
        // Second sweep finds nothing
        assert_eq!(ledger.expire_overdue(today).await.unwrap(), 0);
    }
}
