//! Party goal repository for SQLite operations
//!
//! `contribute_atomic` is the serialization point for goal progress: the
//! guarded increment is the first statement of the transaction, so the write
//! lock is taken before any in-transaction read and concurrent contributions
//! queue behind each other. The completion transition is a compare-and-set
//! (`... AND status = 'active'`) inside the same transaction, which makes
//! the reward credit exactly-once under racing contributions.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{GoalStatus, PartyGoalRow};
use crate::utils::time::format_date;

const GOAL_COLUMNS: &str = "id, party_id, created_by, title, description, target_value, \
     current_value, status, reward_points, starts_on, ends_on, created_at, updated_at";

/// Fields for creating a goal
#[derive(Debug, Clone)]
pub struct NewGoal<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub target_value: i64,
    pub reward_points: i64,
    pub starts_on: NaiveDate,
    pub ends_on: Option<NaiveDate>,
}

/// Outcome of an atomic contribution attempt
#[derive(Debug)]
pub enum ContributionOutcome {
    Applied {
        goal: PartyGoalRow,
        /// True iff this contribution crossed the threshold and disbursed
        /// the reward
        completed_now: bool,
    },
    NotFound,
    NotActive,
}

/// Create a goal for a party
pub async fn create_goal(
    pool: &SqlitePool,
    party_id: i64,
    created_by: i64,
    goal: &NewGoal<'_>,
) -> Result<PartyGoalRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let id = sqlx::query(
        r#"
        INSERT INTO party_goals (party_id, created_by, title, description, target_value, reward_points, starts_on, ends_on, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(party_id)
    .bind(created_by)
    .bind(goal.title)
    .bind(goal.description)
    .bind(goal.target_value)
    .bind(goal.reward_points)
    .bind(format_date(goal.starts_on))
    .bind(goal.ends_on.map(format_date))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_goal(pool, id)
        .await?
        .ok_or_else(|| SqliteError::Database(sqlx::Error::RowNotFound))
}

/// Fetch a goal by id
pub async fn get_goal(pool: &SqlitePool, goal_id: i64) -> Result<Option<PartyGoalRow>, SqliteError> {
    let row = sqlx::query_as::<_, PartyGoalRow>(&format!(
        "SELECT {GOAL_COLUMNS} FROM party_goals WHERE id = ?"
    ))
    .bind(goal_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// List a party's goals, active first, then newest
pub async fn list_for_party(
    pool: &SqlitePool,
    party_id: i64,
    status: Option<GoalStatus>,
) -> Result<Vec<PartyGoalRow>, SqliteError> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, PartyGoalRow>(&format!(
                "SELECT {GOAL_COLUMNS} FROM party_goals WHERE party_id = ? AND status = ? ORDER BY created_at DESC"
            ))
            .bind(party_id)
            .bind(status.as_str())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, PartyGoalRow>(&format!(
                "SELECT {GOAL_COLUMNS} FROM party_goals WHERE party_id = ? \
                 ORDER BY (status = 'active') DESC, created_at DESC"
            ))
            .bind(party_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}

/// Apply a contribution to an active goal, atomically
///
/// In one transaction: increment `current_value` (guarded on active status),
/// transition to completed exactly once when the target is reached, credit
/// the party's point total on that transition, and credit the contributing
/// member's running counter unconditionally.
pub async fn contribute_atomic(
    pool: &SqlitePool,
    goal_id: i64,
    user_id: i64,
    amount: i64,
) -> Result<ContributionOutcome, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;

    // Write first: takes the write lock before any read in this transaction
    let incremented = sqlx::query(
        "UPDATE party_goals SET current_value = current_value + ?, updated_at = ? WHERE id = ? AND status = 'active'",
    )
    .bind(amount)
    .bind(now)
    .bind(goal_id)
    .execute(&mut *tx)
    .await?;

    if incremented.rows_affected() == 0 {
        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM party_goals WHERE id = ?")
                .bind(goal_id)
                .fetch_optional(&mut *tx)
                .await?;
        return Ok(match status {
            None => ContributionOutcome::NotFound,
            Some(_) => ContributionOutcome::NotActive,
        });
    }

    let (party_id, current_value, target_value, reward_points): (i64, i64, i64, i64) =
        sqlx::query_as(
            "SELECT party_id, current_value, target_value, reward_points FROM party_goals WHERE id = ?",
        )
        .bind(goal_id)
        .fetch_one(&mut *tx)
        .await?;

    let mut completed_now = false;
    if current_value >= target_value {
        // Compare-and-set keeps the transition (and the reward) exactly-once
        let transitioned = sqlx::query(
            "UPDATE party_goals SET status = 'completed', updated_at = ? WHERE id = ? AND status = 'active'",
        )
        .bind(now)
        .bind(goal_id)
        .execute(&mut *tx)
        .await?;

        if transitioned.rows_affected() > 0 {
            completed_now = true;
            sqlx::query(
                "UPDATE parties SET total_points = total_points + ?, updated_at = ? WHERE id = ?",
            )
            .bind(reward_points)
            .bind(now)
            .bind(party_id)
            .execute(&mut *tx)
            .await?;
        }
    }

    // The member's running counter moves with every contribution,
    // independently of goal completion
    sqlx::query(
        "UPDATE party_members SET contribution_points = contribution_points + ? WHERE party_id = ? AND user_id = ?",
    )
    .bind(amount)
    .bind(party_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    let goal = sqlx::query_as::<_, PartyGoalRow>(&format!(
        "SELECT {GOAL_COLUMNS} FROM party_goals WHERE id = ?"
    ))
    .bind(goal_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        goal_id,
        user_id,
        amount,
        current_value = goal.current_value,
        completed_now,
        "Contribution applied"
    );

    Ok(ContributionOutcome::Applied { goal, completed_now })
}

/// Cancel an active goal (terminal); returns false if it was not active
pub async fn cancel_goal(pool: &SqlitePool, goal_id: i64) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE party_goals SET status = 'cancelled', updated_at = ? WHERE id = ? AND status = 'active'",
    )
    .bind(now)
    .bind(goal_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Fail all active goals whose end date is strictly in the past
pub async fn expire_overdue(pool: &SqlitePool, today: NaiveDate) -> Result<u64, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result = sqlx::query(
        "UPDATE party_goals SET status = 'failed', updated_at = ? \
         WHERE status = 'active' AND ends_on IS NOT NULL AND ends_on < ?",
    )
    .bind(now)
    .bind(format_date(today))
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
