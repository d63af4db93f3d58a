//! Completion logger, at-risk scanner, and per-habit statistics
//!
//! The only sanctioned write path for a habit's cached streak columns: every
//! log write or delete goes through a repository transaction that recomputes
//! them before committing. "Today" is resolved once per operation here and
//! threaded through all date comparisons.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::EngineError;
use super::streaks;
use crate::core::constants::{COMPLETION_WINDOW_DAYS, COMPLETION_WINDOW_SHORT_DAYS, MOOD_MAX, MOOD_MIN};
use crate::data::SqliteService;
use crate::data::sqlite::repositories::{habit, habit_log};
use crate::data::types::{DailySummaryRow, HabitLogRow, HabitRow};
use crate::utils::time::{format_date, today_utc};

pub use crate::data::sqlite::repositories::habit_log::StreakTotals;

/// A day's completion entry as submitted by the client
#[derive(Debug, Clone, Default)]
pub struct NewLog {
    /// Defaults to the current UTC date when absent
    pub date: Option<NaiveDate>,
    pub completed: bool,
    pub note: Option<String>,
    pub mood: Option<i64>,
    pub duration_minutes: Option<i64>,
}

/// Derived statistics for one habit
#[derive(Debug, Serialize, ToSchema)]
pub struct HabitStats {
    pub habit_id: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    /// Fraction of the trailing 7 days with a completion, in [0, 1]
    pub completion_rate_week: f64,
    /// Fraction of the trailing 30 days with a completion, in [0, 1]
    pub completion_rate_month: f64,
    pub week: Vec<streaks::DayCompletion>,
}

/// All habits' completion state for one calendar date
#[derive(Debug, Serialize, ToSchema)]
pub struct DailySummary {
    /// The summarized date (`YYYY-MM-DD`)
    pub date: String,
    pub completed: usize,
    pub total: usize,
    pub habits: Vec<DailySummaryRow>,
}

/// Completion & progress engine facade for habits
pub struct HabitTracker {
    db: Arc<SqliteService>,
}

impl HabitTracker {
    pub fn new(db: Arc<SqliteService>) -> Self {
        Self { db }
    }

    /// Record (or amend) a day's completion entry and refresh cached streaks
    pub async fn log_completion(
        &self,
        user_id: i64,
        habit_id: i64,
        entry: NewLog,
    ) -> Result<(HabitLogRow, StreakTotals), EngineError> {
        if let Some(mood) = entry.mood
            && !(MOOD_MIN..=MOOD_MAX).contains(&mood)
        {
            return Err(EngineError::InvalidMood(mood));
        }
        if let Some(duration) = entry.duration_minutes
            && duration < 0
        {
            return Err(EngineError::InvalidDuration(duration));
        }

        let pool = self.db.pool();
        // Not-owned is indistinguishable from missing, by design
        habit::get_owned_habit(pool, habit_id, user_id)
            .await?
            .ok_or(EngineError::NotFound("habit"))?;

        let today = today_utc();
        let log_date = entry.date.unwrap_or(today);

        let (row, totals) = habit_log::log_and_recompute(
            pool,
            &habit_log::LogUpsert {
                habit_id,
                user_id,
                log_date,
                completed: entry.completed,
                note: entry.note.as_deref(),
                mood: entry.mood,
                duration_minutes: entry.duration_minutes,
            },
            today,
        )
        .await?;

        Ok((row, totals))
    }

    /// Remove a log entry; cached streaks reflect the removal on return
    pub async fn delete_log(&self, user_id: i64, log_id: i64) -> Result<StreakTotals, EngineError> {
        let pool = self.db.pool();

        let log = habit_log::get_log(pool, log_id)
            .await?
            .filter(|l| l.user_id == user_id)
            .ok_or(EngineError::NotFound("log"))?;

        habit_log::delete_and_recompute(pool, log.id, today_utc())
            .await?
            .ok_or(EngineError::NotFound("log"))
    }

    /// Fetch a single log entry owned by the caller
    pub async fn get_log(&self, user_id: i64, log_id: i64) -> Result<HabitLogRow, EngineError> {
        habit_log::get_log(self.db.pool(), log_id)
            .await?
            .filter(|l| l.user_id == user_id)
            .ok_or(EngineError::NotFound("log"))
    }

    /// List a habit's log history, newest first
    pub async fn list_logs(
        &self,
        user_id: i64,
        habit_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<HabitLogRow>, EngineError> {
        let pool = self.db.pool();
        habit::get_owned_habit(pool, habit_id, user_id)
            .await?
            .ok_or(EngineError::NotFound("habit"))?;

        Ok(habit_log::list_for_habit(pool, habit_id, from, to).await?)
    }

    /// Active habits whose streak lapses unless completed before day-end
    pub async fn at_risk(&self, user_id: i64) -> Result<Vec<HabitRow>, EngineError> {
        Ok(habit::at_risk(self.db.pool(), user_id, today_utc()).await?)
    }

    /// Cached streaks plus derived completion rates and the week strip
    pub async fn stats(&self, user_id: i64, habit_id: i64) -> Result<HabitStats, EngineError> {
        let pool = self.db.pool();
        let habit = habit::get_owned_habit(pool, habit_id, user_id)
            .await?
            .ok_or(EngineError::NotFound("habit"))?;

        let today = today_utc();
        let dates = habit_log::completed_dates(pool, habit_id).await?;

        Ok(HabitStats {
            habit_id,
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak,
            completion_rate_week: streaks::completion_rate(
                &dates,
                COMPLETION_WINDOW_SHORT_DAYS,
                today,
            ),
            completion_rate_month: streaks::completion_rate(&dates, COMPLETION_WINDOW_DAYS, today),
            week: streaks::week_strip(&dates, today),
        })
    }

    /// All active habits' completion state for one date (defaults to today)
    pub async fn daily_summary(
        &self,
        user_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<DailySummary, EngineError> {
        let date = date.unwrap_or_else(today_utc);
        let habits = habit_log::daily_summary(self.db.pool(), user_id, date).await?;
        let completed = habits.iter().filter(|h| h.completed).count();

        Ok(DailySummary {
            date: format_date(date),
            completed,
            total: habits.len(),
            habits,
        })
    }
}
