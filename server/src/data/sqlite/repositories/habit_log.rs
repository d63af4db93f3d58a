//! Habit log repository for SQLite operations
//!
//! One row per (habit, calendar date), enforced by the unique index. A
//! racing duplicate insert lands on the `ON CONFLICT DO UPDATE` path instead
//! of surfacing an error - the race is expected, not exceptional.
//!
//! Every write that can change a habit's streak recomputes the cached
//! streak columns inside the same transaction, so no reader ever observes a
//! log without its streak effect. `longest_streak` is written as
//! `MAX(longest_streak, computed)` and therefore never regresses.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{DailySummaryRow, HabitLogRow};
use crate::domain::streaks;
use crate::utils::time::{format_date, parse_date};

const LOG_COLUMNS: &str = "id, habit_id, user_id, log_date, completed, completed_at, note, mood, \
     duration_minutes, created_at, updated_at";

/// Fields for upserting a day's completion entry
#[derive(Debug, Clone)]
pub struct LogUpsert<'a> {
    pub habit_id: i64,
    pub user_id: i64,
    pub log_date: NaiveDate,
    pub completed: bool,
    pub note: Option<&'a str>,
    pub mood: Option<i64>,
    pub duration_minutes: Option<i64>,
}

/// Habit streak columns as persisted after a recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakTotals {
    pub current: i64,
    pub longest: i64,
}

/// Upsert a day's completion entry and recompute the habit's cached streaks,
/// atomically
///
/// The completion timestamp is stamped only on a false->true transition and
/// cleared on true->false, so the flag and the timestamp never disagree.
pub async fn log_and_recompute(
    pool: &SqlitePool,
    entry: &LogUpsert<'_>,
    today: NaiveDate,
) -> Result<(HabitLogRow, StreakTotals), SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let date_str = format_date(entry.log_date);

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO habit_logs (habit_id, user_id, log_date, completed, completed_at, note, mood, duration_minutes, created_at, updated_at)
        VALUES (?, ?, ?, ?, CASE WHEN ? THEN ? END, ?, ?, ?, ?, ?)
        ON CONFLICT(habit_id, log_date) DO UPDATE SET
            completed = excluded.completed,
            completed_at = CASE
                WHEN excluded.completed = 0 THEN NULL
                WHEN habit_logs.completed = 0 THEN excluded.updated_at
                ELSE habit_logs.completed_at
            END,
            note = excluded.note,
            mood = excluded.mood,
            duration_minutes = excluded.duration_minutes,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(entry.habit_id)
    .bind(entry.user_id)
    .bind(&date_str)
    .bind(entry.completed)
    .bind(entry.completed)
    .bind(now)
    .bind(entry.note)
    .bind(entry.mood)
    .bind(entry.duration_minutes)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query_as::<_, HabitLogRow>(&format!(
        "SELECT {LOG_COLUMNS} FROM habit_logs WHERE habit_id = ? AND log_date = ?"
    ))
    .bind(entry.habit_id)
    .bind(&date_str)
    .fetch_one(&mut *tx)
    .await?;

    let totals = recompute_streaks(&mut tx, entry.habit_id, today).await?;

    tx.commit().await?;

    tracing::debug!(
        habit_id = entry.habit_id,
        date = %date_str,
        completed = entry.completed,
        current = totals.current,
        "Completion logged"
    );

    Ok((row, totals))
}

/// Delete a log entry and recompute the habit's cached streaks, atomically
///
/// Returns None if the log no longer exists (already removed by a racing
/// call).
pub async fn delete_and_recompute(
    pool: &SqlitePool,
    log_id: i64,
    today: NaiveDate,
) -> Result<Option<StreakTotals>, SqliteError> {
    let mut tx = pool.begin().await?;

    let habit_id: Option<i64> = sqlx::query_scalar("SELECT habit_id FROM habit_logs WHERE id = ?")
        .bind(log_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(habit_id) = habit_id else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM habit_logs WHERE id = ?")
        .bind(log_id)
        .execute(&mut *tx)
        .await?;

    let totals = recompute_streaks(&mut tx, habit_id, today).await?;

    tx.commit().await?;

    tracing::debug!(log_id, habit_id, current = totals.current, "Log deleted");
    Ok(Some(totals))
}

/// Recompute and persist both streak columns for a habit
///
/// Must run inside the transaction that changed the log history.
async fn recompute_streaks(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    habit_id: i64,
    today: NaiveDate,
) -> Result<StreakTotals, SqliteError> {
    let date_strs: Vec<String> = sqlx::query_scalar(
        "SELECT log_date FROM habit_logs WHERE habit_id = ? AND completed = 1 ORDER BY log_date DESC",
    )
    .bind(habit_id)
    .fetch_all(&mut **tx)
    .await?;

    let dates: Vec<NaiveDate> = date_strs.iter().filter_map(|s| parse_date(s)).collect();

    let current = i64::from(streaks::current_streak(&dates, today));
    let longest = i64::from(streaks::longest_streak(&dates));
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        "UPDATE habits SET current_streak = ?, longest_streak = MAX(longest_streak, ?), updated_at = ? WHERE id = ?",
    )
    .bind(current)
    .bind(longest)
    .bind(now)
    .bind(habit_id)
    .execute(&mut **tx)
    .await?;

    let (current, longest): (i64, i64) =
        sqlx::query_as("SELECT current_streak, longest_streak FROM habits WHERE id = ?")
            .bind(habit_id)
            .fetch_one(&mut **tx)
            .await?;

    Ok(StreakTotals { current, longest })
}

/// Fetch a log entry by id
pub async fn get_log(pool: &SqlitePool, log_id: i64) -> Result<Option<HabitLogRow>, SqliteError> {
    let row = sqlx::query_as::<_, HabitLogRow>(&format!(
        "SELECT {LOG_COLUMNS} FROM habit_logs WHERE id = ?"
    ))
    .bind(log_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// All completed dates for a habit (unordered consumers sort as needed)
pub async fn completed_dates(
    pool: &SqlitePool,
    habit_id: i64,
) -> Result<Vec<NaiveDate>, SqliteError> {
    let date_strs: Vec<String> = sqlx::query_scalar(
        "SELECT log_date FROM habit_logs WHERE habit_id = ? AND completed = 1 ORDER BY log_date DESC",
    )
    .bind(habit_id)
    .fetch_all(pool)
    .await?;

    Ok(date_strs.iter().filter_map(|s| parse_date(s)).collect())
}

/// List a habit's log entries, newest first, optionally bounded by dates
pub async fn list_for_habit(
    pool: &SqlitePool,
    habit_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<HabitLogRow>, SqliteError> {
    let mut sql = format!("SELECT {LOG_COLUMNS} FROM habit_logs WHERE habit_id = ?");
    if from.is_some() {
        sql.push_str(" AND log_date >= ?");
    }
    if to.is_some() {
        sql.push_str(" AND log_date <= ?");
    }
    sql.push_str(" ORDER BY log_date DESC");

    let mut query = sqlx::query_as::<_, HabitLogRow>(&sql).bind(habit_id);
    if let Some(from) = from {
        query = query.bind(format_date(from));
    }
    if let Some(to) = to {
        query = query.bind(format_date(to));
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// All of a user's active habits with their completion state for one date
pub async fn daily_summary(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<Vec<DailySummaryRow>, SqliteError> {
    let rows = sqlx::query_as::<_, DailySummaryRow>(
        r#"
        SELECT h.id AS habit_id, h.title, COALESCE(l.completed, 0) AS completed, l.id AS log_id
        FROM habits h
        LEFT JOIN habit_logs l ON l.habit_id = h.id AND l.log_date = ?
        WHERE h.user_id = ? AND h.is_active = 1
        ORDER BY h.id
        "#,
    )
    .bind(format_date(date))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
