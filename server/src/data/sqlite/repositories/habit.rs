//! Habit repository for SQLite operations
//!
//! Habits are soft-deleted (active flag cleared) so completion history stays
//! queryable. The cached streak columns are only written through
//! `habit_log::log_and_recompute` / `habit_log::delete_and_recompute`; habit
//! edits here never touch them.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{HabitCadence, HabitRow};
use crate::utils::time::format_date;

const HABIT_COLUMNS: &str = "id, user_id, party_id, title, description, cadence, custom_days, \
     is_active, current_streak, longest_streak, created_at, updated_at";

/// Fields for creating a habit
#[derive(Debug, Clone)]
pub struct NewHabit<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub cadence: HabitCadence,
    pub custom_days: Option<&'a str>,
    pub party_id: Option<i64>,
}

/// Mutable fields for a habit update (None = leave unchanged)
#[derive(Debug, Clone, Default)]
pub struct HabitPatch<'a> {
    pub title: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub cadence: Option<HabitCadence>,
    pub custom_days: Option<Option<&'a str>>,
    pub party_id: Option<Option<i64>>,
    pub is_active: Option<bool>,
}

/// Create a habit owned by `user_id`
pub async fn create_habit(
    pool: &SqlitePool,
    user_id: i64,
    habit: &NewHabit<'_>,
) -> Result<HabitRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let id = sqlx::query(
        r#"
        INSERT INTO habits (user_id, party_id, title, description, cadence, custom_days, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(habit.party_id)
    .bind(habit.title)
    .bind(habit.description)
    .bind(habit.cadence.as_str())
    .bind(habit.custom_days)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_habit(pool, id)
        .await?
        .ok_or_else(|| SqliteError::Database(sqlx::Error::RowNotFound))
}

/// Fetch a habit by id
pub async fn get_habit(pool: &SqlitePool, habit_id: i64) -> Result<Option<HabitRow>, SqliteError> {
    let row = sqlx::query_as::<_, HabitRow>(&format!(
        "SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?"
    ))
    .bind(habit_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Fetch a habit only if it is owned by `user_id`
pub async fn get_owned_habit(
    pool: &SqlitePool,
    habit_id: i64,
    user_id: i64,
) -> Result<Option<HabitRow>, SqliteError> {
    let row = sqlx::query_as::<_, HabitRow>(&format!(
        "SELECT {HABIT_COLUMNS} FROM habits WHERE id = ? AND user_id = ?"
    ))
    .bind(habit_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// List a user's habits, newest first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    include_inactive: bool,
) -> Result<Vec<HabitRow>, SqliteError> {
    let sql = if include_inactive {
        format!("SELECT {HABIT_COLUMNS} FROM habits WHERE user_id = ? ORDER BY created_at DESC")
    } else {
        format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE user_id = ? AND is_active = 1 ORDER BY created_at DESC"
        )
    };

    let rows = sqlx::query_as::<_, HabitRow>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Apply a partial update to an owned habit
///
/// Returns None if the habit does not exist or is not owned by `user_id`.
/// Streak columns are deliberately not updatable here.
pub async fn update_habit(
    pool: &SqlitePool,
    habit_id: i64,
    user_id: i64,
    patch: &HabitPatch<'_>,
) -> Result<Option<HabitRow>, SqliteError> {
    let Some(current) = get_owned_habit(pool, habit_id, user_id).await? else {
        return Ok(None);
    };

    let title = patch.title.unwrap_or(&current.title);
    let description = match patch.description {
        Some(d) => d,
        None => current.description.as_deref(),
    };
    let cadence = patch.cadence.unwrap_or_else(|| current.cadence());
    let custom_days = match patch.custom_days {
        Some(d) => d,
        None => current.custom_days.as_deref(),
    };
    let party_id = match patch.party_id {
        Some(p) => p,
        None => current.party_id,
    };
    let is_active = patch.is_active.unwrap_or(current.is_active);
    let now = chrono::Utc::now().timestamp();

    sqlx::query(
        r#"
        UPDATE habits
        SET title = ?, description = ?, cadence = ?, custom_days = ?, party_id = ?, is_active = ?, updated_at = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(cadence.as_str())
    .bind(custom_days)
    .bind(party_id)
    .bind(is_active)
    .bind(now)
    .bind(habit_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    get_habit(pool, habit_id).await
}

/// Soft-delete: clear the active flag, keep history
pub async fn deactivate(
    pool: &SqlitePool,
    habit_id: i64,
    user_id: i64,
) -> Result<bool, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let result =
        sqlx::query("UPDATE habits SET is_active = 0, updated_at = ? WHERE id = ? AND user_id = ?")
            .bind(now)
            .bind(habit_id)
            .bind(user_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Active habits with a live streak and no completed record for `today`
///
/// Read-only derived view; never mutates streak fields.
pub async fn at_risk(
    pool: &SqlitePool,
    user_id: i64,
    today: NaiveDate,
) -> Result<Vec<HabitRow>, SqliteError> {
    let rows = sqlx::query_as::<_, HabitRow>(&format!(
        r#"
        SELECT {HABIT_COLUMNS} FROM habits h
        WHERE h.user_id = ? AND h.is_active = 1 AND h.current_streak > 0
          AND NOT EXISTS (
            SELECT 1 FROM habit_logs l
            WHERE l.habit_id = h.id AND l.log_date = ? AND l.completed = 1
          )
        ORDER BY h.current_streak DESC
        "#
    ))
    .bind(user_id)
    .bind(format_date(today))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::test_pool;

    async fn make_habit(pool: &SqlitePool, title: &str) -> HabitRow {
        create_habit(
            pool,
            1,
            &NewHabit {
                title,
                description: None,
                cadence: HabitCadence::Daily,
                custom_days: None,
                party_id: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_habit() {
        let pool = test_pool().await;

        let habit = make_habit(&pool, "Morning run").await;
        assert_eq!(habit.title, "Morning run");
        assert_eq!(habit.current_streak, 0);
        assert_eq!(habit.longest_streak, 0);
        assert!(habit.is_active);

        let fetched = get_habit(&pool, habit.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, habit.id);
    }

    #[tokio::test]
    async fn test_get_owned_habit_enforces_owner() {
        let pool = test_pool().await;
        let habit = make_habit(&pool, "Read").await;

        assert!(get_owned_habit(&pool, habit.id, 1).await.unwrap().is_some());
        assert!(get_owned_habit(&pool, habit.id, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_user_filters_inactive() {
        let pool = test_pool().await;
        let keep = make_habit(&pool, "Keep").await;
        let drop = make_habit(&pool, "Drop").await;
        assert!(deactivate(&pool, drop.id, 1).await.unwrap());

        let active = list_for_user(&pool, 1, false).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, keep.id);

        let all = list_for_user(&pool, 1, true).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_update_habit_partial() {
        let pool = test_pool().await;
        let habit = make_habit(&pool, "Stretch").await;

        let updated = update_habit(
            &pool,
            habit.id,
            1,
            &HabitPatch {
                title: Some("Stretch 10min"),
                cadence: Some(HabitCadence::Custom),
                custom_days: Some(Some("1,3,5")),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.title, "Stretch 10min");
        assert_eq!(updated.cadence(), HabitCadence::Custom);
        assert_eq!(updated.custom_days.as_deref(), Some("1,3,5"));
        // Untouched fields survive
        assert!(updated.is_active);
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn test_update_habit_wrong_owner() {
        let pool = test_pool().await;
        let habit = make_habit(&pool, "Meditate").await;

        let res = update_habit(
            &pool,
            habit.id,
            99,
            &HabitPatch {
                title: Some("Hijacked"),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(res.is_none());
    }

    #[tokio::test]
    async fn test_deactivate_is_soft() {
        let pool = test_pool().await;
        let habit = make_habit(&pool, "Journal").await;

        assert!(deactivate(&pool, habit.id, 1).await.unwrap());
        // Row still there, just inactive
        let fetched = get_habit(&pool, habit.id).await.unwrap().unwrap();
        assert!(!fetched.is_active);
    }
}
