//! Party and membership repository for SQLite operations
//!
//! Parties are joined by invite code. The membership row carries the
//! per-(user, party) contribution counter used for the leaderboard; leaving
//! a party deactivates the row instead of deleting it, so rejoining keeps
//! the earned points.

use rand::Rng;
use rand::distributions::Alphanumeric;
use sqlx::SqlitePool;

use crate::core::constants::INVITE_CODE_LEN;
use crate::data::sqlite::SqliteError;
use crate::data::types::{LeaderboardEntry, MemberWithUser, MembershipRow, PartyRole, PartyRow};

const PARTY_COLUMNS: &str = "id, creator_id, name, description, invite_code, is_public, \
     max_members, total_points, is_active, created_at, updated_at";

/// Fields for creating a party
#[derive(Debug, Clone)]
pub struct NewParty<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub is_public: bool,
    pub max_members: i64,
}

/// Outcome of a join-by-invite attempt
#[derive(Debug)]
pub enum JoinOutcome {
    Joined(MembershipRow),
    NotFound,
    Full,
}

/// Generate a random alphanumeric invite code
fn invite_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(INVITE_CODE_LEN)
        .map(char::from)
        .collect()
}

/// Create a party; the creator becomes its leader (single transaction)
pub async fn create_party_atomic(
    pool: &SqlitePool,
    creator_id: i64,
    party: &NewParty<'_>,
) -> Result<PartyRow, SqliteError> {
    let now = chrono::Utc::now().timestamp();
    let code = invite_code();

    let mut tx = pool.begin().await?;

    let party_id = sqlx::query(
        r#"
        INSERT INTO parties (creator_id, name, description, invite_code, is_public, max_members, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(creator_id)
    .bind(party.name)
    .bind(party.description)
    .bind(&code)
    .bind(party.is_public)
    .bind(party.max_members)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    sqlx::query(
        "INSERT INTO party_members (party_id, user_id, role, joined_at) VALUES (?, ?, ?, ?)",
    )
    .bind(party_id)
    .bind(creator_id)
    .bind(PartyRole::Leader.as_str())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let row = sqlx::query_as::<_, PartyRow>(&format!(
        "SELECT {PARTY_COLUMNS} FROM parties WHERE id = ?"
    ))
    .bind(party_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(party_id, creator_id, "Party created");
    Ok(row)
}

/// Fetch a party by id
pub async fn get_party(pool: &SqlitePool, party_id: i64) -> Result<Option<PartyRow>, SqliteError> {
    let row = sqlx::query_as::<_, PartyRow>(&format!(
        "SELECT {PARTY_COLUMNS} FROM parties WHERE id = ?"
    ))
    .bind(party_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Join a party by invite code (capacity-checked, rejoin reactivates)
pub async fn join_party_atomic(
    pool: &SqlitePool,
    code: &str,
    user_id: i64,
) -> Result<JoinOutcome, SqliteError> {
    let now = chrono::Utc::now().timestamp();

    let mut tx = pool.begin().await?;

    let party: Option<(i64, i64)> = sqlx::query_as(
        "SELECT id, max_members FROM parties WHERE invite_code = ? AND is_active = 1",
    )
    .bind(code)
    .fetch_optional(&mut *tx)
    .await?;

    let Some((party_id, max_members)) = party else {
        return Ok(JoinOutcome::NotFound);
    };

    let member_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM party_members WHERE party_id = ? AND is_active = 1",
    )
    .bind(party_id)
    .fetch_one(&mut *tx)
    .await?;

    // Rejoins don't count against capacity; the row already exists
    let existing: Option<i64> = sqlx::query_scalar(
        "SELECT 1 FROM party_members WHERE party_id = ? AND user_id = ?",
    )
    .bind(party_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    if existing.is_none() && member_count >= max_members {
        return Ok(JoinOutcome::Full);
    }

    sqlx::query(
        r#"
        INSERT INTO party_members (party_id, user_id, role, joined_at)
        VALUES (?, ?, 'member', ?)
        ON CONFLICT(party_id, user_id) DO UPDATE SET is_active = 1
        "#,
    )
    .bind(party_id)
    .bind(user_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let row = membership_tx(&mut tx, party_id, user_id).await?;

    tx.commit().await?;

    tracing::debug!(party_id, user_id, "Member joined party");
    Ok(JoinOutcome::Joined(row))
}

/// Leave a party (membership row kept, deactivated)
pub async fn leave_party(
    pool: &SqlitePool,
    party_id: i64,
    user_id: i64,
) -> Result<bool, SqliteError> {
    let result =
        sqlx::query("UPDATE party_members SET is_active = 0 WHERE party_id = ? AND user_id = ?")
            .bind(party_id)
            .bind(user_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Get a specific membership
pub async fn membership(
    pool: &SqlitePool,
    party_id: i64,
    user_id: i64,
) -> Result<Option<MembershipRow>, SqliteError> {
    let row = sqlx::query_as::<_, MembershipRow>(
        r#"
        SELECT party_id, user_id, role, contribution_points, is_active, joined_at
        FROM party_members
        WHERE party_id = ? AND user_id = ?
        "#,
    )
    .bind(party_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

async fn membership_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    party_id: i64,
    user_id: i64,
) -> Result<MembershipRow, SqliteError> {
    let row = sqlx::query_as::<_, MembershipRow>(
        r#"
        SELECT party_id, user_id, role, contribution_points, is_active, joined_at
        FROM party_members
        WHERE party_id = ? AND user_id = ?
        "#,
    )
    .bind(party_id)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(row)
}

/// List a party's active members with user info
pub async fn list_members(
    pool: &SqlitePool,
    party_id: i64,
) -> Result<Vec<MemberWithUser>, SqliteError> {
    let rows = sqlx::query_as::<_, MemberWithUser>(
        r#"
        SELECT u.id AS user_id, u.display_name, pm.role, pm.contribution_points, pm.joined_at
        FROM party_members pm
        JOIN users u ON pm.user_id = u.id
        WHERE pm.party_id = ? AND pm.is_active = 1
        ORDER BY pm.joined_at ASC
        "#,
    )
    .bind(party_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Active members ordered by contribution points, highest first
pub async fn leaderboard(
    pool: &SqlitePool,
    party_id: i64,
) -> Result<Vec<LeaderboardEntry>, SqliteError> {
    let rows = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT u.id AS user_id, u.display_name, pm.contribution_points
        FROM party_members pm
        JOIN users u ON pm.user_id = u.id
        WHERE pm.party_id = ? AND pm.is_active = 1
        ORDER BY pm.contribution_points DESC, u.id ASC
        "#,
    )
    .bind(party_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::repositories::user::insert_user;
    use crate::data::sqlite::test_pool;

    fn new_party(name: &str) -> NewParty<'_> {
        NewParty {
            name,
            description: None,
            is_public: false,
            max_members: 50,
        }
    }

    #[tokio::test]
    async fn test_create_party_makes_creator_leader() {
        let pool = test_pool().await;

        let party = create_party_atomic(&pool, 1, &new_party("The Owls")).await.unwrap();
        assert_eq!(party.creator_id, 1);
        assert_eq!(party.invite_code.len(), INVITE_CODE_LEN);
        assert_eq!(party.total_points, 0);

        let m = membership(&pool, party.id, 1).await.unwrap().unwrap();
        assert_eq!(m.role(), PartyRole::Leader);
        assert!(m.is_active);
    }

    #[tokio::test]
    async fn test_join_by_invite_code() {
        let pool = test_pool().await;
        let party = create_party_atomic(&pool, 1, &new_party("Joiners")).await.unwrap();
        let user = insert_user(&pool, Some("Haseeb")).await.unwrap();

        let outcome = join_party_atomic(&pool, &party.invite_code, user.id)
            .await
            .unwrap();
        let JoinOutcome::Joined(m) = outcome else {
            panic!("expected join to succeed");
        };
        assert_eq!(m.role(), PartyRole::Member);
        assert_eq!(m.contribution_points, 0);
    }

    #[tokio::test]
    async fn test_join_unknown_code() {
        let pool = test_pool().await;
        let outcome = join_party_atomic(&pool, "nope1234", 1).await.unwrap();
        assert!(matches!(outcome, JoinOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_join_full_party() {
        let pool = test_pool().await;
        let party = create_party_atomic(
            &pool,
            1,
            &NewParty {
                max_members: 1,
                ..new_party("Tiny")
            },
        )
        .await
        .unwrap();
        let user = insert_user(&pool, None).await.unwrap();

        let outcome = join_party_atomic(&pool, &party.invite_code, user.id)
            .await
            .unwrap();
        assert!(matches!(outcome, JoinOutcome::Full));
    }

    #[tokio::test]
    async fn test_rejoin_keeps_contribution_points() {
        let pool = test_pool().await;
        let party = create_party_atomic(&pool, 1, &new_party("Sticky")).await.unwrap();
        let user = insert_user(&pool, None).await.unwrap();

        join_party_atomic(&pool, &party.invite_code, user.id)
            .await
            .unwrap();
        sqlx::query(
            "UPDATE party_members SET contribution_points = 42 WHERE party_id = ? AND user_id = ?",
        )
        .bind(party.id)
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

        assert!(leave_party(&pool, party.id, user.id).await.unwrap());
        let m = membership(&pool, party.id, user.id).await.unwrap().unwrap();
        assert!(!m.is_active);

        let JoinOutcome::Joined(m) =
            join_party_atomic(&pool, &party.invite_code, user.id).await.unwrap()
        else {
            panic!("expected rejoin to succeed");
        };
        assert!(m.is_active);
        assert_eq!(m.contribution_points, 42);
    }

    #[tokio::test]
    async fn test_rejoin_allowed_when_full() {
        // The dormant row already holds a slot; reactivation is not a new join
        let pool = test_pool().await;
        let party = create_party_atomic(
            &pool,
            1,
            &NewParty {
                max_members: 2,
                ..new_party("Cosy")
            },
        )
        .await
        .unwrap();
        let user = insert_user(&pool, None).await.unwrap();

        join_party_atomic(&pool, &party.invite_code, user.id)
            .await
            .unwrap();
        leave_party(&pool, party.id, user.id).await.unwrap();

        let other = insert_user(&pool, None).await.unwrap();
        join_party_atomic(&pool, &party.invite_code, other.id)
            .await
            .unwrap();

        let outcome = join_party_atomic(&pool, &party.invite_code, user.id)
            .await
            .unwrap();
        assert!(matches!(outcome, JoinOutcome::Joined(_)));
    }

    #[tokio::test]
    async fn test_list_members_and_leaderboard() {
        let pool = test_pool().await;
        let party = create_party_atomic(&pool, 1, &new_party("Rankers")).await.unwrap();
        let user = insert_user(&pool, Some("Nouman")).await.unwrap();
        join_party_atomic(&pool, &party.invite_code, user.id)
            .await
            .unwrap();

        sqlx::query(
            "UPDATE party_members SET contribution_points = 10 WHERE party_id = ? AND user_id = ?",
        )
        .bind(party.id)
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

        let members = list_members(&pool, party.id).await.unwrap();
        assert_eq!(members.len(), 2);

        let board = leaderboard(&pool, party.id).await.unwrap();
        assert_eq!(board[0].user_id, user.id);
        assert_eq!(board[0].contribution_points, 10);
    }
}
