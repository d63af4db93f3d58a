//! SQLite schema definitions
//!
//! Initial schema with all tables. No migrations needed for first version.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema SQL
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: Schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at INTEGER NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at INTEGER NOT NULL,
    checksum TEXT NOT NULL,
    execution_time_ms INTEGER,
    success INTEGER NOT NULL DEFAULT 1
);

-- =============================================================================
-- 1. Users (identity is resolved upstream; rows mirror the identity provider)
-- =============================================================================
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT UNIQUE CHECK(email IS NULL OR length(email) >= 3),
    display_name TEXT CHECK(display_name IS NULL OR length(display_name) <= 100),
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- =============================================================================
-- 2. Parties (groups pursuing shared goals)
-- =============================================================================
CREATE TABLE IF NOT EXISTS parties (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    creator_id INTEGER NOT NULL REFERENCES users(id),
    name TEXT NOT NULL CHECK(length(name) >= 1 AND length(name) <= 100),
    description TEXT,
    invite_code TEXT NOT NULL UNIQUE,
    is_public INTEGER NOT NULL DEFAULT 0,
    max_members INTEGER NOT NULL DEFAULT 50 CHECK(max_members > 0),
    total_points INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_parties_invite ON parties(invite_code);

-- =============================================================================
-- 3. Party Members (junction, carries the contribution counter)
-- =============================================================================
CREATE TABLE IF NOT EXISTS party_members (
    party_id INTEGER NOT NULL REFERENCES parties(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role TEXT NOT NULL DEFAULT 'member' CHECK(role IN ('leader', 'officer', 'member')),
    contribution_points INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    joined_at INTEGER NOT NULL,
    PRIMARY KEY (party_id, user_id)
);

CREATE INDEX IF NOT EXISTS idx_party_members_user ON party_members(user_id);

-- =============================================================================
-- 4. Habits (owned by one user, optionally linked to a party)
-- =============================================================================
CREATE TABLE IF NOT EXISTS habits (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    party_id INTEGER REFERENCES parties(id) ON DELETE SET NULL,
    title TEXT NOT NULL CHECK(length(title) >= 1 AND length(title) <= 100),
    description TEXT,
    cadence TEXT NOT NULL DEFAULT 'daily' CHECK(cadence IN ('daily', 'weekly', 'monthly', 'custom')),
    custom_days TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    current_streak INTEGER NOT NULL DEFAULT 0 CHECK(current_streak >= 0),
    longest_streak INTEGER NOT NULL DEFAULT 0 CHECK(longest_streak >= 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_habits_user ON habits(user_id);
CREATE INDEX IF NOT EXISTS idx_habits_party ON habits(party_id) WHERE party_id IS NOT NULL;

-- =============================================================================
-- 5. Habit Logs (one row per habit per calendar day - hard invariant)
-- =============================================================================
CREATE TABLE IF NOT EXISTS habit_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    habit_id INTEGER NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    log_date TEXT NOT NULL CHECK(log_date GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]'),
    completed INTEGER NOT NULL DEFAULT 0,
    completed_at INTEGER,
    note TEXT CHECK(note IS NULL OR length(note) <= 2000),
    mood INTEGER CHECK(mood IS NULL OR (mood >= 1 AND mood <= 5)),
    duration_minutes INTEGER CHECK(duration_minutes IS NULL OR duration_minutes >= 0),
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL,
    UNIQUE(habit_id, log_date)
);

CREATE INDEX IF NOT EXISTS idx_habit_logs_habit_date ON habit_logs(habit_id, log_date DESC);
CREATE INDEX IF NOT EXISTS idx_habit_logs_user_date ON habit_logs(user_id, log_date);

-- =============================================================================
-- 6. Party Goals (shared numeric targets)
-- =============================================================================
CREATE TABLE IF NOT EXISTS party_goals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    party_id INTEGER NOT NULL REFERENCES parties(id) ON DELETE CASCADE,
    created_by INTEGER NOT NULL REFERENCES users(id),
    title TEXT NOT NULL CHECK(length(title) >= 1 AND length(title) <= 100),
    description TEXT,
    target_value INTEGER NOT NULL CHECK(target_value > 0),
    current_value INTEGER NOT NULL DEFAULT 0 CHECK(current_value >= 0),
    status TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active', 'completed', 'failed', 'cancelled')),
    reward_points INTEGER NOT NULL DEFAULT 0 CHECK(reward_points >= 0),
    starts_on TEXT NOT NULL,
    ends_on TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_party_goals_party_status ON party_goals(party_id, status);
CREATE INDEX IF NOT EXISTS idx_party_goals_expiry ON party_goals(ends_on) WHERE status = 'active';

-- =============================================================================
-- Default Data
-- =============================================================================

-- Local single-user bootstrap identity
INSERT OR IGNORE INTO users (id, display_name, is_active, created_at, updated_at)
VALUES (1, 'Local User', 1, strftime('%s', 'now'), strftime('%s', 'now'));
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn test_schema_version_is_positive() {
        assert!(SCHEMA_VERSION > 0);
    }

    #[test]
    fn test_schema_contains_required_tables() {
        let required_tables = [
            "schema_version",
            "schema_migrations",
            "users",
            "parties",
            "party_members",
            "habits",
            "habit_logs",
            "party_goals",
        ];

        for table in required_tables {
            assert!(
                SCHEMA.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table)),
                "Schema missing table: {}",
                table
            );
        }
    }

    #[test]
    fn test_schema_enforces_one_log_per_day() {
        // The streak calculator assumes no duplicate (habit, date) rows
        assert!(SCHEMA.contains("UNIQUE(habit_id, log_date)"));
    }

    #[test]
    fn test_schema_contains_default_user() {
        assert!(
            SCHEMA.contains("INSERT OR IGNORE INTO users"),
            "Schema missing local bootstrap user"
        );
    }
}
