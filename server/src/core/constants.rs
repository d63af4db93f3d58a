//! Application-wide constants
//!
//! All environment variable names, tuning knobs, and domain limits live here
//! so the rest of the codebase never hardcodes them.

/// Application name (display)
pub const APP_NAME: &str = "Tally";
/// Application name (lowercase, used in log filters)
pub const APP_NAME_LOWER: &str = "tally";
/// Fallback dot-folder when no platform data dir is available
pub const APP_DOT_FOLDER: &str = ".tally";

// ============================================================================
// Environment variables
// ============================================================================

pub const ENV_HOST: &str = "TALLY_HOST";
pub const ENV_PORT: &str = "TALLY_PORT";
pub const ENV_DEBUG: &str = "TALLY_DEBUG";
pub const ENV_LOG: &str = "TALLY_LOG";
pub const ENV_DATA_DIR: &str = "TALLY_DATA_DIR";
pub const ENV_GOAL_SWEEP_MINUTES: &str = "TALLY_GOAL_SWEEP_MINUTES";

// ============================================================================
// Server defaults
// ============================================================================

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4180;
/// Maximum JSON request body size (bytes)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
/// Upstream-resolved user identity header (see api::auth)
pub const HEADER_USER_ID: &str = "x-tally-user";

// ============================================================================
// SQLite tuning
// ============================================================================

pub const SQLITE_DB_FILENAME: &str = "tally.db";
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;
/// Negative = KiB of page cache (SQLite convention)
pub const SQLITE_CACHE_SIZE: &str = "-20000";
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// ============================================================================
// Background tasks / shutdown
// ============================================================================

pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
/// Default interval for the goal expiry sweep (0 disables the task)
pub const DEFAULT_GOAL_SWEEP_MINUTES: u64 = 60;

// ============================================================================
// Domain limits
// ============================================================================

/// Mood rating bounds (inclusive)
pub const MOOD_MIN: i64 = 1;
pub const MOOD_MAX: i64 = 5;
/// Completion-rate windows (days, inclusive of today)
pub const COMPLETION_WINDOW_SHORT_DAYS: u32 = 7;
pub const COMPLETION_WINDOW_DAYS: u32 = 30;
/// Days rendered in the per-habit week strip
pub const WEEK_STRIP_DAYS: u32 = 7;
/// Party invite code length (alphanumeric)
pub const INVITE_CODE_LEN: usize = 8;
/// Default party capacity
pub const DEFAULT_MAX_MEMBERS: i64 = 50;
/// Title length cap shared by habits, parties, and goals
pub const MAX_TITLE_LEN: u64 = 100;
/// Free-text note cap on completion logs
pub const MAX_NOTE_LEN: u64 = 2000;
