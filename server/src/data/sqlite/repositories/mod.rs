//! SQLite repository functions
//!
//! Free functions over a `SqlitePool`, one module per aggregate. Writes that
//! must be atomic with their derived updates run inside a single transaction
//! here rather than being stitched together by callers.

pub mod habit;
pub mod habit_log;
pub mod party;
pub mod party_goal;
pub mod user;
