//! Domain services
//!
//! The completion & progress engine: streak derivation (`streaks`), the
//! completion logger / at-risk scanner (`tracker`), and the group goal
//! ledger (`goals`). Services are thin orchestration over the repository
//! transactions; `EngineError` carries the error taxonomy the HTTP layer
//! maps onto status codes.

pub mod goals;
pub mod streaks;
pub mod tracker;

pub use goals::GoalLedger;
pub use tracker::HabitTracker;

use thiserror::Error;

use crate::data::SqliteError;

#[derive(Error, Debug)]
pub enum EngineError {
    // Validation: rejected before any mutation
    #[error("mood must be between 1 and 5, got {0}")]
    InvalidMood(i64),
    #[error("duration must be non-negative, got {0}")]
    InvalidDuration(i64),
    #[error("contribution amount must be positive, got {0}")]
    InvalidAmount(i64),
    #[error("target value must be positive, got {0}")]
    InvalidTarget(i64),
    #[error("reward points must be non-negative, got {0}")]
    InvalidReward(i64),
    #[error("end date must not precede start date")]
    InvalidDateRange,

    // Missing or not owned by the caller
    #[error("{0} not found")]
    NotFound(&'static str),

    // Authorization
    #[error("user is not an active member of this party")]
    NotAMember,
    #[error("insufficient party role for this action")]
    InsufficientRole,

    // Conflict: state forbids the operation
    #[error("goal is not active")]
    NotActive,

    #[error(transparent)]
    Database(#[from] SqliteError),
}
