//! API route handlers

pub mod goals;
pub mod habits;
pub mod health;
pub mod logs;
pub mod parties;
