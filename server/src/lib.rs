//! Tally server library
//!
//! Habit tracking with streak derivation and shared party goals, served over
//! a JSON HTTP API backed by embedded SQLite.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
