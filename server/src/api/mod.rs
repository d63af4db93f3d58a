//! HTTP API layer

pub mod auth;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod types;

pub use auth::AuthUser;
pub use server::ApiServer;
pub use types::ApiError;
