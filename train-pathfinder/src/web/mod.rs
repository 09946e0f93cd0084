//! Web layer for the path planner.
//!
//! Provides HTTP endpoints for searching paths and auditing conflicts.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
