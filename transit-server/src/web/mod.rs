//! Web layer for the transit route planner.
//!
//! Provides HTTP endpoints for listing stations, planning routes and
//! reloading the network data.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
