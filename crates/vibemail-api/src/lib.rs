//! VibeMail API - REST API server
//!
//! This crate exposes the VibeMail workspace over HTTP: sending accounts,
//! campaigns, the dashboard, the unified inbox, the AI assistant and the
//! simulation status.

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::{create_openapi_routes, ApiDoc};
pub use routes::create_router;
pub use state::AppState;
