//! Web API module for anonboard.
//!
//! This module exposes the boards over HTTP: a JSON/form API under `/api`,
//! a health check, and optionally the static board pages.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{create_app, create_router};
pub use server::WebServer;
