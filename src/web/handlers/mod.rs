//! API handlers for the board routes.

pub mod replies;
pub mod threads;

pub use replies::*;
pub use threads::*;

use crate::board::BoardService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Thread and reply operations.
    pub service: BoardService,
}

impl AppState {
    /// Create a new application state.
    pub fn new(service: BoardService) -> Self {
        Self { service }
    }
}
