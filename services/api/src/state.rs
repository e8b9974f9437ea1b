//! Shared Application State
//!
//! Long-lived collaborators are constructed once in `main` and shared by every
//! handler through this struct.

use callbridge_core::initiator::CallInitiator;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub initiator: Arc<CallInitiator>,
}
