//! Admin protocol surface.
//!
//! A single plain-HTTP endpoint set on its own listener:
//!
//! - `/use<prefix>`: restore the prefix's pre-override target
//! - `/develop<prefix>?at=<url>`: override the prefix's target
//! - anything else: render the current configuration
//!
//! Responses are plain text. There is deliberately no authentication; the
//! listener is meant to stay on a loopback or otherwise trusted interface.

pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::routing::Routes;

/// State shared with the admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub routes: Arc<Routes>,
}

/// Build the admin app. Dispatch happens on raw path prefixes inside the
/// fallback handler rather than through axum's route matching, because the
/// operated-on prefix is the remainder of the path itself.
pub fn router(state: AdminState, request_timeout: Duration) -> Router {
    Router::new()
        .fallback(handlers::dispatch)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
