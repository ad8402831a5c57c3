//! HTTP surface: router composition.
//!
//! The relay itself only needs `/ws`. Other collaborators plug their
//! routes in here without touching the relay.

pub mod handlers;

use axum::Router;
use axum::routing::get;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete router: system endpoints plus the WebSocket relay.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .route("/ws", get(ws_handler))
}
