//! Axum WebSocket upgrade handler.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// Header set by reverse proxies carrying the original client address.
const FORWARDED_FOR: &str = "x-forwarded-for";

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// Admission is decided once the upgrade completes, inside
/// [`run_connection`].
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let remote = remote_address(&headers, Some(peer));
    let relay = Arc::clone(&state.relay);

    ws.on_upgrade(move |socket| run_connection(socket, relay, remote))
}

/// Resolves the client address for logging: proxy header first, then the
/// peer socket IP, then the literal `none`.
#[must_use]
pub fn remote_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "none".to_string())
}
