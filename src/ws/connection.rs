//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection: asks the
//! relay for admission, then forwards inbound text frames to the relay and
//! writes queued outbound frames to the socket until either side goes away.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::service::{OpenOutcome, RelayService};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Rejected connections get the `serverFull` notice and a close frame.
/// - Inbound frames are handed to the relay in arrival order.
/// - Outbound frames come from the session's bounded queue.
/// - Any transport-level end of the socket closes the session.
pub async fn run_connection(socket: WebSocket, relay: Arc<RelayService>, remote: String) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (id, mut outbound) = match relay.open(remote).await {
        OpenOutcome::Active { id, outbound } => (id, outbound),
        OpenOutcome::Rejected { notice } => {
            if let Some(notice) = notice {
                let _ = ws_tx.send(Message::Text(notice)).await;
            }
            let _ = ws_tx.send(Message::Close(None)).await;
            return;
        }
    };

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        relay.receive(id, text.as_str()).await;
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            // Frame queued for this session
            frame = outbound.recv() => {
                let Some(frame) = frame else {
                    break;
                };
                if ws_tx.send(Message::Text(frame)).await.is_err() {
                    break;
                }
            }
        }
    }

    relay.close(id).await;
    tracing::debug!(session_id = %id, "ws connection closed");
}
