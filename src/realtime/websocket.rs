/**
 * WebSocket Subscription Handler
 *
 * This module implements the `GET /ws/{token}` endpoint. A viewer connects
 * with its JWT in the path (browser WebSocket clients cannot set an
 * Authorization header), the token is verified before the upgrade, and the
 * resulting socket is registered with the connection registry under the
 * token's session id.
 *
 * # Connection Lifecycle
 *
 * 1. Verify the token; reject the upgrade with 401 if invalid.
 * 2. Create a bounded delivery queue and register its sender.
 * 3. Run the delivery task: forward queued envelopes to the socket,
 *    send a Ping every `HEARTBEAT_INTERVAL`, and watch for the client
 *    closing the connection.
 * 4. On any send failure, close frame, or socket error, unregister the
 *    channel and drop the connection.
 *
 * The heartbeat keeps half-open connections from lingering in the
 * registry: a peer that stopped responding fails the next Ping send and
 * is unregistered by this task, not by the registry itself.
 */

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::Response,
};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::auth::sessions::verify_token;
use crate::realtime::registry::{ConnectionRegistry, CHANNEL_QUEUE_CAPACITY};

/// Interval between server-initiated heartbeat pings.
const HEARTBEAT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(30);

/// Handle a WebSocket subscription request (GET /ws/{token}).
///
/// # Errors
///
/// * `401 Unauthorized` - if the token is missing, expired, or invalid
pub async fn handle_ws_subscription(
    State(registry): State<ConnectionRegistry>,
    Path(token): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<Response, StatusCode> {
    let claims = verify_token(&token).map_err(|e| {
        tracing::warn!("[WS] Rejected subscription with invalid token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    let subscriber = claims.sub;
    tracing::info!("[WS] Subscription accepted for session {}", subscriber);

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, registry, subscriber)))
}

/// Drive one connected socket until it dies, then unregister it.
async fn handle_socket(socket: WebSocket, registry: ConnectionRegistry, subscriber: String) {
    let channel_id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::channel::<String>(CHANNEL_QUEUE_CAPACITY);
    registry.register(&subscriber, channel_id, tx);

    let (mut sink, mut stream) = socket.split();
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);
    // First tick fires immediately; skip it so the handshake isn't
    // followed by an instant ping.
    heartbeat.tick().await;

    loop {
        tokio::select! {
            queued = rx.recv() => {
                match queued {
                    Some(payload) => {
                        if sink.send(Message::Text(payload.into())).await.is_err() {
                            tracing::debug!("[WS] Send failed for channel {}", channel_id);
                            break;
                        }
                    }
                    // Sender side pruned by the registry.
                    None => break,
                }
            }
            _ = heartbeat.tick() => {
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    tracing::debug!("[WS] Heartbeat failed for channel {}", channel_id);
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!("[WS] Channel {} closed by peer", channel_id);
                        break;
                    }
                    Some(Ok(_)) => {
                        // Pongs and any client chatter are ignored; this
                        // stream is one-way from the server's perspective.
                    }
                    Some(Err(e)) => {
                        tracing::debug!("[WS] Socket error on channel {}: {:?}", channel_id, e);
                        break;
                    }
                }
            }
        }
    }

    registry.unregister(&subscriber, channel_id);
    tracing::info!("[WS] Connection closed for session {}", subscriber);
}
