//! Real-time notification handlers
//!
//! WebSocket endpoint streaming the authenticated user's notification
//! events as JSON frames. Browsers cannot set headers on upgrade requests,
//! so the access token is carried in the query string.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::extractors::WsAuthQuery;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Subscribe to the caller's notification stream
///
/// GET /notifications/ws?access_token=...
pub async fn websocket(
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
    ws: WebSocketUpgrade,
) -> ApiResult<Response> {
    let claims = state
        .jwt_service()
        .validate_access_token(&query.access_token)
        .map_err(|e| {
            warn!(error = %e, "WebSocket auth failed");
            ApiError::InvalidAuthFormat
        })?;
    let user_id = claims.user_id().map_err(|_| ApiError::InvalidAuthFormat)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, socket, user_id)))
}

async fn handle_socket(state: AppState, mut socket: WebSocket, user_id: i64) {
    let mut receiver = state.hub().subscribe(user_id);
    info!(user_id, "Notification stream connected");

    loop {
        tokio::select! {
            event = receiver.recv() => {
                match event {
                    Ok(event) => {
                        let Ok(payload) = serde_json::to_string(&event) else {
                            continue;
                        };
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(user_id, skipped, "Notification stream lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            incoming = socket.recv() => {
                // Clients only ever close or ping; anything else is ignored
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    info!(user_id, "Notification stream disconnected");
}
