use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use tracing::debug;

use super::{AppState, UserQuery};

/// `GET /ws/notifications?username=` streams each new notification for
/// that user as a JSON text frame.
pub(crate) async fn notifications_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Response {
    ws.on_upgrade(move |socket| relay(socket, state, query.username))
}

async fn relay(mut socket: WebSocket, state: AppState, username: String) {
    let (connection, mut rx) = state.push.subscribe(&username);

    loop {
        tokio::select! {
            pushed = rx.recv() => {
                let Some(payload) = pushed else { break };
                if socket.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                // client frames carry nothing we act on
                Some(Ok(_)) => {}
            },
        }
    }

    state.push.unsubscribe(&username, connection);
    debug!(%username, connection, "notification socket closed");
}
