pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{
    sink::{Sink, SinkExt},
    stream::{Stream, StreamExt},
};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::protocol::Outbound;
use crate::session::Participant;
use crate::state::AppState;
use handlers::Flow;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    tracing::debug!("WebSocket connection request");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one WebSocket connection from upgrade to close
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    run_connection(sender, receiver, &state).await;
}

/// Drive a participant over any split message stream.
///
/// The sink is owned by a single writer task fed by the participant's
/// outbound queue, so direct replies and broadcast lines never interleave.
pub async fn run_connection<S, R, E>(sender: S, mut receiver: R, state: &AppState)
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: std::fmt::Display + Send,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: std::fmt::Display,
{
    let (mut participant, rx) =
        Participant::new(&state.config.default_name, state.config.outbound_buffer);
    let writer = tokio::spawn(writer_task(sender, rx));

    participant.activate(&state.router).await;

    while let Some(msg) = receiver.next().await {
        let flow = match msg {
            Ok(Message::Text(text)) => {
                tracing::debug!(
                    participant = %participant.id(),
                    "Received message: {}",
                    text.as_str()
                );
                handlers::handle_text(text.as_str(), &mut participant, state).await
            }
            Ok(Message::Binary(_)) => handlers::handle_binary(&mut participant, state).await,
            Ok(Message::Ping(data)) => {
                participant.send_frame(Outbound::Pong(data));
                Flow::Continue
            }
            Ok(Message::Pong(_)) => Flow::Continue,
            Ok(Message::Close(_)) => {
                tracing::info!(participant = %participant.id(), "WebSocket closed");
                Flow::Close
            }
            Err(e) => {
                tracing::error!(participant = %participant.id(), "WebSocket error: {}", e);
                Flow::Close
            }
        };

        if flow == Flow::Close {
            break;
        }
    }

    participant.begin_close();
    participant.teardown(&state.router).await;

    // The writer drains what is left and exits once every sender is gone
    if let Err(e) = writer.await {
        tracing::error!("Writer task failed: {}", e);
    }
}

async fn writer_task<S>(mut sink: S, mut rx: mpsc::Receiver<Outbound>)
where
    S: Sink<Message> + Unpin + Send,
    S::Error: std::fmt::Display + Send,
{
    while let Some(frame) = rx.recv().await {
        let msg = match frame {
            Outbound::Line(text) => Message::Text(text.into()),
            Outbound::Pong(data) => Message::Pong(data),
        };
        if let Err(e) = sink.send(msg).await {
            tracing::debug!("Failed to write to socket: {}", e);
            break;
        }
    }
    let _ = sink.close().await;
}
