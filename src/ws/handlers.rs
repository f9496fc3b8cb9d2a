//! Inbound frame dispatch
//!
//! Classified text lines and binary payloads are handled here, independent of
//! the socket, so the whole conversation can be driven from tests.

use crate::config::RelayConfig;
use crate::protocol::{self, ClientLine};
use crate::session::Participant;
use crate::state::AppState;
use crate::types::UnsupportedPayloadPolicy;

/// Whether the read loop keeps going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

/// Handle one inbound text frame
pub async fn handle_text(text: &str, participant: &mut Participant, state: &AppState) -> Flow {
    handle_message(ClientLine::parse(text), participant, state).await
}

/// Handle a classified line
pub async fn handle_message(
    msg: ClientLine,
    participant: &mut Participant,
    state: &AppState,
) -> Flow {
    match msg {
        ClientLine::Rename(name) => {
            let name = state.config.clean(&name).into_owned();
            participant.set_name(name);
            participant.send_direct(&protocol::username_set(participant.name()));
            Flow::Continue
        }

        ClientLine::Quit => {
            tracing::info!(
                participant = %participant.id(),
                name = %participant.name(),
                "Participant requested disconnect"
            );
            Flow::Close
        }

        ClientLine::Chat(content) => {
            let line = chat_line(&state.config, participant.name(), &content);
            tracing::debug!(participant = %participant.id(), "Chat: {}", line);
            state.router.broadcast(&line, Some(participant.id())).await;
            participant.send_direct(&line);
            Flow::Continue
        }
    }
}

/// Handle a binary frame: notify everyone, then apply the configured policy
pub async fn handle_binary(participant: &mut Participant, state: &AppState) -> Flow {
    tracing::warn!(
        participant = %participant.id(),
        name = %participant.name(),
        "Binary message received"
    );
    state
        .router
        .broadcast(&protocol::binary_notice(participant.name()), None)
        .await;

    match state.config.unsupported_payload {
        UnsupportedPayloadPolicy::Notify => Flow::Continue,
        UnsupportedPayloadPolicy::Disconnect => Flow::Close,
    }
}

fn chat_line(config: &RelayConfig, name: &str, content: &str) -> String {
    protocol::chat_line(name, &config.clean(content))
}
