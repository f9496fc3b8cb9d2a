//! Line protocol spoken over the WebSocket
//!
//! Clients send plain text frames. A frame is either a command (`/u <name>`,
//! `/q`) or a chat line. Everything the server sends back is a
//! newline-terminated text frame.

use axum::body::Bytes;

pub const RENAME_PREFIX: &str = "/u ";
pub const QUIT_PREFIX: &str = "/q";
pub const PRESENCE_PREFIX: &str = "users:";

pub const WELCOME_LINES: [&str; 3] = [
    "Welcome to the chat.",
    "Change your username with: /u <your_username>",
    "Leave the chat with: /q",
];

/// A classified inbound text frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientLine {
    /// Set the sender's display name (already trimmed)
    Rename(String),
    /// End the sender's session
    Quit,
    /// Anything else, relayed verbatim
    Chat(String),
}

impl ClientLine {
    pub fn parse(text: &str) -> Self {
        if let Some(name) = text.strip_prefix(RENAME_PREFIX) {
            ClientLine::Rename(name.trim().to_string())
        } else if text.starts_with(QUIT_PREFIX) {
            ClientLine::Quit
        } else {
            ClientLine::Chat(text.to_string())
        }
    }
}

/// A frame queued for a participant's writer task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Line(String),
    Pong(Bytes),
}

impl Outbound {
    /// Terminate `text` with a newline unless it already is
    pub fn line(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Outbound::Line(text)
    }

    pub fn as_line(&self) -> Option<&str> {
        match self {
            Outbound::Line(text) => Some(text),
            Outbound::Pong(_) => None,
        }
    }
}

pub fn chat_line(name: &str, content: &str) -> String {
    format!("{}: {}", name, content)
}

pub fn username_set(name: &str) -> String {
    format!("Username set to {}", name)
}

pub fn presence(count: usize) -> String {
    format!("{}{}", PRESENCE_PREFIX, count)
}

pub fn left_notice(name: &str) -> String {
    format!("{} has left the chat.", name)
}

pub fn binary_notice(name: &str) -> String {
    format!("{} has entered a binary message. For shame!", name)
}

/// Parse a presence token back into a count (client-side helper, used in tests)
pub fn parse_presence(line: &str) -> Option<usize> {
    line.trim_end()
        .strip_prefix(PRESENCE_PREFIX)
        .and_then(|n| n.parse().ok())
}

/// Drop control characters from user-supplied text
pub fn clean_input(input: &str) -> String {
    input.chars().filter(|c| !c.is_control()).collect()
}
