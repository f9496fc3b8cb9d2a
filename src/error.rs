//! Error types
//!
//! Delivery failures are scoped to a single recipient and never abort a
//! broadcast. Only server startup errors are fatal to the process.

use std::net::SocketAddr;

/// Why a line could not be queued for a recipient
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("outbound buffer full")]
    Full,

    #[error("connection closed")]
    Closed,
}

/// Errors that stop the server process
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
