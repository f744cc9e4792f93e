//! Stub server error types

use std::net::SocketAddr;

/// Errors that can occur while running the stub auth server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Failed to read the bound address.
    #[error("Failed to read local address: {0}")]
    LocalAddr(std::io::Error),

    /// The server task ended abnormally.
    #[error("Server task failed: {0}")]
    Task(String),
}
