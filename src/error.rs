//! Error types for the chat relay
//!
//! Defines connection-level errors and outbound delivery errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Connection-level errors
///
/// Anything that ends a connection handler. Per-connection failures are
/// contained within that session's task and never reach the listener.
#[derive(Debug, Error)]
pub enum RelayError {
    /// IO error on the client socket (fatal for the connection)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Relay command channel closed (fatal - relay actor gone)
    #[error("Relay channel send error")]
    ChannelSend,
}

/// Outbound delivery errors
///
/// Occurs when pushing a line into a session's outbound queue fails.
/// Broadcast delivery is best-effort: both variants are logged and skipped.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the queue has been closed
    #[error("Session channel closed")]
    ChannelClosed,

    /// The bounded queue is full (slow reader)
    #[error("Session queue full")]
    QueueFull,
}
