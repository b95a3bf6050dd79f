//! Session struct definition
//!
//! Represents one connected, name-registered client and its outbound channel.

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::types::SessionId;

/// Connected client information
///
/// Holds the server-side state for one connection: its unique ID, the
/// display name accepted at handshake (immutable afterwards), and the
/// sender side of its bounded outbound queue. The receiving side is drained
/// by the connection's writer task.
#[derive(Debug)]
pub struct Session {
    /// Unique identifier for this session
    pub id: SessionId,
    /// Display name, set once at handshake
    pub name: String,
    /// Server → client line queue
    pub sender: mpsc::Sender<String>,
}

impl Session {
    /// Create a new session with the given ID, name, and sender channel
    pub fn new(id: SessionId, name: String, sender: mpsc::Sender<String>) -> Self {
        Self { id, name, sender }
    }

    /// Queue a line for delivery to this client without blocking
    ///
    /// Returns an error if the queue is closed (client disconnected) or
    /// full (client too slow to drain its writer).
    pub fn send(&self, line: String) -> Result<(), SendError> {
        self.sender.try_send(line).map_err(|e| match e {
            mpsc::error::TrySendError::Closed(_) => SendError::ChannelClosed,
            mpsc::error::TrySendError::Full(_) => SendError::QueueFull,
        })
    }
}
