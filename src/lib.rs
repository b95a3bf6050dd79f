//! Multi-Client TCP Chat Relay Library
//!
//! A line-based chat relay built on tokio using the Actor pattern for
//! state management.
//!
//! # Features
//! - TCP connection handling with newline-delimited UTF-8 framing
//! - Display-name handshake with rejection of empty names
//! - Chat broadcast to all connected clients, timestamped and name-prefixed
//! - Live `USERS:` roster updates on every join and departure
//! - Disconnection handling with exactly-once cleanup
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatRelay` is the central actor owning the session registry
//! - Each connection has a handler task feeding commands to the relay
//! - Each session drains a bounded outbound queue on its own writer task,
//!   so one slow client cannot stall a broadcast to the others
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use chat_relay::{ChatRelay, handle_connection};
//!
//! #[tokio::main]
//! async fn main() {
//!     let listener = TcpListener::bind("0.0.0.0:12345").await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(256);
//!
//!     tokio::spawn(ChatRelay::new(cmd_rx).run());
//!
//!     while let Ok((stream, _)) = listener.accept().await {
//!         let cmd_tx = cmd_tx.clone();
//!         tokio::spawn(handle_connection(stream, cmd_tx));
//!     }
//! }
//! ```

pub mod broadcast;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use error::{RelayError, SendError};
pub use handler::handle_connection;
pub use registry::Registry;
pub use server::{ChatRelay, RelayCommand};
pub use session::Session;
pub use types::SessionId;
