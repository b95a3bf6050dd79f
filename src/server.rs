//! ChatRelay actor implementation
//!
//! The central actor that owns the session registry and serializes every
//! membership mutation and broadcast. Uses the Actor pattern with mpsc
//! channels for message passing: the registry is only ever touched on this
//! task, which is the one critical section the design requires.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::broadcast;
use crate::protocol;
use crate::registry::Registry;
use crate::session::Session;
use crate::types::SessionId;

/// Commands sent from connection handlers to the ChatRelay actor
///
/// The command channel is FIFO per sender, so a session's `Chat` commands
/// are always processed before its own `Leave`.
#[derive(Debug)]
pub enum RelayCommand {
    /// Handshake completed: register the session and announce it
    Join {
        id: SessionId,
        name: String,
        sender: mpsc::Sender<String>,
    },
    /// One chat message read from the session's inbound stream
    Chat { id: SessionId, body: String },
    /// Session loop finished: deregister and announce the departure
    Leave { id: SessionId },
}

/// The main ChatRelay actor
///
/// Consumes commands from all connection handlers and drives the registry
/// and broadcaster. No locks needed - all shared state lives here.
pub struct ChatRelay {
    /// All active sessions
    registry: Registry,
    /// Command receiver channel
    receiver: mpsc::Receiver<RelayCommand>,
}

impl ChatRelay {
    /// Create a new ChatRelay with the given command receiver
    pub fn new(receiver: mpsc::Receiver<RelayCommand>) -> Self {
        Self {
            registry: Registry::new(),
            receiver,
        }
    }

    /// Run the ChatRelay event loop
    ///
    /// Continuously receives and processes commands until all senders are
    /// dropped.
    pub async fn run(mut self) {
        info!("ChatRelay started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatRelay shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Join { id, name, sender } => self.handle_join(id, name, sender),
            RelayCommand::Chat { id, body } => self.handle_chat(id, body),
            RelayCommand::Leave { id } => self.handle_leave(id),
        }
    }

    /// Register a session, acknowledge it, and announce it to everyone
    ///
    /// The acceptance line goes to the new session only; the join notice
    /// and refreshed roster go to all sessions including the new one.
    fn handle_join(&mut self, id: SessionId, name: String, sender: mpsc::Sender<String>) {
        info!("Session {} registered as '{}'", id, name);

        let session = Session::new(id, name.clone(), sender);
        let _ = session.send(protocol::acceptance_line(&name));
        self.registry.add(session);

        broadcast::broadcast_message(&self.registry, &protocol::join_notice(&name));
        broadcast::broadcast_roster(&self.registry);

        debug!("Active sessions: {}", self.registry.len());
    }

    /// Broadcast one chat message with the sender's name prefixed
    fn handle_chat(&mut self, id: SessionId, body: String) {
        let Some(name) = self.registry.name_of(id) else {
            return;
        };

        let line = protocol::chat_line(name, &body);
        debug!("Session {} broadcast {} bytes", id, body.len());
        broadcast::broadcast_message(&self.registry, &line);
    }

    /// Deregister a session and announce the departure
    ///
    /// Idempotent: a second `Leave` for the same id finds nothing in the
    /// registry and produces no broadcast. The session (and with it the
    /// sender side of its outbound queue) is dropped only after removal,
    /// so the registry never holds a closed channel.
    fn handle_leave(&mut self, id: SessionId) {
        let Some(session) = self.registry.remove(id) else {
            return;
        };

        info!("Session {} ('{}') left", id, session.name);
        let Session { name, .. } = session;

        broadcast::broadcast_message(&self.registry, &protocol::departure_notice(&name));
        broadcast::broadcast_roster(&self.registry);

        debug!("Active sessions: {}", self.registry.len());
    }
}
