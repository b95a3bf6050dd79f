//! Broadcast fan-out
//!
//! Formats outbound text and fans it out to every session in a registry
//! snapshot. Delivery into each session's outbound queue is non-blocking:
//! registry state and network I/O never wait on each other, so one stalled
//! client cannot delay the rest. A failed recipient is logged and skipped;
//! its own read loop is responsible for deregistering it.

use chrono::Local;
use tracing::warn;

use crate::protocol;
use crate::registry::Registry;

/// Timestamp format for chat and system notices
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prefix a message body with the current local timestamp
pub fn format_message(body: &str) -> String {
    format!("{} {}", Local::now().format(TIMESTAMP_FORMAT), body)
}

/// Broadcast a timestamped chat or system notice to every session
pub fn broadcast_message(registry: &Registry, body: &str) {
    fan_out(registry, format_message(body));
}

/// Broadcast the current roster as a `USERS:` control line to every session
pub fn broadcast_roster(registry: &Registry) {
    fan_out(registry, protocol::roster_line(&registry.snapshot_names()));
}

/// Push one line into every outbound queue in the current snapshot
///
/// A closed or full queue must not abort delivery to the remaining
/// sessions, and must not mutate the registry.
fn fan_out(registry: &Registry, line: String) {
    for sender in registry.snapshot_channels() {
        if let Err(e) = sender.try_send(line.clone()) {
            warn!("Dropping broadcast line for one session: {}", e);
        }
    }
}
