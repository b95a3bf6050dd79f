//! Basic type definitions for the chat relay
//!
//! Provides the `SessionId` newtype: a process-wide unique, monotonically
//! increasing session identifier assigned at accept time.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Unique session identifier (newtype pattern)
///
/// Wraps a monotonically increasing counter for type-safe session
/// identification. Ids are handed out in accept order, so keying the
/// registry by `SessionId` also yields join-order iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate the next session ID
    pub fn new() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
