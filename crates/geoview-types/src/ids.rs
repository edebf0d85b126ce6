//! Typed wrapper around the feed's opaque event identifier.
//!
//! The upstream feed assigns each event a globally unique string id (for
//! USGS, codes like `us7000abcd`). The feed carries no revision counter
//! beyond `id` and the occurrence time, so a refresh always replaces the
//! whole event sequence rather than patching individual records. Wrapping
//! the id in a newtype keeps it from being confused with other strings
//! (place names, layer ids) at compile time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique identifier for an event, assigned by the upstream feed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventId(pub String);

impl EventId {
    /// Create an event id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}
