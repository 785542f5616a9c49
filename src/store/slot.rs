//! # Slot keys: per-site identity in the shared store.
//!
//! A [`SlotKey`] scopes one subscription site's projection inside the store.
//! It is allocated once, the first time a site subscribes, stays stable for
//! the site's entire mounted lifetime, and is released exactly once at
//! teardown.

use std::fmt;
use std::sync::Arc;

/// Opaque, globally unique identifier for one subscription site.
///
/// Cheap to clone; compares by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey(Arc<str>);

impl SlotKey {
    /// Wraps an identifier issued by the store.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the key as a store path segment.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SlotKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
