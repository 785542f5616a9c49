//! # Lifecycle events emitted by subscription sites.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Slot events**: per-site identity allocation and release
//! - **Acquisition events**: the race between overlapping initializations
//! - **Terminal events**: handle destruction and site teardown
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! slot key, the resource kind, and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. All publishing happens on one logical thread, so delivery
//! order and `seq` order coincide.
//!
//! ## Example
//! ```rust
//! use subvisor::{Event, EventKind, ResourceKind};
//!
//! let ev = Event::new(EventKind::AcquireFailed)
//!     .with_slot("01J0000000000000000000000")
//!     .with_kind(ResourceKind::Query)
//!     .with_reason("permission denied");
//!
//! assert_eq!(ev.kind, EventKind::AcquireFailed);
//! assert_eq!(ev.reason.as_deref(), Some("permission denied"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::params::ResourceKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of subscription lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Slot events ===
    /// A site allocated its slot key (first subscription on the site).
    ///
    /// Sets:
    /// - `slot`: the freshly allocated key
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SlotAllocated,

    /// The slot key was released back to the store (site teardown).
    ///
    /// Sets:
    /// - `slot`: the released key
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SlotReleased,

    // === Acquisition events ===
    /// A new handle was constructed and its initialization started.
    ///
    /// Sets:
    /// - `slot`: site slot key
    /// - `resource`: resource kind of the handle
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AcquireStarted,

    /// A handle completed initialization and was promoted to active.
    ///
    /// Sets:
    /// - `slot`: site slot key
    /// - `resource`: resource kind of the handle
    /// - `init_count`: site promotion counter after the increment
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AcquireReady,

    /// An in-flight initialization was superseded by a newer parameter change.
    ///
    /// Signal-only: the superseded handle is reclaimed later, through the
    /// teardown queue.
    ///
    /// Sets:
    /// - `slot`: site slot key
    /// - `resource`: resource kind of the superseded handle
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AcquireSuperseded,

    /// A superseded initialization eventually completed (success or failure)
    /// and its result was discarded.
    ///
    /// Emitted so that late completions never pass silently.
    ///
    /// Sets:
    /// - `slot`: site slot key
    /// - `resource`: resource kind of the abandoned handle
    /// - `reason`: the discarded failure message, if the init rejected
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AcquireAbandoned,

    /// An initialization that was **not** superseded failed.
    ///
    /// The failure is absorbed here; the site stays not-ready until a later
    /// parameter change or teardown. Distinguished from [`AcquireAbandoned`]
    /// so genuine faults (permissions, I/O) remain visible.
    ///
    /// [`AcquireAbandoned`]: EventKind::AcquireAbandoned
    ///
    /// Sets:
    /// - `slot`: site slot key
    /// - `resource`: resource kind of the failed handle
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    AcquireFailed,

    // === Terminal events ===
    /// A handle was finally reclaimed (unref + destroy), either during a
    /// promotion sweep or at site teardown.
    ///
    /// Sets:
    /// - `slot`: site slot key
    /// - `resource`: resource kind of the destroyed handle
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    HandleDestroyed,

    /// The site finished teardown. Only late [`AcquireAbandoned`] completions
    /// may still follow for this slot.
    ///
    /// [`AcquireAbandoned`]: EventKind::AcquireAbandoned
    ///
    /// Sets:
    /// - `slot`: site slot key
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SiteTornDown,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Slot key of the site, if applicable.
    pub slot: Option<Arc<str>>,
    /// Resource kind of the handle involved, if applicable.
    pub resource: Option<ResourceKind>,
    /// Human-readable reason (failure messages, discarded results, ...).
    pub reason: Option<Arc<str>>,
    /// Site promotion counter (only for `AcquireReady`).
    pub init_count: Option<u64>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            slot: None,
            resource: None,
            reason: None,
            init_count: None,
        }
    }

    /// Attaches the site's slot key.
    #[inline]
    pub fn with_slot(mut self, slot: impl Into<Arc<str>>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Attaches the resource kind.
    #[inline]
    pub fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.resource = Some(kind);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the promotion counter value.
    #[inline]
    pub fn with_init_count(mut self, n: u64) -> Self {
        self.init_count = Some(n);
        self
    }

    /// True if this event reports a discarded or failed acquisition.
    #[inline]
    pub fn is_failure(&self) -> bool {
        matches!(
            self.kind,
            EventKind::AcquireAbandoned | EventKind::AcquireFailed
        )
    }
}
