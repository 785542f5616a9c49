//! # Per-slot lifecycle ledger.
//!
//! Maintains authoritative per-slot counts of constructed, promoted, and
//! destroyed handles, derived purely from the event stream.
//!
//! ## Architecture
//! ```text
//! SiteController ──► SubscriberSet ──► AuditTracker::on_event()
//!                                             │
//!                                             ▼
//!                                  HashMap<slot, SlotLedger>
//!                                 (started / ready / destroyed / ...)
//! ```
//!
//! ## Rules
//! - Events arrive in `seq` order on one thread; no staleness gating needed.
//! - A slot is **balanced** once it is torn down and every handle that was
//!   ever started has been destroyed — the no-leak property, observable at
//!   runtime instead of only in tests.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Counters for one slot.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SlotLedger {
    /// Handles constructed (acquisitions started).
    pub started: u64,
    /// Promotions to active.
    pub ready: u64,
    /// Handles reclaimed (unref + destroy).
    pub destroyed: u64,
    /// In-flight inits superseded by newer parameter changes.
    pub superseded: u64,
    /// Superseded inits whose late completion was discarded.
    pub abandoned: u64,
    /// Genuine (non-superseded) init failures.
    pub failed: u64,
    /// True once the site finished teardown.
    pub torn_down: bool,
    /// Last event sequence number observed for this slot.
    pub last_seq: u64,
}

impl SlotLedger {
    /// True if every started handle was destroyed and the site is gone.
    pub fn is_balanced(&self) -> bool {
        self.torn_down && self.started == self.destroyed
    }
}

/// Event-driven ledger of handle lifecycles, keyed by slot.
#[derive(Default)]
pub struct AuditTracker {
    slots: RefCell<HashMap<String, SlotLedger>>,
}

impl AuditTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the ledger for one slot, if any events were seen.
    pub fn ledger(&self, slot: &str) -> Option<SlotLedger> {
        self.slots.borrow().get(slot).cloned()
    }

    /// Returns sorted slot keys that are torn down but not balanced.
    ///
    /// A non-empty result after teardown indicates a leak.
    pub fn leaking(&self) -> Vec<String> {
        let slots = self.slots.borrow();
        let mut out: Vec<String> = slots
            .iter()
            .filter(|(_, l)| l.torn_down && !l.is_balanced())
            .map(|(slot, _)| slot.clone())
            .collect();
        out.sort_unstable();
        out
    }
}

impl Subscribe for AuditTracker {
    fn on_event(&self, event: &Event) {
        let Some(slot) = event.slot.as_deref() else {
            return;
        };

        let mut slots = self.slots.borrow_mut();
        let ledger = slots.entry(slot.to_string()).or_default();
        ledger.last_seq = event.seq;

        match event.kind {
            EventKind::AcquireStarted => ledger.started += 1,
            EventKind::AcquireReady => ledger.ready += 1,
            EventKind::HandleDestroyed => ledger.destroyed += 1,
            EventKind::AcquireSuperseded => ledger.superseded += 1,
            EventKind::AcquireAbandoned => ledger.abandoned += 1,
            EventKind::AcquireFailed => ledger.failed += 1,
            EventKind::SiteTornDown => ledger.torn_down = true,
            EventKind::SlotAllocated | EventKind::SlotReleased => {}
        }
    }

    fn name(&self) -> &'static str {
        "audit"
    }
}
