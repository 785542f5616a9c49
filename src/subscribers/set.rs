//! # SubscriberSet: panic-isolated fan-out over multiple subscribers.
//!
//! [`SubscriberSet`] distributes each [`Event`] to every subscriber, in
//! registration order, on the emitting thread.
//!
//! ## What it guarantees
//! - In-order delivery per subscriber (and globally — one thread).
//! - Panics inside subscribers are caught and logged (isolation).
//!
//! ## What it does **not** guarantee
//! - Nothing shields the controller from a *slow* subscriber; fan-out is
//!   synchronous by design (the controller runs between UI render turns, and
//!   deferring observability would reorder it against teardown sweeps).

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use crate::events::Event;

use super::Subscribe;

/// Composite fan-out over registered subscribers.
#[derive(Default)]
pub struct SubscriberSet {
    subs: Vec<Rc<dyn Subscribe>>,
}

impl SubscriberSet {
    /// Creates a set over the given subscribers.
    #[must_use]
    pub fn new(subs: Vec<Rc<dyn Subscribe>>) -> Self {
        Self { subs }
    }

    /// Fan-out one event to all subscribers.
    ///
    /// A panicking subscriber is reported to stderr and skipped; the
    /// remaining subscribers still receive the event.
    pub fn emit(&self, event: &Event) {
        for sub in &self.subs {
            if let Err(panic_err) = catch_unwind(AssertUnwindSafe(|| sub.on_event(event))) {
                eprintln!(
                    "[subvisor] subscriber '{}' panicked: {:?}",
                    sub.name(),
                    panic_err
                );
            }
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subs.len()
    }
}
