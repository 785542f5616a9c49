//! # Event subscribers for lifecycle observability.
//!
//! This module provides the [`Subscribe`] trait and built-in implementations
//! for handling the events a subscription site emits.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   SiteController ── emit(Event) ──► SubscriberSet ──► fan-out (same thread)
//!                                          │
//!                                     ┌────┴────┬─────────┬───────┐
//!                                     ▼         ▼         ▼       ▼
//!                                  AuditTracker LogWriter Custom  ...
//! ```
//!
//! Everything runs on one logical thread, so fan-out is a plain in-order
//! call per subscriber — no queues, no workers. A panicking subscriber is
//! isolated (`catch_unwind`) so it cannot corrupt the controller's state
//! machine mid-transition.
//!
//! ## Subscriber types
//! - **Passive subscribers** — observe and react to events (logging, metrics)
//! - **Stateful subscribers** — maintain state from events ([`AuditTracker`])
//!
//! ## Implementing custom subscribers
//! ```rust
//! use subvisor::{Event, EventKind, Subscribe};
//!
//! struct FailureCounter(std::cell::Cell<u64>);
//!
//! impl Subscribe for FailureCounter {
//!     fn on_event(&self, event: &Event) {
//!         if matches!(event.kind, EventKind::AcquireFailed) {
//!             self.0.set(self.0.get() + 1);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "failure-counter" }
//! }
//! ```

mod audit;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use audit::{AuditTracker, SlotLedger};
pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
