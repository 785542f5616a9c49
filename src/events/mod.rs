//! Lifecycle events: the controller's observability surface.
//!
//! This module groups the event **data model** emitted by subscription sites
//! as they allocate slots, race acquisitions, promote handles, and tear down.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: `SiteController` (all lifecycle transitions).
//! - **Consumers**: [`SubscriberSet`](crate::SubscriberSet) fan-out to
//!   user subscribers ([`AuditTracker`](crate::AuditTracker), `LogWriter`,
//!   custom [`Subscribe`](crate::Subscribe) implementations).
//!
//! Delivery is synchronous and in-order: everything runs on one logical
//! thread, so a subscriber observes events exactly in the order the
//! controller produced them.

mod event;

pub use event::{Event, EventKind};
