//! # Event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for plugging custom event
//! handlers into a subscription site.
//!
//! ## Rules
//! - Handlers run synchronously on the controller's thread, in event order.
//! - Keep handlers cheap; a slow handler delays the controller itself.
//! - Panics are caught by [`SubscriberSet`](crate::SubscriberSet) and logged;
//!   other subscribers are unaffected.

use crate::events::Event;

/// Event subscriber for lifecycle observability.
///
/// Handlers are invoked in-order on the controller's own thread. Do not block;
/// hand expensive work to a task of your own.
pub trait Subscribe {
    /// Processes a single event.
    ///
    /// Called inline at the point the controller emits; events arrive in
    /// `seq` order.
    fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in panic reports.
    ///
    /// Prefer short, descriptive names (e.g., "audit", "metrics"). The
    /// default uses `type_name::<Self>()`, which can be verbose — override it
    /// when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
