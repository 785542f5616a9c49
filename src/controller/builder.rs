//! # Construction-time wiring for a subscription site.
//!
//! [`SiteBuilder`] bundles the collaborators a [`SiteController`] consumes:
//! the shared store, the per-kind constructors, the re-render trigger, and
//! event subscribers.
//!
//! ## Example
//! ```
//! use subvisor::{KindRegistry, LocalState, MemoryStore, ResourceKind, SiteController};
//!
//! let store = MemoryStore::new();
//! let kinds = KindRegistry::new().register(ResourceKind::Local, {
//!     let store = store.clone();
//!     move |slot, params| LocalState::construct(store.clone(), slot, params)
//! });
//!
//! let site = SiteController::builder(store)
//!     .with_kinds(kinds)
//!     .build();
//! assert!(!site.view().ready);
//! ```

use std::rc::Rc;

use crate::render::{NullRender, Render};
use crate::resources::KindRegistry;
use crate::store::Store;
use crate::subscribers::{Subscribe, SubscriberSet};

use super::site::SiteController;

/// Builder for constructing a [`SiteController`] with optional collaborators.
pub struct SiteBuilder {
    store: Rc<dyn Store>,
    kinds: KindRegistry,
    render: Rc<dyn Render>,
    subscribers: Vec<Rc<dyn Subscribe>>,
}

impl SiteBuilder {
    /// Creates a new builder over the given store.
    pub fn new(store: Rc<dyn Store>) -> Self {
        Self {
            store,
            kinds: KindRegistry::new(),
            render: Rc::new(NullRender),
            subscribers: Vec::new(),
        }
    }

    /// Sets the per-kind resource constructors.
    pub fn with_kinds(mut self, kinds: KindRegistry) -> Self {
        self.kinds = kinds;
        self
    }

    /// Sets the re-render trigger used when data-exposing kinds promote.
    ///
    /// Defaults to a no-op; sites that only serve store-observed kinds rely
    /// on the store's own reactivity and never need one.
    pub fn with_render(mut self, render: Rc<dyn Render>) -> Self {
        self.render = render;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events (acquisitions, supersessions,
    /// reclamations) synchronously, in order.
    pub fn with_subscribers(mut self, subscribers: Vec<Rc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds and returns the site controller.
    pub fn build(self) -> Rc<SiteController> {
        SiteController::new_internal(
            self.store,
            self.kinds,
            self.render,
            SubscriberSet::new(self.subscribers),
        )
    }
}
