//! # Kind registry: the constructor seam for resource implementations.
//!
//! The controller is parameterized over resource kinds but never knows how a
//! "document" or "query" talks to its backend. Integrators register one
//! constructor per [`ResourceKind`]; each constructor closes over whatever
//! store connection it needs.
//!
//! ## Rules
//! - Constructing for an unregistered kind is a programming error and fails
//!   fast with [`SubscribeError::UnregisteredKind`]; no handle is left
//!   half-constructed.
//! - Constructors are infallible: argument validation belongs to the handle's
//!   own initialization, which may reject asynchronously.
//!
//! ## Example
//! ```
//! use serde_json::json;
//! use subvisor::{KindRegistry, LocalState, MemoryStore, ResourceKind};
//!
//! let store = MemoryStore::new();
//! let kinds = KindRegistry::new().register(ResourceKind::Local, {
//!     let store = store.clone();
//!     move |slot, params| LocalState::construct(store.clone(), slot, params)
//! });
//!
//! assert!(kinds.supports(ResourceKind::Local));
//! assert!(!kinds.supports(ResourceKind::Doc));
//! ```

use std::collections::HashMap;

use crate::error::SubscribeError;
use crate::params::{ParamSpec, ResourceKind};
use crate::resources::ResourceRef;
use crate::store::SlotKey;

type ConstructFn = Box<dyn Fn(&SlotKey, &ParamSpec) -> ResourceRef>;

/// Maps resource kinds to handle constructors.
#[derive(Default)]
pub struct KindRegistry {
    ctors: HashMap<ResourceKind, ConstructFn>,
}

impl KindRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the constructor for a kind.
    pub fn register<F>(mut self, kind: ResourceKind, ctor: F) -> Self
    where
        F: Fn(&SlotKey, &ParamSpec) -> ResourceRef + 'static,
    {
        self.ctors.insert(kind, Box::new(ctor));
        self
    }

    /// True if a constructor is registered for the kind.
    #[must_use]
    pub fn supports(&self, kind: ResourceKind) -> bool {
        self.ctors.contains_key(&kind)
    }

    /// Constructs a fresh handle for the given parameters, scoped to `slot`.
    pub fn construct(
        &self,
        slot: &SlotKey,
        params: &ParamSpec,
    ) -> Result<ResourceRef, SubscribeError> {
        let ctor = self
            .ctors
            .get(&params.kind())
            .ok_or(SubscribeError::UnregisteredKind(params.kind()))?;
        Ok(ctor(slot, params))
    }
}
