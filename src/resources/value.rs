//! # Computed value: synchronous, store-observed reference kind.
//!
//! [`ComputedValue`] evaluates a closure and projects the result into the
//! store at the site's slot path. Unlike [`LocalState`](crate::LocalState)
//! it recomputes on **every** init, since a parameter change usually means
//! the inputs of the computation changed.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::Value;

use crate::params::ResourceKind;
use crate::resources::{Acquisition, Resource, ResourceRef};
use crate::store::{MemoryStore, SlotKey, Store};

/// A derived value recomputed per acquisition and projected into the store.
pub struct ComputedValue {
    store: Rc<MemoryStore>,
    slot: SlotKey,
    compute: Box<dyn Fn() -> Value>,
    refs: Cell<u32>,
}

impl ComputedValue {
    /// Constructs a handle that projects `compute()` at the slot path.
    pub fn construct<F>(store: Rc<MemoryStore>, slot: &SlotKey, compute: F) -> ResourceRef
    where
        F: Fn() -> Value + 'static,
    {
        Rc::new(Self {
            store,
            slot: slot.clone(),
            compute: Box::new(compute),
            refs: Cell::new(0),
        })
    }
}

impl Resource for ComputedValue {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Value
    }

    fn begin(&self, _first_for_slot: bool) -> Acquisition {
        self.store.put(self.slot.as_str(), (self.compute)());
        Acquisition::Ready
    }

    fn cancel(&self) {
        // Synchronous kind: there is never an in-flight init to abandon.
    }

    fn read(&self) -> Option<Value> {
        self.store.scope(self.slot.as_str()).get()
    }

    fn ref_store_path(&self) {
        self.refs.set(self.refs.get() + 1);
    }

    fn unref_store_path(&self) {
        self.refs.set(self.refs.get().saturating_sub(1));
    }

    fn destroy(&self) {
        self.store.remove(self.slot.as_str());
    }
}
