//! # Local scratch state: synchronous, store-observed reference kind.
//!
//! [`LocalState`] projects per-site scratch state into the store at the
//! site's slot path. Initialization is atomic from the controller's point of
//! view: `begin` writes and returns [`Acquisition::Ready`], so no
//! cancellation machinery is ever involved.
//!
//! ## Rules
//! - The initial value (first constructor argument, default `null`) is
//!   written only on the **first ever** init for the slot; later
//!   re-parameterizations keep whatever value the caller has since written.
//! - `destroy` clears the slot projection.
//! - The in-memory store does not reference-count paths, so ref/unref are
//!   bookkeeping no-ops kept for the contract.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::Value;

use crate::params::{ParamSpec, ResourceKind};
use crate::resources::{Acquisition, Resource, ResourceRef};
use crate::store::{MemoryStore, SlotKey, Store};

/// Per-site scratch state projected into the in-memory store.
pub struct LocalState {
    store: Rc<MemoryStore>,
    slot: SlotKey,
    initial: Value,
    refs: Cell<u32>,
}

impl LocalState {
    /// Constructs a handle for one acquisition attempt.
    ///
    /// The first constructor argument is the initial value; absent means
    /// `null`.
    pub fn construct(store: Rc<MemoryStore>, slot: &SlotKey, params: &ParamSpec) -> ResourceRef {
        let initial = params.args().first().cloned().unwrap_or(Value::Null);
        Rc::new(Self {
            store,
            slot: slot.clone(),
            initial,
            refs: Cell::new(0),
        })
    }
}

impl Resource for LocalState {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Local
    }

    fn begin(&self, first_for_slot: bool) -> Acquisition {
        if first_for_slot {
            self.store.put(self.slot.as_str(), self.initial.clone());
        }
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
