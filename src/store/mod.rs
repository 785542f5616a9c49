//! Shared-store boundary: scoped-path reads and slot identity.
//!
//! The controller never owns the data it subscribes to — a shared,
//! reference-counted store does. This module specifies the controller-facing
//! slice of that store and ships a small in-memory implementation for tests,
//! documentation, and the synchronous reference kinds.
//!
//! ## Contents
//! - [`Store`]       scoped-path access + slot-key allocation
//! - [`StoreRef`]    a handle scoped to one path (`at` / `get`)
//! - [`SlotKey`]     the opaque per-site identifier
//! - [`MemoryStore`] in-memory reference implementation
//!
//! ## Rules
//! - Reads that feed reactive consumers **must** go through
//!   [`StoreRef::get`]; reading a projection by any other means bypasses the
//!   store's change detection.
//! - Slot keys are allocated exactly once per site via [`Store::fresh_id`]
//!   and released exactly once via [`Store::release_id`], at site teardown.
//! - Reference counting of store paths is the resource handle's concern
//!   (see [`Resource`](crate::resources::Resource)); the store only provides
//!   identity and access here.

mod memory;
mod slot;

use std::rc::Rc;

use serde_json::Value;

pub use memory::MemoryStore;
pub use slot::SlotKey;

/// Controller-facing slice of the shared data store.
///
/// Everything runs on one logical thread; implementations are expected to be
/// `!Send` and internally use `RefCell`-style mutability.
pub trait Store {
    /// Returns a handle scoped to the given path.
    fn scope(&self, path: &str) -> Rc<dyn StoreRef>;

    /// Issues a fresh, globally unique slot key.
    fn fresh_id(&self) -> SlotKey;

    /// Releases a slot key previously issued by [`Store::fresh_id`].
    ///
    /// Called exactly once per key, at site teardown.
    fn release_id(&self, key: &SlotKey);
}

/// A store handle scoped to one path.
pub trait StoreRef {
    /// Returns the path this handle is scoped to.
    fn path(&self) -> &str;

    /// Returns a handle scoped to a subpath of this one.
    fn at(&self, subpath: &str) -> Rc<dyn StoreRef>;

    /// Reads the current value at this path.
    ///
    /// This is the store's tracked access primitive: reactive consumers rely
    /// on reads going through here.
    fn get(&self) -> Option<Value>;
}
