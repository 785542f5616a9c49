//! # In-memory reference store.
//!
//! [`MemoryStore`] backs the synchronous reference kinds, the documentation
//! examples, and the test suite. It maps slash-separated paths to
//! [`serde_json::Value`]s and issues ULID slot keys.
//!
//! ## Rules
//! - All reads that go through [`StoreRef::get`] are counted
//!   ([`MemoryStore::tracked_reads`]), so tests can assert that projections
//!   use the store's access primitive instead of poking at fields.
//! - `release_id` forgets the key; releasing an unknown key is a no-op.
//!
//! Not a real backing store: no persistence, no server, no change feeds.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::Value;
use ulid::Ulid;

use super::{SlotKey, Store, StoreRef};

#[derive(Default)]
struct Inner {
    cells: RefCell<HashMap<String, Value>>,
    ids: RefCell<HashSet<String>>,
    tracked_reads: Cell<u64>,
}

/// In-memory path/value store with ULID slot keys.
///
/// ## Example
/// ```
/// use serde_json::json;
/// use subvisor::{MemoryStore, Store};
///
/// let store = MemoryStore::new();
/// store.put("threads/1", json!({"title": "hello"}));
///
/// let scoped = store.scope("threads");
/// assert_eq!(scoped.at("1").get(), Some(json!({"title": "hello"})));
/// assert!(scoped.at("2").get().is_none());
/// ```
#[derive(Default)]
pub struct MemoryStore {
    inner: Rc<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Writes a value at the given path.
    pub fn put(&self, path: &str, value: Value) {
        self.inner.cells.borrow_mut().insert(path.to_string(), value);
    }

    /// Removes the value at the given path, returning it if present.
    pub fn remove(&self, path: &str) -> Option<Value> {
        self.inner.cells.borrow_mut().remove(path)
    }

    /// Number of reads performed through the tracked access primitive.
    pub fn tracked_reads(&self) -> u64 {
        self.inner.tracked_reads.get()
    }

    /// True if the given slot key is currently issued and unreleased.
    pub fn id_live(&self, key: &SlotKey) -> bool {
        self.inner.ids.borrow().contains(key.as_str())
    }
}

impl Store for MemoryStore {
    fn scope(&self, path: &str) -> Rc<dyn StoreRef> {
        Rc::new(MemoryRef {
            inner: Rc::clone(&self.inner),
            path: path.to_string(),
        })
    }

    fn fresh_id(&self) -> SlotKey {
        let id = Ulid::new().to_string();
        self.inner.ids.borrow_mut().insert(id.clone());
        SlotKey::new(id)
    }

    fn release_id(&self, key: &SlotKey) {
        self.inner.ids.borrow_mut().remove(key.as_str());
    }
}

/// Handle scoped to one path of a [`MemoryStore`].
struct MemoryRef {
    inner: Rc<Inner>,
    path: String,
}

impl StoreRef for MemoryRef {
    fn path(&self) -> &str {
        &self.path
    }

    fn at(&self, subpath: &str) -> Rc<dyn StoreRef> {
        Rc::new(MemoryRef {
            inner: Rc::clone(&self.inner),
            path: format!("{}/{}", self.path, subpath),
        })
    }

    fn get(&self) -> Option<Value> {
        self.inner.tracked_reads.set(self.inner.tracked_reads.get() + 1);
        self.inner.cells.borrow().get(&self.path).cloned()
    }
}
