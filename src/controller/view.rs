//! # Derived view: what the calling site actually sees.
//!
//! A [`View`] is a pure function of controller state, recomputed on every
//! read — never cached across renders. See
//! [`SiteController::view`](crate::SiteController::view) for the projection
//! rules.

use std::rc::Rc;

use serde_json::Value;

use crate::store::StoreRef;

/// The externally visible triple of one subscription site.
pub struct View {
    /// Current data snapshot. `None` until the first promotion; afterwards,
    /// data-exposing kinds read from the active handle, store-observed kinds
    /// from the store's tracked access primitive.
    pub data: Option<Value>,

    /// Store handle for the caller. Query-family kinds get the collection
    /// path (so callers can mutate sibling records); other kinds get the
    /// slot projection, materialized only once ready — earlier it would
    /// resolve to an unbound path.
    pub handle: Option<Rc<dyn StoreRef>>,

    /// True once the site promoted at least one handle.
    pub ready: bool,
}
