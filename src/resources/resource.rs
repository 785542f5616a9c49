//! # The resource handle contract.
//!
//! A [`Resource`] is one acquisition attempt. Its life is short and strictly
//! ordered:
//!
//! ```text
//! construct ──► begin() ──┬─ Acquisition::Ready          (sync kinds)
//!                         └─ Acquisition::Pending(fut)   (async kinds)
//!
//! cancel()   signal-only; tells the handle to stop caring about its own
//!            eventual init result. Idempotent. Never reclaims anything.
//!
//! destroy()  final cleanup, preceded by unref_store_path(). The controller
//!            guarantees destroy() runs exactly once per handle; handles may
//!            rely on that instead of guarding themselves.
//! ```
//!
//! ## Rules
//! - Synchronicity is fixed per kind, not per call: a kind either always
//!   returns `Ready` or always returns `Pending`.
//! - `begin` is called at most once per handle.
//! - `unref_store_path` is called on every handle the controller ever
//!    constructed, including ones whose init lost a race — a cancelled handle
//!    may already have incremented a store reference before being superseded.
//!    Implementations must therefore tolerate unref-without-prior-ref.
//! - A stalled `Pending` future that never resolves is legal; the site simply
//!   stays not-ready until superseded or torn down.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use serde_json::Value;

use crate::error::AcquireError;
use crate::params::ResourceKind;

/// Shared handle to one acquisition attempt.
///
/// Owned exclusively by the controller instance that created it; never shared
/// across sites.
pub type ResourceRef = Rc<dyn Resource>;

/// Outcome of starting an acquisition.
pub enum Acquisition {
    /// Initialization completed inline. The controller promotes the handle
    /// without any cancellation machinery.
    Ready,

    /// Initialization suspends. The controller drives the future and gates
    /// its completion on a cancellation token.
    Pending(LocalBoxFuture<'static, Result<(), AcquireError>>),
}

/// One acquisition attempt against the backing store.
pub trait Resource {
    /// The kind this handle was constructed for.
    fn kind(&self) -> ResourceKind;

    /// Starts initialization.
    ///
    /// `first_for_slot` is true only for the first handle ever constructed
    /// for this site's slot; kinds that seed initial state use it to avoid
    /// clobbering survivors of a parameter change.
    fn begin(&self, first_for_slot: bool) -> Acquisition;

    /// Cooperative cancellation signal. Idempotent; a no-op once destroyed.
    ///
    /// Does **not** reclaim resources — reclamation always goes through the
    /// controller's teardown queue.
    fn cancel(&self);

    /// Reads the handle's current data, if any.
    fn read(&self) -> Option<Value>;

    /// Increments the reference count on this handle's backing store path.
    fn ref_store_path(&self);

    /// Decrements the reference count on this handle's backing store path.
    ///
    /// Must tolerate being called when no reference was ever taken.
    fn unref_store_path(&self);

    /// Final cleanup. The controller calls this exactly once per handle.
    fn destroy(&self);
}
