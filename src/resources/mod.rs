//! Resource handles: the polymorphic unit of acquisition.
//!
//! One [`Resource`] instance represents **one acquisition attempt** for one
//! subscription site. The controller constructs a fresh handle per parameter
//! change, races overlapping handles, and reclaims every handle it ever
//! constructed exactly once.
//!
//! ## Contents
//! - [`Resource`], [`Acquisition`], [`ResourceRef`] — the handle contract
//! - [`KindRegistry`] — per-kind constructors (the integration seam)
//! - [`LocalState`], [`ComputedValue`] — synchronous reference kinds backed
//!   by the in-memory store
//!
//! The asynchronous kinds (doc, query, query-extra, api) talk to a backing
//! server and live outside this crate; integrators register their
//! constructors on a [`KindRegistry`].

mod local;
mod registry;
mod resource;
mod value;

pub use local::LocalState;
pub use registry::KindRegistry;
pub use resource::{Acquisition, Resource, ResourceRef};
pub use value::ComputedValue;
