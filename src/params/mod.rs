//! Parameter normalization: raw caller arguments to canonical descriptors.
//!
//! This module turns a resource-kind tag plus a heterogeneous argument list
//! into a [`ParamSpec`], the canonical descriptor the controller compares by
//! **structural equality** to decide whether a parameter change actually
//! happened.
//!
//! ## Contents
//! - [`ResourceKind`] tagged variant over the six subscribable kinds
//! - [`ParamSpec`]    immutable descriptor (kind + ordered opaque arguments)
//!
//! ## Rules
//! - A new descriptor is produced whenever the argument list changes **by
//!   value**; identity is irrelevant.
//! - For query-family kinds the first argument is reinterpreted downstream as
//!   a store collection path. No validation happens here — that is the
//!   resource handle's responsibility.

mod kind;
mod spec;

pub use kind::ResourceKind;
pub use spec::ParamSpec;
