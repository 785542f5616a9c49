//! Lifecycle controller: acquisition, supersession, and teardown.
//!
//! This module contains the core of the crate. The only public API is
//! [`SiteController`] (one instance per mounted subscription site), its
//! [`SiteBuilder`] wiring, and the [`View`] the projector computes for the
//! caller.
//!
//! Internal structure:
//! - [`site`]:    the controller state machine (acquire, supersede, promote,
//!   reclaim, tear down);
//! - [`view`]:    the derived-view triple recomputed on every read;
//! - [`builder`]: construction-time wiring (store, kinds, renderer,
//!   subscribers).

mod builder;
mod site;
mod view;

pub use builder::SiteBuilder;
pub use site::SiteController;
pub use view::View;
