//! # subvisor
//!
//! **Subvisor** is a subscription lifecycle controller for Rust.
//!
//! It binds externally-managed data resources (documents, queries, computed
//! values, local state) to the lifetime of a UI component, and keeps that
//! binding correct under rapid re-parameterization: overlapping asynchronous
//! acquisitions, latest-wins supersession, and exactly-once teardown.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!    subscribe(kind, args)        subscribe(kind, args')       teardown()
//!            │                            │                        │
//!            ▼                            ▼                        ▼
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  SiteController (one per mounted subscription site)                   │
//! │  - KindRegistry (constructors per ResourceKind)                       │
//! │  - SiteState (params, slot, active handle, teardown queue, token)     │
//! │  - SubscriberSet (fans out lifecycle events)                          │
//! │  - Render (batched re-render trigger for data-exposing kinds)         │
//! └──────┬───────────────────────┬──────────────────────────┬────────────┘
//!        ▼                       ▼                          ▼
//!  ┌───────────────┐     ┌───────────────┐          ┌───────────────┐
//!  │   Resource    │     │   Resource    │          │     Store     │
//!  │ (handle #1,   │     │ (handle #2,   │          │ (slot keys +  │
//!  │  superseded)  │     │   active)     │          │ tracked reads)│
//!  └──────┬────────┘     └──────┬────────┘          └───────────────┘
//!         │ cancel() now        │ begin() ─► Ready / Pending(future)
//!         │ destroy() later     │
//!         ▼                     ▼
//!   teardown queue ──► reclaimed at the next promotion or at teardown
//! ```
//!
//! ### Lifecycle
//! ```text
//! subscribe(kind, args)
//!   ├─ torn down?               ─► Err(TornDown)
//!   ├─ same params (by value)?  ─► Ok, nothing happens
//!   ├─ kind unregistered?       ─► Err(UnregisteredKind), nothing mutated
//!   ├─ allocate slot key        (first subscribe only)
//!   ├─ construct handle, queue it, mark it active
//!   ├─ cancel the outstanding async init, if any (latest wins)
//!   └─ begin():
//!        ├─ Ready        ─► promote in the same turn (sync fast path)
//!        └─ Pending(fut) ─► spawn_local; on completion:
//!             ├─ superseded ─► discard result, publish AcquireAbandoned
//!             ├─ Ok         ─► promote (sweep losers, ref store path,
//!             │                 bump init_count, schedule re-render)
//!             └─ Err        ─► publish AcquireFailed, site stays not-ready
//!
//! teardown()
//!   ├─ cancel outstanding init, destroy every queued handle exactly once
//!   └─ release the slot key
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                    |
//! |-------------------|------------------------------------------------------------------|---------------------------------------|
//! | **Controller**    | Per-site lifecycle state machine with latest-wins supersession.  | [`SiteController`], [`SiteBuilder`]   |
//! | **Resources**     | Handle contract plus per-kind constructors.                      | [`Resource`], [`KindRegistry`]        |
//! | **Store**         | Slot-keyed reactive store boundary and an in-memory reference.   | [`Store`], [`StoreRef`], [`MemoryStore`] |
//! | **Subscriber API**| Hook into lifecycle events (auditing, logging, custom).          | [`Subscribe`], [`AuditTracker`]       |
//! | **Rendering**     | Batched, same-turn-coalescing re-render trigger.                 | [`Render`], [`RenderBatch`]           |
//! | **Errors**        | Typed errors for subscription and acquisition.                   | [`SubscribeError`], [`AcquireError`]  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use serde_json::json;
//! use subvisor::{KindRegistry, LocalState, MemoryStore, ResourceKind, SiteController};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     tokio::task::LocalSet::new()
//!         .run_until(async {
//!             let store = MemoryStore::new();
//!             let kinds = KindRegistry::new().register(ResourceKind::Local, {
//!                 let store = store.clone();
//!                 move |slot, params| LocalState::construct(store.clone(), slot, params)
//!             });
//!
//!             // Build subscribers (optional)
//!             #[cfg(feature = "logging")]
//!             let subs: Vec<Rc<dyn subvisor::Subscribe>> = {
//!                 use subvisor::LogWriter;
//!                 vec![Rc::new(LogWriter::default())]
//!             };
//!             #[cfg(not(feature = "logging"))]
//!             let subs: Vec<Rc<dyn subvisor::Subscribe>> = Vec::new();
//!
//!             let site = SiteController::builder(store)
//!                 .with_kinds(kinds)
//!                 .with_subscribers(subs)
//!                 .build();
//!
//!             site.subscribe(ResourceKind::Local, vec![json!({"draft": ""})])
//!                 .unwrap();
//!             let view = site.view();
//!             assert!(view.ready); // synchronous kind: ready in the same turn
//!             assert_eq!(view.data, Some(json!({"draft": ""})));
//!
//!             site.teardown();
//!         })
//!         .await;
//! }
//! ```

mod controller;
mod error;
mod events;
mod params;
mod render;
mod resources;
mod store;
mod subscribers;

// ---- Public re-exports ----

pub use controller::{SiteBuilder, SiteController, View};
pub use error::{AcquireError, SubscribeError};
pub use events::{Event, EventKind};
pub use params::{ParamSpec, ResourceKind};
pub use render::{NullRender, Render, RenderBatch};
pub use resources::{Acquisition, ComputedValue, KindRegistry, LocalState, Resource, ResourceRef};
pub use store::{MemoryStore, SlotKey, Store, StoreRef};
pub use subscribers::{AuditTracker, SlotLedger, Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
