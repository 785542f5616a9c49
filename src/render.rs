//! # Re-render trigger: deferred, coalesced notifications.
//!
//! Data-exposing kinds need to tell the host UI "something you render
//! changed". That notification must be **batched**: several promotions inside
//! one cooperative scheduling turn should produce exactly one downstream
//! notification, and the notification must never run before the promotion's
//! teardown sweep finished.
//!
//! ## Contents
//! - [`Render`]       the trigger boundary consumed by the controller
//! - [`RenderBatch`]  same-turn coalescing implementation
//! - [`NullRender`]   no-op for sites whose kinds are store-observed
//!
//! ## Rules
//! - [`Render::schedule`] never runs the notification inline; delivery is
//!   deferred to a fresh task on the current thread's local set.
//! - Calls within one turn coalesce: the flag is armed on the first call and
//!   cleared when the deferred task runs.
//!
//! ```text
//! schedule() ─┬─ pending? ── yes ──► (coalesced, nothing to do)
//!             └─ no ──► arm flag, spawn_local ──► next turn: clear flag, notify()
//! ```

use std::cell::Cell;
use std::rc::Rc;

/// Boundary for requesting a downstream re-render.
pub trait Render {
    /// Requests one deferred notification; same-turn requests coalesce.
    fn schedule(&self);
}

/// Coalescing renderer: many `schedule()` calls per turn, one notification.
///
/// Must be used inside a [`tokio::task::LocalSet`], like the rest of the
/// controller.
///
/// ## Example
/// ```no_run
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use subvisor::{Render, RenderBatch};
///
/// let renders = Rc::new(Cell::new(0u32));
/// let render = RenderBatch::new({
///     let renders = renders.clone();
///     move || renders.set(renders.get() + 1)
/// });
/// render.schedule();
/// render.schedule(); // coalesced: `renders` will reach 1, not 2
/// ```
pub struct RenderBatch {
    pending: Rc<Cell<bool>>,
    notify: Rc<dyn Fn()>,
}

impl RenderBatch {
    /// Creates a renderer that calls `notify` once per armed batch.
    pub fn new<F>(notify: F) -> Rc<Self>
    where
        F: Fn() + 'static,
    {
        Rc::new(Self {
            pending: Rc::new(Cell::new(false)),
            notify: Rc::new(notify),
        })
    }
}

impl Render for RenderBatch {
    fn schedule(&self) {
        if self.pending.replace(true) {
            return;
        }
        let pending = Rc::clone(&self.pending);
        let notify = Rc::clone(&self.notify);
        tokio::task::spawn_local(async move {
            pending.set(false);
            notify();
        });
    }
}

/// Renderer for sites that never need an explicit trigger.
#[derive(Default, Clone, Copy)]
pub struct NullRender;

impl Render for NullRender {
    fn schedule(&self) {}
}
