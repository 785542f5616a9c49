//! # Subscription site controller - the core lifecycle state machine.
//!
//! One [`SiteController`] per mounted subscription site. It owns one *active*
//! handle and a queue of handles *pending teardown*, and drives acquisition,
//! supersession, reference counting, and teardown-on-unmount.
//!
//! ## Architecture
//! ```text
//! subscribe(kind, args)
//!     ├─► normalize to ParamSpec; structurally equal to current? ─► no-op
//!     ├─► allocate slot key (first use only)
//!     ├─► construct fresh handle via KindRegistry
//!     └─► on_params_changed(handle)
//!             ├─► outstanding async init? cancel its token + handle (signal-only)
//!             ├─► push handle onto teardown queue (unconditionally)
//!             ├─► set handle active (latest intent)
//!             └─► begin():
//!                   ├─ Ready        ─► finish_init() inline
//!                   └─ Pending(fut) ─► fresh token, spawn_local completion
//!
//! finish_init()
//!     ├─► destroy every queued handle except the last (unref + destroy)
//!     ├─► init_count += 1
//!     ├─► ref the promoted handle's store path
//!     └─► data-exposing kind? schedule a batched re-render
//!
//! teardown()
//!     ├─► cancel outstanding token, clear active
//!     ├─► destroy every queued handle (unref + destroy)
//!     └─► release slot key
//! ```
//!
//! ## Rules
//! - **Latest wins**: when parameter changes race, the most recently started
//!   initialization determines the visible resource; earlier ones are
//!   cancelled (signal-only) and reclaimed at the next promotion or at
//!   teardown, never left dangling and never allowed to overwrite a later
//!   result.
//! - **Two-phase reclamation**: cancellation signals now, the teardown queue
//!   reclaims later. A destroy never races an in-flight completion callback.
//! - Synchronous kinds never see a cancellation token; their initialization
//!   is atomic from the controller's point of view.
//! - Init failures are absorbed: surfaced as events, never to the caller.
//!   The caller-visible signal is `ready` staying `false`.
//!
//! Runs on one logical thread inside a [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tokio_util::sync::CancellationToken;

use crate::error::SubscribeError;
use crate::events::{Event, EventKind};
use crate::params::{ParamSpec, ResourceKind};
use crate::render::Render;
use crate::resources::{Acquisition, KindRegistry, ResourceRef};
use crate::store::{SlotKey, Store};
use crate::subscribers::SubscriberSet;

use super::builder::SiteBuilder;
use super::view::View;

/// Per-site mutable state. All transitions are documented on the operations
/// that perform them; nothing outside this module touches the fields.
struct SiteState {
    /// Last accepted descriptor; input deduplication (structural equality).
    params: Option<ParamSpec>,
    /// Allocated once at first subscribe, released once at teardown.
    slot: Option<SlotKey>,
    /// The current handle - latest intent, at most one.
    active: Option<ResourceRef>,
    /// Ownership ledger: every handle ever constructed, in construction
    /// order. The last entry is the handle being promoted; it is excluded
    /// from the destroy-all-but-last sweep.
    teardown: Vec<ResourceRef>,
    /// Supersession flag for the one in-flight async init, if any.
    /// Written here, read by that init's completion. Never set for sync kinds.
    cancel: Option<CancellationToken>,
    /// Incremented exactly once per promotion; `ready` ⇔ `init_count > 0`.
    init_count: u64,
    /// True once any handle was constructed for this slot.
    ever_acquired: bool,
    /// Teardown happened; the site accepts nothing further.
    torn_down: bool,
}

/// Binds the lifetime of an externally-managed resource to one subscription
/// site, tolerating rapid re-parameterization.
///
/// ## Example
/// ```
/// use serde_json::json;
/// use subvisor::{KindRegistry, LocalState, MemoryStore, ResourceKind, SiteController};
///
/// let store = MemoryStore::new();
/// let kinds = KindRegistry::new().register(ResourceKind::Local, {
///     let store = store.clone();
///     move |slot, params| LocalState::construct(store.clone(), slot, params)
/// });
/// let site = SiteController::builder(store).with_kinds(kinds).build();
///
/// site.subscribe(ResourceKind::Local, vec![json!({"draft": ""})]).unwrap();
/// let view = site.view();
/// assert!(view.ready); // synchronous kind: ready in the same turn
/// assert_eq!(view.data, Some(json!({"draft": ""})));
///
/// site.teardown();
/// ```
pub struct SiteController {
    store: Rc<dyn Store>,
    kinds: KindRegistry,
    render: Rc<dyn Render>,
    subs: SubscriberSet,
    /// Back-reference handed to spawned init continuations.
    me: Weak<SiteController>,
    state: RefCell<SiteState>,
}

impl SiteController {
    /// Returns a builder over the given store.
    pub fn builder(store: Rc<dyn Store>) -> SiteBuilder {
        SiteBuilder::new(store)
    }

    pub(super) fn new_internal(
        store: Rc<dyn Store>,
        kinds: KindRegistry,
        render: Rc<dyn Render>,
        subs: SubscriberSet,
    ) -> Rc<Self> {
        Rc::new_cyclic(|me| Self {
            store,
            kinds,
            render,
            subs,
            me: me.clone(),
            state: RefCell::new(SiteState {
                params: None,
                slot: None,
                active: None,
                teardown: Vec::new(),
                cancel: None,
                init_count: 0,
                ever_acquired: false,
                torn_down: false,
            }),
        })
    }

    /// Subscribes the site to the given kind and constructor arguments.
    ///
    /// Idempotent under identical-by-value repeated calls: no new handle is
    /// constructed unless the parameter descriptor changes structurally.
    ///
    /// ### Errors
    /// - [`SubscribeError::UnregisteredKind`] - no constructor for `kind`;
    ///   a programming error, raised before any handle is constructed.
    /// - [`SubscribeError::TornDown`] - the site was already torn down.
    pub fn subscribe(
        &self,
        kind: ResourceKind,
        args: Vec<serde_json::Value>,
    ) -> Result<(), SubscribeError> {
        let params = ParamSpec::new(kind, args);
        {
            let state = self.state.borrow();
            if state.torn_down {
                return Err(SubscribeError::TornDown);
            }
            if state.params.as_ref() == Some(&params) {
                return Ok(());
            }
        }
        if !self.kinds.supports(kind) {
            return Err(SubscribeError::UnregisteredKind(kind));
        }

        let slot = self.ensure_slot();
        let handle = self.kinds.construct(&slot, &params)?;
        self.state.borrow_mut().params = Some(params);
        self.on_params_changed(handle);
        Ok(())
    }

    /// Tears the site down: cancels any in-flight init, reclaims every handle
    /// ever constructed, and releases the slot key.
    ///
    /// Idempotent, and safe to call even if no init ever completed.
    pub fn teardown(&self) {
        let (token, handles, slot) = {
            let mut state = self.state.borrow_mut();
            if state.torn_down {
                return;
            }
            state.torn_down = true;
            let token = state.cancel.take();
            state.active = None;
            let handles: Vec<ResourceRef> = state.teardown.drain(..).collect();
            (token, handles, state.slot.take())
        };

        if let Some(token) = token {
            token.cancel();
        }
        for handle in handles {
            self.reclaim(handle, slot.as_ref());
        }
        if let Some(slot) = slot {
            self.store.release_id(&slot);
            self.subs
                .emit(&Event::new(EventKind::SlotReleased).with_slot(slot.as_str()));
            self.subs
                .emit(&Event::new(EventKind::SiteTornDown).with_slot(slot.as_str()));
        } else {
            self.subs.emit(&Event::new(EventKind::SiteTornDown));
        }
    }

    /// Computes the externally visible triple. Pure function of state,
    /// recomputed on every call.
    pub fn view(&self) -> View {
        let state = self.state.borrow();
        let ready = state.init_count > 0;
        let kind = state.params.as_ref().map(ParamSpec::kind);

        let data = match kind {
            _ if !ready => None,
            Some(k) if k.exposes_data() => state.active.as_ref().and_then(|h| h.read()),
            // Store-observed kinds go through the store's tracked access
            // primitive; a direct field read would bypass change detection.
            Some(_) => state
                .slot
                .as_ref()
                .and_then(|slot| self.store.scope(slot.as_str()).get()),
            None => None,
        };

        let handle = match (kind, state.params.as_ref()) {
            (Some(k), Some(params)) if k.is_query_family() => params
                .collection_path()
                .map(|path| self.store.scope(path)),
            (Some(_), _) if ready => state
                .slot
                .as_ref()
                .map(|slot| self.store.scope(slot.as_str())),
            _ => None,
        };

        View {
            data,
            handle,
            ready,
        }
    }

    /// Number of promotions so far; `view().ready` ⇔ `init_count() > 0`.
    pub fn init_count(&self) -> u64 {
        self.state.borrow().init_count
    }

    /// The site's slot key, if a subscription was ever made.
    pub fn slot(&self) -> Option<SlotKey> {
        self.state.borrow().slot.clone()
    }

    // ---------------------------
    // Internals
    // ---------------------------

    /// Allocates the slot key on first use.
    fn ensure_slot(&self) -> SlotKey {
        if let Some(slot) = self.state.borrow().slot.clone() {
            return slot;
        }
        let slot = self.store.fresh_id();
        self.state.borrow_mut().slot = Some(slot.clone());
        self.subs
            .emit(&Event::new(EventKind::SlotAllocated).with_slot(slot.as_str()));
        slot
    }

    /// Processes one parameter change with a freshly constructed handle.
    ///
    /// The caller (`subscribe`) guarantees the descriptor differs from the
    /// previous one.
    fn on_params_changed(&self, handle: ResourceRef) {
        let (first_for_slot, superseded) = {
            let mut state = self.state.borrow_mut();
            // Latest wins: an unfinished async init loses immediately. The
            // token stops its completion; the handle itself stays queued and
            // is reclaimed at the next promotion or at teardown.
            let superseded = state.cancel.take().map(|token| {
                token.cancel();
                state.active.clone()
            });
            let first = !state.ever_acquired;
            state.ever_acquired = true;
            state.teardown.push(Rc::clone(&handle));
            state.active = Some(Rc::clone(&handle));
            (first, superseded.flatten())
        };

        if let Some(prev) = superseded {
            prev.cancel();
            self.emit_for(EventKind::AcquireSuperseded, prev.kind());
        }
        self.emit_for(EventKind::AcquireStarted, handle.kind());

        match handle.begin(first_for_slot) {
            Acquisition::Ready => {
                // Fast path: no cancellation machinery. The visible re-render
                // is still deferred through the batching renderer.
                self.finish_init();
            }
            Acquisition::Pending(fut) => {
                let token = CancellationToken::new();
                self.state.borrow_mut().cancel = Some(token.clone());

                // Always succeeds while `&self` is alive.
                let Some(me) = self.me.upgrade() else {
                    return;
                };
                let kind = handle.kind();
                tokio::task::spawn_local(async move {
                    let result = fut.await;
                    if token.is_cancelled() {
                        // A newer init superseded this one and finishes on
                        // its own; the result - success or failure - is
                        // discarded, audibly.
                        let mut ev = me.event_for(EventKind::AcquireAbandoned, kind);
                        if let Err(err) = result {
                            ev = ev.with_reason(err.to_string());
                        }
                        me.subs.emit(&ev);
                        return;
                    }

                    me.state.borrow_mut().cancel = None;
                    match result {
                        Ok(()) => me.finish_init(),
                        Err(err) => {
                            // Expected under rapid resubscription races; log
                            // only, never propagate, never retry. The site
                            // stays not-ready.
                            let ev = me
                                .event_for(EventKind::AcquireFailed, kind)
                                .with_reason(err.to_string());
                            me.subs.emit(&ev);
                        }
                    }
                });
            }
        }
    }

    /// Promotes the newest handle: sweeps losing competitors, bumps the init
    /// counter, takes the store reference, and requests a re-render for
    /// data-exposing kinds.
    fn finish_init(&self) {
        let (stale, promoted, init_count, slot) = {
            let mut state = self.state.borrow_mut();
            let keep_from = state.teardown.len().saturating_sub(1);
            let stale: Vec<ResourceRef> = state.teardown.drain(..keep_from).collect();
            state.init_count += 1;
            (
                stale,
                state.active.clone(),
                state.init_count,
                state.slot.clone(),
            )
        };

        // Reclamation point for every losing competitor from this and prior
        // races.
        for handle in stale {
            self.reclaim(handle, slot.as_ref());
        }

        let Some(promoted) = promoted else {
            return;
        };
        promoted.ref_store_path();

        if promoted.kind().exposes_data() {
            // Store-observed kinds rely on the store's own reactivity.
            self.render.schedule();
        }

        let ev = self
            .event_for(EventKind::AcquireReady, promoted.kind())
            .with_init_count(init_count);
        self.subs.emit(&ev);
    }

    /// Unrefs and destroys one handle. Every handle the site ever constructed
    /// passes through here exactly once.
    fn reclaim(&self, handle: ResourceRef, slot: Option<&SlotKey>) {
        handle.unref_store_path();
        handle.destroy();

        let mut ev = Event::new(EventKind::HandleDestroyed).with_kind(handle.kind());
        if let Some(slot) = slot {
            ev = ev.with_slot(slot.as_str());
        }
        self.subs.emit(&ev);
    }

    fn emit_for(&self, kind: EventKind, resource: ResourceKind) {
        let ev = self.event_for(kind, resource);
        self.subs.emit(&ev);
    }

    /// Builds an event tagged with the site's slot. Late completions after
    /// teardown may find the slot gone; the event is emitted untagged then.
    fn event_for(&self, kind: EventKind, resource: ResourceKind) -> Event {
        let ev = Event::new(kind).with_kind(resource);
        match self.state.borrow().slot.clone() {
            Some(slot) => ev.with_slot(slot.as_str()),
            None => ev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;

    use serde_json::{Value, json};
    use tokio::sync::oneshot;
    use tokio::task::LocalSet;

    use crate::error::AcquireError;
    use crate::render::RenderBatch;
    use crate::resources::Resource;
    use crate::store::MemoryStore;
    use crate::subscribers::{AuditTracker, Subscribe};

    type Completion = oneshot::Receiver<Result<(), AcquireError>>;

    /// Counters shared between a fake handle and the test body.
    #[derive(Default)]
    struct Probe {
        began: Cell<u32>,
        cancels: Cell<u32>,
        refs: Cell<u32>,
        unrefs: Cell<u32>,
        destroys: Cell<u32>,
    }

    /// Instrumented resource handle. Synchronous unless pre-armed with a
    /// completion channel the test resolves by hand.
    struct FakeResource {
        kind: ResourceKind,
        data: Value,
        probe: Rc<Probe>,
        completion: RefCell<Option<Completion>>,
    }

    impl Resource for FakeResource {
        fn kind(&self) -> ResourceKind {
            self.kind
        }

        fn begin(&self, _first_for_slot: bool) -> Acquisition {
            self.probe.began.set(self.probe.began.get() + 1);
            match self.completion.borrow_mut().take() {
                None => Acquisition::Ready,
                Some(rx) => Acquisition::Pending(Box::pin(async move {
                    rx.await.unwrap_or(Err(AcquireError::Cancelled))
                })),
            }
        }

        fn cancel(&self) {
            self.probe.cancels.set(self.probe.cancels.get() + 1);
        }

        fn read(&self) -> Option<Value> {
            Some(self.data.clone())
        }

        fn ref_store_path(&self) {
            self.probe.refs.set(self.probe.refs.get() + 1);
        }

        fn unref_store_path(&self) {
            self.probe.unrefs.set(self.probe.unrefs.get() + 1);
        }

        fn destroy(&self) {
            self.probe.destroys.set(self.probe.destroys.get() + 1);
        }
    }

    /// Construction log plus pre-armed completions for async inits.
    #[derive(Default)]
    struct Handles {
        probes: Vec<Rc<Probe>>,
        completions: VecDeque<Completion>,
    }

    impl Handles {
        fn shared() -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self::default()))
        }

        fn probe(handles: &Rc<RefCell<Self>>, i: usize) -> Rc<Probe> {
            Rc::clone(&handles.borrow().probes[i])
        }

        fn count(handles: &Rc<RefCell<Self>>) -> usize {
            handles.borrow().probes.len()
        }
    }

    /// Registers a fake constructor for `kind`. Async when the harness holds
    /// a queued completion at construction time, sync otherwise.
    fn register_fake(
        kinds: KindRegistry,
        kind: ResourceKind,
        handles: &Rc<RefCell<Handles>>,
    ) -> KindRegistry {
        let handles = Rc::clone(handles);
        kinds.register(kind, move |_slot, params| {
            let probe = Rc::new(Probe::default());
            let mut h = handles.borrow_mut();
            h.probes.push(Rc::clone(&probe));
            Rc::new(FakeResource {
                kind: params.kind(),
                data: json!(params.args()),
                probe,
                completion: RefCell::new(h.completions.pop_front()),
            })
        })
    }

    /// Records every emitted event for assertions.
    struct Recorder(Rc<RefCell<Vec<Event>>>);

    impl Subscribe for Recorder {
        fn on_event(&self, event: &Event) {
            self.0.borrow_mut().push(event.clone());
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    fn arm(handles: &Rc<RefCell<Handles>>) -> oneshot::Sender<Result<(), AcquireError>> {
        let (tx, rx) = oneshot::channel();
        handles.borrow_mut().completions.push_back(rx);
        tx
    }

    fn seen(events: &Rc<RefCell<Vec<Event>>>, kind: EventKind) -> usize {
        events.borrow().iter().filter(|e| e.kind == kind).count()
    }

    /// Lets spawned local completions and batched renders run.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn query_site(
        handles: &Rc<RefCell<Handles>>,
        events: &Rc<RefCell<Vec<Event>>>,
    ) -> Rc<SiteController> {
        let kinds = register_fake(KindRegistry::new(), ResourceKind::Query, handles);
        SiteController::builder(MemoryStore::new())
            .with_kinds(kinds)
            .with_subscribers(vec![Rc::new(Recorder(Rc::clone(events)))])
            .build()
    }

    #[tokio::test]
    async fn test_sync_kind_ready_in_same_turn() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let kinds = register_fake(KindRegistry::new(), ResourceKind::Doc, &handles);
                let site = SiteController::builder(MemoryStore::new())
                    .with_kinds(kinds)
                    .build();

                site.subscribe(ResourceKind::Doc, vec![json!("users"), json!(7)])
                    .unwrap();

                // No suspension point: ready before anything is awaited.
                let view = site.view();
                assert!(view.ready);
                assert_eq!(view.data, Some(json!([json!("users"), json!(7)])));
                assert_eq!(Handles::probe(&handles, 0).cancels.get(), 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_identical_params_construct_no_second_handle() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let kinds = register_fake(KindRegistry::new(), ResourceKind::Doc, &handles);
                let site = SiteController::builder(MemoryStore::new())
                    .with_kinds(kinds)
                    .build();

                let args = || vec![json!("users"), json!({"id": 7})];
                site.subscribe(ResourceKind::Doc, args()).unwrap();
                site.subscribe(ResourceKind::Doc, args()).unwrap();
                assert_eq!(Handles::count(&handles), 1);

                site.subscribe(ResourceKind::Doc, vec![json!("users"), json!({"id": 8})])
                    .unwrap();
                assert_eq!(Handles::count(&handles), 2);
                assert_eq!(site.init_count(), 2);
            })
            .await;
    }

    #[tokio::test]
    async fn test_latest_wins_under_race() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let events = Rc::new(RefCell::new(Vec::new()));
                let tx1 = arm(&handles);
                let tx2 = arm(&handles);
                let site = query_site(&handles, &events);

                site.subscribe(ResourceKind::Query, vec![json!("t"), json!(1)])
                    .unwrap();
                site.subscribe(ResourceKind::Query, vec![json!("t"), json!(2)])
                    .unwrap();

                let slow = Handles::probe(&handles, 0);
                let fast = Handles::probe(&handles, 1);
                assert_eq!(slow.cancels.get(), 1, "superseded handle is signalled");
                assert!(!site.view().ready);

                // Newer init completes first and wins.
                tx2.send(Ok(())).unwrap();
                settle().await;
                assert_eq!(site.init_count(), 1);
                assert_eq!(site.view().data, Some(json!([json!("t"), json!(2)])));
                assert_eq!(slow.destroys.get(), 1, "loser reclaimed at promotion");
                assert_eq!(slow.unrefs.get(), 1);
                assert_eq!(fast.refs.get(), 1);

                // The slow init's late completion is a no-op.
                tx1.send(Ok(())).unwrap();
                settle().await;
                assert_eq!(site.init_count(), 1);
                assert_eq!(site.view().data, Some(json!([json!("t"), json!(2)])));
                assert_eq!(seen(&events, EventKind::AcquireAbandoned), 1);
                assert_eq!(seen(&events, EventKind::AcquireFailed), 0);

                site.teardown();
                assert_eq!(fast.destroys.get(), 1);
                assert_eq!(fast.unrefs.get(), 1);
            })
            .await;
    }

    #[tokio::test]
    async fn test_sync_change_supersedes_inflight_async() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let events = Rc::new(RefCell::new(Vec::new()));
                let tx = arm(&handles);
                let kinds = register_fake(KindRegistry::new(), ResourceKind::Query, &handles);
                let kinds = register_fake(kinds, ResourceKind::Doc, &handles);
                let site = SiteController::builder(MemoryStore::new())
                    .with_kinds(kinds)
                    .with_subscribers(vec![Rc::new(Recorder(Rc::clone(&events)))])
                    .build();

                site.subscribe(ResourceKind::Query, vec![json!("t")]).unwrap();
                site.subscribe(ResourceKind::Doc, vec![json!("users"), json!(1)])
                    .unwrap();

                // The sync successor promotes inline and sweeps the loser.
                assert_eq!(site.init_count(), 1);
                assert_eq!(site.view().data, Some(json!([json!("users"), json!(1)])));

                let stale = Handles::probe(&handles, 0);
                assert_eq!(stale.cancels.get(), 1);
                assert_eq!(stale.destroys.get(), 1);
                assert_eq!(stale.unrefs.get(), 1);
                assert_eq!(stale.refs.get(), 0, "never promoted, never ref'd");

                // The stale async completion must not re-promote.
                tx.send(Ok(())).unwrap();
                settle().await;
                assert_eq!(site.init_count(), 1);
                assert_eq!(site.view().data, Some(json!([json!("users"), json!(1)])));
                assert_eq!(seen(&events, EventKind::AcquireAbandoned), 1);
            })
            .await;
    }

    #[tokio::test]
    async fn test_no_leak_under_churn_then_teardown() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let events = Rc::new(RefCell::new(Vec::new()));
                let _tx1 = arm(&handles);
                let _tx2 = arm(&handles);
                let tx3 = arm(&handles);

                let audit = Rc::new(AuditTracker::new());
                let kinds = register_fake(KindRegistry::new(), ResourceKind::Query, &handles);
                let site = SiteController::builder(MemoryStore::new())
                    .with_kinds(kinds)
                    .with_subscribers(vec![
                        audit.clone() as Rc<dyn Subscribe>,
                        Rc::new(Recorder(Rc::clone(&events))),
                    ])
                    .build();

                for i in 0..3 {
                    site.subscribe(ResourceKind::Query, vec![json!("t"), json!(i)])
                        .unwrap();
                }
                tx3.send(Ok(())).unwrap();
                settle().await;
                assert!(site.view().ready);

                site.teardown();
                settle().await;

                for i in 0..Handles::count(&handles) {
                    let probe = Handles::probe(&handles, i);
                    assert_eq!(probe.destroys.get(), 1, "handle {i} destroyed exactly once");
                    assert_eq!(probe.unrefs.get(), 1, "handle {i} unref'd exactly once");
                    assert!(probe.refs.get() <= 1);
                }
                // Only the promoted handle ever took a store reference.
                assert_eq!(Handles::probe(&handles, 2).refs.get(), 1);
                assert!(audit.leaking().is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn test_unregistered_kind_fails_fast() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let kinds = register_fake(KindRegistry::new(), ResourceKind::Query, &handles);
                let site = SiteController::builder(MemoryStore::new())
                    .with_kinds(kinds)
                    .build();

                let err = site
                    .subscribe(ResourceKind::Api, vec![json!("ping")])
                    .unwrap_err();
                assert_eq!(err, SubscribeError::UnregisteredKind(ResourceKind::Api));
                assert_eq!(Handles::count(&handles), 0, "no half-constructed handle");
                assert!(site.slot().is_none(), "no state mutated");
                assert!(!site.view().ready);
            })
            .await;
    }

    #[tokio::test]
    async fn test_superseded_rejection_is_observable() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let events = Rc::new(RefCell::new(Vec::new()));
                let tx1 = arm(&handles);
                let tx2 = arm(&handles);
                let site = query_site(&handles, &events);

                site.subscribe(ResourceKind::Query, vec![json!(1)]).unwrap();
                site.subscribe(ResourceKind::Query, vec![json!(2)]).unwrap();

                tx1.send(Err(AcquireError::Failed("boom".into()))).unwrap();
                settle().await;

                // Not silent, but not a failure either: the rejection arrived
                // after supersession.
                assert_eq!(seen(&events, EventKind::AcquireAbandoned), 1);
                assert_eq!(seen(&events, EventKind::AcquireFailed), 0);
                let reason = events.borrow().iter()
                    .find(|e| e.kind == EventKind::AcquireAbandoned)
                    .and_then(|e| e.reason.clone());
                assert!(reason.unwrap().contains("boom"));

                // The superseding handle still promotes normally.
                tx2.send(Ok(())).unwrap();
                settle().await;
                assert!(site.view().ready);
            })
            .await;
    }

    #[tokio::test]
    async fn test_genuine_failure_absorbed_site_stays_not_ready() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let events = Rc::new(RefCell::new(Vec::new()));
                let tx = arm(&handles);
                let site = query_site(&handles, &events);

                site.subscribe(ResourceKind::Query, vec![json!("t")]).unwrap();
                tx.send(Err(AcquireError::Failed("permission denied".into())))
                    .unwrap();
                settle().await;

                assert_eq!(seen(&events, EventKind::AcquireFailed), 1);
                assert!(!site.view().ready, "failure never surfaces as ready");
                assert_eq!(site.init_count(), 0);

                // The failed handle is still reclaimed at teardown.
                site.teardown();
                assert_eq!(Handles::probe(&handles, 0).destroys.get(), 1);
            })
            .await;
    }

    #[tokio::test]
    async fn test_same_turn_promotions_render_once() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let renders = Rc::new(Cell::new(0u32));
                let render = RenderBatch::new({
                    let renders = renders.clone();
                    move || renders.set(renders.get() + 1)
                });

                let kinds = register_fake(KindRegistry::new(), ResourceKind::Doc, &handles);
                let site = SiteController::builder(MemoryStore::new())
                    .with_kinds(kinds)
                    .with_render(render)
                    .build();

                // Two sync promotions within one logical tick.
                site.subscribe(ResourceKind::Doc, vec![json!(1)]).unwrap();
                site.subscribe(ResourceKind::Doc, vec![json!(2)]).unwrap();
                assert_eq!(renders.get(), 0, "re-render is deferred");

                settle().await;
                assert_eq!(renders.get(), 1, "batched into a single notification");
            })
            .await;
    }

    #[tokio::test]
    async fn test_teardown_idempotent_and_safe_before_init() {
        LocalSet::new()
            .run_until(async {
                let site = SiteController::builder(MemoryStore::new()).build();

                site.teardown();
                site.teardown();
                assert!(!site.view().ready);

                let err = site
                    .subscribe(ResourceKind::Local, vec![json!(null)])
                    .unwrap_err();
                assert_eq!(err, SubscribeError::TornDown);
            })
            .await;
    }

    #[tokio::test]
    async fn test_teardown_with_inflight_init() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let events = Rc::new(RefCell::new(Vec::new()));
                let tx = arm(&handles);
                let site = query_site(&handles, &events);

                site.subscribe(ResourceKind::Query, vec![json!("t")]).unwrap();
                site.teardown();

                let probe = Handles::probe(&handles, 0);
                assert_eq!(probe.destroys.get(), 1);
                assert_eq!(probe.unrefs.get(), 1);

                // The completion arrives after the site is gone: discarded.
                tx.send(Ok(())).unwrap();
                settle().await;
                assert_eq!(site.init_count(), 0);
                assert_eq!(seen(&events, EventKind::AcquireAbandoned), 1);
                assert_eq!(seen(&events, EventKind::AcquireReady), 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_threads_query_scenario() {
        LocalSet::new()
            .run_until(async {
                let handles = Handles::shared();
                let events = Rc::new(RefCell::new(Vec::new()));
                let tx_open = arm(&handles);
                let tx_closed = arm(&handles);
                let site = query_site(&handles, &events);

                site.subscribe(
                    ResourceKind::Query,
                    vec![json!("threads"), json!({"status": "open"})],
                )
                .unwrap();
                assert!(!site.view().ready);

                // Params change before the previous init resolves.
                site.subscribe(
                    ResourceKind::Query,
                    vec![json!("threads"), json!({"status": "closed"})],
                )
                .unwrap();
                tx_closed.send(Ok(())).unwrap();
                settle().await;

                let view = site.view();
                assert!(view.ready);
                assert_eq!(
                    view.data,
                    Some(json!([json!("threads"), json!({"status": "closed"})]))
                );
                assert_eq!(view.handle.unwrap().path(), "threads");

                let open = Handles::probe(&handles, 0);
                assert_eq!(open.destroys.get(), 1);
                assert_eq!(open.unrefs.get(), 1);
                assert!(open.refs.get() <= 1);

                drop(tx_open); // slow init never resolves; nothing hangs
                settle().await;
                assert_eq!(site.view().data,
                    Some(json!([json!("threads"), json!({"status": "closed"})])));
            })
            .await;
    }

    #[tokio::test]
    async fn test_store_observed_kind_reads_through_store() {
        LocalSet::new()
            .run_until(async {
                let store = MemoryStore::new();
                let kinds = KindRegistry::new().register(ResourceKind::Local, {
                    let store = store.clone();
                    move |slot, params| crate::resources::LocalState::construct(
                        store.clone(), slot, params,
                    )
                });
                let site = SiteController::builder(store.clone())
                    .with_kinds(kinds)
                    .build();

                site.subscribe(ResourceKind::Local, vec![json!({"count": 0})])
                    .unwrap();
                let slot = site.slot().unwrap();

                let before = store.tracked_reads();
                let view = site.view();
                assert!(view.ready);
                assert_eq!(view.data, Some(json!({"count": 0})));
                assert!(store.tracked_reads() > before, "read must be tracked");
                assert_eq!(view.handle.unwrap().path(), slot.as_str());

                site.teardown();
                assert!(!store.id_live(&slot), "slot key released");
                assert!(store.scope(slot.as_str()).get().is_none());
            })
            .await;
    }
}
