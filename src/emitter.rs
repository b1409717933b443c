use crate::config::Config;
use crate::defer::DeferTable;
use crate::emit_barrier::EmitBarrier;
use crate::event::{GLOBAL, Payload};
use crate::ledger::Ledger;
use crate::listener::{Listener, WithTimes};
use crate::registry::{Registry, Removal};
use crate::wait_group::WaitGroup;
use crate::{Emission, EmitterError, Reply, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, trace, warn};

struct State<A, R> {
    registry: Registry<A, R>,
    ledger: Ledger<A>,
    barrier: EmitBarrier,
}

struct Inner<A, R> {
    state: Mutex<State<A, R>>,
    timers: DeferTable,
    scheduled: WaitGroup,
    runtime: Option<Handle>,
    config: Config,
}

impl<A, R> Inner<A, R> {
    fn new(config: Config) -> Self {
        Self {
            state: Mutex::new(State {
                registry: Registry::default(),
                ledger: Ledger::default(),
                barrier: EmitBarrier::default(),
            }),
            timers: DeferTable::default(),
            scheduled: WaitGroup::default(),
            runtime: config.runtime.clone().or_else(|| Handle::try_current().ok()),
            config,
        }
    }

    /// The runtime scheduled work goes to: the one bound at construction,
    /// else the caller's.
    fn runtime(&self) -> Option<Handle> {
        self.runtime.clone().or_else(|| Handle::try_current().ok())
    }

    fn remove(&self, removal: Removal) {
        let mut state = self.state.lock();
        match state.barrier.hold(removal) {
            Some(removal) => {
                let removed = state.registry.remove(&removal);
                trace!(?removal, removed, "listeners removed");
            }
            None => trace!(queued = state.barrier.queued(), "removal queued behind dispatch"),
        }
    }

    /// Snapshots the listeners reached by `(event, id)` and marks a dispatch
    /// as running until the returned guard drops.
    fn begin_dispatch(&self, event: &str, id: &str) -> (Vec<Listener<A, R>>, Dispatching<'_, A, R>) {
        let mut state = self.state.lock();
        state.barrier.enter();
        let order = state.registry.dispatch_order(event, id);
        (order, Dispatching(self))
    }
}

impl<A, R> Drop for Inner<A, R> {
    fn drop(&mut self) {
        self.timers.cancel_all();
    }
}

/// Leaves the dispatch on drop, unwinding included, and applies the removals
/// queued while it ran.
struct Dispatching<'a, A, R>(&'a Inner<A, R>);

impl<A, R> Drop for Dispatching<'_, A, R> {
    fn drop(&mut self) {
        let mut state = self.0.state.lock();
        for removal in state.barrier.leave() {
            let removed = state.registry.remove(&removal);
            trace!(?removal, removed, "queued removal applied");
        }
    }
}

/// A named-event emitter.
///
/// Listeners are registered per event name and scope id; [`GLOBAL`] listeners
/// hear every emission of their event, id-scoped listeners only emissions
/// for their id. `A` is the argument type handed to every listener and `R`
/// what listeners return.
///
/// `Emitter` is a handle: clones share the same registry. Scheduled work
/// (static replays, deferred emissions) runs on [`Config::runtime`], or on
/// the runtime the emitter was created in, so handles moved to plain threads
/// keep scheduling there.
pub struct Emitter<A, R = ()> {
    inner: Arc<Inner<A, R>>,
}

impl<A: Payload, R: Send + 'static> Emitter<A, R> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            inner: Arc::new(Inner::new(config)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Registers a global listener for `event`.
    pub fn on(&self, event: &str, listener: Listener<A, R>) -> &Self {
        self.on_id(event, GLOBAL, listener)
    }

    /// Registers `listener` for `event` emissions scoped to `id`.
    ///
    /// Static emissions already recorded for `event` whose scope matches are
    /// replayed to the new listener on a later turn, never inside this call.
    pub fn on_id(&self, event: &str, id: &str, listener: Listener<A, R>) -> &Self {
        let replays = {
            let mut state = self.inner.state.lock();
            state.registry.add(event, id, listener.clone());
            state.ledger.replays_for(event, id)
        };
        trace!(event, id, key = ?listener.key(), "listener registered");

        for args in replays {
            self.schedule_replay(event, id, listener.clone(), args);
        }
        self
    }

    /// Registers a global listener that runs at most once.
    ///
    /// Once it has run, the listener is skipped: later emissions that reach it
    /// get no entry for it in their [`Emission`], even while its removal is
    /// still queued behind a running dispatch.
    pub fn once(&self, event: &str, listener: Listener<A, R>) -> &Self {
        self.many_id(event, GLOBAL, 1, listener)
    }

    pub fn once_id(&self, event: &str, id: &str, listener: Listener<A, R>) -> &Self {
        self.many_id(event, id, 1, listener)
    }

    /// Registers a global listener that runs at most `times` times.
    ///
    /// # Panics
    /// Panics if `times` is zero.
    pub fn many(&self, event: &str, times: usize, listener: Listener<A, R>) -> &Self {
        self.many_id(event, GLOBAL, times, listener)
    }

    /// Registers `listener` for `(event, id)` for at most `times` calls.
    ///
    /// The wrapper keeps the listener's identity, so `off_id` with the
    /// original handle removes it. It deregisters itself when its last call
    /// is admitted.
    ///
    /// # Panics
    /// Panics if `times` is zero.
    pub fn many_id(&self, event: &str, id: &str, times: usize, listener: Listener<A, R>) -> &Self {
        let key = listener.key();
        let removal = Removal::Listener {
            event: event.to_owned(),
            id: id.to_owned(),
            key,
        };
        let emitter = Arc::downgrade(&self.inner);
        let limited = WithTimes::new(times, listener, move || {
            if let Some(inner) = emitter.upgrade() {
                inner.remove(removal.clone());
            }
        });

        self.on_id(event, id, Listener::with_key(key, limited))
    }

    /// Makes `listener` the only global listener of `event`.
    ///
    /// Id-scoped listeners of `event` are kept.
    pub fn overwrite(&self, event: &str, listener: Listener<A, R>) -> &Self {
        self.overwrite_id(event, GLOBAL, listener)
    }

    /// Makes `listener` the only listener of the `(event, id)` bucket.
    pub fn overwrite_id(&self, event: &str, id: &str, listener: Listener<A, R>) -> &Self {
        {
            let mut state = self.inner.state.lock();
            if state.barrier.is_emitting() {
                // Queue the current entries one by one so the replacement
                // registered below survives the flush.
                for key in state.registry.keys(event, id) {
                    let _ = state.barrier.hold(Removal::Listener {
                        event: event.to_owned(),
                        id: id.to_owned(),
                        key,
                    });
                }
            } else {
                state.registry.remove(&Removal::Bucket {
                    event: event.to_owned(),
                    id: id.to_owned(),
                });
            }
        }
        self.on_id(event, id, listener)
    }

    /// Removes the first global registration of `listener`.
    pub fn off(&self, event: &str, listener: &Listener<A, R>) -> &Self {
        self.off_id(event, GLOBAL, listener)
    }

    /// Removes the first registration of `listener` under `(event, id)`.
    pub fn off_id(&self, event: &str, id: &str, listener: &Listener<A, R>) -> &Self {
        self.inner.remove(Removal::Listener {
            event: event.to_owned(),
            id: id.to_owned(),
            key: listener.key(),
        });
        self
    }

    /// Removes every listener of `event`, global and id-scoped.
    pub fn clear(&self, event: &str) -> &Self {
        self.inner.remove(Removal::Event {
            event: event.to_owned(),
        });
        self
    }

    /// Removes every listener of the `(event, id)` bucket.
    pub fn clear_id(&self, event: &str, id: &str) -> &Self {
        self.inner.remove(Removal::Bucket {
            event: event.to_owned(),
            id: id.to_owned(),
        });
        self
    }

    /// Calls the global listeners of `event` in registration order.
    pub fn emit(&self, event: &str, args: A) -> Emission<R> {
        self.dispatch(event, GLOBAL, &args)
    }

    /// Calls the listeners scoped to `id`, then the global ones.
    ///
    /// Stops at the first listener returning [`Reply::Cancel`]. A panicking
    /// listener propagates out of this call and the listeners after it do
    /// not run.
    pub fn emit_id(&self, event: &str, id: &str, args: A) -> Emission<R> {
        self.dispatch(event, id, &args)
    }

    fn dispatch(&self, event: &str, id: &str, args: &A) -> Emission<R> {
        let (order, _dispatching) = self.inner.begin_dispatch(event, id);
        trace!(event, id, listeners = order.len(), "dispatching");

        let mut replies = Vec::with_capacity(order.len());
        for listener in &order {
            let Some(reply) = listener.invoke(args) else {
                continue;
            };
            let cancelled = reply.is_cancel();
            replies.push(reply);
            if cancelled {
                trace!(event, id, "emission cancelled by listener");
                break;
            }
        }

        Emission::new(replies)
    }

    /// Calls only the first global listener of `event` and returns its reply.
    pub fn rpc(&self, event: &str, args: A) -> Result<Reply<R>> {
        self.rpc_id(event, GLOBAL, args)
    }

    /// Calls only the first listener reached by `(event, id)`: the id's own
    /// bucket first, the global bucket otherwise.
    pub fn rpc_id(&self, event: &str, id: &str, args: A) -> Result<Reply<R>> {
        let (order, _dispatching) = self.inner.begin_dispatch(event, id);

        for listener in &order {
            if let Some(reply) = listener.invoke(&args) {
                return Ok(reply);
            }
        }

        let err = EmitterError::NoResponder {
            event: event.to_owned(),
            id: id.to_owned(),
        };
        debug!(event, id, label = err.as_label(), "rpc without responder");
        Err(err)
    }

    /// Emits to the global listeners and records the emission so listeners
    /// registered later still receive it.
    pub fn emit_static(&self, event: &str, args: A) -> &Self {
        self.dispatch_static(event, GLOBAL, args);
        self
    }

    /// Like [`emit_static`](Self::emit_static), scoped to `id`.
    ///
    /// # Errors
    /// [`EmitterError::MissingId`] if `id` is empty.
    pub fn emit_static_id(&self, event: &str, id: &str, args: A) -> Result<&Self> {
        if id.is_empty() {
            return Err(EmitterError::MissingId {
                event: event.to_owned(),
            });
        }
        self.dispatch_static(event, id, args);
        Ok(self)
    }

    fn dispatch_static(&self, event: &str, id: &str, args: A) {
        let args = Arc::new(args);
        self.dispatch(event, id, &args);
        self.inner.state.lock().ledger.record(event, id, args);
        debug!(event, id, "static emission recorded");
    }

    /// Forgets the static emissions recorded for `event`.
    pub fn cancel_static(&self, event: &str) -> &Self {
        let cancelled = self.inner.state.lock().ledger.cancel(event);
        debug!(event, cancelled, "static emissions cancelled");
        self
    }

    /// Whether `emit(event, ..)` would reach at least one listener.
    ///
    /// Spent `once`/`many` listeners do not count.
    pub fn will_emit(&self, event: &str) -> bool {
        self.will_emit_id(event, GLOBAL)
    }

    /// Whether `emit_id(event, id, ..)` would reach at least one listener.
    pub fn will_emit_id(&self, event: &str, id: &str) -> bool {
        self.inner.state.lock().registry.reaches(event, id)
    }

    /// Emits `event` after the debounce window.
    ///
    /// A later call for the same event within the window replaces this one:
    /// only the latest arguments are emitted. With deferral disabled (see
    /// [`DeferSwitch`](crate::DeferSwitch)) the emission happens right away.
    pub fn defer_emit(&self, event: &str, args: A) -> &Self {
        if !self.inner.config.defer.is_enabled() {
            self.emit(event, args);
            return self;
        }
        let Some(runtime) = self.inner.runtime() else {
            warn!(event, "no tokio runtime to defer on; emitting now");
            self.emit(event, args);
            return self;
        };

        let token = self.inner.timers.arm(event);
        let delay = self.inner.config.defer_delay;
        let emitter = Arc::downgrade(&self.inner);
        let guard = self.inner.scheduled.add();
        let event = event.to_owned();
        debug!(event = %event, ?delay, "emission deferred");

        runtime.spawn(async move {
            let _guard = guard;
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    trace!(event = %event, "deferred emission superseded");
                }
                _ = tokio::time::sleep(delay) => {
                    token.cancel();
                    if let Some(inner) = emitter.upgrade() {
                        Emitter { inner }.emit(&event, args);
                    }
                }
            }
        });
        self
    }

    /// Whether a deferred emission of `event` is waiting for its timer.
    pub fn is_deferred(&self, event: &str) -> bool {
        self.inner.timers.is_pending(event)
    }

    /// Whether a dispatch is running right now.
    pub fn is_emitting(&self) -> bool {
        self.inner.state.lock().barrier.is_emitting()
    }

    pub fn listener_count(&self, event: &str, id: &str) -> usize {
        self.inner.state.lock().registry.bucket(event, id).len()
    }

    pub fn static_count(&self, event: &str) -> usize {
        self.inner.state.lock().ledger.len(event)
    }

    /// Scheduled replays and deferred emissions not finished yet.
    pub fn scheduled_count(&self) -> usize {
        self.inner.scheduled.pending()
    }

    /// Waits until every scheduled replay and deferred emission has run or
    /// been superseded.
    pub async fn drain(&self) {
        self.inner.scheduled.wait().await;
    }

    fn schedule_replay(&self, event: &str, id: &str, listener: Listener<A, R>, args: Arc<A>) {
        let Some(runtime) = self.inner.runtime() else {
            warn!(event, id, "no tokio runtime to replay on; static replay skipped");
            return;
        };

        let delay = self.inner.config.replay_delay;
        let guard = self.inner.scheduled.add();
        debug!(event, id, ?delay, "static replay scheduled");

        runtime.spawn(async move {
            let _guard = guard;
            tokio::time::sleep(delay).await;
            listener.invoke(&args);
        });
    }
}

impl<A: Payload, R: Send + 'static> Default for Emitter<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> Clone for Emitter<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> fmt::Debug for Emitter<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
