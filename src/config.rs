//! # Emitter configuration.
//!
//! [`Config`] sets the delays used for scheduled work, the tokio runtime
//! that work is spawned on, and carries the [`DeferSwitch`] that decides
//! whether `defer_emit` debounces at all.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use emitkit::{Config, DeferSwitch, Emitter};
//!
//! // Two emitters owned by the same collaborator share one switch.
//! let switch = DeferSwitch::default();
//! let mut cfg = Config::default();
//! cfg.defer_delay = Duration::from_millis(50);
//! cfg.defer = switch.clone();
//!
//! let users: Emitter<String> = Emitter::with_config(cfg.clone());
//! let orders: Emitter<u64> = Emitter::with_config(cfg);
//!
//! switch.disable();
//! assert!(!users.config().defer.is_enabled());
//! assert!(!orders.config().defer.is_enabled());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;

/// Settings of one [`Emitter`](crate::Emitter).
#[derive(Clone, Debug)]
pub struct Config {
    /// Debounce window of `defer_emit`.
    pub defer_delay: Duration,
    /// Delay before a static emission is replayed to a late listener.
    pub replay_delay: Duration,
    /// Whether `defer_emit` debounces or emits right away.
    pub defer: DeferSwitch,
    /// Runtime for static replays and deferred emissions. When unset, the
    /// emitter binds to the runtime it is created in, if any.
    pub runtime: Option<Handle>,
}

impl Default for Config {
    /// - `defer_delay = 1ms`
    /// - `replay_delay = 1ms`
    /// - `defer` enabled
    /// - `runtime` unset
    fn default() -> Self {
        Self {
            defer_delay: Duration::from_millis(1),
            replay_delay: Duration::from_millis(1),
            defer: DeferSwitch::default(),
            runtime: None,
        }
    }
}

/// Shared on/off flag for deferred emission.
///
/// Clones observe the same flag.
#[derive(Clone, Debug)]
pub struct DeferSwitch(Arc<AtomicBool>);

impl DeferSwitch {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn enable(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn disable(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for DeferSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}
