//! Named-event emitter.
//!
//! Listeners are registered against an event name and optionally a scope
//! id. Emissions reach the listeners of their id first, then the global
//! ones, and gather every listener's [`Reply`]. On top of that: one-shot and
//! limited listeners, replay of "static" emissions to late subscribers,
//! debounced emission, and cancellation of an emission by any listener.
//!
//! ```
//! use emitkit::{Emitter, Reply, from_fn};
//!
//! let emitter: Emitter<u32, &str> = Emitter::new();
//! emitter
//!     .on("save", from_fn(|_: &u32| "global"))
//!     .on_id("save", "doc-1", from_fn(|n: &u32| {
//!         if *n > 10 { Reply::Cancel } else { Reply::Value("doc-1") }
//!     }));
//!
//! let replies = emitter.emit_id("save", "doc-1", 1);
//! assert_eq!(replies.into_values(), vec!["doc-1", "global"]);
//!
//! assert!(emitter.emit_id("save", "doc-1", 99).did_cancel());
//! ```

mod config;
mod defer;
mod emission;
mod emit_barrier;
mod emitter;
mod error;
mod event;
mod ledger;
mod listener;
mod mixin;
mod registry;
mod reply;
mod wait_group;

pub use {
    config::{Config, DeferSwitch},
    emission::{Emission, did_cancel},
    emitter::Emitter,
    error::{EmitterError, Result},
    event::{GLOBAL, Payload},
    listener::*,
    mixin::{AsEmitter, Evented, make_emitter},
    reply::Reply,
};
