//! Errors raised by emitter operations.
//!
//! Every error is returned synchronously from the offending call. Emitting
//! to nobody, removing a listener that is not registered, and querying an
//! unknown event are not errors.

use crate::event::is_global;
use thiserror::Error;

pub type Result<T, E = EmitterError> = std::result::Result<T, E>;

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitterError {
    /// `emit_static_id` was called with an empty id.
    #[error("missing id for static emission of event \"{event}\"")]
    MissingId {
        /// The event that was being emitted.
        event: String,
    },

    /// `rpc`/`rpc_id` found no listener to answer.
    #[error("{}", no_responder_message(.event, .id))]
    NoResponder {
        /// The event that was called.
        event: String,
        /// The scope id of the call (`"*"` for `rpc`).
        id: String,
    },
}

fn no_responder_message(event: &str, id: &str) -> String {
    if is_global(id) {
        format!(
            "cannot make an rpc call to event \"{event}\" without a listener; \
             register one with on(\"{event}\", ..)"
        )
    } else {
        format!(
            "cannot make an rpc call to event \"{event}\" and id \"{id}\" without a listener; \
             register one with on_id(\"{event}\", \"{id}\", ..)"
        )
    }
}

impl EmitterError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use emitkit::EmitterError;
    ///
    /// let err = EmitterError::MissingId { event: "loaded".into() };
    /// assert_eq!(err.as_label(), "emitter_missing_id");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::MissingId { .. } => "emitter_missing_id",
            EmitterError::NoResponder { .. } => "emitter_no_responder",
        }
    }
}
