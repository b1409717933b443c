/// Scope id of listeners and emissions that are not tied to a specific id.
pub const GLOBAL: &str = "*";

pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}

#[inline]
pub(crate) fn is_global(id: &str) -> bool {
    id == GLOBAL
}

/// Whether a recorded emission scoped to `recorded` should replay to a listener scoped to `listener`.
#[inline]
pub(crate) fn scopes_match(recorded: &str, listener: &str) -> bool {
    is_global(recorded) || is_global(listener) || recorded == listener
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_matches_every_scope() {
        assert!(scopes_match(GLOBAL, "doc-1"));
        assert!(scopes_match("doc-1", GLOBAL));
        assert!(scopes_match("doc-1", "doc-1"));
        assert!(!scopes_match("doc-1", "doc-2"));
    }
}
