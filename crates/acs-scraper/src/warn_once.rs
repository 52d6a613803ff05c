//! De-duplicating front for `tracing` warnings and errors.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct WarnOnce {
    seen: Mutex<HashSet<(String, String)>>,
}

impl WarnOnce {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a warning unless this `(scope, message)` pair was already logged.
    /// Returns whether anything was emitted.
    pub fn warn(&self, scope: &str, message: &str) -> bool {
        let first = self.first_time(scope, message);
        if first {
            tracing::warn!(scope, "{message}");
        }
        first
    }

    /// Same as [`Self::warn`] at error level. Shares the seen-set with `warn`.
    pub fn error(&self, scope: &str, message: &str) -> bool {
        let first = self.first_time(scope, message);
        if first {
            tracing::error!(scope, "{message}");
        }
        first
    }

    fn first_time(&self, scope: &str, message: &str) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((scope.to_owned(), message.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_pair_is_emitted_once() {
        let log = WarnOnce::new();
        assert!(log.warn("home", "upstream down"));
        assert!(!log.warn("home", "upstream down"));
        assert!(!log.error("home", "upstream down"));
    }

    #[test]
    fn distinct_scope_or_message_is_emitted() {
        let log = WarnOnce::new();
        assert!(log.warn("home", "upstream down"));
        assert!(log.warn("standings", "upstream down"));
        assert!(log.warn("home", "parse failed"));
    }
}
