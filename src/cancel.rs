//! Cancellation token for superseded color resolutions.

use std::cell::Cell;
use std::rc::Rc;

/// Shared flag flipped once when a pending resolution is superseded or torn down.
///
/// Clones observe the same flag. Single-threaded: resolutions run on one
/// executor, so `Rc<Cell<_>>` is enough.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
        // idempotent
        token.cancel();
        assert!(token.is_cancelled());
    }
}
