//! Cooperative cancellation for step-wise searches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared stop flag for a running search.
///
/// A UI keeps one clone and hands another to the search. The search reads
/// the flag once at the top of every step, before popping the next frontier
/// entry, so a cancellation requested mid-animation takes effect on the next
/// step and never leaves an expansion half applied.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stop was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Ask every search holding a clone of this token to stop.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Clear the flag so the token can drive another search. Searches that
    /// already stopped stay cancelled.
    #[inline]
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_flag() {
        let token = CancelToken::new();
        let held = token.clone();
        assert!(!held.is_cancelled());
        token.cancel();
        assert!(held.is_cancelled());
    }

    #[test]
    fn reset_rearms() {
        let token = CancelToken::new();
        token.cancel();
        token.reset();
        assert!(!token.clone().is_cancelled());
    }
}
