// Per-session "turn in flight" flag

use std::sync::atomic::{AtomicBool, Ordering};

/// Holds the session's turn flag; clears it when dropped.
///
/// Dropping covers every exit path: early return, error, panic unwinding and
/// a cancelled future.
#[derive(Debug)]
pub struct TurnGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> TurnGuard<'a> {
    /// Set the flag, or `None` if another turn already holds it.
    pub fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_release() {
        let flag = AtomicBool::new(false);
        let guard = TurnGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(TurnGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(TurnGuard::acquire(&flag).is_some());
    }
}
