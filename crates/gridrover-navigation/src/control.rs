//! Run guard and cooperative cancellation.
//!
//! Exactly one command sequence may be in flight. A [`RunGuard`] is a cheap
//! shared handle: the interpreter acquires a [`RunTicket`] from it before it
//! starts moving, and any holder of a clone can request cancellation. The
//! interpreter only looks at the cancel flag between primitives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::error::NavigationError;

#[derive(Debug, Default)]
struct GuardState {
    busy: AtomicBool,
    cancel: AtomicBool,
}

/// Shared busy flag and cancellation request.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    state: Arc<GuardState>,
}

impl RunGuard {
    /// Creates an idle guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a sequence as in flight.
    ///
    /// Clears any stale cancellation request left over from a previous run.
    ///
    /// # Errors
    ///
    /// Returns `Err(NavigationError::Busy)` if another sequence holds the guard.
    pub fn try_acquire(&self) -> Result<RunTicket, NavigationError> {
        if self
            .state
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(NavigationError::Busy);
        }
        self.state.cancel.store(false, Ordering::Release);
        debug!("Run guard acquired");
        Ok(RunTicket { guard: self.clone() })
    }

    /// Whether a sequence is in flight.
    pub fn is_busy(&self) -> bool {
        self.state.busy.load(Ordering::Acquire)
    }

    /// Asks the running sequence to stop at the next primitive boundary.
    /// Has no effect on an idle guard beyond being cleared by the next acquire.
    pub fn cancel(&self) {
        info!("Cancellation requested");
        self.state.cancel.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.state.cancel.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns the in-flight slot. Releases it on drop.
#[derive(Debug)]
pub struct RunTicket {
    guard: RunGuard,
}

impl RunTicket {
    /// Whether cancellation has been requested for this run.
    pub fn is_cancelled(&self) -> bool {
        self.guard.is_cancelled()
    }
}

impl Drop for RunTicket {
    fn drop(&mut self) {
        self.guard.state.busy.store(false, Ordering::Release);
        debug!("Run guard released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_busy() {
        let guard = RunGuard::new();
        let ticket = guard.try_acquire().unwrap();
        assert!(guard.is_busy());
        assert_eq!(guard.clone().try_acquire().unwrap_err(), NavigationError::Busy);
        drop(ticket);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_ok());
    }

    #[test]
    fn test_cancel_visible_through_ticket() {
        let guard = RunGuard::new();
        let ticket = guard.try_acquire().unwrap();
        assert!(!ticket.is_cancelled());
        guard.clone().cancel();
        assert!(ticket.is_cancelled());
    }

    #[test]
    fn test_acquire_clears_stale_cancel() {
        let guard = RunGuard::new();
        guard.cancel();
        let ticket = guard.try_acquire().unwrap();
        assert!(!ticket.is_cancelled());
    }

    #[test]
    fn test_guard_shared_across_threads() {
        let guard = RunGuard::new();
        let _ticket = guard.try_acquire().unwrap();
        let other = guard.clone();
        let result = std::thread::spawn(move || other.try_acquire().map(|_| ())).join().unwrap();
        assert_eq!(result, Err(NavigationError::Busy));
    }
}
