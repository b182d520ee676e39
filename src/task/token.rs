//! Cooperative cancellation token.
//!
//! A [`CancelToken`] is the interruption flag shared between a running task
//! and whoever may want to stop it. The task polls it at checkpoints
//! ([`CancelToken::checkpoint`]) or parks on it ([`CancelToken::sleep`]); the
//! canceller flips it with [`CancelToken::cancel`]. Once set, the flag never
//! clears.
//!
//! The flag itself is an `AtomicBool` so checkpoints in tight loops stay a
//! single load. The mutex/condvar pair exists only so that an interruptible
//! sleep can be woken immediately instead of at its deadline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::Interrupted;

struct TokenInner {
    cancelled: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Shared interruption flag. Cloning yields another view of the same flag.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                lock: Mutex::new(()),
                wake: Condvar::new(),
            }),
        }
    }

    /// Request cancellation and wake every thread parked in [`sleep`](Self::sleep).
    ///
    /// Idempotent; calling it more than once has no further effect.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        // Taking the lock orders the store against a sleeper that has checked
        // the flag but not yet parked, so the notification cannot be lost.
        let _guard = self.inner.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.inner.wake.notify_all();
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// A checkpoint: `Err(Interrupted)` if cancellation has been requested.
    ///
    /// Task bodies call this at bounded intervals and propagate the error with `?`.
    #[inline]
    pub fn checkpoint(&self) -> Result<(), Interrupted> {
        if self.is_cancelled() {
            Err(Interrupted)
        } else {
            Ok(())
        }
    }

    /// Block the calling thread for `duration`, returning early with
    /// `Err(Interrupted)` as soon as the token is cancelled.
    ///
    /// A token that is already cancelled returns immediately without sleeping.
    ///
    /// A `duration` too large to express as a deadline sleeps until cancelled.
    pub fn sleep(&self, duration: Duration) -> Result<(), Interrupted> {
        let deadline = Instant::now().checked_add(duration);
        let mut guard = self.inner.lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if self.is_cancelled() {
                return Err(Interrupted);
            }
            // Spurious wakeups just go round the loop again.
            guard = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(());
                    }
                    self.inner
                        .wake
                        .wait_timeout(guard, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self.inner.wake.wait(guard).unwrap_or_else(PoisonError::into_inner),
            };
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        CancelToken::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
