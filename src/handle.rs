//! Future-like handle to a submitted task.
//!
//! A [`TaskHandle`] is shared by the submitter, the worker, and any canceller;
//! the last clone dropped frees the state. The state machine is
//!
//! ```text
//! Pending ──► Running ──► Completed(R) | Cancelled | Failed(err)
//!    │
//!    └──────► Cancelled
//! ```
//!
//! and every terminal state is absorbing. All transitions happen under one
//! mutex; waiters park on a condvar that is signalled on entry to a terminal
//! state.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::displaylevel;
use crate::task::{Abort, CancelToken};

/// Payload-free view of a handle's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Cancelled | TaskState::Failed)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Pending => "pending",
            TaskState::Running => "running",
            TaskState::Completed => "completed",
            TaskState::Cancelled => "cancelled",
            TaskState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Error returned when waiting on a handle.
#[derive(Debug, Clone)]
pub enum TaskError {
    /// The task was cancelled before it could complete.
    Cancelled,
    /// The task body failed; carries the body's error.
    Failed(Arc<dyn Error + Send + Sync + 'static>),
    /// `get_timeout` gave up while the task was still pending or running.
    Timeout,
}

impl TaskError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Cancelled)
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskError::Cancelled => f.write_str("task was cancelled"),
            TaskError::Failed(e) => write!(f, "task failed: {}", e),
            TaskError::Timeout => f.write_str("timed out waiting for task"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TaskError::Failed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

enum Slot<R> {
    Pending,
    Running,
    Completed(R),
    Cancelled,
    Failed(Arc<dyn Error + Send + Sync + 'static>),
}

impl<R> Slot<R> {
    fn state(&self) -> TaskState {
        match self {
            Slot::Pending => TaskState::Pending,
            Slot::Running => TaskState::Running,
            Slot::Completed(_) => TaskState::Completed,
            Slot::Cancelled => TaskState::Cancelled,
            Slot::Failed(_) => TaskState::Failed,
        }
    }
}

impl<R: Clone> Slot<R> {
    fn outcome(&self) -> Option<Result<R, TaskError>> {
        match self {
            Slot::Pending | Slot::Running => None,
            Slot::Completed(v) => Some(Ok(v.clone())),
            Slot::Cancelled => Some(Err(TaskError::Cancelled)),
            Slot::Failed(e) => Some(Err(TaskError::Failed(Arc::clone(e)))),
        }
    }
}

struct Shared<R> {
    id: u64,
    slot: Mutex<Slot<R>>,
    done: Condvar,
    token: CancelToken,
}

/// Caller-visible proxy for a task's eventual outcome.
pub struct TaskHandle<R> {
    shared: Arc<Shared<R>>,
}

impl<R> Clone for TaskHandle<R> {
    fn clone(&self) -> Self {
        TaskHandle { shared: Arc::clone(&self.shared) }
    }
}

impl<R> fmt::Debug for TaskHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.shared.id)
            .field("state", &self.state())
            .finish()
    }
}

impl<R> TaskHandle<R> {
    pub(crate) fn new(id: u64) -> Self {
        TaskHandle {
            shared: Arc::new(Shared {
                id,
                slot: Mutex::new(Slot::Pending),
                done: Condvar::new(),
                token: CancelToken::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot<R>> {
        self.shared.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executor-assigned sequence number, unique per executor.
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// The interruption flag handed to the task body.
    pub fn token(&self) -> &CancelToken {
        &self.shared.token
    }

    pub fn state(&self) -> TaskState {
        self.lock().state()
    }

    /// `true` once the handle is Completed, Cancelled, or Failed.
    pub fn is_done(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == TaskState::Cancelled
    }

    /// Request cancellation.
    ///
    /// A pending or running task moves to Cancelled at once and `true` is
    /// returned. With `may_interrupt` the task's token is also set, so a
    /// running body stops at its next checkpoint or wakes from its
    /// interruptible sleep; without it the body runs on and its result is
    /// discarded. A task already in a terminal state is left untouched and
    /// `false` is returned.
    pub fn cancel(&self, may_interrupt: bool) -> bool {
        let mut slot = self.lock();
        let previous = slot.state();
        if previous.is_terminal() {
            return false;
        }
        *slot = Slot::Cancelled;
        drop(slot);
        self.shared.done.notify_all();
        if may_interrupt {
            self.shared.token.cancel();
        }
        displaylevel!(4, "task #{} cancelled while {}\n", self.shared.id, previous);
        true
    }

    /// Block until the handle reaches a terminal state and return that state.
    pub fn wait(&self) -> TaskState {
        let mut slot = self.lock();
        while !slot.state().is_terminal() {
            slot = self.shared.done.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
        slot.state()
    }

    /// Like [`wait`](Self::wait) but gives up after `timeout`, returning the
    /// state observed at that point. A timeout past the clock's range waits
    /// without bound.
    pub fn wait_timeout(&self, timeout: Duration) -> TaskState {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return self.wait(),
        };
        let mut slot = self.lock();
        loop {
            let state = slot.state();
            let now = Instant::now();
            if state.is_terminal() || now >= deadline {
                return state;
            }
            let (g, _) = self
                .shared
                .done
                .wait_timeout(slot, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            slot = g;
        }
    }

    // ── Worker-side transitions ──────────────────────────────────────────────

    /// Pending → Running. Returns `false` if the task was cancelled first.
    pub(crate) fn start(&self) -> bool {
        let mut slot = self.lock();
        match *slot {
            Slot::Pending => {
                *slot = Slot::Running;
                true
            }
            _ => false,
        }
    }

    /// Record the body's outcome. Ignored unless the handle is still Running,
    /// which is how a result computed after a cancel is discarded.
    pub(crate) fn finish(&self, outcome: Result<R, Abort>) {
        let mut slot = self.lock();
        if !matches!(*slot, Slot::Running) {
            displaylevel!(
                4,
                "task #{} finished after reaching {}; outcome discarded\n",
                self.shared.id,
                slot.state()
            );
            return;
        }
        *slot = match outcome {
            Ok(v) => Slot::Completed(v),
            Err(Abort::Interrupted) => Slot::Cancelled,
            Err(Abort::Failed(e)) => Slot::Failed(Arc::from(e)),
        };
        let state = slot.state();
        drop(slot);
        self.shared.done.notify_all();
        displaylevel!(4, "task #{} {}\n", self.shared.id, state);
    }
}

impl<R: Clone> TaskHandle<R> {
    /// Block until the task leaves Pending/Running.
    ///
    /// Returns the value on Completed, [`TaskError::Cancelled`] on Cancelled,
    /// and [`TaskError::Failed`] with the body's error on Failed.
    pub fn get(&self) -> Result<R, TaskError> {
        let mut slot = self.lock();
        loop {
            if let Some(outcome) = slot.outcome() {
                return outcome;
            }
            slot = self.shared.done.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// [`get`](Self::get) bounded by `timeout`; [`TaskError::Timeout`] if the
    /// task is still pending or running when it expires. A timeout past the
    /// clock's range behaves like `get`.
    pub fn get_timeout(&self, timeout: Duration) -> Result<R, TaskError> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return self.get(),
        };
        let mut slot = self.lock();
        loop {
            if let Some(outcome) = slot.outcome() {
                return outcome;
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(TaskError::Timeout);
            }
            let (g, _) = self
                .shared
                .done
                .wait_timeout(slot, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            slot = g;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_handle_is_pending() {
        let h: TaskHandle<u32> = TaskHandle::new(1);
        assert_eq!(h.state(), TaskState::Pending);
        assert!(!h.is_done());
        assert!(!h.is_cancelled());
    }

    #[test]
    fn cancel_pending_skips_start() {
        let h: TaskHandle<u32> = TaskHandle::new(1);
        assert!(h.cancel(false));
        assert!(!h.start());
        assert!(h.get().unwrap_err().is_cancelled());
    }

    #[test]
    fn completed_is_final() {
        let h: TaskHandle<u32> = TaskHandle::new(1);
        assert!(h.start());
        h.finish(Ok(5));
        assert!(!h.cancel(true));
        assert_eq!(h.state(), TaskState::Completed);
        assert_eq!(h.get().unwrap(), 5);
        assert!(!h.token().is_cancelled());
    }

    #[test]
    fn result_after_cancel_is_discarded() {
        let h: TaskHandle<u32> = TaskHandle::new(1);
        assert!(h.start());
        assert!(h.cancel(false));
        h.finish(Ok(5));
        assert_eq!(h.state(), TaskState::Cancelled);
    }

    #[test]
    fn interrupted_body_ends_cancelled() {
        let h: TaskHandle<u32> = TaskHandle::new(1);
        assert!(h.start());
        h.finish(Err(Abort::Interrupted));
        assert_eq!(h.state(), TaskState::Cancelled);
    }

    #[test]
    fn failed_body_carries_error() {
        let h: TaskHandle<u32> = TaskHandle::new(1);
        assert!(h.start());
        h.finish(Err(Abort::failed("boom")));
        match h.get() {
            Err(TaskError::Failed(e)) => assert_eq!(e.to_string(), "boom"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unbounded_timeouts_wait_for_completion() {
        let h: TaskHandle<u32> = TaskHandle::new(1);
        let worker = h.clone();
        let finisher = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            assert!(worker.start());
            worker.finish(Ok(9));
        });
        assert_eq!(h.wait_timeout(Duration::MAX), TaskState::Completed);
        assert_eq!(h.get_timeout(Duration::MAX).unwrap(), 9);
        finisher.join().unwrap();
    }

    #[test]
    fn get_timeout_on_pending_times_out() {
        let h: TaskHandle<u32> = TaskHandle::new(1);
        assert!(matches!(h.get_timeout(Duration::from_millis(10)), Err(TaskError::Timeout)));
        assert_eq!(h.wait_timeout(Duration::from_millis(1)), TaskState::Pending);
    }
}
