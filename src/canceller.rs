//! Cancellation requester: an independent thread that cancels a handle after
//! a delay.
//!
//! Used to exercise the race between a task finishing and a cancel request
//! arriving. The canceller calls [`TaskHandle::cancel`] exactly once and
//! reports whether the request took effect.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::displaylevel;
use crate::handle::TaskHandle;

/// Spawn a thread that sleeps for `delay`, then calls
/// `handle.cancel(may_interrupt)` once.
///
/// Joining the returned thread yields the value `cancel` returned: `true` if
/// the task was still pending or running, `false` if it had already reached
/// a terminal state.
pub fn spawn_canceller<R>(
    handle: TaskHandle<R>,
    delay: Duration,
    may_interrupt: bool,
) -> io::Result<JoinHandle<bool>>
where
    R: Send + 'static,
{
    thread::Builder::new()
        .name(format!("taskbench-canceller-{}", handle.id()))
        .spawn(move || {
            thread::sleep(delay);
            let cancelled = handle.cancel(may_interrupt);
            displaylevel!(
                3,
                "canceller: cancel(may_interrupt={}) on task #{} after {:?} -> {}\n",
                may_interrupt,
                handle.id(),
                delay,
                cancelled
            );
            cancelled
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::TaskState;

    #[test]
    fn cancels_pending_handle_once() {
        let handle: TaskHandle<()> = TaskHandle::new(7);
        let canceller = spawn_canceller(handle.clone(), Duration::from_millis(5), true).unwrap();
        assert!(canceller.join().unwrap());
        assert_eq!(handle.state(), TaskState::Cancelled);
        assert!(handle.token().is_cancelled());
    }

    #[test]
    fn second_canceller_reports_no_effect() {
        let handle: TaskHandle<()> = TaskHandle::new(8);
        let first = spawn_canceller(handle.clone(), Duration::ZERO, false).unwrap();
        assert!(first.join().unwrap());
        let second = spawn_canceller(handle.clone(), Duration::ZERO, false).unwrap();
        assert!(!second.join().unwrap());
    }
}
