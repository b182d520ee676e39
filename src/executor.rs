//! Single-worker execution context.
//!
//! [`SingleThreadExecutor`] owns one dedicated worker thread fed by a
//! `crossbeam_channel` queue, so at most one task is Running at a time and
//! tasks start in submission order. The queue is unbounded by default;
//! [`SingleThreadExecutor::with_capacity`] bounds it, in which case
//! [`submit`](SingleThreadExecutor::submit) blocks while the queue is full.
//!
//! A task that fails, panics, or is cancelled never takes the worker down:
//! panics are caught and surface as a Failed handle, and the worker moves on
//! to the next queued task.
//!
//! Lifecycle:
//!
//! - [`shutdown`](SingleThreadExecutor::shutdown) refuses new work and lets the
//!   queue drain.
//! - [`shutdown_now`](SingleThreadExecutor::shutdown_now) additionally cancels
//!   every queued task and interrupts the running one.
//! - `Drop` shuts down and joins the worker.

use crossbeam_channel::{bounded, unbounded, Receiver, Select, SendTimeoutError, Sender, TryRecvError};
use std::any::Any;
use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::displaylevel;
use crate::handle::TaskHandle;
use crate::task::{Abort, CancelToken, Task};

const WORKER_THREAD_NAME: &str = "taskbench-worker";

/// Longest a blocked `submit` holds off a concurrent shutdown.
const SEND_SLICE: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Returned by [`SingleThreadExecutor::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The executor no longer accepts work.
    ShutDown,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::ShutDown => f.write_str("executor has been shut down"),
        }
    }
}

impl std::error::Error for SubmitError {}

/// A task body panicked; the panic message is kept when it is a string.
#[derive(Debug, Clone)]
pub struct TaskPanicked {
    pub message: String,
}

impl TaskPanicked {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        TaskPanicked { message }
    }
}

impl fmt::Display for TaskPanicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task panicked: {}", self.message)
    }
}

impl std::error::Error for TaskPanicked {}

// ---------------------------------------------------------------------------
// Queue entries
// ---------------------------------------------------------------------------

/// Type-erased queue entry so tasks with different outputs share one channel.
trait Runnable: Send {
    fn id(&self) -> u64;
    fn token(&self) -> CancelToken;
    fn cancel(&self) -> bool;
    fn run(self: Box<Self>);
}

struct Submission<T: Task> {
    task: T,
    handle: TaskHandle<T::Output>,
}

impl<T: Task> Runnable for Submission<T> {
    fn id(&self) -> u64 {
        self.handle.id()
    }

    fn token(&self) -> CancelToken {
        self.handle.token().clone()
    }

    fn cancel(&self) -> bool {
        self.handle.cancel(true)
    }

    fn run(self: Box<Self>) {
        let Submission { task, handle } = *self;
        if !handle.start() {
            displaylevel!(4, "task #{} skipped: cancelled before start\n", handle.id());
            return;
        }
        displaylevel!(4, "task #{} running\n", handle.id());
        let token = handle.token().clone();
        let outcome = match panic::catch_unwind(AssertUnwindSafe(|| task.run(&token))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let panicked = TaskPanicked::from_payload(payload);
                displaylevel!(1, "task #{}: {}\n", handle.id(), panicked);
                Err(Abort::failed(panicked))
            }
        };
        handle.finish(outcome);
    }
}

// ---------------------------------------------------------------------------
// Shared state between the executor and its worker
// ---------------------------------------------------------------------------

struct ExecState {
    /// Submitted tasks the worker has not yet finished with.
    pending: usize,
    /// Set by the worker when its loop exits.
    terminated: bool,
}

/// What the worker is doing right now, guarded separately from the counters.
struct Current {
    /// Token of the task on the worker, if any.
    token: Option<CancelToken>,
    /// Set by `shutdown_now`; the worker takes no further jobs.
    stop_now: bool,
}

struct Inner {
    state: Mutex<ExecState>,
    cvar: Condvar,
    current: Mutex<Current>,
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, ExecState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_current(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn end(&self) {
        self.lock_current().token = None;
    }

    fn job_done(&self) {
        let mut s = self.lock_state();
        s.pending -= 1;
        if s.pending == 0 {
            self.cvar.notify_all();
        }
    }
}

fn worker_loop(rx: Receiver<Box<dyn Runnable>>, inner: Arc<Inner>) {
    loop {
        // Wait for a job (or for every sender to go) without taking it.
        let mut sel = Select::new();
        sel.recv(&rx);
        sel.ready();

        // A job is only taken under the `current` lock, so it is either
        // published as running before `shutdown_now` sets the stop flag or
        // left in the queue for `shutdown_now` to drain and count.
        let job = {
            let mut current = inner.lock_current();
            if current.stop_now {
                break;
            }
            match rx.try_recv() {
                Ok(job) => {
                    current.token = Some(job.token());
                    job
                }
                Err(TryRecvError::Empty) => continue,
                Err(TryRecvError::Disconnected) => break,
            }
        };
        job.run();
        inner.end();
        inner.job_done();
    }
    let mut s = inner.lock_state();
    s.terminated = true;
    inner.cvar.notify_all();
    displaylevel!(4, "{} terminated\n", WORKER_THREAD_NAME);
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// Execution context with exactly one worker thread.
pub struct SingleThreadExecutor {
    /// `None` once shut down. Sends happen under the read lock.
    tx: RwLock<Option<Sender<Box<dyn Runnable>>>>,
    /// Kept so `shutdown_now` can drain entries the worker has not taken.
    rx: Receiver<Box<dyn Runnable>>,
    inner: Arc<Inner>,
    worker: Mutex<Option<JoinHandle<()>>>,
    next_id: AtomicU64,
}

impl SingleThreadExecutor {
    /// Executor with an unbounded queue; `submit` never blocks.
    pub fn new() -> io::Result<Self> {
        let (tx, rx) = unbounded();
        Self::start(tx, rx)
    }

    /// Executor whose queue holds at most `capacity` waiting tasks.
    ///
    /// `capacity` must be ≥ 1.
    pub fn with_capacity(capacity: usize) -> io::Result<Self> {
        if capacity < 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "queue capacity must be at least 1",
            ));
        }
        let (tx, rx) = bounded(capacity);
        Self::start(tx, rx)
    }

    fn start(tx: Sender<Box<dyn Runnable>>, rx: Receiver<Box<dyn Runnable>>) -> io::Result<Self> {
        let inner = Arc::new(Inner {
            state: Mutex::new(ExecState { pending: 0, terminated: false }),
            cvar: Condvar::new(),
            current: Mutex::new(Current { token: None, stop_now: false }),
        });
        let worker_rx = rx.clone();
        let worker_inner = Arc::clone(&inner);
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || worker_loop(worker_rx, worker_inner))?;

        Ok(SingleThreadExecutor {
            tx: RwLock::new(Some(tx)),
            rx,
            inner,
            worker: Mutex::new(Some(worker)),
            next_id: AtomicU64::new(1),
        })
    }

    /// Queue `task` for the worker and return its handle in Pending state.
    ///
    /// Blocks only when the executor was built with a bounded queue that is
    /// currently full.
    pub fn submit<T: Task>(&self, task: T) -> Result<TaskHandle<T::Output>, SubmitError> {
        let handle = TaskHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut job: Box<dyn Runnable> = Box::new(Submission { task, handle: handle.clone() });

        // Count the task before it is visible to the worker so `wait_idle`
        // cannot observe zero between send and execution.
        self.inner.lock_state().pending += 1;

        // Holding the read lock across the send means `shutdown` (write lock)
        // cannot complete while a send is in flight. A full bounded queue is
        // retried in slices, releasing the lock in between.
        loop {
            let tx = self.tx.read().unwrap_or_else(PoisonError::into_inner);
            let sent = match tx.as_ref() {
                Some(tx) => tx.send_timeout(job, SEND_SLICE),
                None => {
                    self.inner.job_done();
                    return Err(SubmitError::ShutDown);
                }
            };
            match sent {
                Ok(()) => break,
                Err(SendTimeoutError::Timeout(j)) => job = j,
                Err(SendTimeoutError::Disconnected(_)) => {
                    self.inner.job_done();
                    return Err(SubmitError::ShutDown);
                }
            }
        }
        displaylevel!(4, "task #{} submitted\n", handle.id());
        Ok(handle)
    }

    /// Number of submitted tasks the worker has not finished with yet.
    pub fn pending(&self) -> usize {
        self.inner.lock_state().pending
    }

    pub fn is_shutdown(&self) -> bool {
        self.tx.read().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    /// `true` once the worker thread has exited.
    pub fn is_terminated(&self) -> bool {
        self.inner.lock_state().terminated
    }

    /// Block until every submitted task has been run, skipped, or drained.
    ///
    /// Does not shut the executor down; it accepts further work afterwards.
    pub fn wait_idle(&self) {
        let mut s = self.inner.lock_state();
        while s.pending > 0 {
            s = self.inner.cvar.wait(s).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Stop accepting new tasks. Already queued tasks still run.
    ///
    /// Once this returns no further task can enter the queue.
    pub fn shutdown(&self) {
        let tx = self.tx.write().unwrap_or_else(PoisonError::into_inner).take();
        if tx.is_some() {
            displaylevel!(4, "executor shutting down\n");
        }
    }

    /// Stop accepting tasks, cancel every queued task, and interrupt the
    /// running one. Returns how many queued tasks were cancelled.
    pub fn shutdown_now(&self) -> usize {
        self.shutdown();
        let running = {
            let mut current = self.inner.lock_current();
            current.stop_now = true;
            current.token.clone()
        };
        // The worker takes nothing once `stop_now` is set, so every job still
        // queued is drained and counted here.
        let mut cancelled = 0;
        while let Ok(job) = self.rx.try_recv() {
            if job.cancel() {
                cancelled += 1;
            }
            displaylevel!(4, "task #{} drained at shutdown\n", job.id());
            self.inner.job_done();
        }
        if let Some(token) = running {
            token.cancel();
        }
        cancelled
    }

    /// After a shutdown, wait up to `timeout` for the worker to exit.
    /// Returns `true` if it terminated in time.
    /// A timeout past the clock's range waits without bound.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut s = self.inner.lock_state();
        loop {
            if s.terminated {
                return true;
            }
            s = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    self.inner
                        .cvar
                        .wait_timeout(s, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self.inner.cvar.wait(s).unwrap_or_else(PoisonError::into_inner),
            };
        }
    }
}

impl Drop for SingleThreadExecutor {
    /// Shuts down, lets queued tasks drain, and joins the worker thread.
    fn drop(&mut self) {
        self.shutdown();
        let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(worker) = worker {
            if worker.join().is_err() {
                displaylevel!(1, "{} exited with a panic\n", WORKER_THREAD_NAME);
            }
        }
    }
}
