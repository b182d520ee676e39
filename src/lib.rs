// taskbench: cancellable single-worker task execution and a compression
// codec microbenchmark

pub mod display;
pub mod task;
pub mod handle;
pub mod executor;
pub mod canceller;
pub mod poll;
pub mod codec;
pub mod corpus;
pub mod bench;
pub mod cli;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use canceller::spawn_canceller;
pub use executor::{SingleThreadExecutor, SubmitError, TaskPanicked};
pub use handle::{TaskError, TaskHandle, TaskState};
pub use task::{from_fn, Abort, CancelToken, Interrupted, PrimeChecker, SleepTask, Task};
