//! Units of deferred work and the cancellation contract they obey.
//!
//! A [`Task`] consumes itself on the executor's worker thread and receives the
//! [`CancelToken`] of its handle. Long-running bodies must check the token at
//! bounded intervals; a body that never does can only be cancelled before it
//! starts.
//!
//! | Type                        | Body |
//! |-----------------------------|------|
//! | [`SleepTask`]               | interruptible wait for a fixed duration |
//! | [`PrimeChecker`] (simple)   | trial division by every integer up to √n |
//! | [`PrimeChecker`] (smart)    | trial division by 2 and odd integers up to √n |
//! | [`FnTask`]                  | any closure, via [`from_fn`] |

pub mod token;
pub mod sleep;
pub mod prime;

pub use prime::{PrimeChecker, PrimeError, PrimeStrategy};
pub use sleep::SleepTask;
pub use token::CancelToken;

use std::fmt;

/// Boxed error raised by a task body.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Returned by a checkpoint or an interruptible wait once cancellation has
/// been requested. The worker turns it into the Cancelled state; it is never
/// handed to the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("task interrupted")
    }
}

impl std::error::Error for Interrupted {}

/// Why a task body stopped without producing a value.
#[derive(Debug)]
pub enum Abort {
    /// A checkpoint observed the cancellation request.
    Interrupted,
    /// The body itself failed.
    Failed(BoxError),
}

impl Abort {
    /// Wrap any error raised by task logic.
    pub fn failed<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Abort::Failed(err.into())
    }
}

impl From<Interrupted> for Abort {
    fn from(_: Interrupted) -> Self {
        Abort::Interrupted
    }
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Abort::Interrupted => f.write_str("task interrupted"),
            Abort::Failed(e) => write!(f, "task failed: {}", e),
        }
    }
}

/// A unit of work run once by the executor's worker.
pub trait Task: Send + 'static {
    type Output: Send + 'static;

    /// Run the body to completion, or until `token` reports cancellation.
    fn run(self, token: &CancelToken) -> Result<Self::Output, Abort>;
}

/// Task backed by a closure. Build one with [`from_fn`].
pub struct FnTask<F> {
    body: F,
}

/// Adapt a closure into a [`Task`].
///
/// ```
/// use taskbench::task::{from_fn, Abort, CancelToken, Task};
///
/// let task = from_fn(|token: &CancelToken| -> Result<u32, Abort> {
///     token.checkpoint()?;
///     Ok(7)
/// });
/// assert_eq!(task.run(&CancelToken::new()).ok(), Some(7));
/// ```
pub fn from_fn<F, R>(body: F) -> FnTask<F>
where
    F: FnOnce(&CancelToken) -> Result<R, Abort> + Send + 'static,
    R: Send + 'static,
{
    FnTask { body }
}

impl<F, R> Task for FnTask<F>
where
    F: FnOnce(&CancelToken) -> Result<R, Abort> + Send + 'static,
    R: Send + 'static,
{
    type Output = R;

    fn run(self, token: &CancelToken) -> Result<R, Abort> {
        (self.body)(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_converts_with_question_mark() {
        fn body(token: &CancelToken) -> Result<(), Abort> {
            token.checkpoint()?;
            Ok(())
        }
        let token = CancelToken::new();
        token.cancel();
        assert!(matches!(body(&token), Err(Abort::Interrupted)));
    }

    #[test]
    fn abort_failed_keeps_message() {
        let abort = Abort::failed("bad input");
        assert_eq!(abort.to_string(), "task failed: bad input");
    }
}
