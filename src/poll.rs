//! Bounded polling window.
//!
//! [`Await`] repeatedly evaluates a condition until it holds, and checks that
//! it started holding inside a `[at_least, at_most]` window measured from the
//! call. It is how tests and the `cancel` command wait for a handle to change
//! state without blocking on the handle itself.
//!
//! ```
//! use std::time::Duration;
//! use taskbench::poll::Await;
//!
//! let elapsed = Await::new()
//!     .at_most(Duration::from_secs(1))
//!     .until(|| true)
//!     .unwrap();
//! assert!(elapsed < Duration::from_secs(1));
//! ```

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound used when none is given.
pub const AT_MOST_DEFAULT: Duration = Duration::from_secs(10);

/// Delay between two evaluations of the condition.
pub const POLL_INTERVAL_DEFAULT: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwaitError {
    /// The condition held before the lower bound; carries the elapsed time.
    TooEarly(Duration),
    /// The condition never held within the upper bound.
    TimedOut(Duration),
}

impl fmt::Display for AwaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AwaitError::TooEarly(d) => write!(f, "condition met too early, after {:?}", d),
            AwaitError::TimedOut(d) => write!(f, "condition not met within {:?}", d),
        }
    }
}

impl std::error::Error for AwaitError {}

#[derive(Debug, Clone, Copy)]
pub struct Await {
    at_least: Duration,
    at_most: Duration,
    poll_interval: Duration,
}

impl Default for Await {
    fn default() -> Self {
        Await {
            at_least: Duration::ZERO,
            at_most: AT_MOST_DEFAULT,
            poll_interval: POLL_INTERVAL_DEFAULT,
        }
    }
}

impl Await {
    pub fn new() -> Self {
        Await::default()
    }

    /// Window `[at_least, at_most]`.
    pub fn between(self, at_least: Duration, at_most: Duration) -> Self {
        self.at_least(at_least).at_most(at_most)
    }

    pub fn at_least(mut self, d: Duration) -> Self {
        self.at_least = d;
        self
    }

    pub fn at_most(mut self, d: Duration) -> Self {
        self.at_most = d;
        self
    }

    pub fn poll_interval(mut self, d: Duration) -> Self {
        self.poll_interval = d;
        self
    }

    /// Poll `condition` until it returns `true`.
    ///
    /// Returns the elapsed time at which it was first seen `true`. The
    /// condition is evaluated once more at the upper bound, so a transition
    /// landing between two polls near the deadline is not missed.
    pub fn until<F>(&self, mut condition: F) -> Result<Duration, AwaitError>
    where
        F: FnMut() -> bool,
    {
        let start = Instant::now();
        loop {
            let held = condition();
            let elapsed = start.elapsed();
            if held {
                if elapsed < self.at_least {
                    return Err(AwaitError::TooEarly(elapsed));
                }
                return Ok(elapsed);
            }
            if elapsed >= self.at_most {
                return Err(AwaitError::TimedOut(elapsed));
            }
            let remaining = self.at_most - elapsed;
            thread::sleep(self.poll_interval.min(remaining));
        }
    }
}
