//! Delay task: parks the worker for a fixed duration.

use std::time::Duration;

use super::{Abort, CancelToken, Task};

/// Sleeps for `duration` on the handle's token.
///
/// The wait is interruptible: cancelling with `may_interrupt = true` wakes the
/// worker at once and the task ends Cancelled rather than Completed.
#[derive(Debug, Clone, Copy)]
pub struct SleepTask {
    duration: Duration,
}

impl SleepTask {
    pub fn new(duration: Duration) -> Self {
        SleepTask { duration }
    }

    pub fn from_millis(millis: u64) -> Self {
        SleepTask::new(Duration::from_millis(millis))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Task for SleepTask {
    type Output = ();

    fn run(self, token: &CancelToken) -> Result<(), Abort> {
        token.checkpoint()?;
        token.sleep(self.duration)?;
        Ok(())
    }
}
