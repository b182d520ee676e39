//! The cancellation scenario behind `taskbench cancel`.
//!
//! Three threads of control take part: this thread submits the task and
//! polls its handle, the executor's worker runs it, and a canceller thread
//! fires after the configured delay.

use std::fmt::Debug;
use std::time::Duration;

use anyhow::{anyhow, Context};

use super::args::{CancelArgs, DemoTask};
use crate::canceller::spawn_canceller;
use crate::displaylevel;
use crate::executor::SingleThreadExecutor;
use crate::handle::{TaskError, TaskState};
use crate::poll::{Await, AwaitError};
use crate::task::{PrimeChecker, SleepTask, Task};

/// What happened to the task.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub state: TaskState,
    /// Whether the canceller's `cancel` call took effect.
    pub cancel_accepted: bool,
    /// Time from submission until the handle was seen in a terminal state.
    pub observed_after: Duration,
    /// `get()` on the handle, with the value rendered for display.
    pub result: Result<String, TaskError>,
}

fn drive<T>(executor: &SingleThreadExecutor, task: T, args: &CancelArgs) -> anyhow::Result<ScenarioOutcome>
where
    T: Task,
    T::Output: Clone + Debug,
{
    let handle = executor.submit(task).context("submitting task")?;
    let canceller = spawn_canceller(
        handle.clone(),
        Duration::from_millis(args.delay_ms),
        !args.no_interrupt,
    )
    .context("spawning canceller")?;

    let observed_after = Await::new()
        .at_most(Duration::from_millis(args.timeout_ms))
        .poll_interval(Duration::from_millis(5))
        .until(|| handle.is_done())
        .map_err(|e| match e {
            AwaitError::TimedOut(d) => anyhow!("task #{} still {} after {:?}", handle.id(), handle.state(), d),
            other => anyhow!(other),
        })?;

    let cancel_accepted = canceller
        .join()
        .map_err(|_| anyhow!("canceller thread panicked"))?;

    Ok(ScenarioOutcome {
        state: handle.state(),
        cancel_accepted,
        observed_after,
        result: handle.get().map(|v| format!("{:?}", v)),
    })
}

/// Run the scenario described by `args` on a fresh executor.
pub fn run_cancel_scenario(args: &CancelArgs) -> anyhow::Result<ScenarioOutcome> {
    let executor = SingleThreadExecutor::new().context("starting executor")?;
    displaylevel!(3, "submitting {:?} task; canceller fires after {} ms\n", args.task, args.delay_ms);
    let outcome = match args.task {
        DemoTask::Sleep => drive(&executor, SleepTask::from_millis(args.duration_ms), args),
        DemoTask::Prime => drive(&executor, PrimeChecker::simple(args.number), args),
        DemoTask::SmartPrime => drive(&executor, PrimeChecker::smart(args.number), args),
    }?;
    // Interrupt whatever may still be winding down so dropping the executor
    // does not wait on a non-interrupted body.
    executor.shutdown_now();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(task: DemoTask) -> CancelArgs {
        CancelArgs {
            task,
            duration_ms: 3_000,
            number: crate::task::prime::BIG_PRIME,
            delay_ms: 20,
            no_interrupt: false,
            timeout_ms: 5_000,
        }
    }

    #[test]
    fn sleep_scenario_ends_cancelled() {
        let outcome = run_cancel_scenario(&args(DemoTask::Sleep)).unwrap();
        assert_eq!(outcome.state, TaskState::Cancelled);
        assert!(outcome.cancel_accepted);
        assert!(matches!(outcome.result, Err(TaskError::Cancelled)));
        assert!(outcome.observed_after < Duration::from_millis(3_000));
    }

    #[test]
    fn quick_prime_completes_before_cancel() {
        let mut a = args(DemoTask::SmartPrime);
        a.number = 97;
        a.delay_ms = 200;
        let outcome = run_cancel_scenario(&a).unwrap();
        assert_eq!(outcome.state, TaskState::Completed);
        assert!(!outcome.cancel_accepted);
        assert_eq!(outcome.result.unwrap(), "true");
    }
}
