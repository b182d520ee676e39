//! Command-line arguments for the `taskbench` binary.
//!
//! ```text
//! taskbench [-v|-q]... bench  [--codec C]... [--corpus K]... [-i N] [-w N] [--corpus-dir DIR] [--json FILE]
//! taskbench [-v|-q]... cancel [--task T] [--duration-ms MS] [--number N] [--delay-ms MS] [--no-interrupt]
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::bench::config::{ITERATIONS_DEFAULT, WARMUP_ITERATIONS_DEFAULT};
use crate::codec::CodecKind;
use crate::corpus::CorpusKind;
use crate::display::{DISPLAY_LEVEL_DEFAULT, DISPLAY_LEVEL_MAX};
use crate::task::prime::BIG_PRIME;

#[derive(Debug, Parser)]
#[command(name = "taskbench", version, about = "Cancellable task execution and compression codec benchmarks")]
pub struct Cli {
    /// Increase verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease verbosity (repeatable).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Display level implied by `-v`/`-q`, starting from the default.
    pub fn display_level(&self) -> u32 {
        let level = DISPLAY_LEVEL_DEFAULT as i64 + self.verbose as i64 - self.quiet as i64;
        level.clamp(0, DISPLAY_LEVEL_MAX as i64) as u32
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Time compress+decompress round trips of each codec on each corpus.
    Bench(BenchArgs),
    /// Run one task, cancel it after a delay, and report its terminal state.
    Cancel(CancelArgs),
}

#[derive(Debug, Args)]
pub struct BenchArgs {
    /// Codec to benchmark (repeatable; default: all).
    #[arg(long = "codec", value_enum)]
    pub codecs: Vec<CodecKind>,

    /// Corpus to benchmark (repeatable; default: all).
    #[arg(long = "corpus", value_enum)]
    pub corpora: Vec<CorpusKind>,

    /// Measured iterations per pair.
    #[arg(short, long, default_value_t = ITERATIONS_DEFAULT)]
    pub iterations: u32,

    /// Warm-up iterations per pair.
    #[arg(short, long, default_value_t = WARMUP_ITERATIONS_DEFAULT)]
    pub warmup: u32,

    /// Directory holding urls.10K, geo.protodata and fireworks.jpeg.
    #[arg(long)]
    pub corpus_dir: Option<PathBuf>,

    /// Also write the results to this file as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoTask {
    Sleep,
    Prime,
    SmartPrime,
}

#[derive(Debug, Args)]
pub struct CancelArgs {
    /// Task to run.
    #[arg(long, value_enum, default_value_t = DemoTask::Sleep)]
    pub task: DemoTask,

    /// Sleep duration for the sleep task.
    #[arg(long, default_value_t = 3_000)]
    pub duration_ms: u64,

    /// Number to check for the prime tasks.
    #[arg(long, default_value_t = BIG_PRIME, allow_negative_numbers = true)]
    pub number: i64,

    /// Delay before the canceller fires.
    #[arg(long, default_value_t = 100)]
    pub delay_ms: u64,

    /// Cancel without interrupting the running task.
    #[arg(long)]
    pub no_interrupt: bool,

    /// Give up waiting for a terminal state after this long.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,
}
