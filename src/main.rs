//! Binary entry point for the `taskbench` command-line tool.
//!
//! - `taskbench bench` times every requested codec on every requested corpus
//!   and prints a result table (optionally also a JSON file).
//! - `taskbench cancel` runs a single cancellation scenario and prints the
//!   task's terminal state.
//!
//! Exit code 0 on success, 1 on any error.

use clap::Parser;

use taskbench::bench::{bench_corpora, format_report, write_json, BenchConfig};
use taskbench::cli::args::{BenchArgs, CancelArgs, Cli, Command};
use taskbench::cli::scenario::run_cancel_scenario;
use taskbench::display::{display_level, set_display_level};
use taskbench::{displaylevel, displayout};

fn run_bench(args: &BenchArgs) -> anyhow::Result<()> {
    let mut config = BenchConfig::default();
    config
        .set_notification_level(display_level())
        .set_iterations(args.iterations)
        .set_warmup_iterations(args.warmup);

    let results = bench_corpora(&args.codecs, &args.corpora, args.corpus_dir.as_deref(), &config)?;
    if display_level() >= 1 {
        displayout!("{}", format_report(&results));
    }
    if let Some(path) = &args.json {
        write_json(path, &results)?;
        displaylevel!(3, "results written to {}\n", path.display());
    }
    Ok(())
}

fn run_cancel(args: &CancelArgs) -> anyhow::Result<()> {
    let outcome = run_cancel_scenario(args)?;
    let result = match &outcome.result {
        Ok(v) => format!("completed with {}", v),
        Err(e) => e.to_string(),
    };
    displayout!(
        "{:?}: {} after {:?} (cancel {})\n",
        args.task,
        result,
        outcome.observed_after,
        if outcome.cancel_accepted { "accepted" } else { "had no effect" }
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    set_display_level(cli.display_level());

    let result = match &cli.command {
        Command::Bench(args) => run_bench(args),
        Command::Cancel(args) => run_cancel(args),
    };

    if let Err(e) = result {
        displaylevel!(1, "taskbench: {:#}\n", e);
        std::process::exit(1);
    }
}
