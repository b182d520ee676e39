//! Command-line interface for the `taskbench` binary.
//!
//! | Submodule    | Responsibility |
//! |--------------|----------------|
//! | [`args`]     | clap definitions: global verbosity flags and the `bench` / `cancel` subcommands. |
//! | [`scenario`] | The submit → cancel-after-delay → poll → `get` flow run by `cancel`. |
//!
//! Typical call sequence: `Cli::parse` → `set_display_level` → dispatch on [`args::Command`].

pub mod args;
pub mod scenario;
