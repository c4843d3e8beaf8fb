//! Command Line Interface (CLI) layer for sarprep.
//!
//! `args` defines the flags, `errors` the CLI error type and `runner` merges
//! a config file with flags and drives one run through `sarprep::api`.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
