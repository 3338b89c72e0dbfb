//! # CLI Interface
//!
//! Defines the command-line argument structure for `wabisabi-sim` using
//! `clap` derive. Two subcommands: `run` and `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use wabisabi_pool::config::{
    DEFAULT_MAX_ROUND_ATTEMPTS, DEFAULT_SIM_CONCURRENCY, DEFAULT_SIM_ROUNDS,
};

/// WabiSabi zero-credential pool simulator.
///
/// Drives one shared credential pool from many concurrent mock coinjoin
/// rounds and reports how it held up.
#[derive(Parser, Debug)]
#[command(
    name = "wabisabi-sim",
    about = "WabiSabi zero-credential pool simulator",
    version,
    propagate_version = true
)]
pub struct WabisabiSimCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a batch of concurrent rounds against one pool.
    Run(RunArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to a JSON pool configuration file.
    #[arg(long, short = 'c', env = "WABISABI_POOL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Credential vector width. Overrides the config file.
    #[arg(long, short = 'n', env = "WABISABI_CREDENTIAL_NUMBER")]
    pub credential_number: Option<usize>,

    /// Number of rounds to simulate.
    #[arg(long, short = 'r', env = "WABISABI_ROUNDS", default_value_t = DEFAULT_SIM_ROUNDS)]
    pub rounds: u32,

    /// Maximum rounds in flight at once.
    #[arg(long, env = "WABISABI_CONCURRENCY", default_value_t = DEFAULT_SIM_CONCURRENCY)]
    pub concurrency: usize,

    /// Null requests each round issues before padding. Zero makes rounds
    /// live off other rounds' leftovers and exercises the retry path.
    #[arg(long, default_value_t = 1)]
    pub bootstrap: u32,

    /// Padding attempts per round step before the round is abandoned.
    #[arg(long, default_value_t = DEFAULT_MAX_ROUND_ATTEMPTS)]
    pub max_attempts: u32,

    /// RNG seed for round amounts and the coordinator key.
    #[arg(long, env = "WABISABI_SEED", default_value_t = 0)]
    pub seed: u64,

    /// Log format: "pretty" or "json".
    #[arg(long, env = "WABISABI_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Print Prometheus metrics after the summary.
    #[arg(long)]
    pub metrics: bool,
}
