// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # WabiSabi Pool Simulator
//!
//! Entry point for the `wabisabi-sim` binary. Parses CLI arguments,
//! initializes logging and metrics, then runs a batch of mock coinjoin
//! rounds concurrently against one shared zero-credential pool.
//!
//! - `run`     — simulate rounds and print a JSON summary
//! - `version` — print build version information

mod cli;
mod coordinator;
mod logging;
mod metrics;
mod round;

use std::path::Path;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use wabisabi_pool::config::{PROTOCOL_NAME, PROTOCOL_VERSION};
use wabisabi_pool::{Amount, CredentialPool, PoolConfig, PoolStats};

use cli::{Commands, WabisabiSimCli};
use coordinator::MockCoordinator;
use logging::LogFormat;
use metrics::SimMetrics;
use round::{run_round, RoundParams};

/// Smallest round input, in sats. Anything below this is dust to a real
/// coordinator.
const MIN_ROUND_AMOUNT: u64 = 5_000;

/// Largest round input, in sats.
const MAX_ROUND_AMOUNT: u64 = 10_000_000;

/// Summary printed to stdout at the end of `run`.
#[derive(Debug, Serialize)]
struct RunSummary {
    protocol: &'static str,
    width: usize,
    rounds: u32,
    completed: u64,
    failed: u64,
    exhaustion_retries: u64,
    issued_by_coordinator: u64,
    pool: PoolStats,
    discarded_at_shutdown: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = WabisabiSimCli::parse();

    match cli.command {
        Commands::Run(args) => run_sim(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Runs every round, at most `concurrency` at a time, and reports.
async fn run_sim(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "wabisabi_sim=info,wabisabi_pool=info",
        LogFormat::from_str_lossy(&args.log_format),
    );
    ensure!(args.concurrency > 0, "--concurrency must be at least 1");
    ensure!(args.max_attempts > 0, "--max-attempts must be at least 1");

    let pool_config = load_pool_config(args.config.as_deref(), args.credential_number)?;
    let pool: Arc<CredentialPool> =
        Arc::new(CredentialPool::new(pool_config).context("invalid pool configuration")?);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let coordinator = Arc::new(MockCoordinator::new(pool.width(), &mut rng));
    let metrics = SimMetrics::new().context("failed to register metrics")?;

    tracing::info!(
        protocol = PROTOCOL_NAME,
        width = pool.width(),
        rounds = args.rounds,
        concurrency = args.concurrency,
        bootstrap = args.bootstrap,
        seed = args.seed,
        "starting simulation"
    );

    let semaphore = Arc::new(Semaphore::new(args.concurrency));
    let mut tasks = JoinSet::new();

    for round in 0..args.rounds {
        let params = RoundParams {
            amount: Amount::new(rng.gen_range(MIN_ROUND_AMOUNT..=MAX_ROUND_AMOUNT)),
            bootstrap_issuances: args.bootstrap,
            max_attempts: args.max_attempts,
        };
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .context("round semaphore closed")?;
        let pool = Arc::clone(&pool);
        let coordinator = Arc::clone(&coordinator);

        tasks.spawn(async move {
            let _permit = permit;
            run_round(round, pool, coordinator, params).await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined.context("round task panicked")? {
            Ok(outcome) => {
                tracing::debug!(
                    round = outcome.round,
                    amount = outcome.amount.value(),
                    "round joined"
                );
                metrics.rounds_completed_total.inc();
                metrics
                    .exhaustion_retries_total
                    .inc_by(u64::from(outcome.exhaustion_retries));
            }
            Err(e) => {
                metrics.rounds_failed_total.inc();
                tracing::warn!(error = %e, "round failed");
            }
        }
    }

    let stats = pool.stats();
    metrics.observe_pool(&stats);

    // The pool never outlives the session it was filled in.
    let discarded = pool.discard_all();

    let summary = RunSummary {
        protocol: PROTOCOL_NAME,
        width: pool.width(),
        rounds: args.rounds,
        completed: metrics.rounds_completed_total.get(),
        failed: metrics.rounds_failed_total.get(),
        exhaustion_retries: metrics.exhaustion_retries_total.get(),
        issued_by_coordinator: coordinator.issued_total(),
        pool: stats,
        discarded_at_shutdown: discarded,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to encode summary")?
    );

    if args.metrics {
        print!("{}", metrics.encode().context("failed to encode metrics")?);
    }

    tracing::info!(
        completed = summary.completed,
        failed = summary.failed,
        "simulation finished"
    );
    Ok(())
}

/// Reads the pool config file, if any, then applies the CLI width override.
fn load_pool_config(path: Option<&Path>, credential_number: Option<usize>) -> Result<PoolConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read pool config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse pool config {}", path.display()))?
        }
        None => PoolConfig::default(),
    };

    if let Some(n) = credential_number {
        config.credential_number = n;
    }
    config.validate().context("invalid pool configuration")?;
    Ok(config)
}

/// Prints version information to stdout.
fn print_version() {
    println!("wabisabi-sim {}", env!("CARGO_PKG_VERSION"));
    println!("pool         {}", PROTOCOL_VERSION);
    println!("protocol     {}", PROTOCOL_NAME);
}
