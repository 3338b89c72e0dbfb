//! # Round Driver
//!
//! Runs one simulated coinjoin round against a shared pool:
//!
//! ```text
//!   bootstrap   null request(s)      ──► N zero creds      ──► pool
//!   input reg   [pad(∅)]             ──► [amount, 0, ..]   ──► value cred + pool
//!   output reg  [pad(value cred)]    ──► [0, 0, ..]        ──► pool
//! ```
//!
//! The pool fails fast when it runs dry. Deciding what to do about that is
//! this module's job: fetch a fresh zero issuance and try again, up to the
//! configured number of attempts, then give up on the round.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use wabisabi_pool::{Amount, Credential, CredentialPool, CredentialVector, PoolError};

use crate::coordinator::{CoordinatorError, MockCoordinator};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Knobs for a single round.
#[derive(Debug, Clone, Copy)]
pub struct RoundParams {
    /// Amount registered as the round's input.
    pub amount: Amount,
    /// Null requests issued before the round starts padding.
    pub bootstrap_issuances: u32,
    /// Padding attempts per step before the round is abandoned.
    pub max_attempts: u32,
}

/// What a successful round reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round: u32,
    pub amount: Amount,
    /// Padding attempts that hit an exhausted pool and were retried.
    pub exhaustion_retries: u32,
}

/// Why a round was abandoned.
#[derive(Debug, Error)]
pub enum RoundError {
    /// Padding kept failing after the configured attempts.
    #[error("round {round}: padding failed after {attempts} attempt(s): {source}")]
    Padding {
        round: u32,
        attempts: u32,
        #[source]
        source: PoolError,
    },

    /// The coordinator rejected a request.
    #[error("round {round}: coordinator rejected request: {source}")]
    Coordinator {
        round: u32,
        #[source]
        source: CoordinatorError,
    },

    /// The coordinator returned the wrong number of value credentials.
    #[error("round {round}: expected {expected} value credential(s), coordinator returned {got}")]
    UnexpectedValue {
        round: u32,
        expected: usize,
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// Runs one round to completion.
pub async fn run_round(
    round: u32,
    pool: Arc<CredentialPool>,
    coordinator: Arc<MockCoordinator>,
    params: RoundParams,
) -> Result<RoundOutcome, RoundError> {
    let coordinator_err = move |source| RoundError::Coordinator { round, source };
    let mut exhaustion_retries = 0;

    for _ in 0..params.bootstrap_issuances {
        let issued = coordinator.issue_zero().map_err(coordinator_err)?;
        pool.register_zero_value_credentials(issued);
    }
    debug!(round, available = pool.len(), "round bootstrapped");

    // Input registration: present fillers only.
    let presented = pad(
        round,
        &pool,
        &coordinator,
        Vec::new(),
        params.max_attempts,
        &mut exhaustion_retries,
    )
    .await?;
    let response = coordinator
        .register_input(presented, params.amount)
        .map_err(coordinator_err)?;
    let valuable = pool.register_zero_value_credentials(response);
    if valuable.len() != 1 {
        return Err(RoundError::UnexpectedValue {
            round,
            expected: 1,
            got: valuable.len(),
        });
    }

    tokio::task::yield_now().await;

    // Output registration: present the value credential padded with zeros.
    let presented = pad(
        round,
        &pool,
        &coordinator,
        valuable,
        params.max_attempts,
        &mut exhaustion_retries,
    )
    .await?;
    let response = coordinator
        .register_output(presented)
        .map_err(coordinator_err)?;
    let leftover = pool.register_zero_value_credentials(response);
    if !leftover.is_empty() {
        return Err(RoundError::UnexpectedValue {
            round,
            expected: 0,
            got: leftover.len(),
        });
    }

    info!(
        round,
        amount = params.amount.value(),
        exhaustion_retries,
        "round completed"
    );
    Ok(RoundOutcome {
        round,
        amount: params.amount,
        exhaustion_retries,
    })
}

/// Pads `real` to the protocol width, topping the pool up from the
/// coordinator each time it comes up short.
async fn pad(
    round: u32,
    pool: &CredentialPool,
    coordinator: &MockCoordinator,
    real: Vec<Credential>,
    max_attempts: u32,
    exhaustion_retries: &mut u32,
) -> Result<CredentialVector, RoundError> {
    let mut real = real;
    let mut attempt = 1;

    loop {
        match pool.complete_with_zero_credentials(real) {
            Ok(vector) => return Ok(vector),
            Err(err) if err.is_exhausted() && attempt < max_attempts => {
                warn!(
                    round,
                    attempt,
                    error = %err,
                    "pool exhausted, requesting fresh zero credentials"
                );
                real = err.into_credentials();
                let issued = coordinator
                    .issue_zero()
                    .map_err(|source| RoundError::Coordinator { round, source })?;
                pool.register_zero_value_credentials(issued);

                attempt += 1;
                *exhaustion_retries += 1;
                tokio::task::yield_now().await;
            }
            Err(source) => {
                return Err(RoundError::Padding {
                    round,
                    attempts: attempt,
                    source,
                })
            }
        }
    }
}
