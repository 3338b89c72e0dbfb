//! # Protocol Configuration & Constants
//!
//! Every magic number in the pool lives here. The credential width is the
//! one that actually matters: it is baked into the coordinator's range-proof
//! and MAC structure, so a client that disagrees with the coordinator about
//! it does not get a second chance. It gets a rejected request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Protocol Constants
// ---------------------------------------------------------------------------

/// Number of credentials in every request and response vector (WabiSabi's
/// `k`). Two is what the deployed coordinators use: enough to split or merge
/// one balance per request, small enough to keep the proofs cheap.
pub const CREDENTIAL_NUMBER: usize = 2;

/// Protocol identifier, used by the harness in log lines and MAC domain
/// separation.
pub const PROTOCOL_NAME: &str = "WabiSabi";

/// Crate version, assembled at compile time.
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// Harness Defaults
// ---------------------------------------------------------------------------

/// Default number of simulated rounds.
pub const DEFAULT_SIM_ROUNDS: u32 = 16;

/// Default number of rounds allowed in flight at once. Four matches what a
/// busy wallet sees when it is registered in several coordinator rounds.
pub const DEFAULT_SIM_CONCURRENCY: usize = 4;

/// How many times a round re-requests zero credentials after hitting an
/// exhausted pool before giving up on the round.
pub const DEFAULT_MAX_ROUND_ATTEMPTS: u32 = 3;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors raised while validating a [`PoolConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A zero-width vector cannot carry anything, real or filler.
    #[error("credential_number must be at least 1, got {0}")]
    InvalidCredentialNumber(usize),
}

// ---------------------------------------------------------------------------
// PoolConfig
// ---------------------------------------------------------------------------

/// Tunable parameters for a [`CredentialPool`](crate::pool::CredentialPool).
///
/// There is exactly one knob today. It is still a struct so that harness
/// config files stay forward compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Fixed width `N` of every credential vector this pool assembles.
    pub credential_number: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            credential_number: CREDENTIAL_NUMBER,
        }
    }
}

impl PoolConfig {
    /// Creates a config with an explicit width.
    pub fn with_credential_number(credential_number: usize) -> Self {
        Self { credential_number }
    }

    /// Rejects widths the padding algorithm cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credential_number == 0 {
            return Err(ConfigError::InvalidCredentialNumber(self.credential_number));
        }
        Ok(())
    }
}
