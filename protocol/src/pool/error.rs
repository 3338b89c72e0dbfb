//! Error types for the credential pool.
//!
//! Both request-side failures hand the caller's credentials back. They are
//! not `Clone`, so an error that swallowed them would burn real balances.

use thiserror::Error;

use crate::credential::Credential;

/// Errors returned by pool and vector operations.
#[derive(Debug, Error)]
pub enum PoolError<C = Credential> {
    /// The queue holds fewer zero-value credentials than the padding needs.
    /// Nothing was removed from the pool.
    #[error(
        "zero credential pool exhausted: {required} fillers required, {available} available"
    )]
    PoolExhausted {
        /// Fillers the request needed.
        required: usize,
        /// Fillers the pool held at the time of the call.
        available: usize,
        /// The real credentials the caller supplied, unconsumed.
        credentials: Vec<C>,
    },

    /// More real credentials were supplied than the vector has slots.
    #[error("oversized request: {supplied} credentials supplied, vector width is {width}")]
    OversizedRequest {
        /// Number of credentials supplied.
        supplied: usize,
        /// The configured vector width.
        width: usize,
        /// The supplied credentials, unconsumed.
        credentials: Vec<C>,
    },

    /// An issued vector did not have the protocol width.
    #[error("credential vector width mismatch: expected {expected}, got {got}")]
    WidthMismatch {
        /// The configured vector width.
        expected: usize,
        /// The width actually received.
        got: usize,
    },
}

impl<C> PoolError<C> {
    /// Recovers the caller's credentials from a failed request. Returns an
    /// empty vector for errors that never took ownership of any.
    pub fn into_credentials(self) -> Vec<C> {
        match self {
            Self::PoolExhausted { credentials, .. } | Self::OversizedRequest { credentials, .. } => {
                credentials
            }
            Self::WidthMismatch { .. } => Vec::new(),
        }
    }

    /// Returns `true` for the one failure a round controller can recover
    /// from by fetching more zero-value credentials.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::PoolExhausted { .. })
    }
}
