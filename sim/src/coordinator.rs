//! # Mock Coordinator
//!
//! Stands in for a WabiSabi coordinator so the pool can be driven through
//! realistic rounds without proofs or a network. It keeps the three checks
//! that matter to the pool:
//!
//! 1. Every presented and issued vector has exactly the protocol width.
//! 2. Every presented credential carries a MAC this coordinator produced.
//! 3. No credential is presented twice (serial-number double-spend check).
//!
//! MACs are a keyed BLAKE3 over the credential id and amount. That is not
//! an algebraic MAC and proves nothing in zero knowledge, but it is enough
//! to catch a credential that did not come from here.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use rand::RngCore;
use thiserror::Error;
use tracing::debug;

use wabisabi_pool::config::PROTOCOL_NAME;
use wabisabi_pool::{Amount, Credential, CredentialId, CredentialVector, PoolError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons the mock coordinator rejects a request.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// The presented vector or requested amounts had the wrong width.
    #[error("request width {got} does not match protocol width {expected}")]
    WidthMismatch {
        /// Protocol width.
        expected: usize,
        /// Width actually presented.
        got: usize,
    },

    /// A presented credential was not issued by this coordinator.
    #[error("credential {0} carries an invalid MAC")]
    InvalidMac(CredentialId),

    /// A presented credential has already been spent.
    #[error("credential {0} presented twice")]
    DoubleSpend(CredentialId),

    /// Requested amounts do not balance against presented ones.
    #[error("unbalanced request: presented {presented} + deposit {deposit} != requested {requested} + withdrawal {withdrawal}")]
    Unbalanced {
        presented: u64,
        deposit: u64,
        requested: u64,
        withdrawal: u64,
    },

    /// The issued vector failed the width check on the way out.
    #[error(transparent)]
    Issuance(#[from] PoolError),
}

// ---------------------------------------------------------------------------
// MockCoordinator
// ---------------------------------------------------------------------------

/// An in-process coordinator that issues and verifies credentials.
pub struct MockCoordinator {
    width: usize,
    issuer_key: [u8; 32],
    spent: Mutex<HashSet<CredentialId>>,
    issued_total: AtomicU64,
}

impl MockCoordinator {
    /// Creates a coordinator with a fresh issuer key drawn from `rng`.
    pub fn new(width: usize, rng: &mut impl RngCore) -> Self {
        let mut issuer_key = [0u8; 32];
        rng.fill_bytes(&mut issuer_key);
        Self {
            width,
            issuer_key,
            spent: Mutex::new(HashSet::new()),
            issued_total: AtomicU64::new(0),
        }
    }

    /// Total credentials issued so far.
    pub fn issued_total(&self) -> u64 {
        self.issued_total.load(Ordering::Relaxed)
    }

    /// Answers a null request: `width` fresh zero-value credentials.
    pub fn issue_zero(&self) -> Result<CredentialVector, CoordinatorError> {
        self.issue(&vec![Amount::ZERO; self.width])
    }

    /// Input registration: spends `presented` and issues `amount` as one
    /// value credential, padded with zero credentials to the full width.
    pub fn register_input(
        &self,
        presented: CredentialVector,
        amount: Amount,
    ) -> Result<CredentialVector, CoordinatorError> {
        let mut requested = vec![Amount::ZERO; self.width];
        requested[0] = amount;
        self.reissue(presented, &requested, amount, Amount::ZERO)
    }

    /// Output registration: spends `presented`, withdraws its whole value
    /// into an output and issues only zero credentials back.
    pub fn register_output(
        &self,
        presented: CredentialVector,
    ) -> Result<CredentialVector, CoordinatorError> {
        let withdrawal = presented.iter().map(|c| c.amount().value()).sum::<u64>();
        let requested = vec![Amount::ZERO; self.width];
        self.reissue(presented, &requested, Amount::ZERO, Amount::new(withdrawal))
    }

    /// Verifies and spends `presented`, then issues `requested`.
    ///
    /// The balance rule is
    /// `sum(presented) + deposit == sum(requested) + withdrawal`.
    pub fn reissue(
        &self,
        presented: CredentialVector,
        requested: &[Amount],
        deposit: Amount,
        withdrawal: Amount,
    ) -> Result<CredentialVector, CoordinatorError> {
        if presented.width() != self.width {
            return Err(CoordinatorError::WidthMismatch {
                expected: self.width,
                got: presented.width(),
            });
        }
        if requested.len() != self.width {
            return Err(CoordinatorError::WidthMismatch {
                expected: self.width,
                got: requested.len(),
            });
        }

        for credential in &presented {
            if credential.mac() != self.mac(credential.id(), credential.amount()).as_slice() {
                return Err(CoordinatorError::InvalidMac(credential.id()));
            }
        }

        let presented_sum: u64 = presented.iter().map(|c| c.amount().value()).sum();
        let requested_sum: u64 = requested.iter().map(Amount::value).sum();
        if presented_sum + deposit.value() != requested_sum + withdrawal.value() {
            return Err(CoordinatorError::Unbalanced {
                presented: presented_sum,
                deposit: deposit.value(),
                requested: requested_sum,
                withdrawal: withdrawal.value(),
            });
        }

        {
            let mut spent = self.spent.lock();
            if let Some(reused) = presented.iter().find(|c| spent.contains(&c.id())) {
                return Err(CoordinatorError::DoubleSpend(reused.id()));
            }
            spent.extend(presented.iter().map(Credential::id));
        }

        self.issue(requested)
    }

    fn issue(&self, amounts: &[Amount]) -> Result<CredentialVector, CoordinatorError> {
        let credentials: Vec<Credential> = amounts
            .iter()
            .map(|&amount| {
                let id = CredentialId::generate();
                Credential::with_id(id, amount, self.mac(id, amount))
            })
            .collect();
        let vector = CredentialVector::from_issued(credentials, self.width)?;

        self.issued_total
            .fetch_add(vector.width() as u64, Ordering::Relaxed);
        debug!(
            width = vector.width(),
            zero = vector.zero_count(),
            "issued credentials"
        );
        Ok(vector)
    }

    fn mac(&self, id: CredentialId, amount: Amount) -> Vec<u8> {
        let mut hasher = blake3::Hasher::new_keyed(&self.issuer_key);
        hasher.update(PROTOCOL_NAME.as_bytes());
        hasher.update(id.as_bytes());
        hasher.update(&amount.value().to_le_bytes());
        hasher.finalize().as_bytes().to_vec()
    }
}
