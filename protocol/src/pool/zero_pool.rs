//! Thread-safe zero-value credential pool.
//!
//! One pool is shared by every round a wallet is registered in. Producers
//! (registration after each coordinator response) and consumers (padding
//! before each request) interleave freely. The only lock is the one around
//! the queue itself, and it is never held across anything slower than a
//! `VecDeque` operation.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::PoolError;
use super::vector::CredentialVector;
use crate::config::{ConfigError, PoolConfig};
use crate::credential::{Credential, ZeroValue};

// ---------------------------------------------------------------------------
// PoolStats
// ---------------------------------------------------------------------------

/// Point-in-time counters for a pool.
///
/// The totals are monotonic over the life of the pool. `available` is a
/// snapshot and may be stale by the time the caller reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolStats {
    /// Zero-value credentials currently queued.
    pub available: usize,
    /// Zero-value credentials ever registered.
    pub registered_total: u64,
    /// Zero-value credentials handed out as filler.
    pub consumed_total: u64,
    /// Assembly calls that failed with [`PoolError::PoolExhausted`].
    pub exhausted_total: u64,
}

// ---------------------------------------------------------------------------
// CredentialPool
// ---------------------------------------------------------------------------

/// A reservoir of zero-value credentials used to pad request vectors to the
/// protocol width.
///
/// Share it behind an `Arc`; every method takes `&self`.
pub struct CredentialPool<C = Credential> {
    /// Fillers in registration order. Front is oldest.
    zero_credentials: Mutex<VecDeque<C>>,

    config: PoolConfig,

    registered_total: AtomicU64,
    consumed_total: AtomicU64,
    exhausted_total: AtomicU64,
}

impl<C> fmt::Debug for CredentialPool<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("available", &self.zero_credentials.lock().len())
            .field("config", &self.config)
            .finish()
    }
}

impl<C: ZeroValue> CredentialPool<C> {
    /// Creates an empty pool with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCredentialNumber`] for a zero width.
    pub fn new(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(width = config.credential_number, "creating credential pool");
        Ok(Self::with_validated(config))
    }

    /// Creates an empty pool at the protocol's default width.
    pub fn with_default_config() -> Self {
        Self::with_validated(PoolConfig::default())
    }

    fn with_validated(config: PoolConfig) -> Self {
        Self {
            zero_credentials: Mutex::new(VecDeque::new()),
            config,
            registered_total: AtomicU64::new(0),
            consumed_total: AtomicU64::new(0),
            exhausted_total: AtomicU64::new(0),
        }
    }

    /// Keeps the zero-value credentials of a coordinator response and
    /// returns the value-bearing ones.
    ///
    /// The whole input is partitioned before this returns: zero-value
    /// credentials are queued in input order, and the value-bearing ones
    /// come back in input order. Empty input is a no-op.
    ///
    /// A response wider than the protocol width is still accepted (the
    /// credentials are valid whatever the coordinator did) but logged.
    pub fn register_zero_value_credentials<I>(&self, credentials: I) -> Vec<C>
    where
        I: IntoIterator<Item = C>,
    {
        let (zero, valuable): (Vec<C>, Vec<C>) =
            credentials.into_iter().partition(|c| c.is_zero());

        let issued = zero.len() + valuable.len();
        if issued > self.config.credential_number {
            warn!(
                issued,
                width = self.config.credential_number,
                "registering more credentials than the vector width"
            );
        }

        if zero.is_empty() {
            return valuable;
        }

        let zero_count = zero.len();
        let available = {
            let mut queue = self.zero_credentials.lock();
            queue.extend(zero);
            queue.len()
        };
        self.registered_total
            .fetch_add(zero_count as u64, Ordering::Relaxed);

        debug!(
            zero = zero_count,
            value = valuable.len(),
            available,
            "registered issued credentials"
        );

        valuable
    }

    /// Pads `credentials` with pooled zero-value credentials into a vector
    /// of exactly the protocol width.
    ///
    /// The real credentials occupy the trailing slots in the order given.
    /// The leading slots are filled from the pool, oldest first, so slot 0
    /// holds the longest-queued filler.
    ///
    /// # Errors
    ///
    /// - [`PoolError::OversizedRequest`] if more credentials are supplied
    ///   than the vector has slots.
    /// - [`PoolError::PoolExhausted`] if the pool cannot cover the padding.
    ///   The pool is left untouched.
    ///
    /// Both errors carry the supplied credentials back to the caller.
    pub fn complete_with_zero_credentials<I>(
        &self,
        credentials: I,
    ) -> Result<CredentialVector<C>, PoolError<C>>
    where
        I: IntoIterator<Item = C>,
    {
        let width = self.config.credential_number;
        let real: Vec<C> = credentials.into_iter().collect();

        if real.len() > width {
            return Err(PoolError::OversizedRequest {
                supplied: real.len(),
                width,
                credentials: real,
            });
        }

        let required = width - real.len();
        let fillers: Vec<C> = {
            let mut queue = self.zero_credentials.lock();
            if queue.len() < required {
                let available = queue.len();
                drop(queue);

                self.exhausted_total.fetch_add(1, Ordering::Relaxed);
                warn!(required, available, "zero credential pool exhausted");
                return Err(PoolError::PoolExhausted {
                    required,
                    available,
                    credentials: real,
                });
            }
            queue.drain(..required).collect()
        };
        self.consumed_total
            .fetch_add(required as u64, Ordering::Relaxed);

        debug!(
            real = real.len(),
            filler = required,
            "assembled credential vector"
        );

        let mut slots = Vec::with_capacity(width);
        slots.extend(fillers);
        slots.extend(real);
        Ok(CredentialVector::from_slots(slots))
    }
}

impl<C> CredentialPool<C> {
    /// Number of zero-value credentials currently queued.
    pub fn len(&self) -> usize {
        self.zero_credentials.lock().len()
    }

    /// Returns `true` if no fillers are queued.
    pub fn is_empty(&self) -> bool {
        self.zero_credentials.lock().is_empty()
    }

    /// The fixed width of every vector this pool assembles.
    pub fn width(&self) -> usize {
        self.config.credential_number
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            available: self.len(),
            registered_total: self.registered_total.load(Ordering::Relaxed),
            consumed_total: self.consumed_total.load(Ordering::Relaxed),
            exhausted_total: self.exhausted_total.load(Ordering::Relaxed),
        }
    }

    /// Drops every queued filler and returns how many there were.
    ///
    /// Fillers are only spendable against the coordinator key that issued
    /// them. Call this when the session ends or the key rotates.
    pub fn discard_all(&self) -> usize {
        let discarded = {
            let mut queue = self.zero_credentials.lock();
            let n = queue.len();
            queue.clear();
            n
        };
        if discarded > 0 {
            info!(discarded, "discarded pooled zero credentials");
        }
        discarded
    }
}

impl<C: ZeroValue> Default for CredentialPool<C> {
    fn default() -> Self {
        Self::with_default_config()
    }
}
