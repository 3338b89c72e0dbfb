//! Core credential type definitions.
//!
//! These types are the vocabulary shared between the pool, the harness and
//! whatever issuance layer sits on top. `Amount` and `CredentialId` are
//! `Copy`; `Credential` is not, on purpose.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ZeroValue
// ---------------------------------------------------------------------------

/// The single predicate the pool asks of a credential.
///
/// Implement this for the issuance layer's credential type and the pool
/// works with it unchanged.
pub trait ZeroValue {
    /// Returns `true` if the credential carries no value and may be used as
    /// filler.
    fn is_zero(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// An amount claim carried by a credential, in the smallest unit of the
/// credential's attribute (satoshis for amount credentials, vbytes for
/// vsize credentials).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Amount(u64);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Wraps a raw amount.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw amount.
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Returns `true` if this amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// CredentialId
// ---------------------------------------------------------------------------

/// Local handle for a credential.
///
/// This is the client's bookkeeping key, not the serial number the
/// coordinator tracks. It exists so tests and logs can tell two otherwise
/// identical zero credentials apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CredentialId(Uuid);

impl CredentialId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the raw bytes of the id.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// An issued credential.
///
/// Immutable once constructed. The MAC bytes are opaque here; producing and
/// checking them is the issuance layer's job.
pub struct Credential {
    id: CredentialId,
    amount: Amount,
    mac: Vec<u8>,
}

impl Credential {
    /// Wraps a freshly issued credential.
    pub fn new(amount: Amount, mac: Vec<u8>) -> Self {
        Self {
            id: CredentialId::generate(),
            amount,
            mac,
        }
    }

    /// Wraps a credential under a caller-chosen id.
    pub fn with_id(id: CredentialId, amount: Amount, mac: Vec<u8>) -> Self {
        Self { id, amount, mac }
    }

    /// Shorthand for a zero-value credential with an empty MAC.
    pub fn zero() -> Self {
        Self::new(Amount::ZERO, Vec::new())
    }

    pub fn id(&self) -> CredentialId {
        self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn mac(&self) -> &[u8] {
        &self.mac
    }
}

impl ZeroValue for Credential {
    fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Eight bytes of MAC is plenty to eyeball in a log line.
        let mac_prefix = &self.mac[..self.mac.len().min(8)];
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("amount", &self.amount)
            .field("mac", &hex::encode(mac_prefix))
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "credential {} ({})", self.id, self.amount)
    }
}
