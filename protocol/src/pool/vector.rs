//! Fixed-width credential vectors.
//!
//! A [`CredentialVector`] is exactly `N` credentials in protocol order.
//! Positions bind to the coordinator's range-proof and MAC structure, so
//! the order of a vector is never changed after construction.

use std::slice;

use super::error::PoolError;
use crate::credential::{Credential, ZeroValue};

/// An ordered vector of exactly `N` credentials.
///
/// Built either by [`CredentialPool::complete_with_zero_credentials`]
/// (outgoing requests) or by [`CredentialVector::from_issued`] (incoming
/// coordinator responses).
///
/// [`CredentialPool::complete_with_zero_credentials`]:
///     super::CredentialPool::complete_with_zero_credentials
#[derive(Debug)]
pub struct CredentialVector<C = Credential> {
    slots: Vec<C>,
}

impl<C> CredentialVector<C> {
    /// Wraps slots the pool has already sized.
    pub(crate) fn from_slots(slots: Vec<C>) -> Self {
        Self { slots }
    }

    /// Validates a coordinator response against the protocol width.
    pub fn from_issued(credentials: Vec<C>, width: usize) -> Result<Self, PoolError<C>> {
        if credentials.len() != width {
            return Err(PoolError::WidthMismatch {
                expected: width,
                got: credentials.len(),
            });
        }
        Ok(Self::from_slots(credentials))
    }

    /// Number of slots. Always the protocol width.
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> slice::Iter<'_, C> {
        self.slots.iter()
    }

    pub fn as_slice(&self) -> &[C] {
        &self.slots
    }

    /// Consumes the vector, yielding its slots in protocol order.
    pub fn into_vec(self) -> Vec<C> {
        self.slots
    }
}

impl<C: ZeroValue> CredentialVector<C> {
    /// Number of zero-value slots.
    pub fn zero_count(&self) -> usize {
        self.slots.iter().filter(|c| c.is_zero()).count()
    }
}

impl<C> IntoIterator for CredentialVector<C> {
    type Item = C;
    type IntoIter = std::vec::IntoIter<C>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

impl<'a, C> IntoIterator for &'a CredentialVector<C> {
    type Item = &'a C;
    type IntoIter = slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
