//! # Pool Module — Zero-Credential Reservoir & Fixed-Width Padding
//!
//! Every WabiSabi request carries exactly `N` credentials, and every
//! response returns exactly `N`. The coordinator must not be able to tell a
//! wallet presenting one real balance from a wallet presenting two, so the
//! empty slots get filled with zero-value credentials. Those fillers are
//! real credentials: the coordinator issued them, it tracks their serial
//! numbers, and each one can be presented exactly once.
//!
//! ## Architecture
//!
//! ```text
//! zero_pool.rs — CredentialPool: register issued credentials, pad requests
//! vector.rs    — CredentialVector: an ordered vector of exactly N credentials
//! error.rs     — PoolError: exhaustion, oversized requests, width mismatches
//! ```
//!
//! ## Lifecycle of a filler
//!
//! ```text
//!   coordinator response ──► register_zero_value_credentials ──► value creds
//!                                      │
//!                                      ▼ (zero creds, FIFO)
//!                               ┌─────────────┐
//!                               │   queue     │
//!                               └──────┬──────┘
//!                                      ▼
//!   real creds (0..N) ──► complete_with_zero_credentials ──► CredentialVector
//! ```
//!
//! ## Design Principles
//!
//! 1. **Registration is eager.** The whole batch is partitioned before the
//!    call returns. No iterator with hidden side effects, so no way to
//!    forget half the fillers by dropping it early.
//!
//! 2. **Exhaustion fails fast.** If the queue cannot cover the padding, the
//!    call returns [`PoolError::PoolExhausted`] immediately and the pool is
//!    left untouched. Waiting for fresh fillers is the round controller's
//!    decision, not ours.
//!
//! 3. **Reservation is atomic.** One lock acquisition checks the fill level
//!    and drains the fillers, so concurrent rounds never share a credential.

pub mod vector;
pub mod zero_pool;

mod error;

pub use error::PoolError;
pub use vector::CredentialVector;
pub use zero_pool::{CredentialPool, PoolStats};
