// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # WabiSabi Pool — Zero-Credential Padding
//!
//! WabiSabi coordinators issue and accept credentials in vectors of a fixed
//! width. A wallet that only has one real balance to present still presents
//! `N` credentials; the rest are zero-value fillers the coordinator issued
//! earlier. If the padding ever came up short, or reused a filler, or put
//! the real credentials in a telling position, the coordinator would learn
//! exactly what the fixed width is there to hide.
//!
//! This crate is that padding, and nothing else. Proofs, MACs, transport and
//! the round state machine are somebody else's problem.
//!
//! ## Architecture
//!
//! - **credential** — The `ZeroValue` seam and a concrete `Credential`.
//! - **pool** — The shared zero-credential queue and fixed-width assembly.
//! - **config** — The protocol width and pool configuration.
//!
//! ## Quick tour
//!
//! ```
//! use wabisabi_pool::config::PoolConfig;
//! use wabisabi_pool::credential::{Amount, Credential};
//! use wabisabi_pool::pool::CredentialPool;
//!
//! let pool = CredentialPool::new(PoolConfig::with_credential_number(3)).unwrap();
//!
//! // A coordinator response: two fillers and one real balance.
//! let issued = vec![
//!     Credential::zero(),
//!     Credential::new(Amount::new(50_000), Vec::new()),
//!     Credential::zero(),
//! ];
//! let valuable = pool.register_zero_value_credentials(issued);
//! assert_eq!(valuable.len(), 1);
//! assert_eq!(pool.len(), 2);
//!
//! // Next request: spend the real balance, pad with the fillers.
//! let request = pool.complete_with_zero_credentials(valuable).unwrap();
//! assert_eq!(request.width(), 3);
//! assert!(pool.is_empty());
//! ```

pub mod config;
pub mod credential;
pub mod pool;

pub use config::{ConfigError, PoolConfig, CREDENTIAL_NUMBER};
pub use credential::{Amount, Credential, CredentialId, ZeroValue};
pub use pool::{CredentialPool, CredentialVector, PoolError, PoolStats};
