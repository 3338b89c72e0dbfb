//! # Credential Module
//!
//! The pool never looks inside a credential. Serial numbers, MACs and the
//! attribute commitments all belong to the issuance layer. The only thing
//! the pool needs to know is whether a credential is worth anything, and
//! that question is the [`ZeroValue`] trait.
//!
//! [`Credential`] is the concrete token the harness and the tests push
//! around. It is deliberately not `Clone`: a credential spent in two
//! request vectors is a double-spend the coordinator will reject and log,
//! so the type system gets the first shot at stopping it.

pub mod types;

pub use types::{Amount, Credential, CredentialId, ZeroValue};
