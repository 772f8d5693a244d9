//! Signing core for authenticated API calls and transaction approvals.
//!
//! Keys are Ed25519, derived from a 32-byte seed configured as hex.
//!
//! # Modules
//!
//! - [`approval`]: Approval challenge responses (message, digest, signature)
//! - [`constants`]: Header names and protocol literals
//! - [`encoding`]: Lowercase hex conversions
//! - [`error`]: Error types carried in `error_stack::Report`
//! - [`request_signing`]: Key derivation, request canonicalization and signing
//! - [`settings`]: Configuration loading and validation
//! - [`test_support`]: Testing utilities

pub mod approval;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod request_signing;
pub mod settings;
