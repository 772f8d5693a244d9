//! Request signing utilities for authenticated API calls.
//!
//! This module derives Ed25519 keys from seeds, canonicalizes HTTP requests,
//! and signs and verifies them.

pub mod canonical;
pub mod keys;
pub mod signing;

pub use canonical::*;
pub use keys::*;
pub use signing::*;
