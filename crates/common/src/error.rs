//! Error types for the signing core.
//!
//! Every fallible operation returns `Result<T, Report<SignerError>>`. The
//! `Report` carries the operation and field context through `attach` and
//! `change_context`; the CLI formats it for the user.

use derive_more::{Display, Error};

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum SignerError {
    /// Seed bytes do not match the Ed25519 secret key length.
    #[display("Invalid seed length: expected {expected} bytes, got {actual}")]
    InvalidSeedLength { expected: usize, actual: usize },

    /// Malformed hex input.
    #[display("Invalid encoding: {message}")]
    InvalidEncoding { message: String },

    #[display("Unsupported approval type: {approval_type}")]
    UnsupportedApprovalType { approval_type: String },

    /// The signature primitive failed. Not retryable.
    #[display("Signing failure: {message}")]
    SigningFailure { message: String },

    #[display("Malformed challenge: {field}")]
    MalformedChallenge { field: String },

    #[display("Malformed payload: {field}")]
    MalformedPayload { field: String },

    /// The transaction payload lacks an attribute named by the challenge.
    #[display("Transaction payload is missing attribute '{attr}'")]
    MissingAttribute { attr: String },

    #[display("Value cannot be sent as header '{header}'")]
    InvalidHeaderValue { header: String },

    #[display("Missing header '{header}'")]
    MissingHeader { header: String },

    #[display("Unsupported signature scheme: {scheme}")]
    UnsupportedSignatureScheme { scheme: String },

    #[display("Configuration error: {message}")]
    Configuration { message: String },
}
