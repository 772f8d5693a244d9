use http::header::HeaderName;

pub const HEADER_API_KEY_ID: HeaderName = HeaderName::from_static("x-api-key-id");
pub const HEADER_API_TIMESTAMP: HeaderName = HeaderName::from_static("x-api-timestamp");
pub const HEADER_API_SIGNATURE: HeaderName = HeaderName::from_static("x-api-signature");
pub const HEADER_API_SIGNATURE_ALG: HeaderName = HeaderName::from_static("x-api-signature-alg");
pub const HEADER_API_CANONICAL_VERSION: HeaderName =
    HeaderName::from_static("x-api-canonical-version");

/// Value of `x-api-signature-alg`.
pub const SIGNATURE_ALGORITHM: &str = "ed25519";

/// The only approval scheme this crate answers.
pub const APPROVAL_TYPE_ED25519: &str = "DSA_ED25519";

/// Prefix for environment variables overriding settings, e.g. `API_SIGNER__API_KEY__SEED`.
pub const ENV_PREFIX: &str = "API_SIGNER";
