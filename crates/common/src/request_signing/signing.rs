//! Request signing and verification utilities.
//!
//! This module signs canonical request bytes with Ed25519 and returns the
//! authentication headers the API expects. Signatures are lowercase hex.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use error_stack::{Report, ResultExt};
use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::constants::{
    HEADER_API_CANONICAL_VERSION, HEADER_API_KEY_ID, HEADER_API_SIGNATURE,
    HEADER_API_SIGNATURE_ALG, HEADER_API_TIMESTAMP, SIGNATURE_ALGORITHM,
};
use crate::encoding::{from_hex_array, to_hex};
use crate::error::SignerError;
use crate::settings::Settings;

use super::canonical::{canonicalize, CANONICAL_VERSION};
use super::keys::KeyPair;

// `required_header` reads values back with `to_str`, which only accepts
// visible ASCII, so reject anything wider here.
fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, Report<SignerError>> {
    let invalid = || {
        Report::new(SignerError::InvalidHeaderValue {
            header: name.as_str().to_string(),
        })
    };
    if !value.is_ascii() {
        return Err(invalid());
    }
    HeaderValue::from_str(value).map_err(|_| invalid())
}

fn required_header<'a>(
    headers: &'a HeaderMap,
    name: &HeaderName,
) -> Result<&'a str, Report<SignerError>> {
    let value = headers.get(name).ok_or_else(|| {
        Report::new(SignerError::MissingHeader {
            header: name.as_str().to_string(),
        })
    })?;
    value.to_str().map_err(|_| {
        Report::new(SignerError::InvalidHeaderValue {
            header: name.as_str().to_string(),
        })
    })
}

/// Signs `message` and returns the signature as lowercase hex.
///
/// # Errors
///
/// Returns [`SignerError::SigningFailure`] if the signature primitive fails.
pub fn sign_message(key_pair: &KeyPair, message: &[u8]) -> Result<String, Report<SignerError>> {
    let signature = key_pair.sign(message)?;
    Ok(to_hex(signature.to_bytes()))
}

/// Signs a request and returns the authentication headers.
///
/// The headers carry the key id, timestamp, hex signature, algorithm and
/// canonicalization version. The caller adds `Content-Type` itself.
///
/// # Errors
///
/// Returns [`SignerError::InvalidHeaderValue`] if `key_id` is not a valid
/// header value, or [`SignerError::SigningFailure`] if signing fails.
pub fn sign_request(
    key_pair: &KeyPair,
    key_id: &str,
    method: &str,
    path: &str,
    body: &[u8],
    timestamp: i64,
) -> Result<HeaderMap, Report<SignerError>> {
    let key_id_value = header_value(&HEADER_API_KEY_ID, key_id)?;

    let canonical = canonicalize(method, path, body, key_id, timestamp);
    let signature = sign_message(key_pair, &canonical)
        .attach(format!("while signing {} {}", method, path))?;

    log::debug!(
        "Signed {} {} with key id {} at {} ({} canonical bytes)",
        method,
        path,
        key_id,
        timestamp,
        canonical.len()
    );

    let mut headers = HeaderMap::with_capacity(5);
    headers.insert(HEADER_API_KEY_ID, key_id_value);
    headers.insert(HEADER_API_TIMESTAMP, HeaderValue::from(timestamp));
    headers.insert(
        HEADER_API_SIGNATURE,
        header_value(&HEADER_API_SIGNATURE, &signature)?,
    );
    headers.insert(
        HEADER_API_SIGNATURE_ALG,
        HeaderValue::from_static(SIGNATURE_ALGORITHM),
    );
    headers.insert(
        HEADER_API_CANONICAL_VERSION,
        HeaderValue::from_static(CANONICAL_VERSION),
    );

    Ok(headers)
}

/// Holds the configured key pair and key id for one CLI invocation.
pub struct RequestSigner {
    key_pair: KeyPair,
    pub kid: String,
}

impl RequestSigner {
    #[must_use]
    pub fn new(key_pair: KeyPair, kid: impl Into<String>) -> Self {
        Self {
            key_pair,
            kid: kid.into(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the configured seed is not a valid hex seed.
    pub fn from_settings(settings: &Settings) -> Result<Self, Report<SignerError>> {
        let key_pair = settings.key_pair()?;
        Ok(Self::new(key_pair, settings.api_key.id.clone()))
    }

    #[must_use]
    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    /// Signs a raw payload and returns the hex signature.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::SigningFailure`] if signing fails.
    pub fn sign(&self, payload: &[u8]) -> Result<String, Report<SignerError>> {
        sign_message(&self.key_pair, payload)
    }

    /// # Errors
    ///
    /// See [`sign_request`].
    pub fn sign_request(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
        timestamp: i64,
    ) -> Result<HeaderMap, Report<SignerError>> {
        sign_request(&self.key_pair, &self.kid, method, path, body, timestamp)
    }

    /// Signs a request stamped with the current Unix time.
    ///
    /// # Errors
    ///
    /// See [`sign_request`].
    pub fn sign_request_now(
        &self,
        method: &str,
        path: &str,
        body: &[u8],
    ) -> Result<HeaderMap, Report<SignerError>> {
        let timestamp = chrono::Utc::now().timestamp();
        self.sign_request(method, path, body, timestamp)
    }
}

/// Parses a hex-encoded Ed25519 public key.
///
/// # Errors
///
/// Returns [`SignerError::InvalidEncoding`] if the key is not 32 bytes of hex
/// or is not a valid curve point.
pub fn parse_public_key(public_key_hex: &str) -> Result<VerifyingKey, Report<SignerError>> {
    let bytes: [u8; 32] = from_hex_array(public_key_hex).attach("while decoding public key")?;
    VerifyingKey::from_bytes(&bytes).map_err(|e| {
        Report::new(SignerError::InvalidEncoding {
            message: format!("invalid Ed25519 public key: {}", e),
        })
    })
}

/// Verifies a hex signature over `payload`.
///
/// Returns `Ok(false)` when the signature is well-formed but does not match.
///
/// # Errors
///
/// Returns [`SignerError::InvalidEncoding`] if the signature or public key
/// cannot be decoded.
pub fn verify_signature(
    payload: &[u8],
    signature_hex: &str,
    public_key: &VerifyingKey,
) -> Result<bool, Report<SignerError>> {
    let signature_bytes: [u8; 64] =
        from_hex_array(signature_hex).attach("while decoding signature")?;
    let signature = Signature::from_bytes(&signature_bytes);

    Ok(public_key.verify(payload, &signature).is_ok())
}

/// Verifies the authentication headers produced by [`sign_request`].
///
/// # Errors
///
/// Returns [`SignerError::MissingHeader`] if a signing header is absent,
/// [`SignerError::UnsupportedSignatureScheme`] for an unknown algorithm or
/// canonicalization version, and [`SignerError::InvalidEncoding`] for a
/// malformed timestamp or signature.
pub fn verify_request(
    headers: &HeaderMap,
    public_key: &VerifyingKey,
    method: &str,
    path: &str,
    body: &[u8],
) -> Result<bool, Report<SignerError>> {
    let algorithm = required_header(headers, &HEADER_API_SIGNATURE_ALG)?;
    if algorithm != SIGNATURE_ALGORITHM {
        return Err(Report::new(SignerError::UnsupportedSignatureScheme {
            scheme: algorithm.to_string(),
        }));
    }

    let version = required_header(headers, &HEADER_API_CANONICAL_VERSION)?;
    if version != CANONICAL_VERSION {
        return Err(Report::new(SignerError::UnsupportedSignatureScheme {
            scheme: format!("{} canonical version {}", algorithm, version),
        }));
    }

    let key_id = required_header(headers, &HEADER_API_KEY_ID)?;
    let timestamp_str = required_header(headers, &HEADER_API_TIMESTAMP)?;
    let timestamp: i64 = timestamp_str.parse().map_err(|_| {
        Report::new(SignerError::InvalidEncoding {
            message: format!("timestamp '{}' is not an integer", timestamp_str),
        })
    })?;
    let signature = required_header(headers, &HEADER_API_SIGNATURE)?;

    let canonical = canonicalize(method, path, body, key_id, timestamp);
    verify_signature(&canonical, signature, public_key)
}
