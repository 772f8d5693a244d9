//! Ed25519 key derivation from seeds.
//!
//! The seed is the Ed25519 secret key itself (RFC 8032 key generation), so
//! any external verifier holding the same seed reproduces the same public key.

use std::fmt;

use ed25519_dalek::{
    Signature, SignatureError, Signer as Ed25519Signer, SigningKey, VerifyingKey,
    SECRET_KEY_LENGTH,
};
use error_stack::{Report, ResultExt};
use jose_jwk::{
    jose_jwa::{Algorithm, Signing},
    Jwk, Key, Okp, OkpCurves, Parameters,
};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::encoding::{from_hex, to_hex};
use crate::error::SignerError;

/// Byte length of an Ed25519 seed.
pub const SEED_LENGTH: usize = SECRET_KEY_LENGTH;

/// Secret seed material. `Debug` output never includes the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LENGTH]);

impl Seed {
    /// # Errors
    ///
    /// Returns [`SignerError::InvalidSeedLength`] unless `bytes` is exactly
    /// [`SEED_LENGTH`] long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Report<SignerError>> {
        let array: [u8; SEED_LENGTH] = bytes.try_into().map_err(|_| {
            Report::new(SignerError::InvalidSeedLength {
                expected: SEED_LENGTH,
                actual: bytes.len(),
            })
        })?;
        Ok(Self(array))
    }

    /// # Errors
    ///
    /// Returns [`SignerError::InvalidEncoding`] for malformed hex and
    /// [`SignerError::InvalidSeedLength`] for a well-formed seed of the wrong size.
    pub fn from_hex(seed_hex: &str) -> Result<Self, Report<SignerError>> {
        let bytes = from_hex(seed_hex).attach("while decoding seed")?;
        Self::from_bytes(&bytes)
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        to_hex(self.0)
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Generates a fresh seed from the operating system CSPRNG.
#[must_use]
pub fn generate_seed() -> Seed {
    let mut bytes = [0u8; SEED_LENGTH];
    OsRng.fill_bytes(&mut bytes);
    Seed(bytes)
}

/// Signing key and its public half, derived from a [`Seed`].
///
/// The signing key is only reachable through [`KeyPair::sign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    #[must_use]
    pub fn from_seed(seed: &Seed) -> Self {
        let signing_key = SigningKey::from_bytes(&seed.0);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// # Errors
    ///
    /// See [`Seed::from_hex`].
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self, Report<SignerError>> {
        Ok(Self::from_seed(&Seed::from_hex(seed_hex)?))
    }

    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.verifying_key
    }

    #[must_use]
    pub fn public_key_hex(&self) -> String {
        to_hex(self.verifying_key.as_bytes())
    }

    /// Signs `message` with the Ed25519 signing key.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::SigningFailure`] if the primitive reports an error.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, Report<SignerError>> {
        self.signing_key
            .try_sign(message)
            .map_err(|e: SignatureError| {
                log::error!("Ed25519 signing failed: {}", e);
                Report::new(SignerError::SigningFailure {
                    message: e.to_string(),
                })
            })
    }

    /// Public key as a JWK (OKP / Ed25519, `alg = EdDSA`). No private component.
    #[must_use]
    pub fn to_jwk(&self, kid: String) -> Jwk {
        let public_key_bytes = self.verifying_key.as_bytes();

        let okp = Okp {
            crv: OkpCurves::Ed25519,
            x: public_key_bytes.to_vec().into(),
            d: None,
        };

        Jwk {
            key: Key::Okp(okp),
            prm: Parameters {
                kid: Some(kid),
                alg: Some(Algorithm::Signing(Signing::EdDsa)),
                ..Default::default()
            },
        }
    }
}

/// Derives the key pair for raw seed bytes.
///
/// # Errors
///
/// Returns [`SignerError::InvalidSeedLength`] unless `seed` is exactly
/// [`SEED_LENGTH`] bytes.
pub fn derive_key_pair(seed: &[u8]) -> Result<KeyPair, Report<SignerError>> {
    let seed = Seed::from_bytes(seed).attach("while deriving key pair")?;
    Ok(KeyPair::from_seed(&seed))
}

/// Public key for raw seed bytes.
///
/// # Errors
///
/// Same as [`derive_key_pair`].
pub fn public_key(seed: &[u8]) -> Result<VerifyingKey, Report<SignerError>> {
    Ok(derive_key_pair(seed)?.verifying_key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Verifier;

    use crate::test_support::tests::{ZERO_SEED_HEX, ZERO_SEED_PUBLIC_KEY_HEX};

    const RFC8032_SEED_HEX: &str =
        "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const RFC8032_PUBLIC_KEY_HEX: &str =
        "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RFC8032_EMPTY_SIGNATURE_HEX: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    #[test]
    fn test_zero_seed_public_key() {
        let key_pair = KeyPair::from_seed_hex(ZERO_SEED_HEX).unwrap();
        assert_eq!(key_pair.public_key_hex(), ZERO_SEED_PUBLIC_KEY_HEX);
    }

    #[test]
    fn test_rfc8032_vector() {
        let key_pair = KeyPair::from_seed_hex(RFC8032_SEED_HEX).unwrap();
        assert_eq!(key_pair.public_key_hex(), RFC8032_PUBLIC_KEY_HEX);

        let signature = key_pair.sign(b"").unwrap();
        assert_eq!(to_hex(signature.to_bytes()), RFC8032_EMPTY_SIGNATURE_HEX);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let seed = generate_seed();
        let first = derive_key_pair(seed.as_ref()).unwrap();
        let second = derive_key_pair(seed.as_ref()).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            public_key(seed.as_ref()).unwrap(),
            first.verifying_key()
        );
    }

    #[test]
    fn test_generated_seeds_differ() {
        assert_ne!(generate_seed(), generate_seed());
    }

    #[test]
    fn test_seed_hex_round_trip() {
        let seed = generate_seed();
        let hex = seed.to_hex();
        assert_eq!(hex.len(), SEED_LENGTH * 2);
        assert_eq!(Seed::from_hex(&hex).unwrap(), seed);
    }

    #[test]
    fn test_invalid_seed_length() {
        let err = derive_key_pair(&[0u8; 31]).unwrap_err();
        assert_eq!(
            err.current_context(),
            &SignerError::InvalidSeedLength {
                expected: 32,
                actual: 31
            }
        );

        let err = Seed::from_hex("00").unwrap_err();
        assert!(matches!(
            err.current_context(),
            SignerError::InvalidSeedLength { actual: 1, .. }
        ));
    }

    #[test]
    fn test_invalid_seed_encoding() {
        let err = KeyPair::from_seed_hex("not hex").unwrap_err();
        assert!(matches!(
            err.current_context(),
            SignerError::InvalidEncoding { .. }
        ));
    }

    #[test]
    fn test_seed_debug_hides_bytes() {
        let seed = Seed::from_hex(ZERO_SEED_HEX).unwrap();
        assert_eq!(format!("{:?}", seed), "Seed(..)");
    }

    #[test]
    fn test_sign_and_verify() {
        let key_pair = derive_key_pair(generate_seed().as_ref()).unwrap();
        let message = b"test message";
        let signature = key_pair.sign(message).unwrap();

        assert!(key_pair.verifying_key().verify(message, &signature).is_ok());
        assert!(key_pair
            .verifying_key()
            .verify(b"other message", &signature)
            .is_err());
    }

    #[test]
    fn test_create_jwk_from_verifying_key() {
        let key_pair = KeyPair::from_seed_hex(ZERO_SEED_HEX).unwrap();
        let jwk = key_pair.to_jwk("test-kid".to_string());

        assert_eq!(jwk.prm.kid, Some("test-kid".to_string()));
        assert_eq!(jwk.prm.alg, Some(Algorithm::Signing(Signing::EdDsa)));

        match jwk.key {
            Key::Okp(okp) => {
                assert_eq!(okp.crv, OkpCurves::Ed25519);
                assert_eq!(okp.x.len(), 32);
                assert!(okp.d.is_none());
            }
            _ => panic!("Expected OKP key type"),
        }
    }
}
