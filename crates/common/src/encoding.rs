//! Hex encoding used at every text boundary.
//!
//! Output is always lowercase. Decoding accepts either case but rejects odd
//! lengths and non-hex characters.

use error_stack::Report;

use crate::error::SignerError;

#[must_use]
pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decodes a hex string into bytes.
///
/// # Errors
///
/// Returns [`SignerError::InvalidEncoding`] on odd length or non-hex characters.
pub fn from_hex(input: &str) -> Result<Vec<u8>, Report<SignerError>> {
    hex::decode(input).map_err(|e| {
        Report::new(SignerError::InvalidEncoding {
            message: e.to_string(),
        })
    })
}

/// Decodes a hex string into a fixed-size array.
///
/// # Errors
///
/// Returns [`SignerError::InvalidEncoding`] if the input is not valid hex or
/// does not decode to exactly `N` bytes.
pub fn from_hex_array<const N: usize>(input: &str) -> Result<[u8; N], Report<SignerError>> {
    let bytes = from_hex(input)?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| {
        Report::new(SignerError::InvalidEncoding {
            message: format!("expected {} bytes, got {}", N, actual),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_hex_is_lowercase() {
        assert_eq!(to_hex([0xde_u8, 0xad, 0xBE, 0xef]), "deadbeef");
        assert_eq!(to_hex(b""), "");
    }

    proptest! {
        #[test]
        fn test_hex_round_trip_bytes(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(from_hex(&to_hex(&bytes)).unwrap(), bytes);
        }

        #[test]
        fn test_hex_round_trip_lowercase_text(text in "([0-9a-f]{2}){0,64}") {
            prop_assert_eq!(to_hex(from_hex(&text).unwrap()), text);
        }
    }

    #[test]
    fn test_from_hex_accepts_uppercase() {
        assert_eq!(from_hex("DEADbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_from_hex_rejects_odd_length() {
        let err = from_hex("abc").unwrap_err();
        assert!(matches!(
            err.current_context(),
            SignerError::InvalidEncoding { .. }
        ));
    }

    #[test]
    fn test_from_hex_rejects_non_hex() {
        let err = from_hex("zz").unwrap_err();
        assert!(matches!(
            err.current_context(),
            SignerError::InvalidEncoding { .. }
        ));
    }

    #[test]
    fn test_from_hex_array_checks_size() {
        let ok: [u8; 2] = from_hex_array("0102").unwrap();
        assert_eq!(ok, [1, 2]);

        let err = from_hex_array::<3>("0102").unwrap_err();
        assert_eq!(
            err.current_context(),
            &SignerError::InvalidEncoding {
                message: "expected 3 bytes, got 2".into()
            }
        );
    }
}
