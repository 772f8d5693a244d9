//! Key generation and public key display.

use api_signer_common::request_signing::{generate_seed, KeyPair};
use api_signer_common::settings::Settings;
use serde::Serialize;

use crate::error::CliError;
use crate::{KeyFormat, OutputFormat};

#[derive(Debug, Serialize)]
struct GeneratedKey {
    seed: String,
    pub_key: String,
}

/// Generate a new seed and render it with its public key.
pub fn keygen(format: &OutputFormat) -> Result<String, CliError> {
    let seed = generate_seed();
    let key_pair = KeyPair::from_seed(&seed);
    render_generated(
        &GeneratedKey {
            seed: seed.to_hex(),
            pub_key: key_pair.public_key_hex(),
        },
        format,
    )
}

fn render_generated(key: &GeneratedKey, format: &OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(format!("seed: {}\npub_key: {}", key.seed, key.pub_key)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(key)?),
    }
}

/// Render the public key of the configured seed.
pub fn pubkey(settings: &Settings, format: &KeyFormat) -> Result<String, CliError> {
    let key_pair = settings.key_pair()?;
    match format {
        KeyFormat::Hex => Ok(key_pair.public_key_hex()),
        KeyFormat::Jwk => {
            let jwk = key_pair.to_jwk(settings.api_key.id.clone());
            Ok(serde_json::to_string_pretty(&jwk)?)
        }
    }
}
