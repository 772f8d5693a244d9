//! Standalone signing and verification of file contents.

use std::fs;
use std::path::Path;

use api_signer_common::request_signing::{parse_public_key, verify_signature, RequestSigner};
use api_signer_common::settings::Settings;

use crate::error::CliError;

/// Sign the raw bytes of a file and return the hex signature.
pub fn sign_file(settings: &Settings, file: &Path) -> Result<String, CliError> {
    let payload = fs::read(file)?;
    let signer = RequestSigner::from_settings(settings)?;
    log::debug!("Signing {} bytes from {}", payload.len(), file.display());
    Ok(signer.sign(&payload)?)
}

/// Check a hex signature over a file's bytes.
///
/// Uses `public_key` when given, otherwise the configured key.
pub fn verify_file(
    settings: &Settings,
    file: &Path,
    signature: &str,
    public_key: Option<&str>,
) -> Result<bool, CliError> {
    let payload = fs::read(file)?;
    let verifying_key = match public_key {
        Some(hex) => parse_public_key(hex)?,
        None => settings.key_pair()?.verifying_key(),
    };
    Ok(verify_signature(&payload, signature, &verifying_key)?)
}
