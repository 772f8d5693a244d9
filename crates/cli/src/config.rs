//! Configuration loading.
//!
//! Configuration is loaded from a TOML file and merged with environment
//! variables prefixed with `API_SIGNER__`. For example,
//! `API_SIGNER__API_KEY__SEED` overrides `api_key.seed` in the file.

use std::path::Path;

use api_signer_common::settings::Settings;

use crate::error::CliError;

pub(crate) fn load_settings(file: &Path, verbose: bool) -> Result<Settings, CliError> {
    if verbose {
        eprintln!("Loading config from: {}", file.display());
        eprintln!("Environment variables with API_SIGNER__ prefix will be merged");
    }

    let settings = Settings::from_file(file)?;
    log::debug!(
        "Using API key '{}' against {}",
        settings.api_key.id,
        settings.api_url
    );
    Ok(settings)
}
