//! Signer configuration.
//!
//! Settings are read from TOML and merged with environment variables prefixed
//! with `API_SIGNER__`, e.g. `API_SIGNER__API_KEY__SEED` overrides
//! `api_key.seed`. The loaded value is passed explicitly to every operation.

use std::fmt;
use std::fs;
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::approval::MissingAttributePolicy;
use crate::constants::ENV_PREFIX;
use crate::error::SignerError;
use crate::request_signing::{KeyPair, SEED_LENGTH};

fn validate_seed_hex(seed: &str) -> Result<(), ValidationError> {
    if seed.len() == SEED_LENGTH * 2 && seed.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("seed_hex")
            .with_message(format!("must be {} hex characters", SEED_LENGTH * 2).into()))
    }
}

#[derive(Clone, Deserialize, Validate)]
pub struct ApiKey {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(custom(function = "validate_seed_hex"))]
    pub seed: String,
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("seed", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovalSettings {
    #[serde(default)]
    pub missing_attributes: MissingAttributePolicy,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    #[validate(url)]
    pub api_url: String,
    #[validate(nested)]
    pub api_key: ApiKey,
    #[serde(default)]
    pub approval: ApprovalSettings,
}

impl Settings {
    /// Parses TOML, applies `API_SIGNER__` overrides and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::Configuration`] if parsing, deserialization or
    /// validation fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<SignerError>> {
        let environment = Environment::default().prefix(ENV_PREFIX).separator("__");
        Self::from_sources(toml_str, environment)
    }

    /// # Errors
    ///
    /// Returns [`SignerError::Configuration`] if the file cannot be read or
    /// [`Settings::from_toml`] fails.
    pub fn from_file(path: &Path) -> Result<Self, Report<SignerError>> {
        let content = fs::read_to_string(path).change_context(SignerError::Configuration {
            message: format!("Failed to read config file {}", path.display()),
        })?;
        log::debug!("Loading settings from {}", path.display());
        Self::from_toml(&content)
    }

    fn from_sources(toml_str: &str, environment: Environment) -> Result<Self, Report<SignerError>> {
        let toml = File::from_str(toml_str, FileFormat::Toml);
        let config = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .change_context(SignerError::Configuration {
                message: "Failed to build configuration".into(),
            })?;

        let settings: Self =
            config
                .try_deserialize()
                .change_context(SignerError::Configuration {
                    message: "Failed to deserialize settings".into(),
                })?;

        settings
            .validate()
            .change_context(SignerError::Configuration {
                message: "Settings validation failed".into(),
            })?;

        Ok(settings)
    }

    /// Derives the configured API key pair.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_key.seed` is not a valid hex seed.
    pub fn key_pair(&self) -> Result<KeyPair, Report<SignerError>> {
        KeyPair::from_seed_hex(&self.api_key.seed).attach("while loading api_key.seed")
    }
}
