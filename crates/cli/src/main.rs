//! API signer CLI.
//!
//! This tool provides commands for:
//! - Generating Ed25519 seeds and showing the configured public key
//! - Signing and verifying arbitrary files
//! - Sending signed GET/POST requests to the configured API
//! - Answering transaction approval challenges

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;

mod approval;
mod config;
mod error;
mod keys;
mod request;
mod sign;

use error::CliError;
use request::Method;

#[derive(Parser)]
#[command(name = "api-signer")]
#[command(about = "Sign API requests and transaction approvals with Ed25519 keys")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML configuration file
    #[arg(
        long,
        short,
        global = true,
        env = "API_SIGNER_CONFIG",
        default_value = "config.toml"
    )]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new seed and its public key
    Keygen {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the public key of the configured seed
    Pubkey {
        /// Output format
        #[arg(long, value_enum, default_value = "hex")]
        format: KeyFormat,
    },

    /// Sign the raw contents of a file and print the hex signature
    Sign {
        /// File to sign
        #[arg(long, short)]
        file: PathBuf,
    },

    /// Verify a hex signature over the contents of a file
    Verify {
        /// Signed file
        #[arg(long, short)]
        file: PathBuf,

        /// Hex-encoded signature
        #[arg(long, short)]
        signature: String,

        /// Hex-encoded public key (defaults to the configured key)
        #[arg(long)]
        public_key: Option<String>,
    },

    /// Send a signed GET request
    Get {
        /// Request path, including any query string
        path: String,

        /// Print the signed request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Send a signed POST request with a JSON body read from a file
    Post {
        /// Request path, including any query string
        path: String,

        /// File containing the request body
        #[arg(long, short)]
        file: PathBuf,

        /// Print the signed request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Answer a transaction approval challenge
    Approval {
        /// Challenge JSON file
        #[arg(long)]
        challenge: PathBuf,

        /// Transaction JSON file
        #[arg(long)]
        transaction: PathBuf,
    },
}

#[derive(Clone, ValueEnum, Debug)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, ValueEnum, Debug)]
pub enum KeyFormat {
    Hex,
    Jwk,
}

fn init_logger(verbose: bool) -> Result<(), CliError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}  {} {}",
                chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .map_err(|e| CliError::Config(format!("Failed to initialize logger: {}", e)))
}

fn main() {
    let cli = Cli::parse();

    let result = init_logger(cli.verbose).and_then(|()| run(cli));
    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let settings = || config::load_settings(&cli.config, cli.verbose);

    match cli.command {
        Commands::Keygen { format } => keys::keygen(&format),
        Commands::Pubkey { format } => keys::pubkey(&settings()?, &format),
        Commands::Sign { file } => sign::sign_file(&settings()?, &file),
        Commands::Verify {
            file,
            signature,
            public_key,
        } => {
            let valid = sign::verify_file(&settings()?, &file, &signature, public_key.as_deref())?;
            if valid {
                Ok("Signature is valid".to_string())
            } else {
                Err(CliError::Signing("Signature is invalid".into()))
            }
        }
        Commands::Get { path, dry_run } => {
            request::send(&settings()?, Method::Get, &path, b"", dry_run)
        }
        Commands::Post {
            path,
            file,
            dry_run,
        } => {
            let body = fs::read(&file)?;
            request::send(&settings()?, Method::Post, &path, &body, dry_run)
        }
        Commands::Approval {
            challenge,
            transaction,
        } => approval::respond(&settings()?, &challenge, &transaction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "api-signer",
            "--config",
            "signer.toml",
            "post",
            "/v1/transactions",
            "--file",
            "body.json",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("signer.toml"));
        match cli.command {
            Commands::Post {
                path,
                file,
                dry_run,
            } => {
                assert_eq!(path, "/v1/transactions");
                assert_eq!(file, PathBuf::from("body.json"));
                assert!(dry_run);
            }
            _ => panic!("Expected Post command"),
        }
    }

    #[test]
    fn test_cli_keygen_needs_no_config() {
        let cli = Cli::try_parse_from([
            "api-signer",
            "--config",
            "/nonexistent/config.toml",
            "keygen",
            "--format",
            "json",
        ])
        .unwrap();

        let output = run(cli).unwrap();
        assert!(output.contains("\"pub_key\""));
    }

    #[test]
    fn test_cli_missing_config_is_reported() {
        let cli = Cli::try_parse_from([
            "api-signer",
            "--config",
            "/nonexistent/config.toml",
            "pubkey",
        ])
        .unwrap();

        assert!(matches!(run(cli), Err(CliError::Config(_))));
    }
}
