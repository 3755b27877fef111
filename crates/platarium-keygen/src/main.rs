//! Platarium Keygen: command-line front end for identity generation and signing
//!
//! # Usage
//!
//! ```bash
//! platarium-keygen generate
//! platarium-keygen restore --mnemonic "<24 words>" --code <COMPANION>
//! platarium-keygen sign --key PSx... --message '{"data":"Hello"}'
//! platarium-keygen verify --message '{"data":"Hello"}' --signature <DER> --pubkey <HEX>
//! ```

mod cli;
mod config;

use anyhow::{bail, Context, Result};
use platarium_core::identity::{
    parse_prefixed_secret_key, ACCOUNT_KEY_PREFIX, SIGNATURE_KEY_PREFIX,
};
use platarium_core::FacadeLogger;
use secp256k1::Secp256k1;
use serde::Serialize;
use std::sync::Arc;

use cli::Command;
use config::KeyGenConfig;

fn main() -> Result<()> {
    // Keep seed material out of core files
    platarium_core::memory::disable_core_dumps();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = cli::parse_args(&args)?;

    match cli.command {
        Command::Help => {
            print_help();
            return Ok(());
        }
        Command::Version => {
            println!("platarium-keygen {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let mut keygen_config = match &cli.config_path {
        Some(path) => KeyGenConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => KeyGenConfig::default(),
    };
    keygen_config.apply_env_overrides();
    keygen_config
        .validate()
        .context("Configuration validation failed")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(keygen_config.logging.level.as_str()),
    )
    .init();

    run(cli.command, &keygen_config)
}

fn run(command: Command, keygen_config: &KeyGenConfig) -> Result<()> {
    match command {
        Command::Generate => {
            let generator = keygen_config
                .key_generator()?
                .with_logger(Arc::new(FacadeLogger));
            let identity = generator
                .generate_identity()
                .context("Key generation failed")?;
            print_json(&identity)
        }
        Command::Restore {
            mnemonic,
            code,
            index,
            path,
        } => {
            let generator = keygen_config
                .key_generator()?
                .with_logger(Arc::new(FacadeLogger));
            let identity = generator
                .restore_identity(&mnemonic, &code, index, path.as_deref())
                .context("Key restoration failed")?;
            print_json(&identity)
        }
        Command::Sign { key, message } => {
            let message = parse_message(&message)?;
            let prefix = if key.starts_with(ACCOUNT_KEY_PREFIX) {
                ACCOUNT_KEY_PREFIX
            } else if key.starts_with(SIGNATURE_KEY_PREFIX) {
                SIGNATURE_KEY_PREFIX
            } else {
                bail!(
                    "--key must start with {} or {}",
                    ACCOUNT_KEY_PREFIX,
                    SIGNATURE_KEY_PREFIX
                );
            };
            let mut secret_key = parse_prefixed_secret_key(&key, prefix)?;
            let secp = Secp256k1::new();
            let signed = platarium_sign::sign(&secp, &secret_key, &message);
            secret_key.non_secure_erase();
            print_json(&signed?)
        }
        Command::Verify {
            message,
            signature,
            pubkey,
        } => {
            let message = parse_message(&message)?;
            let secp = Secp256k1::verification_only();
            let pubkey = pubkey.strip_prefix("Px").unwrap_or(pubkey.as_str());
            let valid = platarium_sign::verify_signature(&secp, &message, &signature, pubkey);
            log::info!("signature valid: {}", valid);
            print_json(&serde_json::json!({ "valid": valid }))
        }
        Command::Hash { message } => {
            let message = parse_message(&message)?;
            let hash = platarium_sign::hash_message_hex(&message)?;
            print_json(&serde_json::json!({ "hash": hash }))
        }
        Command::Validate => {
            println!("Configuration is valid.");
            println!("  Index:            {}", keygen_config.keygen.index);
            println!(
                "  Path:             {}",
                keygen_config
                    .keygen
                    .path
                    .as_deref()
                    .unwrap_or("(from index)")
            );
            println!("  HKDF salt:        {}", keygen_config.keygen.hkdf_salt);
            println!("  HKDF info:        {}", keygen_config.keygen.hkdf_info);
            println!(
                "  Companion length: {}",
                keygen_config.keygen.companion_length
            );
            println!("  Log level:        {}", keygen_config.logging.level);
            Ok(())
        }
        Command::Help | Command::Version => Ok(()),
    }
}

fn parse_message(raw: &str) -> Result<serde_json::Value> {
    serde_json::from_str(raw).context("--message must be valid JSON")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

fn print_help() {
    println!(
        r#"Platarium Keygen: dual-path identity keys from one mnemonic

USAGE:
    platarium-keygen [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    generate              Create a new identity (mnemonic, companion code, keys)
    restore               Rebuild an identity from mnemonic + companion code
    sign                  Sign a JSON message with a PSx or Sx key
    verify                Check a DER signature against a public key
    hash                  Print the domain-separated digest of a JSON message
    validate              Validate configuration and exit

OPTIONS:
    -c, --config <PATH>   Config file path (defaults apply when omitted)
    --mnemonic <WORDS>    Mnemonic phrase (restore)
    --code <CODE>         Companion code (restore)
    --index <N>           Account index (restore)
    --path <PATH>         Explicit BIP-32 path (restore)
    --key <KEY>           Prefixed private key (sign)
    -m, --message <JSON>  Message to sign, verify or hash
    --signature <HEX>     DER signature (verify)
    --pubkey <HEX>        Public key, optionally Px-prefixed (verify)
    -h, --help            Show this help message
    -V, --version         Show version

ENVIRONMENT VARIABLES (override config file):
    PLATARIUM_INDEX           Account index
    PLATARIUM_HKDF_SALT       HKDF salt for the signature key
    PLATARIUM_HKDF_INFO       HKDF info for the signature key
    PLATARIUM_PATH            Explicit BIP-32 derivation path
    PLATARIUM_LOG_LEVEL       Log level (error/warn/info/debug/trace)

EXAMPLES:
    # New identity at account index 2
    PLATARIUM_INDEX=2 platarium-keygen generate

    # Restore with a config file
    platarium-keygen --config keygen.toml restore --mnemonic "..." --code ABCD123456

    # Sign with the signature key
    platarium-keygen sign --key Sx... --message '{{"data":"Hello, Platarium!"}}'
"#
    );
}
