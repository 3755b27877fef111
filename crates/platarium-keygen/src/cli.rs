//! Command-line parsing (minimal, no clap)

use anyhow::{bail, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate,
    Restore {
        mnemonic: String,
        code: String,
        index: Option<u32>,
        path: Option<String>,
    },
    Sign {
        key: String,
        message: String,
    },
    Verify {
        message: String,
        signature: String,
        pubkey: String,
    },
    Hash {
        message: String,
    },
    Validate,
    Help,
    Version,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub config_path: Option<PathBuf>,
    pub command: Command,
}

#[derive(Default)]
struct Flags {
    mnemonic: Option<String>,
    code: Option<String>,
    index: Option<u32>,
    path: Option<String>,
    key: Option<String>,
    message: Option<String>,
    signature: Option<String>,
    pubkey: Option<String>,
}

fn value(args: &[String], i: &mut usize, flag: &str) -> Result<String> {
    *i += 1;
    match args.get(*i) {
        Some(v) => Ok(v.clone()),
        None => bail!("{} requires a value", flag),
    }
}

fn required(value: Option<String>, flag: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => bail!("missing required option {}", flag),
    }
}

/// Parse arguments (without the program name).
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let mut config_path = None;
    let mut command_name: Option<String> = None;
    let mut flags = Flags::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => config_path = Some(PathBuf::from(value(args, &mut i, "--config")?)),
            "--mnemonic" => flags.mnemonic = Some(value(args, &mut i, "--mnemonic")?),
            "--code" => flags.code = Some(value(args, &mut i, "--code")?),
            "--index" => {
                let raw = value(args, &mut i, "--index")?;
                match raw.parse::<u32>() {
                    Ok(n) => flags.index = Some(n),
                    Err(_) => bail!("--index must be a non-negative integer, got {}", raw),
                }
            }
            "--path" => flags.path = Some(value(args, &mut i, "--path")?),
            "--key" => flags.key = Some(value(args, &mut i, "--key")?),
            "--message" | "-m" => flags.message = Some(value(args, &mut i, "--message")?),
            "--signature" => flags.signature = Some(value(args, &mut i, "--signature")?),
            "--pubkey" => flags.pubkey = Some(value(args, &mut i, "--pubkey")?),
            "--help" | "-h" => command_name = Some("help".into()),
            "--version" | "-V" => command_name = Some("version".into()),
            other if other.starts_with('-') => bail!("Unknown argument: {}", other),
            other => {
                if command_name.is_some() {
                    bail!("Unexpected argument: {}", other);
                }
                command_name = Some(other.to_string());
            }
        }
        i += 1;
    }

    let command = match command_name.as_deref() {
        None | Some("help") => Command::Help,
        Some("version") => Command::Version,
        Some("generate") => Command::Generate,
        Some("validate") => Command::Validate,
        Some("restore") => Command::Restore {
            mnemonic: required(flags.mnemonic, "--mnemonic")?,
            code: required(flags.code, "--code")?,
            index: flags.index,
            path: flags.path,
        },
        Some("sign") => Command::Sign {
            key: required(flags.key, "--key")?,
            message: required(flags.message, "--message")?,
        },
        Some("verify") => Command::Verify {
            message: required(flags.message, "--message")?,
            signature: required(flags.signature, "--signature")?,
            pubkey: required(flags.pubkey, "--pubkey")?,
        },
        Some("hash") => Command::Hash {
            message: required(flags.message, "--message")?,
        },
        Some(other) => bail!("Unknown command: {}", other),
    };

    Ok(Cli {
        config_path,
        command,
    })
}
