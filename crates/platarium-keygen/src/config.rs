//! Key generator configuration, parsed from a TOML file plus environment variable overrides.
//!
//! Priority: environment variables > config file > defaults.

use anyhow::{Context, Result};
use platarium_core::keys::{DEFAULT_HKDF_INFO, DEFAULT_HKDF_SALT, MAX_ACCOUNT_INDEX};
use platarium_core::random::COMPANION_CODE_LEN;
use platarium_core::KeyGenerator;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyGenConfig {
    /// Derivation settings
    #[serde(default)]
    pub keygen: KeyGenSection,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyGenSection {
    /// Account index for `m/44'/60'/0'/0/{index}`
    #[serde(default)]
    pub index: u32,

    /// HKDF salt for the signature key
    #[serde(default = "default_salt")]
    pub hkdf_salt: String,

    /// HKDF info for the signature key
    #[serde(default = "default_info")]
    pub hkdf_info: String,

    /// Explicit BIP-32 path (overrides `index` for derivation)
    #[serde(default)]
    pub path: Option<String>,

    /// Companion code length for new identities
    #[serde(default = "default_companion_length")]
    pub companion_length: usize,
}

impl Default for KeyGenSection {
    fn default() -> Self {
        Self {
            index: 0,
            hkdf_salt: default_salt(),
            hkdf_info: default_info(),
            path: None,
            companion_length: default_companion_length(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

fn default_salt() -> String {
    String::from_utf8_lossy(DEFAULT_HKDF_SALT).into_owned()
}

fn default_info() -> String {
    String::from_utf8_lossy(DEFAULT_HKDF_INFO).into_owned()
}

fn default_companion_length() -> usize {
    COMPANION_CODE_LEN
}

fn default_log_level() -> String {
    "info".to_string()
}

// ============================================================================
// Loading & environment override
// ============================================================================

impl KeyGenConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: KeyGenConfig =
            toml::from_str(&contents).with_context(|| "Failed to parse TOML config")?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `PLATARIUM_INDEX`
    /// - `PLATARIUM_HKDF_SALT`
    /// - `PLATARIUM_HKDF_INFO`
    /// - `PLATARIUM_PATH`
    /// - `PLATARIUM_LOG_LEVEL`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("PLATARIUM_INDEX") {
            if let Ok(index) = v.parse::<u32>() {
                self.keygen.index = index;
            }
        }
        if let Ok(v) = std::env::var("PLATARIUM_HKDF_SALT") {
            self.keygen.hkdf_salt = v;
        }
        if let Ok(v) = std::env::var("PLATARIUM_HKDF_INFO") {
            self.keygen.hkdf_info = v;
        }
        if let Ok(v) = std::env::var("PLATARIUM_PATH") {
            self.keygen.path = Some(v);
        }
        if let Ok(v) = std::env::var("PLATARIUM_LOG_LEVEL") {
            self.logging.level = v;
        }
    }

    /// Validate that the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.keygen.index < MAX_ACCOUNT_INDEX,
            "keygen.index must be < {}",
            MAX_ACCOUNT_INDEX
        );
        anyhow::ensure!(
            !self.keygen.hkdf_salt.is_empty(),
            "keygen.hkdf_salt must not be empty"
        );
        anyhow::ensure!(
            !self.keygen.hkdf_info.is_empty(),
            "keygen.hkdf_info must not be empty"
        );
        anyhow::ensure!(
            self.keygen.companion_length > 0,
            "keygen.companion_length must be > 0"
        );
        Ok(())
    }

    /// Build a generator from these settings.
    pub fn key_generator(&self) -> Result<KeyGenerator> {
        let generator = KeyGenerator::new(
            self.keygen.index,
            self.keygen.hkdf_salt.as_bytes(),
            self.keygen.hkdf_info.as_bytes(),
            self.keygen.path.clone(),
        )?
        .with_companion_length(self.keygen.companion_length)?;
        Ok(generator)
    }
}

// ============================================================================
// Tests
// ============================================================================
