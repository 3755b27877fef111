//! BIP-39 mnemonic handling and master seed derivation
//!
//! The mnemonic is the long-term secret; the companion code is mixed in as
//! the BIP-39 passphrase so the words alone cannot reproduce the seed.

use bip39::{Language, Mnemonic};

use crate::error::KeyError;
use crate::memory::MasterSeed;
use crate::random::{random_alphanumeric, CHARACTER_SET};

/// Words in a freshly generated mnemonic (256 bits of entropy).
pub const MNEMONIC_WORDS: usize = 24;

/// Length of the companion code produced alongside a new mnemonic.
pub const SOURCE_COMPANION_LEN: usize = 12;

/// Supplies fresh mnemonic phrases and companion codes.
pub trait SecretSource: Send + Sync {
    /// Returns `(mnemonic phrase, companion code)`.
    fn new_mnemonic_and_companion(&self) -> Result<(String, String), KeyError>;
}

/// Default source backed by the OS CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSecretSource;

impl SecretSource for OsSecretSource {
    fn new_mnemonic_and_companion(&self) -> Result<(String, String), KeyError> {
        let mnemonic = generate_mnemonic()?;
        let companion = random_alphanumeric(SOURCE_COMPANION_LEN, CHARACTER_SET)?;
        Ok((mnemonic.to_string(), companion))
    }
}

/// Generate a new 24-word English mnemonic.
pub fn generate_mnemonic() -> Result<Mnemonic, KeyError> {
    Mnemonic::generate_in(Language::English, MNEMONIC_WORDS)
        .map_err(|e| KeyError::InvalidMnemonic(e.to_string()))
}

/// Parse and checksum-validate a mnemonic.
pub fn parse_mnemonic(words: &str) -> Result<Mnemonic, KeyError> {
    Mnemonic::parse_in(Language::English, words)
        .map_err(|e| KeyError::InvalidMnemonic(e.to_string()))
}

/// Whether `words` is a checksum-valid English mnemonic.
pub fn is_valid_mnemonic(words: &str) -> bool {
    parse_mnemonic(words).is_ok()
}

/// Derive the 64-byte master seed from a parsed mnemonic and companion code.
pub fn derive_master_seed(mnemonic: &Mnemonic, companion_code: &str) -> MasterSeed {
    let mut raw = mnemonic.to_seed(companion_code);
    MasterSeed::take(&mut raw)
}

/// Parse `words` and derive the master seed in one step.
pub fn master_seed_from_mnemonic(words: &str, companion_code: &str) -> Result<MasterSeed, KeyError> {
    let mnemonic = parse_mnemonic(words)?;
    Ok(derive_master_seed(&mnemonic, companion_code))
}
