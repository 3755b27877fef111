//! Platarium Core
//!
//! Dual-path key derivation from a single BIP-39 mnemonic plus companion code.
//!
//! # Key Derivation
//!
//! From one master seed:
//! - Account key via BIP-32: `m/44'/60'/0'/0/{index}`
//! - Signature key via HKDF-SHA256 with a fixed (or caller-supplied) salt and info
//!
//! A correlation check recomputes the signature key from the master seed
//! before any identity is handed back.

pub mod correlation;
pub mod encoding;
pub mod error;
pub mod generator;
pub mod identity;
pub mod keys;
pub mod logger;
pub mod memory;
pub mod random;
pub mod seed;

pub use correlation::{verify_correlation, verify_correlation_logged};
pub use encoding::{decode_scalar_hex, scalar_to_hex, validate_scalar_hex};
pub use error::KeyError;
pub use generator::KeyGenerator;
pub use identity::{DerivationPaths, IdentityBundle};
pub use keys::{account_path, derive_hkdf_key, derive_key_pair, derive_signature_seed, KeyPairHex};
pub use logger::{ErrorContext, FacadeLogger, KeyLogger, MemoryLogger};
pub use memory::{MasterSeed, SecretBytes, SignatureSeed};
pub use random::{random_alphanumeric, CHARACTER_SET};
pub use seed::{master_seed_from_mnemonic, OsSecretSource, SecretSource};
