//! Error taxonomy for key derivation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Malformed constructor or parameter input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// BIP-39 checksum or wordlist failure
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    /// A hex scalar of the wrong length or alphabet
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),
    /// A scalar that does not fit in 32 bytes
    #[error("Length violation: {0}")]
    LengthViolation(String),
    /// The recomputed signature key does not match the claimed one
    #[error("Key correlation verification failed")]
    CorrelationFailure,
    /// A derivation step produced no usable private key
    #[error("Missing key material: {0}")]
    MissingKeyMaterial(String),
}

impl KeyError {
    /// Stable discriminant used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidMnemonic(_) => "invalid_mnemonic",
            Self::InvalidKeyFormat(_) => "invalid_key_format",
            Self::LengthViolation(_) => "length_violation",
            Self::CorrelationFailure => "correlation_failure",
            Self::MissingKeyMaterial(_) => "missing_key_material",
        }
    }
}
