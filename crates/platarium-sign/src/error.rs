use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Message serialization failed: {0}")]
    Serialization(String),
    #[error("Invalid signature encoding: {0}")]
    InvalidSignature(String),
}

impl From<platarium_core::KeyError> for SignError {
    fn from(e: platarium_core::KeyError) -> Self {
        SignError::InvalidKey(e.to_string())
    }
}
