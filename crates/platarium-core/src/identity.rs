//! Identity bundle returned by generate/restore
//!
//! Every key field carries a type prefix so one key class cannot be
//! mistaken for another:
//!
//! | Field          | Prefix | Payload                         |
//! |----------------|--------|---------------------------------|
//! | `publicKey`    | `Px`   | 66 hex chars, compressed point  |
//! | `privateKey`   | `PSx`  | 64 hex chars, account scalar    |
//! | `signatureKey` | `Sx`   | 64 hex chars, signature scalar  |

use std::fmt;

use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::encoding::decode_scalar_hex;
use crate::error::KeyError;

pub const PUBLIC_KEY_PREFIX: &str = "Px";
pub const ACCOUNT_KEY_PREFIX: &str = "PSx";
pub const SIGNATURE_KEY_PREFIX: &str = "Sx";

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct DerivationPaths {
    /// BIP-32 path of the account key
    pub main_path: String,
    /// Always the literal `HKDF-derived`
    pub signature_path: String,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct IdentityBundle {
    pub mnemonic: String,
    pub companion_code: String,
    pub derivation_paths: DerivationPaths,
    pub public_key: String,
    pub private_key: String,
    pub signature_key: String,
}

impl IdentityBundle {
    /// Account secret key (`PSx` field).
    pub fn account_secret_key(&self) -> Result<SecretKey, KeyError> {
        parse_prefixed_secret_key(&self.private_key, ACCOUNT_KEY_PREFIX)
    }

    /// Signature secret key (`Sx` field).
    pub fn signature_secret_key(&self) -> Result<SecretKey, KeyError> {
        parse_prefixed_secret_key(&self.signature_key, SIGNATURE_KEY_PREFIX)
    }

    /// Account public key (`Px` field).
    pub fn account_public_key(&self) -> Result<PublicKey, KeyError> {
        parse_prefixed_public_key(&self.public_key)
    }

    /// Public key matching the signature secret key. Not stored in the bundle.
    pub fn signature_public_key<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
    ) -> Result<PublicKey, KeyError> {
        let mut sk = self.signature_secret_key()?;
        let pk = PublicKey::from_secret_key(secp, &sk);
        sk.non_secure_erase();
        Ok(pk)
    }
}

impl fmt::Debug for IdentityBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityBundle")
            .field("derivation_paths", &self.derivation_paths)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

fn strip<'a>(value: &'a str, prefix: &str) -> Result<&'a str, KeyError> {
    value.strip_prefix(prefix).ok_or_else(|| {
        KeyError::InvalidKeyFormat(format!("expected a key with prefix '{}'", prefix))
    })
}

/// Decode a `PSx…` or `Sx…` field into a secret key.
///
/// The prefix must match exactly, so an account key is never accepted where
/// a signature key is expected and vice versa.
pub fn parse_prefixed_secret_key(value: &str, prefix: &str) -> Result<SecretKey, KeyError> {
    let mut bytes = decode_scalar_hex(strip(value, prefix)?)?;
    let sk = SecretKey::from_slice(&bytes)
        .map_err(|e| KeyError::InvalidKeyFormat(format!("not a valid secp256k1 scalar: {}", e)));
    bytes.zeroize();
    sk
}

/// Decode a `Px…` field into a compressed public key.
pub fn parse_prefixed_public_key(value: &str) -> Result<PublicKey, KeyError> {
    let body = strip(value, PUBLIC_KEY_PREFIX)?;
    if body.len() != 66 {
        return Err(KeyError::InvalidKeyFormat(format!(
            "expected 66 hex characters for a compressed public key, got {}",
            body.len()
        )));
    }
    let bytes = hex::decode(body).map_err(|e| KeyError::InvalidKeyFormat(e.to_string()))?;
    PublicKey::from_slice(&bytes).map_err(|e| KeyError::InvalidKeyFormat(e.to_string()))
}
