//! Key derivation from the master seed
//!
//! Two disjoint paths lead from one master seed to two key pairs:
//! - Account key via BIP-32: `m/44'/60'/0'/0/{index}` (or a caller path)
//! - Signature key via HKDF-SHA256(master seed, salt, info)
//!
//! Holding the account key gives no handle on the signature key; the
//! signature key is reachable only with the full master seed.

use bitcoin::bip32::{DerivationPath, Xpriv};
use bitcoin::Network;
use hkdf::Hkdf;
use secp256k1::{PublicKey, Secp256k1, SecretKey, Signing};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::encoding::scalar_to_hex;
use crate::error::KeyError;
use crate::memory::{MasterSeed, SignatureSeed};

/// Default HKDF salt for the signature key.
pub const DEFAULT_HKDF_SALT: &[u8] = b"Platarium-Signature-Salt";

/// Default HKDF info for the signature key.
pub const DEFAULT_HKDF_INFO: &[u8] = b"Platarium-Signature-Key";

/// Info string for auxiliary keys derived with [`derive_hkdf_key`].
pub const AUXILIARY_HKDF_INFO: &str = "Platarium-HKDF";

/// Label recorded for the signature key path in identity bundles.
pub const SIGNATURE_PATH_TAG: &str = "HKDF-derived";

/// Exclusive upper bound for account indices (2^31 - 1).
pub const MAX_ACCOUNT_INDEX: u32 = (1 << 31) - 1;

/// BIP-44 style account path with coin type 60.
pub fn account_path(index: u32) -> String {
    format!("m/44'/60'/0'/0/{}", index)
}

/// A secp256k1 key pair rendered as hex.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPairHex {
    /// 64 hex characters
    pub private_key: String,
    /// 66 hex characters (compressed point)
    pub public_key: String,
}

impl Drop for KeyPairHex {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl std::fmt::Debug for KeyPairHex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPairHex")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// HKDF-SHA256 over the master seed, producing the 32-byte signature seed.
///
/// Deterministic in `(master_seed, salt, info)`. Verification must use the
/// same salt and info that generation used.
pub fn derive_signature_seed(
    master_seed: &[u8],
    salt: &[u8],
    info: &[u8],
) -> Result<SignatureSeed, KeyError> {
    if master_seed.is_empty() {
        return Err(KeyError::InvalidArgument(
            "master seed must not be empty".into(),
        ));
    }
    if salt.is_empty() || info.is_empty() {
        return Err(KeyError::InvalidArgument(
            "HKDF salt and info must not be empty".into(),
        ));
    }

    let mut okm = SignatureSeed::zeroed();
    Hkdf::<Sha256>::new(Some(salt), master_seed)
        .expand(info, okm.as_mut_bytes())
        .map_err(|e| KeyError::MissingKeyMaterial(format!("HKDF expand failed: {}", e)))?;
    Ok(okm)
}

/// HKDF-SHA256 with an empty salt, for auxiliary keys tied to a seed.
pub fn derive_hkdf_key(seed: &[u8], info: &str) -> Result<SignatureSeed, KeyError> {
    if seed.is_empty() {
        return Err(KeyError::InvalidArgument("seed must not be empty".into()));
    }
    let mut okm = SignatureSeed::zeroed();
    Hkdf::<Sha256>::new(None, seed)
        .expand(info.as_bytes(), okm.as_mut_bytes())
        .map_err(|e| KeyError::MissingKeyMaterial(format!("HKDF expand failed: {}", e)))?;
    Ok(okm)
}

/// Interpret a 32-byte seed as a secp256k1 secret scalar.
///
/// No modular reduction is applied: a seed that is zero or not below the
/// curve order is rejected.
pub fn secret_key_from_seed(seed: &[u8; 32]) -> Result<SecretKey, KeyError> {
    SecretKey::from_slice(seed)
        .map_err(|e| KeyError::MissingKeyMaterial(format!("seed is not a valid scalar: {}", e)))
}

/// Fixed-width hex for a secret key.
pub fn secret_key_hex(secret_key: &SecretKey) -> Result<String, KeyError> {
    let mut bytes = secret_key.secret_bytes();
    let hex = scalar_to_hex(&bytes);
    bytes.zeroize();
    hex
}

/// Compressed public key as 66 hex characters.
pub fn public_key_hex(public_key: &PublicKey) -> String {
    hex::encode(public_key.serialize())
}

/// Derive both hex forms of the key pair for a 32-byte seed.
pub fn derive_key_pair<C: Signing>(
    secp: &Secp256k1<C>,
    seed: &[u8; 32],
) -> Result<KeyPairHex, KeyError> {
    let mut secret_key = secret_key_from_seed(seed)?;
    let public_key = PublicKey::from_secret_key(secp, &secret_key);
    let private_key = secret_key_hex(&secret_key);
    secret_key.non_secure_erase();

    Ok(KeyPairHex {
        private_key: private_key?,
        public_key: public_key_hex(&public_key),
    })
}

/// Walk the BIP-32 tree to the account key at `path`.
pub fn derive_account_key<C: Signing>(
    secp: &Secp256k1<C>,
    master_seed: &MasterSeed,
    path: &str,
) -> Result<SecretKey, KeyError> {
    let path: DerivationPath = path
        .parse()
        .map_err(|e: bitcoin::bip32::Error| {
            KeyError::InvalidArgument(format!("invalid derivation path: {}", e))
        })?;

    let mut master = Xpriv::new_master(Network::Bitcoin, master_seed.as_bytes())
        .map_err(|e| KeyError::MissingKeyMaterial(e.to_string()))?;
    let derived = master.derive_priv(secp, &path);
    wipe_xpriv(&mut master);

    let mut derived = derived.map_err(|e| KeyError::MissingKeyMaterial(e.to_string()))?;
    let secret_key = derived.private_key;
    wipe_xpriv(&mut derived);
    Ok(secret_key)
}

/// Overwrite the secret half and the chain code of an extended key.
fn wipe_xpriv(xpriv: &mut Xpriv) {
    xpriv.private_key.non_secure_erase();
    let chain_code: &mut [u8] = xpriv.chain_code.as_mut();
    chain_code.zeroize();
}
