//! Signature verification and public key recovery
//!
//! [`verify_signature`] never fails loudly: malformed hex, a bad DER
//! encoding, an invalid public key and a genuine mismatch all yield `false`.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId, Signature};
use secp256k1::{Message, PublicKey, Secp256k1, Verification};
use serde::Serialize;

use crate::error::SignError;
use crate::hash::hash_message;

/// Check a DER signature (hex) over `message` against a public key (hex).
///
/// The public key may be compressed or uncompressed.
pub fn verify_signature<C: Verification, T: Serialize + ?Sized>(
    secp: &Secp256k1<C>,
    message: &T,
    signature_hex: &str,
    public_key_hex: &str,
) -> bool {
    let Ok(digest) = hash_message(message) else {
        return false;
    };
    let Some(signature) = hex::decode(signature_hex)
        .ok()
        .and_then(|der| Signature::from_der(&der).ok())
    else {
        return false;
    };
    let Some(public_key) = hex::decode(public_key_hex)
        .ok()
        .and_then(|bytes| PublicKey::from_slice(&bytes).ok())
    else {
        return false;
    };

    secp.verify_ecdsa(&Message::from_digest(digest), &signature, &public_key)
        .is_ok()
}

/// Recover the signer's public key from a compact signature (r || s || recid).
pub fn recover_public_key<C: Verification, T: Serialize + ?Sized>(
    secp: &Secp256k1<C>,
    message: &T,
    compact_hex: &str,
) -> Result<PublicKey, SignError> {
    let bytes = hex::decode(compact_hex).map_err(|e| SignError::InvalidSignature(e.to_string()))?;
    if bytes.len() != 65 {
        return Err(SignError::InvalidSignature(format!(
            "compact signature must be 65 bytes, got {}",
            bytes.len()
        )));
    }

    let recid = RecoveryId::from_i32(i32::from(bytes[64]))
        .map_err(|e| SignError::InvalidSignature(e.to_string()))?;
    let signature = RecoverableSignature::from_compact(&bytes[..64], recid)
        .map_err(|e| SignError::InvalidSignature(e.to_string()))?;
    let digest = hash_message(message)?;

    secp.recover_ecdsa(&Message::from_digest(digest), &signature)
        .map_err(|e| SignError::InvalidSignature(e.to_string()))
}
