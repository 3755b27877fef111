//! Deterministic low-S ECDSA signing
//!
//! Nonces follow RFC 6979 (libsecp256k1). S is forced into the lower half
//! of the curve order. The compact encoding carries the real recovery id as
//! its last byte, so the public key can be recovered from it.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId, Signature};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, Signing};
use serde::{Deserialize, Serialize};

use platarium_core::IdentityBundle;

use crate::error::SignError;
use crate::hash::hash_message;

/// n / 2 for secp256k1, big-endian.
pub const HALF_CURVE_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Output of [`sign`]. All fields are lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMessage {
    /// Domain-separated digest, 64 chars
    pub hash: String,
    /// 64 chars, zero-padded
    pub r: String,
    /// 64 chars, zero-padded, always <= n/2
    pub s: String,
    /// Compressed public key, 66 chars
    #[serde(rename = "pub")]
    pub public_key: String,
    /// DER-encoded signature
    pub der: String,
    /// r || s || recovery id, 130 chars
    pub compact: String,
}

/// One digest signed by both the account key and the signature key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualSignature {
    pub hash: String,
    /// `[account, signature]`
    pub signatures: Vec<SignedMessage>,
}

/// Whether a big-endian S value lies in the upper half of the curve order.
pub fn is_high_s(s: &[u8; 32]) -> bool {
    s > &HALF_CURVE_ORDER
}

/// Low-S form of `signature`, with the recovery id adjusted to match.
fn ensure_low_s(signature: RecoverableSignature) -> Result<(Signature, RecoveryId), SignError> {
    let (recid, compact) = signature.serialize_compact();
    let mut s = [0u8; 32];
    s.copy_from_slice(&compact[32..]);

    let mut standard = signature.to_standard();
    if !is_high_s(&s) {
        return Ok((standard, recid));
    }

    // Negating S mirrors R's y-coordinate parity
    standard.normalize_s();
    let flipped = RecoveryId::from_i32(recid.to_i32() ^ 1)
        .map_err(|e| SignError::InvalidSignature(e.to_string()))?;
    Ok((standard, flipped))
}

/// Sign a precomputed 32-byte digest.
pub fn sign_digest<C: Signing>(
    secp: &Secp256k1<C>,
    secret_key: &SecretKey,
    digest: [u8; 32],
) -> Result<SignedMessage, SignError> {
    let msg = Message::from_digest(digest);
    let recoverable = secp.sign_ecdsa_recoverable(&msg, secret_key);
    let (signature, recid) = ensure_low_s(recoverable)?;

    let compact = signature.serialize_compact();
    let der = signature.serialize_der();
    let public_key = PublicKey::from_secret_key(secp, secret_key);

    let recovery_byte = u8::try_from(recid.to_i32())
        .map_err(|e| SignError::InvalidSignature(e.to_string()))?;
    let mut compact_hex = hex::encode(compact);
    compact_hex.push_str(&hex::encode([recovery_byte]));

    Ok(SignedMessage {
        hash: hex::encode(digest),
        r: hex::encode(&compact[..32]),
        s: hex::encode(&compact[32..]),
        public_key: hex::encode(public_key.serialize()),
        der: hex::encode(&*der),
        compact: compact_hex,
    })
}

/// Hash `message` with the domain separator and sign the digest.
pub fn sign<C: Signing, T: Serialize + ?Sized>(
    secp: &Secp256k1<C>,
    secret_key: &SecretKey,
    message: &T,
) -> Result<SignedMessage, SignError> {
    let digest = hash_message(message)?;
    sign_digest(secp, secret_key, digest)
}

/// Sign `message` with both identity keys over a single digest.
pub fn sign_with_both_keys<C: Signing, T: Serialize + ?Sized>(
    secp: &Secp256k1<C>,
    account_key: &SecretKey,
    signature_key: &SecretKey,
    message: &T,
) -> Result<DualSignature, SignError> {
    let digest = hash_message(message)?;
    let account = sign_digest(secp, account_key, digest)?;
    let signature = sign_digest(secp, signature_key, digest)?;
    log::debug!("signed digest {} with account and signature keys", account.hash);

    Ok(DualSignature {
        hash: hex::encode(digest),
        signatures: vec![account, signature],
    })
}

/// [`sign_with_both_keys`] using the keys stored in an identity bundle.
pub fn sign_with_identity<C: Signing, T: Serialize + ?Sized>(
    secp: &Secp256k1<C>,
    identity: &IdentityBundle,
    message: &T,
) -> Result<DualSignature, SignError> {
    let mut account_key = identity.account_secret_key()?;
    let mut signature_key = identity.signature_secret_key()?;
    let result = sign_with_both_keys(secp, &account_key, &signature_key, message);
    account_key.non_secure_erase();
    signature_key.non_secure_erase();
    result
}
