//! Platarium message signing
//!
//! Messages are hashed as `SHA-256("PlatariumSignature:" || canonical JSON)`
//! and signed with deterministic, low-S ECDSA over secp256k1. Either identity
//! key (account or signature) can sign; [`sign_with_both_keys`] uses both.

pub mod error;
pub mod hash;
pub mod signer;
pub mod verify;

pub use error::SignError;
pub use hash::{canonical_json, hash_message, hash_message_hex, DOMAIN_SEPARATOR};
pub use signer::{
    is_high_s, sign, sign_digest, sign_with_both_keys, sign_with_identity, DualSignature,
    SignedMessage, HALF_CURVE_ORDER,
};
pub use verify::{recover_public_key, verify_signature};
