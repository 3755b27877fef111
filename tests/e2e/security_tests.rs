//! Security-specific tests.
//!
//! These tests verify:
//! 1. Derivation rejects invalid inputs
//! 2. Verification reduces malformed input to `false` without panicking
//! 3. Prefixed key fields cannot be swapped
//! 4. Secrets never reach log output

use std::sync::Arc;

use platarium_core::identity::{
    parse_prefixed_public_key, parse_prefixed_secret_key, ACCOUNT_KEY_PREFIX,
    SIGNATURE_KEY_PREFIX,
};
use platarium_core::keys::{DEFAULT_HKDF_INFO, DEFAULT_HKDF_SALT};
use platarium_core::{
    derive_signature_seed, random_alphanumeric, scalar_to_hex, validate_scalar_hex,
    verify_correlation, KeyError, KeyGenerator, MemoryLogger,
};
use platarium_sign::{recover_public_key, sign, verify_signature};
use secp256k1::{Secp256k1, SecretKey};
use serde_json::json;

const ABANDON: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

// ============================================================================
// 1. Input validation
// ============================================================================

#[test]
fn test_generator_rejects_bad_construction() {
    assert!(matches!(
        KeyGenerator::with_index(0x7fff_ffff),
        Err(KeyError::InvalidArgument(_))
    ));
    assert!(matches!(
        KeyGenerator::new(0, Vec::<u8>::new(), "info", None),
        Err(KeyError::InvalidArgument(_))
    ));
    assert!(matches!(
        KeyGenerator::new(0, "salt", Vec::<u8>::new(), None),
        Err(KeyError::InvalidArgument(_))
    ));
}

#[test]
fn test_restore_rejects_bad_checksum() {
    let gen = KeyGenerator::with_index(0).unwrap();
    let bad = ABANDON.replace("about", "abandon");
    assert!(matches!(
        gen.restore_identity(&bad, "CODE", None, None),
        Err(KeyError::InvalidMnemonic(_))
    ));
}

#[test]
fn test_restore_rejects_bad_path() {
    let gen = KeyGenerator::with_index(0).unwrap();
    assert!(gen
        .restore_identity(ABANDON, "CODE", None, Some("not/a/path"))
        .is_err());
}

#[test]
fn test_empty_master_seed_rejected() {
    assert!(matches!(
        derive_signature_seed(&[], DEFAULT_HKDF_SALT, DEFAULT_HKDF_INFO),
        Err(KeyError::InvalidArgument(_))
    ));
    let key = "11".repeat(32);
    assert!(matches!(
        verify_correlation(&key, &key, &[], DEFAULT_HKDF_SALT, DEFAULT_HKDF_INFO),
        Err(KeyError::InvalidArgument(_))
    ));
}

#[test]
fn test_correlation_rejects_wrong_length_hex() {
    let seed = [0x42u8; 64];
    let good = "ab".repeat(32);
    let short = "ab".repeat(31);
    assert!(matches!(
        verify_correlation(&short, &good, &seed, DEFAULT_HKDF_SALT, DEFAULT_HKDF_INFO),
        Err(KeyError::InvalidKeyFormat(_))
    ));
    assert!(matches!(
        verify_correlation(&good, &short, &seed, DEFAULT_HKDF_SALT, DEFAULT_HKDF_INFO),
        Err(KeyError::InvalidKeyFormat(_))
    ));
}

#[test]
fn test_oversized_scalar_is_rejected_not_truncated() {
    let mut wide = vec![0x01u8];
    wide.extend_from_slice(&[0xffu8; 32]);
    assert!(matches!(
        scalar_to_hex(&wide),
        Err(KeyError::LengthViolation(_))
    ));

    // Leading zero bytes are not significant
    let mut padded = vec![0u8; 4];
    padded.extend_from_slice(&[0xeeu8; 32]);
    assert_eq!(scalar_to_hex(&padded).unwrap(), "ee".repeat(32));
}

#[test]
fn test_hex_validation() {
    assert!(validate_scalar_hex(&"0".repeat(64)).is_ok());
    assert!(validate_scalar_hex(&"0".repeat(63)).is_err());
    assert!(validate_scalar_hex(&"g".repeat(64)).is_err());
}

#[test]
fn test_random_alphanumeric_rejects_bad_arguments() {
    assert!(matches!(
        random_alphanumeric(0, "AB"),
        Err(KeyError::InvalidArgument(_))
    ));
    assert!(matches!(
        random_alphanumeric(5, ""),
        Err(KeyError::InvalidArgument(_))
    ));
}

// ============================================================================
// 2. Verification never panics
// ============================================================================

#[test]
fn test_verify_altered_message_and_signature() {
    let secp = Secp256k1::new();
    let sk = SecretKey::from_slice(&[0x5au8; 32]).unwrap();
    let message = json!({"data": "Hello, Platarium!"});
    let signed = sign(&secp, &sk, &message).unwrap();

    assert!(verify_signature(&secp, &message, &signed.der, &signed.public_key));
    assert!(!verify_signature(
        &secp,
        &json!({"data": "Hello, Platarium."}),
        &signed.der,
        &signed.public_key
    ));

    let der = hex::decode(&signed.der).unwrap();
    for i in 0..der.len() {
        let mut tampered = der.clone();
        tampered[i] ^= 0x80;
        assert!(
            !verify_signature(&secp, &message, &hex::encode(&tampered), &signed.public_key),
            "tampered byte {} still verified",
            i
        );
    }
}

#[test]
fn test_verify_garbage_inputs() {
    let secp = Secp256k1::new();
    let message = json!({"x": 1});
    let long = "ff".repeat(72);
    let inputs = ["", "00", "not hex", "30", "3044", long.as_str()];
    for sig in inputs {
        for pubkey in inputs {
            assert!(!verify_signature(&secp, &message, sig, pubkey));
        }
    }
}

#[test]
fn test_recover_with_wrong_message_gives_other_key() {
    let secp = Secp256k1::new();
    let sk = SecretKey::from_slice(&[0x6bu8; 32]).unwrap();
    let signed = sign(&secp, &sk, &json!({"a": 1})).unwrap();

    if let Ok(pk) = recover_public_key(&secp, &json!({"a": 2}), &signed.compact) {
        assert_ne!(hex::encode(pk.serialize()), signed.public_key);
    }
}

// ============================================================================
// 3. Prefixes keep key classes apart
// ============================================================================

#[test]
fn test_prefixed_keys_cannot_be_swapped() {
    let gen = KeyGenerator::with_index(0).unwrap();
    let bundle = gen.restore_identity(ABANDON, "SWAPTEST12", None, None).unwrap();

    assert!(parse_prefixed_secret_key(&bundle.private_key, ACCOUNT_KEY_PREFIX).is_ok());
    assert!(parse_prefixed_secret_key(&bundle.signature_key, SIGNATURE_KEY_PREFIX).is_ok());

    assert!(parse_prefixed_secret_key(&bundle.private_key, SIGNATURE_KEY_PREFIX).is_err());
    assert!(parse_prefixed_secret_key(&bundle.signature_key, ACCOUNT_KEY_PREFIX).is_err());
    assert!(parse_prefixed_public_key(&bundle.private_key).is_err());
}

// ============================================================================
// 4. Logging hygiene
// ============================================================================

#[test]
fn test_logs_carry_no_secret_material() {
    let logger = Arc::new(MemoryLogger::new());
    let gen = KeyGenerator::with_index(1)
        .unwrap()
        .with_logger(logger.clone());

    let bundle = gen.generate_identity().unwrap();
    let _ = gen.restore_identity("abandon abandon", "LEAKCODE99", None, None);

    // correlation + success for generate, one error for the bad restore
    let entries = logger.entries();
    assert_eq!(entries.len(), 3);

    let account_hex = bundle.private_key.trim_start_matches(ACCOUNT_KEY_PREFIX).to_string();
    let signature_hex = bundle.signature_key.trim_start_matches(SIGNATURE_KEY_PREFIX).to_string();

    for entry in &entries {
        assert!(!entry.message.contains(&bundle.companion_code));
        assert!(!entry.message.contains("LEAKCODE99"));
        assert!(!entry.message.contains(&account_hex));
        assert!(!entry.message.contains(&signature_hex));
        assert!(!entry.message.contains(&bundle.mnemonic));
    }
}

#[test]
fn test_identity_debug_is_redacted() {
    let gen = KeyGenerator::with_index(0).unwrap();
    let bundle = gen.restore_identity(ABANDON, "DEBUGCODE1", None, None).unwrap();
    let printed = format!("{:?}", bundle);

    assert!(!printed.contains("abandon"));
    assert!(!printed.contains("DEBUGCODE1"));
    assert!(!printed.contains(bundle.private_key.as_str()));
    assert!(!printed.contains(bundle.signature_key.as_str()));
}
