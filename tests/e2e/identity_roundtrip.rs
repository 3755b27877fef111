//! End-to-end tests for the Platarium identity flow.
//!
//! Exercises, across crates:
//!
//! 1. Generate → restore round trip
//! 2. Correlation of the signature key against an independently derived seed
//! 3. Signing with identity keys and verifying the result
//!
//! Run with: cargo test --test identity_roundtrip

use platarium_core::identity::{parse_prefixed_public_key, ACCOUNT_KEY_PREFIX};
use platarium_core::keys::{DEFAULT_HKDF_INFO, DEFAULT_HKDF_SALT, SIGNATURE_PATH_TAG};
use platarium_core::{
    master_seed_from_mnemonic, random_alphanumeric, scalar_to_hex, verify_correlation,
    KeyGenerator, CHARACTER_SET,
};
use platarium_sign::{
    is_high_s, recover_public_key, sign, sign_with_identity, verify_signature,
};
use secp256k1::Secp256k1;
use serde_json::json;

const ABANDON: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn strip<'a>(value: &'a str, prefix: &str) -> &'a str {
    value.strip_prefix(prefix).unwrap()
}

// ============================================================================
// 1. Generate / restore
// ============================================================================

#[test]
fn test_generate_then_restore_reproduces_keys() {
    let gen = KeyGenerator::with_index(3).unwrap();
    let original = gen.generate_identity().unwrap();

    assert_eq!(original.mnemonic.split_whitespace().count(), 24);
    assert_eq!(original.companion_code.len(), 10);
    assert!(original
        .companion_code
        .chars()
        .all(|c| CHARACTER_SET.contains(c)));

    let restored = gen
        .restore_identity(&original.mnemonic, &original.companion_code, None, None)
        .unwrap();

    assert_eq!(restored.public_key, original.public_key);
    assert_eq!(restored.private_key, original.private_key);
    assert_eq!(restored.signature_key, original.signature_key);
    assert_eq!(restored.derivation_paths, original.derivation_paths);
}

#[test]
fn test_restore_with_custom_salt_needs_same_salt() {
    let custom = KeyGenerator::new(0, "app-salt", "app-info", None).unwrap();
    let default = KeyGenerator::with_index(0).unwrap();

    let a = custom.restore_identity(ABANDON, "CODE123456", None, None).unwrap();
    let b = default.restore_identity(ABANDON, "CODE123456", None, None).unwrap();
    let c = custom.restore_identity(ABANDON, "CODE123456", None, None).unwrap();

    // Account key comes from the BIP-32 tree and ignores salt/info
    assert_eq!(a.private_key, b.private_key);
    assert_ne!(a.signature_key, b.signature_key);
    assert_eq!(a.signature_key, c.signature_key);
}

#[test]
fn test_companion_code_is_a_second_factor() {
    let gen = KeyGenerator::with_index(0).unwrap();
    let a = gen.restore_identity(ABANDON, "AAAAAAAAAA", None, None).unwrap();
    let b = gen.restore_identity(ABANDON, "AAAAAAAAAB", None, None).unwrap();

    assert_ne!(a.private_key, b.private_key);
    assert_ne!(a.signature_key, b.signature_key);
}

#[test]
fn test_default_main_path() {
    let gen = KeyGenerator::with_index(0).unwrap();
    let bundle = gen.restore_identity(ABANDON, "CODE", None, None).unwrap();
    assert_eq!(bundle.derivation_paths.main_path, "m/44'/60'/0'/0/0");
    assert_eq!(bundle.derivation_paths.signature_path, SIGNATURE_PATH_TAG);
}

#[test]
fn test_explicit_path_kept_verbatim() {
    let gen = KeyGenerator::new(
        0,
        DEFAULT_HKDF_SALT,
        DEFAULT_HKDF_INFO,
        Some("m/44'/60'/1'/0/0".to_string()),
    )
    .unwrap();
    let bundle = gen.restore_identity(ABANDON, "CODE", None, None).unwrap();
    assert_eq!(bundle.derivation_paths.main_path, "m/44'/60'/1'/0/0");

    let default = KeyGenerator::with_index(0).unwrap();
    let other = default.restore_identity(ABANDON, "CODE", None, None).unwrap();
    assert_ne!(bundle.private_key, other.private_key);
}

#[test]
fn test_bundle_json_shape() {
    let gen = KeyGenerator::with_index(0).unwrap();
    let bundle = gen.restore_identity(ABANDON, "CODE", None, None).unwrap();
    let value = serde_json::to_value(&bundle).unwrap();

    for field in [
        "mnemonic",
        "companionCode",
        "derivationPaths",
        "publicKey",
        "privateKey",
        "signatureKey",
    ] {
        assert!(value.get(field).is_some(), "missing {}", field);
    }
    assert_eq!(
        value["derivationPaths"]["signaturePath"],
        json!("HKDF-derived")
    );

    let public = value["publicKey"].as_str().unwrap();
    assert!(public.starts_with("Px"));
    assert_eq!(public.len(), 2 + 66);
    assert_eq!(value["privateKey"].as_str().unwrap().len(), 3 + 64);
    assert_eq!(value["signatureKey"].as_str().unwrap().len(), 2 + 64);
}

// ============================================================================
// 2. Correlation
// ============================================================================

#[test]
fn test_restored_identity_correlates_with_master_seed() {
    let gen = KeyGenerator::with_index(0).unwrap();
    let bundle = gen.restore_identity(ABANDON, "ZXCVBNM123", None, None).unwrap();
    let seed = master_seed_from_mnemonic(ABANDON, "ZXCVBNM123").unwrap();

    let account = strip(&bundle.private_key, ACCOUNT_KEY_PREFIX);
    let signature = strip(&bundle.signature_key, "Sx");

    assert!(verify_correlation(
        account,
        signature,
        seed.as_bytes(),
        DEFAULT_HKDF_SALT,
        DEFAULT_HKDF_INFO
    )
    .unwrap());

    // Altered salt, info or key each break the link
    assert!(!verify_correlation(
        account,
        signature,
        seed.as_bytes(),
        b"other-salt",
        DEFAULT_HKDF_INFO
    )
    .unwrap());
    assert!(!verify_correlation(
        account,
        signature,
        seed.as_bytes(),
        DEFAULT_HKDF_SALT,
        b"other-info"
    )
    .unwrap());

    let mut altered = signature.to_string();
    let flipped = if altered.ends_with('0') { "1" } else { "0" };
    altered.replace_range(63.., flipped);
    assert!(!verify_correlation(
        account,
        &altered,
        seed.as_bytes(),
        DEFAULT_HKDF_SALT,
        DEFAULT_HKDF_INFO
    )
    .unwrap());
}

#[test]
fn test_account_key_is_not_the_signature_key() {
    let gen = KeyGenerator::with_index(0).unwrap();
    let bundle = gen.generate_identity().unwrap();
    assert_ne!(
        strip(&bundle.private_key, ACCOUNT_KEY_PREFIX),
        strip(&bundle.signature_key, "Sx")
    );
}

// ============================================================================
// 3. Signing with identity keys
// ============================================================================

#[test]
fn test_sign_hello_platarium_with_deterministic_identity() {
    let secp = Secp256k1::new();
    let gen = KeyGenerator::with_index(0).unwrap();
    let bundle = gen.restore_identity(ABANDON, "TESTCODE12", None, None).unwrap();

    let message = json!({"data": "Hello, Platarium!"});
    let sk = bundle.account_secret_key().unwrap();
    let signed = sign(&secp, &sk, &message).unwrap();

    assert_eq!(signed.hash.len(), 64);
    assert!(!signed.r.is_empty());
    assert!(!signed.s.is_empty());
    assert!(!signed.public_key.is_empty());
    assert_eq!(format!("Px{}", signed.public_key), bundle.public_key);

    assert!(verify_signature(&secp, &message, &signed.der, &signed.public_key));
}

#[test]
fn test_dual_signature_verifies_under_both_public_keys() {
    let secp = Secp256k1::new();
    let gen = KeyGenerator::with_index(2).unwrap();
    let bundle = gen.generate_identity().unwrap();
    let message = json!({"to": "Px02", "amount": 10, "memo": {"b": 1, "a": 2}});

    let dual = sign_with_identity(&secp, &bundle, &message).unwrap();
    let account_pub = bundle.account_public_key().unwrap();
    let signature_pub = bundle.signature_public_key(&secp).unwrap();

    assert!(verify_signature(
        &secp,
        &message,
        &dual.signatures[0].der,
        &hex::encode(account_pub.serialize())
    ));
    assert!(verify_signature(
        &secp,
        &message,
        &dual.signatures[1].der,
        &hex::encode(signature_pub.serialize())
    ));
    // Crossed keys must not verify
    assert!(!verify_signature(
        &secp,
        &message,
        &dual.signatures[0].der,
        &hex::encode(signature_pub.serialize())
    ));
}

#[test]
fn test_recovered_key_matches_bundle() {
    let secp = Secp256k1::new();
    let gen = KeyGenerator::with_index(0).unwrap();
    let bundle = gen.restore_identity(ABANDON, "RECOVER123", None, None).unwrap();
    let message = json!({"nonce": 42});

    let signed = sign(&secp, &bundle.account_secret_key().unwrap(), &message).unwrap();
    let recovered = recover_public_key(&secp, &message, &signed.compact).unwrap();
    assert_eq!(recovered, parse_prefixed_public_key(&bundle.public_key).unwrap());
}

#[test]
fn test_signatures_are_low_s() {
    let secp = Secp256k1::new();
    let gen = KeyGenerator::with_index(0).unwrap();
    let bundle = gen.generate_identity().unwrap();
    let sk = bundle.signature_secret_key().unwrap();

    for i in 0..32 {
        let signed = sign(&secp, &sk, &json!({"seq": i})).unwrap();
        let mut s = [0u8; 32];
        hex::decode_to_slice(&signed.s, &mut s).unwrap();
        assert!(!is_high_s(&s));
    }
}

// ============================================================================
// 4. Utilities exposed to wallet tooling
// ============================================================================

#[test]
fn test_scalar_to_hex_pads_short_values() {
    let scalar = hex::decode("123456789abcdef123456789abcdef").unwrap();
    let out = scalar_to_hex(&scalar).unwrap();
    assert_eq!(out.len(), 64);
    assert!(out.ends_with("123456789abcdef123456789abcdef"));
    assert!(out[..out.len() - 30].chars().all(|c| c == '0'));
}

#[test]
fn test_random_alphanumeric_fifteen() {
    let code = random_alphanumeric(15, CHARACTER_SET).unwrap();
    assert_eq!(code.chars().count(), 15);
    for c in code.chars() {
        let idx = CHARACTER_SET.find(c).unwrap();
        assert!(idx < CHARACTER_SET.len());
    }
}
