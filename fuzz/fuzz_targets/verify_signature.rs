#![no_main]

use libfuzzer_sys::fuzz_target;
use platarium_sign::{recover_public_key, verify_signature};
use secp256k1::Secp256k1;

// Compressed generator point, so the key always parses and the signature path runs.
const PUBKEY: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

fuzz_target!(|data: &[u8]| {
    let secp = Secp256k1::verification_only();
    let message = serde_json::json!({ "data": "fuzz" });

    let hex_sig: String = data.iter().map(|b| format!("{:02x}", b)).collect();
    let _ = verify_signature(&secp, &message, &hex_sig, PUBKEY);
    let _ = recover_public_key(&secp, &message, &hex_sig);

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = verify_signature(&secp, &message, s, s);
    }
});
