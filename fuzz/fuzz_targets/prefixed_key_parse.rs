#![no_main]

use libfuzzer_sys::fuzz_target;
use platarium_core::identity::{
    parse_prefixed_public_key, parse_prefixed_secret_key, ACCOUNT_KEY_PREFIX,
    SIGNATURE_KEY_PREFIX,
};
use platarium_core::{decode_scalar_hex, scalar_to_hex};

fuzz_target!(|data: &[u8]| {
    let _ = scalar_to_hex(data);

    if let Ok(s) = std::str::from_utf8(data) {
        let _ = decode_scalar_hex(s);
        let _ = parse_prefixed_secret_key(s, ACCOUNT_KEY_PREFIX);
        let _ = parse_prefixed_secret_key(s, SIGNATURE_KEY_PREFIX);
        let _ = parse_prefixed_public_key(s);
    }
});
