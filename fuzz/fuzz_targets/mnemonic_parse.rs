#![no_main]

use libfuzzer_sys::fuzz_target;
use platarium_core::master_seed_from_mnemonic;
use platarium_core::seed::parse_mnemonic;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text as a mnemonic: Ok or Err, never a panic.
    if let Ok(s) = std::str::from_utf8(data) {
        if parse_mnemonic(s).is_ok() {
            let _ = master_seed_from_mnemonic(s, "FUZZCODE00");
        }
    }
});
