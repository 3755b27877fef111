//! Fixed-width hex encoding for 256-bit scalars

use crate::error::KeyError;

/// Width of a hex-encoded 256-bit scalar.
pub const SCALAR_HEX_LEN: usize = 64;

/// Encode a big-endian scalar as exactly 64 lowercase hex characters.
///
/// Leading zero bytes are ignored, so shorter values are left-padded.
/// Values that need more than 32 bytes are rejected, never truncated.
pub fn scalar_to_hex(scalar: &[u8]) -> Result<String, KeyError> {
    let first = scalar.iter().position(|&b| b != 0).unwrap_or(scalar.len());
    let significant = &scalar[first..];

    if significant.len() > 32 {
        let natural = hex::encode(significant);
        let natural = natural.trim_start_matches('0');
        return Err(KeyError::LengthViolation(format!(
            "scalar needs {} hex characters, maximum is {}",
            natural.len(),
            SCALAR_HEX_LEN
        )));
    }

    let mut padded = [0u8; 32];
    padded[32 - significant.len()..].copy_from_slice(significant);
    Ok(hex::encode(padded))
}

/// Check that `s` is exactly 64 hex characters (either case).
pub fn validate_scalar_hex(s: &str) -> Result<(), KeyError> {
    if s.len() != SCALAR_HEX_LEN {
        return Err(KeyError::InvalidKeyFormat(format!(
            "expected {} hex characters, got {}",
            SCALAR_HEX_LEN,
            s.len()
        )));
    }
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(KeyError::InvalidKeyFormat(
            "scalar contains non-hex characters".into(),
        ));
    }
    Ok(())
}

/// Decode a 64-character hex scalar into its 32 bytes.
pub fn decode_scalar_hex(s: &str) -> Result<[u8; 32], KeyError> {
    validate_scalar_hex(s)?;
    let mut out = [0u8; 32];
    hex::decode_to_slice(s, &mut out)
        .map_err(|e| KeyError::InvalidKeyFormat(e.to_string()))?;
    Ok(out)
}
