//! Correlation check between the account key and the signature key
//!
//! Proves the claimed signature key was derived from a given master seed by
//! recomputing it through HKDF. The BIP-32 walk is not repeated: the account
//! key is accepted and format-checked, but only the signature key is compared.

use zeroize::Zeroize;

use crate::encoding::validate_scalar_hex;
use crate::error::KeyError;
use crate::keys::{derive_signature_seed, secret_key_from_seed, secret_key_hex};
use crate::logger::{ErrorContext, KeyLogger};

/// Returns `Ok(true)` iff `signature_key_hex` equals the key recomputed from
/// `(master_seed, salt, info)`, compared case-insensitively.
///
/// # Errors
/// - [`KeyError::InvalidArgument`] if `master_seed` is empty
/// - [`KeyError::InvalidKeyFormat`] if either key is not 64 hex characters
///
/// Errors are returned, not logged. Use [`verify_correlation_logged`] to
/// report them through a [`KeyLogger`].
pub fn verify_correlation(
    account_key_hex: &str,
    signature_key_hex: &str,
    master_seed: &[u8],
    salt: &[u8],
    info: &[u8],
) -> Result<bool, KeyError> {
    if master_seed.is_empty() {
        return Err(KeyError::InvalidArgument(
            "master seed must not be empty".into(),
        ));
    }
    validate_scalar_hex(account_key_hex)?;
    validate_scalar_hex(signature_key_hex)?;

    // Dropped (and wiped) on every return below
    let signature_seed = derive_signature_seed(master_seed, salt, info)?;
    let mut secret_key = secret_key_from_seed(signature_seed.as_bytes())?;
    let derived = secret_key_hex(&secret_key);
    secret_key.non_secure_erase();

    let mut derived = derived?;
    let matches = derived.eq_ignore_ascii_case(signature_key_hex);
    derived.zeroize();

    log::debug!("correlation check result = {}", matches);
    Ok(matches)
}

/// [`verify_correlation`], reporting any error to `logger` under
/// `verify_correlation` with the given account `index`.
pub fn verify_correlation_logged(
    account_key_hex: &str,
    signature_key_hex: &str,
    master_seed: &[u8],
    salt: &[u8],
    info: &[u8],
    logger: &dyn KeyLogger,
    index: u32,
) -> Result<bool, KeyError> {
    verify_correlation(account_key_hex, signature_key_hex, master_seed, salt, info).map_err(|e| {
        logger.log_error(&ErrorContext::now("verify_correlation", index), &e);
        e
    })
}
