//! Uniform random strings for companion codes

use rand::rngs::OsRng;
use rand::Rng;

use crate::error::KeyError;

/// Alphabet companion codes are drawn from.
pub const CHARACTER_SET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Companion code length used for seed derivation.
pub const COMPANION_CODE_LEN: usize = 10;

/// Draw `length` characters uniformly from `alphabet` using the OS CSPRNG.
///
/// `gen_range` rejects out-of-range samples, so there is no modulo bias.
///
/// # Example
/// ```
/// use platarium_core::random::{random_alphanumeric, CHARACTER_SET};
/// let code = random_alphanumeric(15, CHARACTER_SET).unwrap();
/// assert_eq!(code.chars().count(), 15);
/// ```
pub fn random_alphanumeric(length: usize, alphabet: &str) -> Result<String, KeyError> {
    if length == 0 {
        return Err(KeyError::InvalidArgument(
            "length must be a positive integer".into(),
        ));
    }
    let chars: Vec<char> = alphabet.chars().collect();
    if chars.is_empty() {
        return Err(KeyError::InvalidArgument(
            "character set must not be empty".into(),
        ));
    }

    let mut rng = OsRng;
    Ok((0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect())
}
