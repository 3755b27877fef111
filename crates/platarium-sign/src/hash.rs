//! Domain-separated message hashing
//!
//! `digest = SHA-256("PlatariumSignature:" || canonical_json(message))`
//!
//! Canonical JSON: object keys sorted by their UTF-8 bytes at every depth,
//! no insignificant whitespace, strings escaped by `serde_json`. Numbers are
//! written the way ECMAScript `Number.prototype.toString` writes them (the
//! RFC 8785 rule): `1`, `1.0` and `1u64` all become `1`, `-0.0` becomes `0`,
//! `1e21` becomes `1e+21`. Integers that do not fit an `f64` exactly keep all
//! their digits.

use serde::Serialize;
use serde_json::{Number, Value};
use sha2::{Digest, Sha256};

use crate::error::SignError;

/// Prefix mixed into every message digest.
pub const DOMAIN_SEPARATOR: &str = "PlatariumSignature:";

/// Serialize `message` to canonical JSON.
pub fn canonical_json<T: Serialize + ?Sized>(message: &T) -> Result<String, SignError> {
    let value = serde_json::to_value(message).map_err(|e| SignError::Serialization(e.to_string()))?;
    let mut out = String::new();
    write_canonical(&value, &mut out);
    Ok(out)
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Number(number) => write_number(number, out),
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_number(number: &Number, out: &mut String) {
    if let Some(n) = number.as_u64() {
        out.push_str(&n.to_string());
    } else if let Some(n) = number.as_i64() {
        out.push_str(&n.to_string());
    } else if let Some(f) = number.as_f64() {
        out.push_str(&format_f64(f));
    } else {
        out.push_str(&number.to_string());
    }
}

/// ECMAScript number-to-string for a finite `f64`.
fn format_f64(value: f64) -> String {
    // serde_json never yields NaN or infinities; -0.0 is written as 0
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }

    // `{:e}` gives the shortest round-tripping digits, e.g. "-1.2345e-7"
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = match sci.split_once('e') {
        Some(parts) => parts,
        None => (sci.as_str(), "0"),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);

    let k = digits.len() as i32;
    let n = exponent + 1;
    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }

    if k <= n && n <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat('0').take((n - k) as usize));
    } else if 0 < n && n <= 21 {
        out.push_str(&digits[..n as usize]);
        out.push('.');
        out.push_str(&digits[n as usize..]);
    } else if -6 < n && n <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-n) as usize));
        out.push_str(&digits);
    } else {
        out.push_str(&digits[..1]);
        if k > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push('e');
        out.push(if n - 1 >= 0 { '+' } else { '-' });
        out.push_str(&(n - 1).abs().to_string());
    }
    out
}

/// 32-byte domain-separated digest of `message`.
pub fn hash_message<T: Serialize + ?Sized>(message: &T) -> Result<[u8; 32], SignError> {
    let body = canonical_json(message)?;
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_SEPARATOR.as_bytes());
    hasher.update(body.as_bytes());
    Ok(hasher.finalize().into())
}

/// Hex form of [`hash_message`] (64 characters).
pub fn hash_message_hex<T: Serialize + ?Sized>(message: &T) -> Result<String, SignError> {
    hash_message(message).map(hex::encode)
}
