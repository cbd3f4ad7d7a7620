//! Salted PBKDF2-SHA256 password hashes.
//!
//! Hashes are encoded as `pbkdf2-sha256$<iterations>$<salt>$<key>` with the
//! salt and derived key in standard base64, so the iteration count can be
//! raised without invalidating stored hashes.

use base64::{Engine as _, engine::general_purpose::STANDARD as Base64};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;

use crate::error::{ConverterError, ConverterResult};

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Hashes a password with a fresh random salt.
///
/// # Example
///
/// ```
/// use leave_converter::auth::{hash_password, verify_password};
///
/// let encoded = hash_password("admin123", 1_000);
/// assert!(encoded.starts_with("pbkdf2-sha256$1000$"));
/// assert!(verify_password("admin123", &encoded).unwrap());
/// assert!(!verify_password("admin124", &encoded).unwrap());
/// ```
pub fn hash_password(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let key = derive_key(password, &salt, iterations);

    format!(
        "{SCHEME}${iterations}${}${}",
        Base64.encode(salt),
        Base64.encode(key)
    )
}

/// Checks a password against an encoded hash.
///
/// Returns [`ConverterError::PasswordHash`] if `encoded` is not a hash
/// produced by [`hash_password`].
pub fn verify_password(password: &str, encoded: &str) -> ConverterResult<bool> {
    let mut parts = encoded.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(key), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(malformed("expected four '$'-separated fields"));
    };

    if scheme != SCHEME {
        return Err(malformed(format!("unsupported scheme '{}'", scheme)));
    }
    let iterations: u32 = iterations
        .parse()
        .map_err(|_| malformed(format!("invalid iteration count '{}'", iterations)))?;
    let salt = Base64
        .decode(salt.as_bytes())
        .map_err(|_| malformed("salt is not valid base64"))?;
    let expected = Base64
        .decode(key.as_bytes())
        .map_err(|_| malformed("key is not valid base64"))?;
    if expected.len() != KEY_LEN {
        return Err(malformed("key has the wrong length"));
    }

    let actual = derive_key(password, &salt, iterations);
    Ok(constant_time_eq(&actual, &expected))
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn malformed(message: impl Into<String>) -> ConverterError {
    ConverterError::PasswordHash {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 1_000;

    #[test]
    fn test_hash_verifies_original_password() {
        let encoded = hash_password("s3cret!", FAST);
        assert!(verify_password("s3cret!", &encoded).unwrap());
        assert!(!verify_password("S3cret!", &encoded).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("s3cret!", FAST);
        let second = hash_password("s3cret!", FAST);
        assert_ne!(first, second);
    }

    #[test]
    fn test_iteration_count_is_read_from_hash() {
        let encoded = hash_password("s3cret!", 2_000);
        assert!(encoded.starts_with("pbkdf2-sha256$2000$"));
        assert!(verify_password("s3cret!", &encoded).unwrap());
    }

    #[test]
    fn test_malformed_hashes_are_rejected() {
        for encoded in [
            "",
            "plaintext",
            "md5$1000$c2FsdA==$a2V5",
            "pbkdf2-sha256$many$c2FsdA==$a2V5",
            "pbkdf2-sha256$1000$***$a2V5",
            "pbkdf2-sha256$1000$c2FsdA==$a2V5",
            "pbkdf2-sha256$1000$c2FsdA==$a2V5$extra",
        ] {
            assert!(
                matches!(verify_password("x", encoded), Err(ConverterError::PasswordHash { .. })),
                "accepted {encoded:?}"
            );
        }
    }
}
