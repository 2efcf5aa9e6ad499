//! # Password derivation and verification: PBKDF2-HMAC-SHA256
//!
//! Provides the primitives the credential store uses for local accounts:
//!
//! - [`generate_salt`]: 16 random bytes from the OS RNG.
//! - [`derive_key`]: stretches a password and salt into a 32-byte verifier with
//!   PBKDF2-HMAC-SHA256 at the given round count (150,000 in production).
//! - [`hash_password`]: fresh salt + derivation, returned as standard padded
//!   base64 strings, the format stored in the `passwordHash` / `salt` fields.
//! - [`verify_password`]: decodes a stored hash/salt pair, re-derives, and
//!   compares byte-for-byte in constant time. Returns `Ok(false)` on mismatch and
//!   `Err` only when the stored record cannot be decoded.
//!
//! Derivation is CPU-bound. The `*_async` variants move it onto tokio's blocking
//! pool when called inside a tokio runtime so the caller's executor keeps
//! running. Under any other executor, and on wasm, they run inline.
//!
//! Stored round counts come from storage the user can edit, so verification
//! rejects anything outside `1..=`[`MAX_PBKDF2_ITERATIONS`] as a corrupt record.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use store::models::MAX_PBKDF2_ITERATIONS;

use super::error::AuthError;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Generate a random salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a 256-bit key from a password using PBKDF2-HMAC-SHA256.
pub fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<sha2::Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}

/// Hash a password with a fresh salt. Returns `(hash_b64, salt_b64)`.
pub fn hash_password(password: &str, iterations: u32) -> (String, String) {
    let salt = generate_salt();
    let key = derive_key(password, &salt, iterations);
    (STANDARD.encode(key), STANDARD.encode(salt))
}

/// Verify a password against a stored base64 hash and salt.
pub fn verify_password(
    password: &str,
    hash_b64: &str,
    salt_b64: &str,
    iterations: u32,
) -> Result<bool, AuthError> {
    check_iterations(iterations)?;
    let (expected, salt) = decode_verifier(hash_b64, salt_b64)?;
    let computed = derive_key(password, &salt, iterations);
    Ok(constant_time_eq(&computed, &expected))
}

fn decode_verifier(hash_b64: &str, salt_b64: &str) -> Result<(Vec<u8>, Vec<u8>), AuthError> {
    let hash = STANDARD
        .decode(hash_b64)
        .map_err(|e| AuthError::CorruptRecord(format!("password hash: {e}")))?;
    let salt = STANDARD
        .decode(salt_b64)
        .map_err(|e| AuthError::CorruptRecord(format!("salt: {e}")))?;
    Ok((hash, salt))
}

fn check_iterations(iterations: u32) -> Result<(), AuthError> {
    if iterations == 0 || iterations > MAX_PBKDF2_ITERATIONS {
        return Err(AuthError::CorruptRecord(format!(
            "round count {iterations} out of range"
        )));
    }
    Ok(())
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// [`hash_password`] off the async executor.
pub async fn hash_password_async(
    password: &str,
    iterations: u32,
) -> Result<(String, String), AuthError> {
    #[cfg(not(target_arch = "wasm32"))]
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        let password = password.to_string();
        return handle
            .spawn_blocking(move || hash_password(&password, iterations))
            .await
            .map_err(|e| AuthError::Derivation(e.to_string()));
    }
    Ok(hash_password(password, iterations))
}

/// [`verify_password`] off the async executor.
pub async fn verify_password_async(
    password: &str,
    hash_b64: &str,
    salt_b64: &str,
    iterations: u32,
) -> Result<bool, AuthError> {
    #[cfg(not(target_arch = "wasm32"))]
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        check_iterations(iterations)?;
        let (expected, salt) = decode_verifier(hash_b64, salt_b64)?;
        let password = password.to_string();
        let computed = handle
            .spawn_blocking(move || derive_key(&password, &salt, iterations))
            .await
            .map_err(|e| AuthError::Derivation(e.to_string()))?;
        return Ok(constant_time_eq(&computed, &expected));
    }
    verify_password(password, hash_b64, salt_b64, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 1_000;

    #[test]
    fn test_derive_key_is_deterministic() {
        let salt = [42u8; SALT_LEN];
        let key1 = derive_key("secret1", &salt, FAST);
        let key2 = derive_key("secret1", &salt, FAST);
        assert_eq!(key1, key2);

        // Different password → different key
        assert_ne!(key1, derive_key("secret2", &salt, FAST));

        // Different salt → different key
        assert_ne!(key1, derive_key("secret1", &[7u8; SALT_LEN], FAST));

        // Different round count → different key
        assert_ne!(key1, derive_key("secret1", &salt, FAST + 1));
    }

    #[test]
    fn test_derive_key_known_vector() {
        // RFC 7914 §11 PBKDF2-HMAC-SHA256 test vector, first 32 bytes.
        let key = derive_key("passwd", b"salt", 1);
        let expected: [u8; KEY_LEN] = [
            0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f, 0xec, 0x16, 0x91, 0xc2, 0x25, 0x44,
            0xb6, 0x05, 0xf9, 0x41, 0x85, 0x21, 0x6d, 0xde, 0x04, 0x65, 0xe6, 0x8b, 0x9d, 0x57,
            0xc2, 0x0d, 0xac, 0xbc,
        ];
        assert_eq!(key, expected);
    }

    #[test]
    fn test_hash_and_verify() {
        let (hash, salt) = hash_password("secret1", FAST);
        assert_eq!(STANDARD.decode(&hash).unwrap().len(), KEY_LEN);
        assert_eq!(STANDARD.decode(&salt).unwrap().len(), SALT_LEN);

        assert!(verify_password("secret1", &hash, &salt, FAST).unwrap());
        assert!(!verify_password("secret2", &hash, &salt, FAST).unwrap());
        assert!(!verify_password("secret1", &hash, &salt, FAST + 1).unwrap());
    }

    #[test]
    fn test_salts_are_random() {
        let (hash1, salt1) = hash_password("same", FAST);
        let (hash2, salt2) = hash_password("same", FAST);
        assert_ne!(salt1, salt2);
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_corrupt_verifier_is_an_error() {
        let (hash, _) = hash_password("secret1", FAST);
        assert!(matches!(
            verify_password("secret1", &hash, "%%%", FAST),
            Err(AuthError::CorruptRecord(_))
        ));
        assert!(matches!(
            verify_password("secret1", "not base64!", "c2FsdA==", FAST),
            Err(AuthError::CorruptRecord(_))
        ));
    }

    #[test]
    fn test_out_of_range_rounds_are_corrupt() {
        let (hash, salt) = hash_password("secret1", FAST);
        for rounds in [0, MAX_PBKDF2_ITERATIONS + 1, u32::MAX] {
            assert!(matches!(
                verify_password("secret1", &hash, &salt, rounds),
                Err(AuthError::CorruptRecord(_))
            ));
        }
    }

    #[test]
    fn test_async_variants_without_tokio() {
        use futures::executor::block_on;

        let (hash, salt) = block_on(hash_password_async("secret1", FAST)).unwrap();
        assert!(block_on(verify_password_async("secret1", &hash, &salt, FAST)).unwrap());
        assert!(!block_on(verify_password_async("wrong", &hash, &salt, FAST)).unwrap());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
    }

    #[tokio::test]
    async fn test_async_variants_agree() {
        let (hash, salt) = hash_password_async("secret1", FAST).await.unwrap();
        assert!(verify_password("secret1", &hash, &salt, FAST).unwrap());
        assert!(verify_password_async("secret1", &hash, &salt, FAST)
            .await
            .unwrap());
        assert!(!verify_password_async("wrong", &hash, &salt, FAST)
            .await
            .unwrap());
    }
}
