//! Argon2 password hashing.
//!
//! Hashing is deliberately slow, so both directions run on the blocking
//! thread pool.

use crate::StoreError;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;

/// Hash checked when a login names an unknown user, so that an unknown
/// username costs the same Argon2 work as a wrong password.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("stockroom-unknown-user").unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to prepare dummy password hash");
        String::new()
    })
});

/// Every `(password, stored_hash)` pair handed to the blocking verifier.
#[cfg(test)]
pub(crate) static VERIFIED: std::sync::Mutex<Vec<(String, String)>> =
    std::sync::Mutex::new(Vec::new());

/// Hash `password` with a fresh salt, returning a PHC string.
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Check `password` against a stored PHC string.
///
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// PHC string that no password is expected to match.
pub(crate) fn dummy_hash() -> &'static str {
    DUMMY_HASH.as_str()
}

pub(crate) async fn hash_password_blocking(password: String) -> Result<String, StoreError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| StoreError::PasswordHash(e.to_string()))?
}

/// Verify on the blocking pool. `None` checks against [`dummy_hash`].
pub(crate) async fn verify_password_blocking(
    password: String,
    stored_hash: Option<String>,
) -> Result<bool, StoreError> {
    tokio::task::spawn_blocking(move || {
        let stored_hash = stored_hash.as_deref().unwrap_or_else(|| dummy_hash());
        #[cfg(test)]
        VERIFIED
            .lock()
            .unwrap()
            .push((password.clone(), stored_hash.to_string()));
        verify_password(&password, stored_hash)
    })
    .await
    .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_only_the_original_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("correct horse ", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = hash_password("pw").unwrap();
        let b = hash_password("pw").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_dummy_hash_is_a_valid_argon2_hash() {
        let hash = dummy_hash();
        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordHash::new(hash).is_ok());
        assert!(!verify_password("pw", hash));
        assert!(!verify_password("", hash));
    }

    #[test]
    fn test_plain_text_stored_value_never_matches() {
        assert!(!verify_password("secret", "secret"));
    }
}
