//! # Password Hashing
//!
//! Passwords are only ever stored as Argon2id hashes. Hashing is CPU bound,
//! so request handlers go through the `*_blocking` wrappers which run on
//! tokio's blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tokio::task::{self, JoinError};

use super::errors::{AuthError, AuthResult};

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::HashingFailed)
}

/// Verify a password against its hash
///
/// An unparseable stored hash never matches.
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// [`hash_password`] on the blocking pool
pub async fn hash_password_blocking(password: String) -> Result<AuthResult<String>, JoinError> {
    task::spawn_blocking(move || hash_password(&password)).await
}

/// [`verify_password`] on the blocking pool
pub async fn verify_password_blocking(
    password: String,
    hash: String,
) -> Result<AuthResult<bool>, JoinError> {
    task::spawn_blocking(move || verify_password(&password, &hash)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = "secure_password_123";
        let hash = hash_password(password).unwrap();

        assert_ne!(hash, password);
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_password_hash_produces_unique_hashes() {
        let password = "same_password";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // salted
        assert_ne!(hash1, hash2);
        assert!(verify_password(password, &hash1).unwrap());
        assert!(verify_password(password, &hash2).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_rejected() {
        assert_eq!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let hash = hash_password_blocking("analytical".to_string())
            .await
            .unwrap()
            .unwrap();

        let ok = verify_password_blocking("analytical".to_string(), hash.clone())
            .await
            .unwrap()
            .unwrap();
        assert!(ok);

        let bad = verify_password_blocking("engine".to_string(), hash)
            .await
            .unwrap()
            .unwrap();
        assert!(!bad);
    }
}
