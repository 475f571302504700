//! Password hashing.
//!
//! Argon2id in PHC string format; the per-record salt is embedded in the
//! hash, so the stored column is a single opaque string.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;

use crate::AuthResult;
use crate::error::AuthError;

/// Hashes a password with a fresh random salt.
///
/// # Errors
///
/// Returns `Internal` if hashing fails.
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::internal(format!("password hashing failed: {e}")))
}

/// Verifies a password against a stored PHC hash.
///
/// Returns `false` for a mismatch; a corrupt stored hash is an error, not a
/// mismatch.
///
/// # Errors
///
/// Returns `Internal` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> AuthResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::internal(format!("stored password hash is corrupt: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
