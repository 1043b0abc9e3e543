//! Password hashing for `users.password_hash`.
//!
//! The column holds a self-describing Argon2id PHC string
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`). Parameters and salt
//! travel with the hash, so rows written with older settings keep verifying.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Hashes `plain` with a fresh random salt and returns the PHC string to store.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    match Argon2::default().hash_password(plain.as_bytes(), &salt) {
        Ok(phc) => Ok(phc.to_string()),
        Err(e) => {
            error!(error = %e, "could not hash password");
            anyhow::bail!("password hashing failed: {e}")
        }
    }
}

/// Checks `plain` against a stored PHC string using the parameters it carries.
///
/// `Ok(false)` on mismatch; `Err` only when the stored value is not a PHC string.
pub fn verify_password(plain: &str, stored: &str) -> anyhow::Result<bool> {
    let phc = match PasswordHash::new(stored) {
        Ok(phc) => phc,
        Err(e) => {
            error!(error = %e, "stored password hash is unreadable");
            anyhow::bail!("unreadable password hash: {e}")
        }
    };
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &phc)
        .is_ok())
}
