//! Password validation and digests.
//!
//! A stored password is `SHA-256(salt || password)` where the salt is
//! `"ludoka"` followed by the password length in characters.

use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Passwords must be strictly longer than this many characters.
pub const MIN_PASSWORD_LEN: usize = 3;

/// Check password requirements.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() > MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        })
    }
}

/// Digest a password for storage.
pub fn hash_password(password: &str) -> Vec<u8> {
    let salt = format!("ludoka{}", password.chars().count());
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// Compare a candidate password against a stored digest.
pub fn verify_password(password: &str, stored: &[u8]) -> bool {
    hash_password(password).as_slice() == stored
}
