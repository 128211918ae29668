//! Password hashing with bcrypt.
//!
//! Hashes are salted and use a fixed work factor ([`bcrypt::DEFAULT_COST`]).
//! Neither the plaintext nor the hash is ever logged.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}
