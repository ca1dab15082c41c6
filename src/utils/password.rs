//! Argon2id password hashing. Hashes are stored as PHC strings with the salt embedded.

use crate::error::SwatchError;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand::RngCore;

pub(crate) async fn hash_password(password: String) -> Result<String, SwatchError> {
    tokio::task::spawn_blocking(move || {
        let mut salt_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| SwatchError::PasswordHash(e.to_string()))?;
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| SwatchError::PasswordHash(e.to_string()))
    })
    .await
    .map_err(|e| SwatchError::UnexpectedError(format!("hash task failed: {e}")))?
}

/// `Ok(false)` for a wrong password; `Err` only when the stored hash is unreadable.
pub(crate) async fn verify_password(password: String, stored: String) -> Result<bool, SwatchError> {
    tokio::task::spawn_blocking(move || {
        let parsed =
            PasswordHash::new(&stored).map_err(|e| SwatchError::PasswordHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| SwatchError::UnexpectedError(format!("verify task failed: {e}")))?
}
