//! Delete-password hashing for anonboard.
//!
//! Uses Argon2id. Hashing is CPU and memory bound, so the async entry points
//! run it on the blocking pool and bound it with a timeout.

use std::time::Duration;

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;
use thiserror::Error;

use crate::config::PasswordConfig;
use crate::BoardError;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Stored hash could not be parsed.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Hashing did not finish within the configured limit.
    #[error("password hashing timed out")]
    Timeout,

    /// The blocking worker panicked or was cancelled.
    #[error("password worker failed: {0}")]
    Worker(String),
}

impl From<PasswordError> for BoardError {
    fn from(e: PasswordError) -> Self {
        match e {
            PasswordError::Timeout => BoardError::Timeout("password hashing".to_string()),
            other => BoardError::Hashing(other.to_string()),
        }
    }
}

/// Build an Argon2id hasher with the given cost parameters.
fn create_argon2(params: &Params) -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
}

/// Hash a password with explicit Argon2 parameters.
///
/// Returns a PHC-formatted string carrying the salt and parameters.
pub fn hash_password(password: &str, params: &Params) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2(params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only a broken hash or internal failure is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    // Parameters come from the parsed hash, so old hashes keep verifying after a cost change.
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::HashError(e.to_string())),
    }
}

/// Hashes and verifies delete passwords off the async executor.
#[derive(Debug, Clone)]
pub struct PasswordGuard {
    params: Params,
    timeout: Duration,
}

impl PasswordGuard {
    /// Create a guard from configuration.
    pub fn new(config: &PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

        Ok(Self {
            params,
            timeout: Duration::from_millis(config.hash_timeout_ms),
        })
    }

    /// Hash a plaintext delete password.
    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_string();
        let params = self.params.clone();
        self.run(move || hash_password(&password, &params)).await
    }

    /// Check a candidate password against a stored hash.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let password = password.to_string();
        let hash = hash.to_string();
        self.run(move || verify_password(&password, &hash)).await
    }

    async fn run<T, F>(&self, f: F) -> Result<T, PasswordError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    {
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(f)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(PasswordError::Worker(e.to_string())),
            Err(_) => Err(PasswordError::Timeout),
        }
    }
}
