//! Password hashing (bcrypt).
//!
//! bcrypt is deliberately slow, so both directions run on the blocking pool
//! and never on an async worker.

use bcrypt::BcryptError;
use tokio::task::JoinError;

use crate::observability::logging::spawn_blocking_with_tracing;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error(transparent)]
    Bcrypt(#[from] BcryptError),

    #[error("password task failed: {0}")]
    Task(#[from] JoinError),
}

/// Hash `password` with the given bcrypt cost.
#[tracing::instrument(name = "Hash password", skip(password))]
pub async fn hash(password: &str, cost: u32) -> Result<String, PasswordError> {
    let password = password.to_string();
    let hashed = spawn_blocking_with_tracing(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// True if `value` already looks like a bcrypt hash.
pub fn is_hashed(value: &str) -> bool {
    value.len() == 60 && value.starts_with("$2")
}

/// Compare a plaintext password against a stored hash.
///
/// A malformed hash counts as a mismatch.
#[tracing::instrument(name = "Verify password", skip_all)]
pub async fn check(password: &str, hashed: &str) -> bool {
    let password = password.to_string();
    let hashed = hashed.to_string();
    match spawn_blocking_with_tracing(move || bcrypt::verify(password, &hashed)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "Password verification task failed");
            false
        }
    }
}
