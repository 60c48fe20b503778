use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use tasktrail_core::{AppError, AppResult};

/// Lifetime of an issued session token.
pub const SESSION_TOKEN_TTL: TimeDelta = TimeDelta::hours(24);

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Hashes on the blocking pool; password hashing is deliberately slow.
pub(crate) async fn hash_password_blocking(
    hasher: &Arc<dyn PasswordHasher>,
    password: &str,
) -> AppResult<String> {
    let hasher = Arc::clone(hasher);
    let password = password.to_owned();

    tokio::task::spawn_blocking(move || hasher.hash_password(&password))
        .await
        .map_err(|error| AppError::Internal(format!("password hashing task failed: {error}")))?
}

/// Verifies on the blocking pool.
pub(crate) async fn verify_password_blocking(
    hasher: &Arc<dyn PasswordHasher>,
    password: &str,
    digest: &str,
) -> AppResult<bool> {
    let hasher = Arc::clone(hasher);
    let password = password.to_owned();
    let digest = digest.to_owned();

    tokio::task::spawn_blocking(move || hasher.verify_password(&password, &digest))
        .await
        .map_err(|error| {
            AppError::Internal(format!("password verification task failed: {error}"))
        })?
}

/// Claims carried by a verified session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user) identifier.
    pub subject: String,
    /// Display name of the subject.
    pub display_name: String,
    /// Issue time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time, `issued_at + SESSION_TOKEN_TTL`.
    pub expires_at: DateTime<Utc>,
}

/// Port for issuing and validating signed session tokens.
pub trait SessionTokenService: Send + Sync {
    /// Issues a token for the subject, expiring after [`SESSION_TOKEN_TTL`].
    fn issue_token(&self, subject: &str, display_name: &str) -> AppResult<String>;

    /// Validates signature and expiry. Any failure is `Unauthorized`.
    fn verify_token(&self, token: &str) -> AppResult<SessionClaims>;
}
