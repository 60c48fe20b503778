//! User domain types and credential rules.

use serde::Serialize;
use tasktrail_core::{AppError, AppResult, NonEmptyString};

use crate::ids::entity_id;

entity_id!(
    /// Unique identifier for a user record.
    UserId,
    "user"
);

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length (bounds hashing cost for hostile input).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password before it is hashed.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Application user.
///
/// The password digest serializes under `password` so that every serialized
/// form passes through snapshot or response redaction before leaving the
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: NonEmptyString,
    username: NonEmptyString,
    #[serde(rename = "password")]
    password_hash: String,
}

/// Partial update applied to an existing user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement display name.
    pub name: Option<NonEmptyString>,
    /// Replacement login name.
    pub username: Option<NonEmptyString>,
    /// Replacement password digest (already hashed).
    pub password_hash: Option<String>,
}

impl User {
    /// Creates a user with validated fields.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::for_field("name", name)?,
            username: NonEmptyString::for_field("username", username)?,
            password_hash: password_hash.into(),
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the unique login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the stored password digest.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }

    /// Applies a partial update in place.
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(password_hash) = patch.password_hash {
            self.password_hash = password_hash;
        }
    }
}
