//! User lifecycle service.
//!
//! Every mutation follows the same order: resolve and snapshot the current
//! row, write to the entity store, then hand the committed state to the
//! audit trail.

use std::sync::Arc;

use tasktrail_core::{ActorIdentity, AppError, AppResult, NonEmptyString};
use tasktrail_domain::{EntityKind, Snapshot, User, UserId, UserPatch, validate_password};

use crate::audit_trail::AuditTrail;
use crate::credential_ports::hash_password_blocking;
use crate::{AuditRecorder, PasswordHasher, UserRepository};

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Display name.
    pub name: String,
    /// Unique login name.
    pub username: String,
    /// Plaintext password, hashed before it reaches the store.
    pub password: String,
}

/// Partial update for a user. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserInput {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement login name.
    pub username: Option<String>,
    /// Replacement plaintext password. An empty value leaves the password unchanged.
    pub password: Option<String>,
}

/// Application service for user records.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    audit_trail: AuditTrail,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        audit_recorder: AuditRecorder,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            audit_trail: AuditTrail::new(audit_recorder),
        }
    }

    /// Lists all users.
    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.user_repository.list_users().await
    }

    /// Creates a user. With no actor the user is created without an audit record.
    pub async fn create_user(
        &self,
        actor: Option<&ActorIdentity>,
        input: CreateUserInput,
    ) -> AppResult<User> {
        let name = NonEmptyString::for_field("name", input.name)?;
        let username = NonEmptyString::for_field("username", input.username)?;
        validate_password(&input.password)?;

        if self
            .user_repository
            .find_user_by_username(username.as_str())
            .await?
            .is_some()
        {
            return Err(username_taken());
        }

        let password_hash =
            hash_password_blocking(&self.password_hasher, &input.password).await?;
        let user = User::new(UserId::new(), name, username, password_hash)?;
        let created = self.user_repository.insert_user(&user).await?;

        self.audit_trail
            .created(
                actor,
                EntityKind::Users,
                &created.id().to_string(),
                &created,
            )
            .await;

        Ok(created)
    }

    /// Applies a partial update to an existing user.
    pub async fn update_user(
        &self,
        actor: Option<&ActorIdentity>,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> AppResult<User> {
        let mut user = self.require_user(user_id).await?;
        let before = Snapshot::capture(&user)?;

        let mut patch = UserPatch {
            name: input
                .name
                .map(|name| NonEmptyString::for_field("name", name))
                .transpose()?,
            username: input
                .username
                .map(|username| NonEmptyString::for_field("username", username))
                .transpose()?,
            password_hash: None,
        };

        if let Some(username) = &patch.username
            && username.as_str() != user.username()
            && self
                .user_repository
                .find_user_by_username(username.as_str())
                .await?
                .is_some_and(|other| other.id() != user_id)
        {
            return Err(username_taken());
        }

        if let Some(password) = input.password.filter(|password| !password.is_empty()) {
            validate_password(&password)?;
            patch.password_hash =
                Some(hash_password_blocking(&self.password_hasher, &password).await?);
        }

        user.apply(patch);
        let updated = self.user_repository.update_user(&user).await?;

        self.audit_trail
            .updated(
                actor,
                EntityKind::Users,
                &updated.id().to_string(),
                before,
                &updated,
            )
            .await;

        Ok(updated)
    }

    /// Deletes a user.
    pub async fn delete_user(&self, actor: Option<&ActorIdentity>, user_id: UserId) -> AppResult<()> {
        let user = self.require_user(user_id).await?;
        let before = Snapshot::capture(&user)?;

        self.user_repository.delete_user(user_id).await?;

        self.audit_trail
            .deleted(actor, EntityKind::Users, &user_id.to_string(), before)
            .await;

        Ok(())
    }

    /// Finds a user by login name.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.user_repository.find_user_by_username(username).await
    }

    async fn require_user(&self, user_id: UserId) -> AppResult<User> {
        self.user_repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))
    }
}

fn username_taken() -> AppError {
    AppError::Conflict("Username is already taken".to_owned())
}
