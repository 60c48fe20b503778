use std::sync::Arc;

use tasktrail_core::{ActorIdentity, AppError, AppResult};
use tasktrail_domain::User;
use tokio::sync::OnceCell;

use crate::credential_ports::{hash_password_blocking, verify_password_blocking};
use crate::{CreateUserInput, PasswordHasher, SessionTokenService, UserService};

/// Hashed once and verified against when a username is unknown.
const TIMING_PLACEHOLDER_PASSWORD: &str = "tasktrail-unknown-user-placeholder";

/// Successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Signed session token.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// Credential issuance and bearer-token authentication.
///
/// Registration and login never produce audit records.
#[derive(Clone)]
pub struct AuthService {
    user_service: UserService,
    password_hasher: Arc<dyn PasswordHasher>,
    token_service: Arc<dyn SessionTokenService>,
    placeholder_digest: Arc<OnceCell<String>>,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(
        user_service: UserService,
        password_hasher: Arc<dyn PasswordHasher>,
        token_service: Arc<dyn SessionTokenService>,
    ) -> Self {
        Self {
            user_service,
            password_hasher,
            token_service,
            placeholder_digest: Arc::new(OnceCell::new()),
        }
    }

    /// Registers a new user without an acting principal.
    pub async fn register(&self, input: CreateUserInput) -> AppResult<User> {
        self.user_service.create_user(None, input).await
    }

    /// Verifies credentials and issues a session token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let Some(user) = self.user_service.find_by_username(username).await? else {
            // Verify against a fixed digest so unknown usernames cost one
            // verification like known ones. The outcome is irrelevant.
            let digest = self.placeholder_digest().await?;
            verify_password_blocking(&self.password_hasher, password, digest).await?;
            return Err(invalid_credentials());
        };

        let matched =
            verify_password_blocking(&self.password_hasher, password, user.password_hash()).await?;
        if !matched {
            return Err(invalid_credentials());
        }

        let token = self
            .token_service
            .issue_token(&user.id().to_string(), user.username())?;

        Ok(LoginOutcome { token, user })
    }

    async fn placeholder_digest(&self) -> AppResult<&str> {
        self.placeholder_digest
            .get_or_try_init(|| {
                hash_password_blocking(&self.password_hasher, TIMING_PLACEHOLDER_PASSWORD)
            })
            .await
            .map(String::as_str)
    }

    /// Resolves a bearer token into the acting principal.
    pub fn authenticate(&self, token: &str) -> AppResult<ActorIdentity> {
        let claims = self.token_service.verify_token(token)?;
        Ok(ActorIdentity::new(claims.subject, claims.display_name))
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_owned())
}
