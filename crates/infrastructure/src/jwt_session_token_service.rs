//! HS256 JWT adapter for the session token port.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tasktrail_application::{SESSION_TOKEN_TTL, SessionClaims, SessionTokenService};
use tasktrail_core::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    sub: String,
    username: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256-signed session tokens.
#[derive(Clone)]
pub struct JwtSessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionTokenService {
    /// Creates a token service signing with the given shared secret.
    #[must_use]
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "iat", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    fn issue_at(
        &self,
        subject: &str,
        display_name: &str,
        issued_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let claims = JwtClaims {
            sub: subject.to_owned(),
            username: display_name.to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + SESSION_TOKEN_TTL).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign session token: {error}")))
    }
}

impl SessionTokenService for JwtSessionTokenService {
    fn issue_token(&self, subject: &str, display_name: &str) -> AppResult<String> {
        self.issue_at(subject, display_name, Utc::now())
    }

    fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(
            |error| {
                debug!(error = %error, "session token rejected");
                AppError::Unauthorized("Invalid token".to_owned())
            },
        )?;
        let claims = data.claims;

        let (Some(issued_at), Some(expires_at)) = (
            DateTime::from_timestamp(claims.iat, 0),
            DateTime::from_timestamp(claims.exp, 0),
        ) else {
            return Err(AppError::Unauthorized("Invalid token".to_owned()));
        };

        Ok(SessionClaims {
            subject: claims.sub,
            display_name: claims.username,
            issued_at,
            expires_at,
        })
    }
}
