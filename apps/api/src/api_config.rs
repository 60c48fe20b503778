use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tasktrail_application::DEFAULT_AUDIT_WRITE_TIMEOUT;
use tasktrail_core::AppError;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Shortest accepted token signing secret, in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Development-only signing secret. Never accepted in release builds.
const INSECURE_DEV_JWT_SECRET: &str = "tasktrail-insecure-development-signing-secret";

const DEFAULT_AUDIT_NAMESPACE: &str = "audit";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub audit_database_url: String,
    pub audit_namespace: String,
    pub audit_write_timeout: Duration,
    pub jwt_secret: String,
    pub frontend_url: Option<String>,
    pub api_host: String,
    pub api_port: u16,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_non_empty_env("DATABASE_URL")?;
        let audit_database_url =
            optional_env("AUDIT_DATABASE_URL").unwrap_or_else(|| database_url.clone());
        let audit_namespace = validate_namespace(
            optional_env("AUDIT_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_AUDIT_NAMESPACE.to_owned()),
        )?;
        let audit_write_timeout = optional_env("AUDIT_WRITE_TIMEOUT_MS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|millis| *millis > 0)
                    .map(Duration::from_millis)
                    .ok_or_else(|| {
                        AppError::Validation(format!(
                            "AUDIT_WRITE_TIMEOUT_MS must be a positive integer, got '{value}'"
                        ))
                    })
            })
            .transpose()?
            .unwrap_or(DEFAULT_AUDIT_WRITE_TIMEOUT);

        let allow_insecure_dev_secret = optional_env("ALLOW_INSECURE_DEV_SECRET")
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));
        let jwt_secret = resolve_jwt_secret(
            optional_env("JWT_SECRET"),
            cfg!(debug_assertions) && allow_insecure_dev_secret,
        )?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        Ok(Self {
            migrate_only,
            database_url,
            audit_database_url,
            audit_namespace,
            audit_write_timeout,
            jwt_secret,
            frontend_url: optional_env("FRONTEND_URL"),
            api_host,
            api_port,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

/// Accepts a PostgreSQL schema name made of ASCII letters, digits and
/// underscores, not starting with a digit.
fn validate_namespace(namespace: String) -> Result<String, AppError> {
    let mut chars = namespace.chars();
    let starts_well = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
    let rest_ok = chars.all(|next| next.is_ascii_alphanumeric() || next == '_');

    if !starts_well || !rest_ok || namespace.len() > 63 {
        return Err(AppError::Validation(format!(
            "AUDIT_NAMESPACE must be a plain identifier, got '{namespace}'"
        )));
    }

    Ok(namespace)
}

fn resolve_jwt_secret(
    configured: Option<String>,
    allow_insecure_dev_secret: bool,
) -> Result<String, AppError> {
    match configured {
        Some(secret) if secret.len() >= MIN_JWT_SECRET_LENGTH => Ok(secret),
        Some(_) => Err(AppError::Validation(format!(
            "JWT_SECRET must be at least {MIN_JWT_SECRET_LENGTH} bytes"
        ))),
        None if allow_insecure_dev_secret => {
            warn!(
                "JWT_SECRET is not set; signing session tokens with the built-in development secret. \
                 Tokens are forgeable. Never run this configuration outside local development"
            );
            Ok(INSECURE_DEV_JWT_SECRET.to_owned())
        }
        None => Err(AppError::Validation("JWT_SECRET is required".to_owned())),
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}
