use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tasktrail_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the bearer token into an `ActorIdentity` request extension.
/// Requests without a valid token never reach the handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Authorization header required".to_owned()))?;

    let token = header_value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header format".to_owned())
        })?;

    let identity = state.auth_service.authenticate(token)?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
