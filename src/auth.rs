use crate::{config::BasicAuthConfig, error::AppError, handlers::AppState};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use subtle::ConstantTimeEq;

/// Authentication information attached to each authenticated request
#[derive(Debug, Clone)]
pub struct AuthInfo {
    pub username: String,
}

/// Basic authentication middleware
/// Rejects the request unless the Authorization header carries the configured credentials
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let expected = state
        .config
        .basic_auth
        .as_ref()
        .ok_or_else(|| {
            AppError::Unauthorized("Basic authentication is not configured".to_string())
        })?;

    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let (username, password) = extract_basic_credentials(auth_header)?;

    if !credentials_match(expected, &username, &password) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    req.extensions_mut().insert(AuthInfo { username });

    Ok(next.run(req).await)
}

/// Decode `Basic <base64(user:password)>`
fn extract_basic_credentials(auth_header: &str) -> Result<(String, String), AppError> {
    let (scheme, encoded) = auth_header
        .trim()
        .split_once(' ')
        .ok_or_else(|| {
            AppError::Unauthorized("Authorization header must use Basic scheme".to_string())
        })?;

    if !scheme.eq_ignore_ascii_case("Basic") {
        return Err(AppError::Unauthorized(
            "Authorization header must use Basic scheme".to_string(),
        ));
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::Unauthorized("Credentials are not valid base64".to_string()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| AppError::Unauthorized("Credentials are not valid UTF-8".to_string()))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| AppError::Unauthorized("Credentials must be user:password".to_string()))?;

    Ok((username.to_string(), password.to_string()))
}

fn credentials_match(expected: &BasicAuthConfig, username: &str, password: &str) -> bool {
    let user_ok = expected.username.as_bytes().ct_eq(username.as_bytes());
    let pass_ok = expected.password.as_bytes().ct_eq(password.as_bytes());
    (user_ok & pass_ok).into()
}
