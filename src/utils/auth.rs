// src/utils/auth.rs

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use subtle::ConstantTimeEq;

use crate::{config::Config, error::AppError};

/// Credentials carried by an `Authorization: Basic ...` header.
#[derive(Debug, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Decodes a Basic authorization header value.
pub fn parse_basic_auth(value: &str) -> Option<BasicCredentials> {
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(BasicCredentials {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

/// Compares both fields in constant time. Both comparisons always run.
pub fn credentials_match(given: &BasicCredentials, username: &str, password: &str) -> bool {
    let user_ok = given.username.as_bytes().ct_eq(username.as_bytes());
    let pass_ok = given.password.as_bytes().ct_eq(password.as_bytes());

    (user_ok & pass_ok).into()
}

/// Axum Middleware: Admin Basic Authentication.
///
/// Checks the request's Basic credentials against the configured admin account.
/// Failures answer 401 with a `WWW-Authenticate` challenge.
pub async fn admin_middleware(
    State(config): State<Config>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic_auth)
        .ok_or(AppError::Unauthorized)?;

    if !credentials_match(&credentials, &config.admin_username, &config.admin_password) {
        tracing::warn!(
            "Authentication attempt failed for user `{}`",
            credentials.username
        );
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
