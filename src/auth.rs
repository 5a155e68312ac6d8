use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::{config::ConsoleConfig, navigation::AuthState};

/// Name of the cookie the login page stores the upstream token in.
pub const TOKEN_COOKIE: &str = "token";

/// Claims
///
/// Payload of the JWT issued by the upstream panel's `/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    #[serde(alias = "userID")]
    pub user_id: u64,
    #[serde(default)]
    pub username: String,
    /// Expiration Time (exp). Always validated.
    pub exp: usize,
    pub iat: usize,
}

/// Session
///
/// The caller's authentication state as seen by the console. Built from the request on
/// every page load; a missing, malformed, or expired token yields a logged-out session
/// instead of a rejection, leaving the decision to the navigation guard.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The raw token, forwarded to the upstream as a bearer credential.
    pub token: Option<String>,
    pub claims: Option<Claims>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Validates `token` against `secret`. Invalid tokens produce an anonymous session.
    pub fn from_token(token: &str, secret: &str) -> Self {
        match validate_token(token, secret) {
            Ok(claims) => Self {
                token: Some(token.to_string()),
                claims: Some(claims),
            },
            Err(kind) => {
                tracing::debug!(reason = ?kind, "session token rejected");
                Self::anonymous()
            }
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.username.as_str())
    }
}

impl AuthState for Session {
    fn is_logged_in(&self) -> bool {
        self.claims.is_some()
    }
}

fn validate_token(token: &str, secret: &str) -> Result<Claims, ErrorKind> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| e.into_kind())
}

/// Extracts the session token: the `Authorization: Bearer` header wins over the cookie.
pub fn token_from_parts(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    ConsoleConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = ConsoleConfig::from_ref(state);
        Ok(match token_from_parts(parts) {
            Some(token) => Session::from_token(&token, &config.jwt_secret),
            None => Session::anonymous(),
        })
    }
}

/// AuthenticatedSession
///
/// A session that is known to be logged in. Rejects with 401 otherwise; used on the
/// API routes, where there is no login page to redirect to.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub token: String,
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for AuthenticatedSession
where
    S: Send + Sync,
    ConsoleConfig: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(session) = Session::from_request_parts(parts, state).await;
        match (session.token, session.claims) {
            (Some(token), Some(claims)) => Ok(AuthenticatedSession { token, claims }),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }
}
