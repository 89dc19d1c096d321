//! Axum route handlers for the Auth API.

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::service::{Session, SignupParams};
use crate::errors::AppError;
use crate::extract::JsonBody;
use crate::models::user::PublicUser;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: PublicUser,
}

impl From<Session> for TokenResponse {
    fn from(session: Session) -> Self {
        Self {
            access_token: session.token.access_token,
            token_type: "bearer".to_string(),
            user: session.user,
        }
    }
}

/// Raw token from an `Authorization: Bearer <token>` header.
pub struct BearerToken(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let (scheme, token) = header.split_once(' ').ok_or(AppError::Unauthorized)?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return Err(AppError::Unauthorized);
        }
        Ok(BearerToken(token.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    validate_email(&request.email)?;
    if request.password.is_empty() {
        return Err(AppError::Validation("password cannot be empty".to_string()));
    }

    let session = state
        .auth
        .signup(SignupParams {
            email: request.email,
            password: request.password,
            full_name: non_blank(request.full_name),
            company_name: non_blank(request.company_name),
        })
        .await?;

    Ok(Json(session.into()))
}

/// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let session = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(session.into()))
}

/// GET /auth/me
///
/// Returns the account behind the bearer token.
pub async fn handle_me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<PublicUser>, AppError> {
    let user = state.auth.authenticate(&token).await?;
    Ok(Json(user))
}

/// Minimal shape check: `local@domain.tld`, no whitespace.
fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = !email.chars().any(char::is_whitespace)
        && email
            .split_once('@')
            .map(|(local, domain)| {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            })
            .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(
            "email must be a valid email address".to_string(),
        ))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_plain_addresses() {
        for ok in ["a@b.co", "first.last+roi@acme-corp.io"] {
            assert!(validate_email(ok).is_ok(), "{ok} rejected");
        }
    }

    #[test]
    fn test_validate_email_rejects_malformed_addresses() {
        for bad in ["", "plainaddress", "@acme.io", "a@", "a@acme", "a b@acme.io", "a@@acme.io", "a@.io"] {
            assert!(validate_email(bad).is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn test_blank_optional_names_become_none() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some("Acme".to_string())), Some("Acme".to_string()));
    }
}
