//! Auth Service — signup, login and bearer verification.
//!
//! Login failures are deliberately indistinguishable: unknown email and wrong
//! password both yield `InvalidCredentials`.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::auth::password::PasswordHasher;
use crate::auth::store::{CredentialStore, StoreError};
use crate::auth::token::{IssuedToken, TokenIssuer};
use crate::models::user::{NewUser, PublicUser};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateAccount,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Credential store error: {0}")]
    Store(StoreError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::DuplicateAccount,
            other => AuthError::Store(other),
        }
    }
}

/// Result of a successful signup or login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: IssuedToken,
    pub user: PublicUser,
}

pub struct SignupParams {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    /// Hash verified against when the email is unknown, so both login
    /// failures cost one Argon2 verification.
    dummy_hash: Arc<OnceCell<String>>,
}

const DUMMY_PASSWORD: &str = "genfox-dummy-password";

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher,
            tokens,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Creates an account and signs the new user in.
    pub async fn signup(&self, params: SignupParams) -> Result<Session, AuthError> {
        if self.store.find_by_email(&params.email).await?.is_some() {
            return Err(AuthError::DuplicateAccount);
        }

        let password_hash = self.hash_password(params.password).await?;

        // A concurrent signup can still win the race; the store's unique
        // constraint turns that into DuplicateAccount via From<StoreError>.
        let account = self
            .store
            .insert_user(NewUser {
                email: params.email,
                password_hash,
                full_name: params.full_name,
                company_name: params.company_name,
            })
            .await?;

        info!("Created account {}", account.id);
        let token = self.tokens.issue(&account.email)?;
        Ok(Session {
            token,
            user: PublicUser::from(&account),
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let Some(account) = self.store.find_by_email(email).await? else {
            let dummy_hash = self
                .dummy_hash
                .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD.to_string()))
                .await?;
            self.verify_password(password, dummy_hash).await?;
            warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, &account.password_hash).await? {
            warn!("Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account.email)?;
        Ok(Session {
            token,
            user: PublicUser::from(&account),
        })
    }

    /// Resolves a bearer token to the account it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<PublicUser, AuthError> {
        let claims = self
            .tokens
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)?;

        self.store
            .find_by_email(&claims.sub)
            .await?
            .map(|account| PublicUser::from(&account))
            .ok_or(AuthError::InvalidToken)
    }

    /// Argon2 is CPU-bound, so it runs off the async workers.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    async fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let stored_hash = stored_hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}
