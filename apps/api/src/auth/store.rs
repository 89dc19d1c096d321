//! Credential Store — the only code that touches the `users` table.
//!
//! Email uniqueness is enforced by the store (unique index), not by callers:
//! two concurrent signups for one address race past any read-then-write check.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::user::{NewUser, UserAccount};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Carried in `AuthService` as `Arc<dyn CredentialStore>`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Inserts a new account. Fails with `DuplicateEmail` if the email exists.
    async fn insert_user(&self, user: NewUser) -> Result<UserAccount, StoreError>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let account = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, email, password_hash, full_name, company_name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserAccount, StoreError> {
        let id = Uuid::new_v4();

        let account = sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (id, email, password_hash, full_name, company_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, full_name, company_name, created_at
            "#,
        )
        .bind(id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.company_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        info!("Inserted user {id}");
        Ok(account)
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        _ => StoreError::Database(err),
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory store for service and handler tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct InMemoryCredentialStore {
        users: Mutex<HashMap<String, UserAccount>>,
    }

    impl InMemoryCredentialStore {
        pub fn len(&self) -> usize {
            self.users.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CredentialStore for InMemoryCredentialStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
            Ok(self.users.lock().unwrap().get(email).cloned())
        }

        async fn insert_user(&self, user: NewUser) -> Result<UserAccount, StoreError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(&user.email) {
                return Err(StoreError::DuplicateEmail);
            }
            let account = UserAccount {
                id: Uuid::new_v4(),
                email: user.email,
                password_hash: user.password_hash,
                full_name: user.full_name,
                company_name: user.company_name,
                created_at: Utc::now(),
            };
            users.insert(account.email.clone(), account.clone());
            Ok(account)
        }
    }
}
