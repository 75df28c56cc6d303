/**
 * User Model and Credential Store
 *
 * This module defines the user record and the credential store boundary.
 *
 * Two backends implement the store: `PgCredentialStore` runs parameterized
 * queries against PostgreSQL, and `MemoryCredentialStore` keeps accounts in
 * a guarded map. The server falls back to the in-memory backend when no
 * `DATABASE_URL` is configured, and the test suite runs on it directly.
 *
 * Username uniqueness is enforced by the store, never by callers. Two
 * concurrent signups racing on the same username are arbitrated here: one
 * wins, the other receives `StoreError::DuplicateUsername`.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;

/// A user account record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAccount {
    /// Stable surrogate key, unique and immutable
    pub id: Uuid,
    /// Username (unique among live accounts, compared case-sensitively)
    pub username: String,
    /// User email address
    pub email: String,
    /// Opaque bcrypt hash, never the plaintext
    pub password_hash: String,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
}

/// Credential store boundary.
///
/// All lookups are read-only. `create` is the only write and the store
/// itself rejects duplicate usernames.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a new account.
    ///
    /// # Arguments
    ///
    /// * `username` - Desired username
    /// * `password_hash` - Hash produced by [`crate::auth::password::hash_password`]
    /// * `email` - User email address
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateUsername` if the username is taken.
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<UserAccount, StoreError>;

    /// Look up an account by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, StoreError>;
}

/// PostgreSQL-backed credential store.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<UserAccount, StoreError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let result = sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // The UNIQUE constraint on username is the arbiter for
            // concurrent signups.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, StoreError> {
        let user = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// In-memory credential store.
///
/// Used when the server runs without a database and by the test suite.
/// The map is guarded by a single `RwLock`; `create` holds the write guard
/// across its uniqueness check and insert, so duplicate signups cannot
/// both win.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<Uuid, UserAccount>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: &str,
    ) -> Result<UserAccount, StoreError> {
        let mut users = self.users.write().unwrap();

        if users.values().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUsername(username.to_string()));
        }

        let user = UserAccount {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, StoreError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserAccount>, StoreError> {
        let users = self.users.read().unwrap();
        Ok(users.get(&id).cloned())
    }
}
