/**
 * Credential Verification
 *
 * This module turns a (username, password) pair into one of four explicit
 * outcomes. Callers can tell "bad credentials" apart from "could not check
 * credentials", which the login handler maps to 401 and 500 respectively.
 *
 * An unknown username short-circuits before any hash comparison runs.
 */

use std::sync::Arc;
use thiserror::Error;

use crate::auth::password::verify_password;
use crate::auth::users::{CredentialStore, UserAccount};
use crate::error::StoreError;

/// A failure while checking credentials, as opposed to a rejection.
#[derive(Debug, Error)]
pub enum CredentialCheckError {
    /// The credential store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The stored hash could not be processed.
    #[error("password hash verification failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Outcome of a credential check.
#[derive(Debug)]
pub enum AuthResult {
    /// Credentials matched; carries the verified account.
    Accepted(UserAccount),
    /// No account with that username exists.
    RejectedUserNotFound,
    /// The account exists but the password does not match.
    RejectedBadPassword,
    /// The check itself failed and nothing can be said about the
    /// credentials.
    Error(CredentialCheckError),
}

/// Stateless verification strategy over a credential store.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
}

impl Authenticator {
    /// Create an authenticator over the given store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Verify a (username, password) pair.
    ///
    /// Pure read and compare; no session or other state is touched here.
    ///
    /// # Arguments
    ///
    /// * `username` - The presented username
    /// * `password` - The presented plaintext password
    ///
    /// # Returns
    ///
    /// One of the four [`AuthResult`] outcomes
    pub async fn verify(&self, username: &str, password: &str) -> AuthResult {
        let account = match self.store.find_by_username(username).await {
            Ok(Some(account)) => account,
            Ok(None) => return AuthResult::RejectedUserNotFound,
            Err(e) => return AuthResult::Error(e.into()),
        };

        match verify_password(password, &account.password_hash) {
            Ok(true) => AuthResult::Accepted(account),
            Ok(false) => AuthResult::RejectedBadPassword,
            Err(e) => AuthResult::Error(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::auth::users::MemoryCredentialStore;

    async fn store_with_user(username: &str, password: &str) -> Arc<MemoryCredentialStore> {
        let store = Arc::new(MemoryCredentialStore::new());
        let hash = hash_password(password).unwrap();
        store.create(username, &hash, "a@example.com").await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_accepted_on_matching_credentials() {
        let store = store_with_user("alice1", "secret1").await;
        let auth = Authenticator::new(store);

        match auth.verify("alice1", "secret1").await {
            AuthResult::Accepted(account) => assert_eq!(account.username, "alice1"),
            other => panic!("expected Accepted, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rejected_user_not_found() {
        let store = store_with_user("alice1", "secret1").await;
        let auth = Authenticator::new(store);

        assert!(matches!(
            auth.verify("ghost", "secret1").await,
            AuthResult::RejectedUserNotFound
        ));
    }

    #[tokio::test]
    async fn test_rejected_bad_password() {
        let store = store_with_user("alice1", "secret1").await;
        let auth = Authenticator::new(store);

        assert!(matches!(
            auth.verify("alice1", "wrong").await,
            AuthResult::RejectedBadPassword
        ));
    }

    #[tokio::test]
    async fn test_any_other_password_is_rejected() {
        let store = store_with_user("alice1", "secret1").await;
        let auth = Authenticator::new(store);

        for candidate in ["", "secret", "secret11", "SECRET1"] {
            assert!(
                matches!(
                    auth.verify("alice1", candidate).await,
                    AuthResult::RejectedBadPassword
                ),
                "candidate {:?} should be rejected",
                candidate
            );
        }
    }
}
