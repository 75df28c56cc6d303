/**
 * Session Management
 *
 * This module owns the server-side session table: opaque tokens mapped to
 * account ids. A session proves a prior successful credential check and
 * nothing else; it stores only the account id, never a copy of account
 * fields, so `resolve` re-reads the account from the credential store on
 * every call and out-of-band account changes are visible on the next
 * request.
 *
 * `resolve` is total. An unknown, expired or ended token, and even a
 * store failure, all degrade to anonymous rather than erroring, because
 * every downstream authorization decision is keyed on this call.
 */

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::auth::users::{CredentialStore, UserAccount};

/// A server-side session entry.
#[derive(Debug, Clone)]
pub struct Session {
    /// Id of the account this session is bound to
    pub user_id: Uuid,
    /// When the session was started
    pub created_at: DateTime<Utc>,
    /// When the session expires; `None` means it lives until logout
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session has expired at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

/// Issues, resolves and tears down sessions.
///
/// The token table is shared across all connections and guarded by a
/// single `RwLock`; `start`, `resolve` and `end` are safe to call
/// concurrently from different connections.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn CredentialStore>,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Option<Duration>,
}

impl SessionManager {
    /// Create a session manager over the given credential store.
    ///
    /// # Arguments
    ///
    /// * `store` - Used to re-resolve the account behind each session
    /// * `ttl` - Optional session lifetime; `None` means sessions live
    ///   until explicit logout
    pub fn new(store: Arc<dyn CredentialStore>, ttl: Option<std::time::Duration>) -> Self {
        Self {
            store,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: ttl.and_then(|d| Duration::from_std(d).ok()),
        }
    }

    /// Start a new session for a verified account.
    ///
    /// Each call issues an independent token; multiple concurrent sessions
    /// per account are permitted.
    ///
    /// # Returns
    ///
    /// The opaque session token to hand to the client
    pub fn start(&self, account: &UserAccount) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let session = Session {
            user_id: account.id,
            created_at: now,
            expires_at: self.ttl.map(|ttl| now + ttl),
        };

        self.sessions.write().unwrap().insert(token.clone(), session);
        tracing::debug!("session started for user {}", account.username);
        token
    }

    /// Resolve a token back to its account.
    ///
    /// The account is read fresh from the credential store on every call.
    /// Returns `None` for unknown, expired or ended tokens, for sessions
    /// whose account no longer resolves, and when the store cannot be
    /// read. Never fails.
    pub async fn resolve(&self, token: &str) -> Option<UserAccount> {
        let session = {
            let sessions = self.sessions.read().unwrap();
            sessions.get(token).cloned()?
        };

        if session.is_expired(Utc::now()) {
            self.sessions.write().unwrap().remove(token);
            tracing::debug!("session expired for user id {}", session.user_id);
            return None;
        }

        match self.store.find_by_id(session.user_id).await {
            Ok(Some(account)) => Some(account),
            Ok(None) => {
                // The account vanished out from under the session.
                self.sessions.write().unwrap().remove(token);
                None
            }
            Err(e) => {
                tracing::error!("failed to resolve session identity: {}", e);
                None
            }
        }
    }

    /// Destroy a session.
    ///
    /// # Returns
    ///
    /// `true` if the token named a live session, `false` if there was
    /// nothing to destroy
    pub fn end(&self, token: &str) -> bool {
        self.sessions.write().unwrap().remove(token).is_some()
    }

    /// Remove expired sessions from the table.
    ///
    /// Expired entries already resolve to anonymous; this reclaims their
    /// memory. Called periodically from a background task.
    ///
    /// # Returns
    ///
    /// How many sessions were removed
    pub fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        before - sessions.len()
    }

    /// Number of sessions currently in the table, expired or not.
    pub fn active_count(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::users::MemoryCredentialStore;
    use std::time::Duration as StdDuration;

    async fn manager_with_user(ttl: Option<StdDuration>) -> (SessionManager, UserAccount) {
        let store = Arc::new(MemoryCredentialStore::new());
        let account = store.create("alice1", "hash", "a@example.com").await.unwrap();
        (SessionManager::new(store, ttl), account)
    }

    #[tokio::test]
    async fn test_start_and_resolve() {
        let (manager, account) = manager_with_user(None).await;
        let token = manager.start(&account);

        let resolved = manager.resolve(&token).await.unwrap();
        assert_eq!(resolved.id, account.id);
    }

    #[tokio::test]
    async fn test_resolve_after_end_is_anonymous() {
        let (manager, account) = manager_with_user(None).await;
        let token = manager.start(&account);

        assert!(manager.end(&token));
        assert!(manager.resolve(&token).await.is_none());

        // Ending again finds nothing, and still does not fail
        assert!(!manager.end(&token));
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let (manager, _) = manager_with_user(None).await;
        assert!(manager.resolve("not-a-token").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_anonymous() {
        let (manager, account) = manager_with_user(Some(StdDuration::ZERO)).await;
        let token = manager.start(&account);

        assert!(manager.resolve(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_independent_per_login() {
        let (manager, account) = manager_with_user(None).await;
        let t1 = manager.start(&account);
        let t2 = manager.start(&account);
        assert_ne!(t1, t2);

        // Ending one leaves the other authenticated
        manager.end(&t1);
        assert!(manager.resolve(&t1).await.is_none());
        assert!(manager.resolve(&t2).await.is_some());
    }

    #[tokio::test]
    async fn test_prune_removes_only_expired() {
        let (expiring, account) = manager_with_user(Some(StdDuration::ZERO)).await;
        expiring.start(&account);
        expiring.start(&account);
        assert_eq!(expiring.prune_expired(), 2);
        assert_eq!(expiring.active_count(), 0);

        let (persistent, account) = manager_with_user(None).await;
        persistent.start(&account);
        assert_eq!(persistent.prune_expired(), 0);
        assert_eq!(persistent.active_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_session_calls() {
        let (manager, account) = manager_with_user(None).await;

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = manager.clone();
            let account = account.clone();
            handles.push(tokio::spawn(async move {
                let token = manager.start(&account);
                assert!(manager.resolve(&token).await.is_some());
                assert!(manager.end(&token));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(manager.active_count(), 0);
    }
}
