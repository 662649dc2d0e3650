//! Session context: the single owner of credential state.
//!
//! # Responsibilities
//! - Hold the bearer token in the durable or the session store
//! - Hold the current-user record in the durable store
//! - Clear credentials on logout or on a rejected credential
//!
//! # Design Decisions
//! - Injected into the client at construction; no ambient globals
//! - `set_token` removes the token from the other store first, so a
//!   credential lives in exactly one store
//! - Reads check the durable store first

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::store::{FileStore, KeyValueStore, MemoryStore, StorageError};

pub const TOKEN_KEY: &str = "auth_token";
pub const CURRENT_USER_KEY: &str = "current_user";

/// Profile of the signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Credential holder shared by the client and its callers.
#[derive(Debug, Clone)]
pub struct SessionContext {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl SessionContext {
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// Both stores in memory. Nothing survives the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// Durable store backed by `path`, session store in memory.
    pub fn with_credentials_file(path: impl AsRef<std::path::Path>) -> Result<Self, StorageError> {
        let durable = FileStore::open(path)?;
        Ok(Self::new(Arc::new(durable), Arc::new(MemoryStore::new())))
    }

    pub fn durable_store(&self) -> &Arc<dyn KeyValueStore> {
        &self.durable
    }

    pub fn session_store(&self) -> &Arc<dyn KeyValueStore> {
        &self.session
    }

    /// The active bearer token, durable store first.
    pub fn token(&self) -> Option<String> {
        self.durable
            .get(TOKEN_KEY)
            .or_else(|| self.session.get(TOKEN_KEY))
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store a token. `remember` selects the durable store.
    pub fn set_token(&self, token: &str, remember: bool) -> Result<(), StorageError> {
        let (target, other) = if remember {
            (&self.durable, &self.session)
        } else {
            (&self.session, &self.durable)
        };
        other.remove(TOKEN_KEY)?;
        target.set(TOKEN_KEY, token)?;
        tracing::debug!(remember, "Credential stored");
        Ok(())
    }

    /// Remove the token from both stores.
    pub fn clear_token(&self) -> Result<(), StorageError> {
        let durable = self.durable.remove(TOKEN_KEY);
        let session = self.session.remove(TOKEN_KEY);
        durable.and(session)
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        let raw = self.durable.get(CURRENT_USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable current-user record");
                None
            }
        }
    }

    pub fn set_current_user(&self, user: &CurrentUser) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user)?;
        self.durable.set(CURRENT_USER_KEY, &raw)
    }

    /// Sign in: store the token and the user record together.
    pub fn login(&self, token: &str, user: &CurrentUser, remember: bool) -> Result<(), StorageError> {
        self.set_token(token, remember)?;
        self.set_current_user(user)?;
        tracing::info!(username = %user.username, remember, "Signed in");
        Ok(())
    }

    /// Sign out: drop the token from both stores and the user record.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.clear_token()?;
        self.durable.remove(CURRENT_USER_KEY)?;
        tracing::info!("Signed out");
        Ok(())
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Format a token as an `Authorization` header value.
pub fn bearer_token(token: &str) -> String {
    format!("Bearer {}", token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operator() -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            role: "admin".to_string(),
            name: "Administrator".to_string(),
            created_at: None,
            status: Some("active".to_string()),
        }
    }

    #[test]
    fn test_remember_selects_durable_store() {
        let ctx = SessionContext::in_memory();

        ctx.set_token("durable", true).unwrap();
        assert_eq!(ctx.durable_store().get(TOKEN_KEY).as_deref(), Some("durable"));
        assert!(ctx.session_store().get(TOKEN_KEY).is_none());

        ctx.set_token("ephemeral", false).unwrap();
        assert_eq!(ctx.session_store().get(TOKEN_KEY).as_deref(), Some("ephemeral"));
        assert!(ctx.durable_store().get(TOKEN_KEY).is_none());
        assert_eq!(ctx.token().as_deref(), Some("ephemeral"));
    }

    #[test]
    fn test_durable_wins_when_both_present() {
        let ctx = SessionContext::in_memory();
        ctx.session_store().set(TOKEN_KEY, "session").unwrap();
        ctx.durable_store().set(TOKEN_KEY, "durable").unwrap();

        assert_eq!(ctx.token().as_deref(), Some("durable"));
    }

    #[test]
    fn test_clear_token_empties_both_stores() {
        let ctx = SessionContext::in_memory();
        ctx.session_store().set(TOKEN_KEY, "session").unwrap();
        ctx.durable_store().set(TOKEN_KEY, "durable").unwrap();

        ctx.clear_token().unwrap();
        assert!(!ctx.is_authenticated());
        assert!(ctx.session_store().get(TOKEN_KEY).is_none());
        assert!(ctx.durable_store().get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_login_and_logout() {
        let ctx = SessionContext::in_memory();
        ctx.login("tok", &operator(), false).unwrap();

        assert_eq!(ctx.current_user(), Some(operator()));
        assert!(ctx.is_authenticated());

        ctx.logout().unwrap();
        assert!(ctx.current_user().is_none());
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_current_user_wire_format() {
        let json = serde_json::to_value(operator()).unwrap();
        assert_eq!(json["username"], "admin");
        assert!(json.get("createdAt").is_none());

        let parsed: CurrentUser = serde_json::from_str(
            r#"{"id":7,"username":"ana","email":"ana@user.com","role":"visitor","name":"ana","createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(parsed.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert!(parsed.status.is_none());
    }

    #[test]
    fn test_bearer_token_format() {
        assert_eq!(bearer_token("abc123"), "Bearer abc123");
    }
}
