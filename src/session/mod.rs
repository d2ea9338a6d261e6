// Explicit session context shared by the API client and the CLI.
// Only login/register establish it; logout and 401 responses clear it.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// User information returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserInfo>,
    expired: bool,
}

/// Cloneable handle to the current session
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    /// Anonymous session
    pub fn new() -> Self {
        Self::default()
    }

    /// Session resumed from a previously stored bearer token
    pub fn resume(token: impl Into<String>) -> Self {
        let token = token.into();
        let session = Self::new();
        if !token.is_empty() {
            session.write().token = Some(token);
        }
        session
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// True once the backend rejected the token during this session
    pub fn is_expired(&self) -> bool {
        self.read().expired
    }

    pub(crate) fn establish(&self, token: String, user: Option<UserInfo>) {
        let mut state = self.write();
        state.token = Some(token);
        state.user = user;
        state.expired = false;
        tracing::debug!("Session established");
    }

    pub(crate) fn set_user(&self, user: UserInfo) {
        self.write().user = Some(user);
    }

    /// Explicit logout
    pub fn end(&self) {
        let mut state = self.write();
        state.token = None;
        state.user = None;
        tracing::debug!("Session ended");
    }

    /// Tear down after the backend rejected our credentials
    pub(crate) fn expire(&self) {
        let mut state = self.write();
        if state.token.is_none() {
            return;
        }
        tracing::warn!("Session token rejected by server, clearing session");
        state.token = None;
        state.user = None;
        state.expired = true;
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
