//! Authentication state shared by the gateway and the command guard.
//!
//! The context is cheap to clone; clones share one state. The current user is
//! also published on a watch channel so long-running views can react to login
//! and logout.

mod store;
mod token;

use std::sync::Arc;

use jiff::Timestamp;
use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, warn};

pub use store::{SessionStore, SessionUser, StoredSession};
pub use token::{TokenClaims, decode_claims};

#[cfg(test)]
pub(crate) use token::encode_test_token;

use crate::error::{ConsoleError, Result};
use crate::models::{UserPermissions, UserRole};

#[derive(Default)]
struct SessionState {
    token: Option<SecretString>,
    claims: Option<TokenClaims>,
    role: Option<String>,
}

struct Inner {
    state: RwLock<SessionState>,
    user: watch::Sender<Option<SessionUser>>,
}

#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("SessionContext")
            .field("token", &state.token.as_ref().map(|_| "[REDACTED]"))
            .field("role", &state.role)
            .finish()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// An empty, unauthenticated session.
    pub fn new() -> Self {
        let (user, _) = watch::channel(None);
        SessionContext {
            inner: Arc::new(Inner {
                state: RwLock::new(SessionState::default()),
                user,
            }),
        }
    }

    /// Rebuild a session from what was persisted by a previous login.
    pub fn restore(stored: StoredSession) -> Self {
        let context = Self::new();
        if let Some(token) = stored.token {
            context.establish(token, stored.role, stored.user);
        }
        context
    }

    /// Install a freshly issued token.
    ///
    /// The role comes from the login response when given, otherwise from the
    /// token claims. A token whose payload cannot be read is kept (the backend
    /// decides) but will never pass [`SessionContext::guard`].
    pub fn establish(&self, token: String, role: Option<String>, user: Option<SessionUser>) {
        let claims = match decode_claims(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                warn!("could not read session token claims: {e}");
                None
            }
        };
        let role = role
            .filter(|r| !r.is_empty())
            .or_else(|| claims.as_ref().and_then(|c| c.role.clone()));
        debug!(role = ?role, "session established");

        {
            let mut state = self.inner.state.write();
            state.token = Some(SecretString::from(token));
            state.claims = claims;
            state.role = role;
        }
        self.inner.user.send_replace(user);
    }

    /// Drop token, role and user.
    pub fn clear(&self) {
        *self.inner.state.write() = SessionState::default();
        self.inner.user.send_replace(None);
    }

    pub fn has_token(&self) -> bool {
        self.inner.state.read().token.is_some()
    }

    /// Run `f` with the raw bearer token, if any, without copying it out.
    pub fn with_bearer<R>(&self, f: impl FnOnce(Option<&str>) -> R) -> R {
        let state = self.inner.state.read();
        f(state.token.as_ref().map(|t| t.expose_secret()))
    }

    pub fn claims(&self) -> Option<TokenClaims> {
        self.inner.state.read().claims.clone()
    }

    pub fn role_name(&self) -> Option<String> {
        self.inner.state.read().role.clone()
    }

    /// The role, if it is one the console knows about.
    pub fn role(&self) -> Option<UserRole> {
        self.role_name().and_then(|r| r.parse().ok())
    }

    pub fn permissions(&self) -> UserPermissions {
        self.role().map(|r| r.permissions()).unwrap_or_default()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.inner.user.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.inner.user.subscribe()
    }

    /// A token is present and its `exp` claim lies in the future.
    pub fn is_authenticated_at(&self, now: Timestamp) -> bool {
        let state = self.inner.state.read();
        state.token.is_some() && state.claims.as_ref().is_some_and(|c| !c.is_expired(now))
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Timestamp::now())
    }

    /// Fail with [`ConsoleError::Unauthenticated`] unless authenticated.
    pub fn guard(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(ConsoleError::Unauthenticated)
        }
    }

    /// What to persist for the next invocation.
    pub fn snapshot(&self) -> StoredSession {
        let state = self.inner.state.read();
        StoredSession {
            token: state.token.as_ref().map(|t| t.expose_secret().to_string()),
            role: state.role.clone(),
            user: self.current_user(),
        }
    }
}
