//! Session store: identity directory + active session.
//!
//! Storage keys:
//! - [`USERS_KEY`]: JSON array of every [`Identity`] ever signed up.
//! - [`AUTH_USER_KEY`]: the active [`Identity`], absent when logged out.
//!
//! Every mutation writes through before returning; listeners are notified
//! synchronously after the new state is in place.

use std::sync::Arc;

use pocketledger_core::KeyValueStore;
use pocketledger_core::storage::{read_json, write_json};

use crate::error::{AuthError, AuthResult};
use crate::identity::Identity;

pub const USERS_KEY: &str = "users";
pub const AUTH_USER_KEY: &str = "auth_user";

/// Observer of identity changes.
///
/// Called with the new identity (or `None` on logout) every time the session
/// changes, including the initial restore.
pub trait IdentityListener: Send + Sync {
    fn identity_changed(&self, identity: Option<&Identity>);
}

/// What the session currently knows about its user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Persisted session not read yet.
    #[default]
    Loading,
    /// Restored or logged out; nobody is signed in.
    Anonymous,
    Authenticated(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Loading | SessionState::Anonymous => None,
        }
    }
}

/// Owns the active session for one running instance.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: SessionState,
    listeners: Vec<Arc<dyn IdentityListener>>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SessionStore {
    /// New store in the [`SessionState::Loading`] state. Call
    /// [`SessionStore::restore`] before handing it to other stores.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            state: SessionState::Loading,
            listeners: Vec::new(),
        }
    }

    /// Load the persisted session.
    ///
    /// Only acts while loading; later calls are no-ops. A persisted session
    /// that is malformed or names an identity missing from the directory
    /// restores as anonymous.
    pub fn restore(&mut self) {
        if !self.is_loading() {
            return;
        }

        let saved: Option<Identity> = read_json(&self.storage, AUTH_USER_KEY);
        let restored = saved.and_then(|saved| {
            if self.directory().contains(&saved) {
                Some(saved)
            } else {
                tracing::warn!(identity_id = %saved.id, "persisted session not in directory; ignoring");
                None
            }
        });

        match &restored {
            Some(identity) => tracing::debug!(identity_id = %identity.id, "session restored"),
            None => tracing::debug!("no session to restore"),
        }

        self.set_state(restored);
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    pub fn current_identity(&self) -> Option<&Identity> {
        self.state.identity()
    }

    /// All identities ever signed up, in signup order.
    pub fn directory(&self) -> Vec<Identity> {
        read_json(&self.storage, USERS_KEY).unwrap_or_default()
    }

    /// Register an identity listener.
    ///
    /// The listener is not called for the current state; callers that need
    /// it sync themselves (see the ledger's `attach`).
    pub fn subscribe(&mut self, listener: Arc<dyn IdentityListener>) {
        self.listeners.push(listener);
    }

    /// Create an identity and sign it in.
    ///
    /// The password is accepted but not stored.
    pub fn signup(&mut self, email: &str, _password: &str) -> AuthResult<Identity> {
        let mut directory = self.directory();
        if directory.iter().any(|existing| existing.has_email(email)) {
            return Err(AuthError::DuplicateIdentity {
                email: email.to_string(),
            });
        }

        let identity = Identity::new(email);
        directory.push(identity.clone());
        write_json(&self.storage, USERS_KEY, &directory)?;

        if let Err(err) = self.activate(identity.clone()) {
            directory.pop();
            if let Err(rollback) = write_json(&self.storage, USERS_KEY, &directory) {
                tracing::error!(identity_id = %identity.id, "failed to roll back signup: {rollback}");
            }
            return Err(err);
        }

        tracing::info!(identity_id = %identity.id, "identity signed up");
        Ok(identity)
    }

    /// Sign in an existing identity by email.
    ///
    /// The password is accepted but never verified.
    pub fn login(&mut self, email: &str, _password: &str) -> AuthResult<Identity> {
        let identity = self
            .directory()
            .into_iter()
            .find(|existing| existing.has_email(email))
            .ok_or_else(|| AuthError::UnknownIdentity {
                email: email.to_string(),
            })?;

        tracing::info!(identity_id = %identity.id, "identity logged in");
        self.activate(identity.clone())?;
        Ok(identity)
    }

    /// Clear the active session. No-op when nobody is signed in.
    pub fn logout(&mut self) {
        if self.current_identity().is_none() {
            return;
        }

        if let Err(err) = self.storage.remove(AUTH_USER_KEY) {
            tracing::error!("failed to remove persisted session: {err}");
        }

        tracing::info!("identity logged out");
        self.set_state(None);
    }

    fn activate(&mut self, identity: Identity) -> AuthResult<()> {
        write_json(&self.storage, AUTH_USER_KEY, &identity)?;
        self.set_state(Some(identity));
        Ok(())
    }

    fn set_state(&mut self, identity: Option<Identity>) {
        self.state = match identity {
            Some(identity) => SessionState::Authenticated(identity),
            None => SessionState::Anonymous,
        };

        let current = self.state.identity();
        for listener in &self.listeners {
            listener.identity_changed(current);
        }
    }
}
