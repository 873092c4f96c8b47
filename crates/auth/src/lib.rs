//! `pocketledger-auth` — mock identity directory and session store.
//!
//! Credential-free by contract: passwords are accepted by the API surface but
//! never stored or compared. A real credential check would sit in front of
//! [`SessionStore::login`].

pub mod error;
pub mod identity;
pub mod session;

pub use error::{AuthError, AuthResult};
pub use identity::Identity;
pub use session::{
    AUTH_USER_KEY, IdentityListener, SessionState, SessionStore, USERS_KEY,
};
