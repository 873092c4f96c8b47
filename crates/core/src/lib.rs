//! `pocketledger-core` — foundation building blocks shared by the stores.
//!
//! Identifiers, the domain error model and the durable key-value port. No
//! backend-specific concerns live here.

pub mod entity;
pub mod error;
pub mod id;
pub mod storage;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{EntryId, IdentityId};
pub use storage::{InMemoryStore, KeyValueStore, StorageError, StorageResult};
