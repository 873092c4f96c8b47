//! `pocketledger-app`
//!
//! **Responsibility:** compose the stores for one running instance.
//!
//! This crate provides:
//! - Configuration (storage backend, data directory, log filter)
//! - The theme preference
//! - [`AppContext`]: session + ledger + theme over one storage backend, with
//!   the startup ordering (session restored before the ledger attaches)
//!
//! Presentation layers take an `AppContext` and read everything through it.

pub mod config;
pub mod context;
pub mod theme;

pub use config::{AppConfig, ConfigError, StorageBackend};
pub use context::AppContext;
pub use theme::{THEME_KEY, Theme, ThemeStore};
