//! Application context: every store of one running instance.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;

use pocketledger_auth::SessionStore;
use pocketledger_core::{InMemoryStore, KeyValueStore, StorageResult};
use pocketledger_infra::JsonFileStore;
use pocketledger_ledger::{LedgerStore, NewEntry};

use crate::config::{AppConfig, StorageBackend};
use crate::theme::{Theme, ThemeStore};

/// Owns the session, ledger and theme stores over one storage backend.
///
/// Built once per instance and passed to whatever renders it. Construction
/// restores the session before the ledger attaches, so the ledger's first
/// load already sees the restored identity.
pub struct AppContext {
    storage: Arc<dyn KeyValueStore>,
    session: SessionStore,
    ledger: LedgerStore,
    theme: ThemeStore,
    default_theme: Theme,
}

impl core::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .field("ledger", &self.ledger)
            .field("theme", &self.theme)
            .finish()
    }
}

impl AppContext {
    /// Open the backend selected by `config` and start the stores.
    pub fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let storage: Arc<dyn KeyValueStore> = match config.storage {
            StorageBackend::Memory => Arc::new(InMemoryStore::new()),
            StorageBackend::File => {
                let store = JsonFileStore::open(&config.data_dir).with_context(|| {
                    format!("failed to open storage in {}", config.data_dir.display())
                })?;
                tracing::info!(path = %store.path().display(), "using file storage");
                Arc::new(store)
            }
        };

        Ok(Self::with_storage(storage, config.default_theme))
    }

    /// Start the stores over an existing backend.
    pub fn with_storage(storage: Arc<dyn KeyValueStore>, default_theme: Theme) -> Self {
        let mut session = SessionStore::new(storage.clone());
        session.restore();

        let ledger = LedgerStore::attach(storage.clone(), &mut session);
        let theme = ThemeStore::load(storage.clone(), default_theme);

        Self {
            storage,
            session,
            ledger,
            theme,
            default_theme,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Mutable session access for signup/login/logout. The ledger follows
    /// automatically.
    pub fn session_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeStore {
        &mut self.theme
    }

    /// Blank entry form dated today. "Today" is the UTC calendar date, so
    /// late-evening drafts west of Greenwich already carry tomorrow's date.
    pub fn new_entry_draft(&self) -> NewEntry {
        NewEntry::draft(Utc::now().date_naive())
    }

    /// Wipe every stored key, sign out and return to the default theme.
    pub fn reset_all_data(&mut self) -> StorageResult<()> {
        self.storage.clear()?;
        self.session.logout();
        self.theme = ThemeStore::load(self.storage.clone(), self.default_theme);
        tracing::info!("all local data cleared");
        Ok(())
    }
}
