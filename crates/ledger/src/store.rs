//! Identity-scoped entry store.
//!
//! The store follows the session through [`IdentityListener`]: each identity
//! change discards the in-memory list, loads the new identity's slot and only
//! then re-enables persistence. While logged out the list is empty and nothing
//! is written.

use std::sync::{Arc, Mutex, MutexGuard};

use pocketledger_auth::{Identity, IdentityListener, SessionStore};
use pocketledger_core::storage::{read_json, write_json};
use pocketledger_core::{Entity, EntryId, IdentityId, KeyValueStore};

use crate::entry::{Entry, EntryKind, NewEntry};
use crate::summary::{self, LedgerSummary, MonthlyTotals};

pub const ENTRIES_KEY_PREFIX: &str = "transactions_";

/// Storage key holding `owner`'s entries.
pub fn entries_key(owner: IdentityId) -> String {
    format!("{ENTRIES_KEY_PREFIX}{owner}")
}

fn position<E: Entity>(items: &[E], id: &E::Id) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

#[derive(Debug, Default)]
struct LedgerState {
    owner: Option<IdentityId>,
    entries: Vec<Entry>,
    /// Set once `owner`'s slot has been read. Writes are gated on it.
    loaded: bool,
}

/// Handle to the ledger of the signed-in identity.
///
/// Clones share the same state; one clone is registered with the session.
#[derive(Clone)]
pub struct LedgerStore {
    state: Arc<Mutex<LedgerState>>,
    storage: Arc<dyn KeyValueStore>,
}

impl core::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.lock();
        f.debug_struct("LedgerStore")
            .field("owner", &state.owner)
            .field("entries", &state.entries.len())
            .field("loaded", &state.loaded)
            .finish()
    }
}

impl LedgerStore {
    /// Detached store with no identity. Use [`LedgerStore::attach`] to follow a
    /// session.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState::default())),
            storage,
        }
    }

    /// Create a store subscribed to `session` and synced to its current
    /// identity. A session that is still loading syncs on restore instead.
    pub fn attach(storage: Arc<dyn KeyValueStore>, session: &mut SessionStore) -> Self {
        let store = Self::new(storage);
        session.subscribe(Arc::new(store.clone()));
        if !session.is_loading() {
            store.switch_identity(session.current_identity());
        }
        store
    }

    /// Whether the active identity's entries have been loaded.
    ///
    /// `false` while logged out, even though [`LedgerStore::list`] is empty
    /// then too.
    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    pub fn owner(&self) -> Option<IdentityId> {
        self.lock().owner
    }

    /// Record a new entry at the top of the list.
    ///
    /// Returns the assigned id, or `None` (and does nothing) when no identity
    /// is signed in or the amount is not a finite number.
    pub fn add(&self, new: NewEntry) -> Option<EntryId> {
        let mut state = self.lock();
        let owner = match (state.owner, state.loaded) {
            (Some(owner), true) => owner,
            _ => {
                tracing::debug!("ignoring add without an active identity");
                return None;
            }
        };
        if !new.amount.is_finite() {
            tracing::warn!(amount = new.amount, "ignoring add with a non-finite amount");
            return None;
        }

        let entry = Entry::from_new(EntryId::new(), owner, new);
        let id = entry.id;
        state.entries.insert(0, entry);
        self.persist(&state);
        Some(id)
    }

    /// Replace the entry with the same id, keeping its position.
    ///
    /// Unknown ids and non-finite amounts are ignored. The stored `owner_id`
    /// is kept whatever the replacement carries.
    pub fn update(&self, mut entry: Entry) {
        let mut state = self.lock();
        let Some(index) = position(&state.entries, &entry.id) else {
            tracing::debug!(entry_id = %entry.id, "ignoring update of unknown entry");
            return;
        };
        if !entry.amount.is_finite() {
            tracing::warn!(entry_id = %entry.id, amount = entry.amount, "ignoring update with a non-finite amount");
            return;
        }

        entry.owner_id = state.entries[index].owner_id;
        state.entries[index] = entry;
        self.persist(&state);
    }

    /// Remove the entry with `id`, if present.
    pub fn remove(&self, id: EntryId) {
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|entry| entry.id != id);
        if state.entries.len() == before {
            tracing::debug!(entry_id = %id, "ignoring removal of unknown entry");
            return;
        }

        self.persist(&state);
    }

    /// Entries of the active identity, most recently added first.
    pub fn list(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    pub fn get(&self, id: EntryId) -> Option<Entry> {
        let state = self.lock();
        position(&state.entries, &id).map(|index| state.entries[index].clone())
    }

    /// The first `n` entries of [`LedgerStore::list`].
    pub fn recent(&self, n: usize) -> Vec<Entry> {
        self.lock().entries.iter().take(n).cloned().collect()
    }

    /// Entries whose title or category contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<Entry> {
        self.lock()
            .entries
            .iter()
            .filter(|entry| entry.matches(query))
            .cloned()
            .collect()
    }

    pub fn total_income(&self) -> f64 {
        summary::total(&self.lock().entries, EntryKind::Income)
    }

    pub fn total_expense(&self) -> f64 {
        summary::total(&self.lock().entries, EntryKind::Expense)
    }

    pub fn total_balance(&self) -> f64 {
        let state = self.lock();
        summary::total(&state.entries, EntryKind::Income)
            - summary::total(&state.entries, EntryKind::Expense)
    }

    pub fn summary(&self) -> LedgerSummary {
        LedgerSummary::compute(&self.lock().entries)
    }

    pub fn monthly_breakdown(&self) -> Vec<MonthlyTotals> {
        summary::monthly_breakdown(&self.lock().entries)
    }

    fn switch_identity(&self, identity: Option<&Identity>) {
        let mut state = self.lock();

        state.entries.clear();
        state.loaded = false;
        state.owner = identity.map(|identity| identity.id);

        let Some(owner) = state.owner else {
            tracing::debug!("ledger cleared for anonymous session");
            return;
        };

        let key = entries_key(owner);
        let stored: Vec<Entry> = read_json(&self.storage, &key).unwrap_or_default();
        let total = stored.len();
        state.entries = stored
            .into_iter()
            .filter(|entry| entry.owner_id == owner)
            .collect();
        if state.entries.len() != total {
            tracing::warn!(
                identity_id = %owner,
                dropped = total - state.entries.len(),
                "dropped entries owned by another identity"
            );
        }

        state.loaded = true;
        tracing::debug!(identity_id = %owner, entries = state.entries.len(), "ledger loaded");
    }

    fn persist(&self, state: &LedgerState) {
        let owner = match (state.owner, state.loaded) {
            (Some(owner), true) => owner,
            _ => return,
        };

        if let Err(err) = write_json(&self.storage, &entries_key(owner), &state.entries) {
            tracing::error!(identity_id = %owner, "failed to persist ledger: {err}");
        }
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::error!("ledger state lock poisoned; continuing with inner state");
            poisoned.into_inner()
        })
    }
}

impl IdentityListener for LedgerStore {
    fn identity_changed(&self, identity: Option<&Identity>) {
        self.switch_identity(identity);
    }
}
