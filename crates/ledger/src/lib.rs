//! Personal ledger: income/expense entries scoped to the signed-in identity.
//!
//! [`entry`] and [`summary`] are pure; [`store`] owns persistence and the
//! coupling to the session store.

pub mod entry;
pub mod store;
pub mod summary;

pub use entry::{Entry, EntryKind, NewEntry};
pub use store::{ENTRIES_KEY_PREFIX, LedgerStore, entries_key};
pub use summary::{LedgerSummary, MonthlyTotals};
