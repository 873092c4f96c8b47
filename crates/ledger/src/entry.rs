use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pocketledger_core::{DomainError, DomainResult, Entity, EntryId, IdentityId};

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

/// One recorded transaction.
///
/// Persisted with the field names `id`, `userId`, `title`, `amount`,
/// `category`, `date` (`YYYY-MM-DD`) and `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(rename = "userId")]
    pub owner_id: IdentityId,
    pub title: String,
    /// Non-negative magnitude; the sign comes from `kind`.
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl Entry {
    /// Materialize a [`NewEntry`] with its assigned id and owner.
    pub fn from_new(id: EntryId, owner_id: IdentityId, new: NewEntry) -> Self {
        Self {
            id,
            owner_id,
            title: new.title,
            amount: new.amount,
            category: new.category,
            date: new.date,
            kind: new.kind,
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == EntryKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    /// Case-insensitive substring match on title or category.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.category.to_lowercase().contains(&query)
    }
}

impl Entity for Entry {
    type Id = EntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Entry contents before the store assigns an id and owner.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub kind: EntryKind,
}

impl NewEntry {
    pub fn new(
        title: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
        kind: EntryKind,
    ) -> Self {
        Self {
            title: title.into(),
            amount,
            category: category.into(),
            date,
            kind,
        }
    }

    /// Blank form state: an expense of 0 dated `today`.
    pub fn draft(today: NaiveDate) -> Self {
        Self::new("", 0.0, "", today, EntryKind::Expense)
    }

    /// Form-level checks. The store accepts entries without calling this.
    pub fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title must not be blank"));
        }
        if !self.amount.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if self.amount < 0.0 {
            return Err(DomainError::validation("amount must not be negative"));
        }
        Ok(())
    }
}

impl From<Entry> for NewEntry {
    fn from(entry: Entry) -> Self {
        Self {
            title: entry.title,
            amount: entry.amount,
            category: entry.category,
            date: entry.date,
            kind: entry.kind,
        }
    }
}
