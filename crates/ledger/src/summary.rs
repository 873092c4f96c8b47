//! Derived figures over a slice of entries.
//!
//! Nothing here is cached: every call walks the entries it is given.

use std::collections::BTreeMap;

use chrono::{Datelike, Month};

use crate::entry::{Entry, EntryKind};

/// Sum of `amount` over entries of `kind`.
pub fn total(entries: &[Entry], kind: EntryKind) -> f64 {
    entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.amount)
        .sum()
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerSummary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    /// Percentage of income kept; 0 when there is no income.
    pub savings_rate: f64,
}

impl LedgerSummary {
    pub fn compute(entries: &[Entry]) -> Self {
        let income = total(entries, EntryKind::Income);
        let expense = total(entries, EntryKind::Expense);
        let balance = income - expense;

        Self {
            income,
            expense,
            balance,
            savings_rate: savings_rate(income, expense),
        }
    }
}

pub fn savings_rate(income: f64, expense: f64) -> f64 {
    if income > 0.0 {
        (income - expense) / income * 100.0
    } else {
        0.0
    }
}

/// Income and expense for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyTotals {
    pub month: Month,
    pub income: f64,
    pub expense: f64,
}

impl MonthlyTotals {
    /// Short label such as `"Jan"`.
    pub fn label(&self) -> &'static str {
        match self.month {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

/// Group entries by calendar month, January first.
///
/// The year is ignored: March 2024 and March 2025 land in the same bucket.
/// Months without entries are omitted.
pub fn monthly_breakdown(entries: &[Entry]) -> Vec<MonthlyTotals> {
    let mut buckets: BTreeMap<u32, (f64, f64)> = BTreeMap::new();

    for entry in entries {
        let bucket = buckets.entry(entry.date.month()).or_default();
        match entry.kind {
            EntryKind::Income => bucket.0 += entry.amount,
            EntryKind::Expense => bucket.1 += entry.amount,
        }
    }

    buckets
        .into_iter()
        .filter_map(|(month, (income, expense))| {
            let month = u8::try_from(month).ok().and_then(|m| Month::try_from(m).ok())?;
            Some(MonthlyTotals {
                month,
                income,
                expense,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::NewEntry;
    use chrono::NaiveDate;
    use pocketledger_core::{EntryId, IdentityId};

    fn entry(amount: f64, kind: EntryKind, y: i32, m: u32, d: u32) -> Entry {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Entry::from_new(
            EntryId::new(),
            IdentityId::new(),
            NewEntry::new("t", amount, "c", date, kind),
        )
    }

    #[test]
    fn empty_ledger_is_all_zero() {
        let summary = LedgerSummary::compute(&[]);
        assert_eq!(summary.income, 0.0);
        assert_eq!(summary.expense, 0.0);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.savings_rate, 0.0);
        assert!(monthly_breakdown(&[]).is_empty());
    }

    #[test]
    fn summary_matches_definitions() {
        let entries = vec![
            entry(1000.0, EntryKind::Income, 2025, 1, 2),
            entry(5.0, EntryKind::Expense, 2025, 1, 1),
            entry(245.0, EntryKind::Expense, 2025, 1, 3),
        ];

        let summary = LedgerSummary::compute(&entries);
        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expense, 250.0);
        assert_eq!(summary.balance, 750.0);
        assert_eq!(summary.savings_rate, 75.0);
    }

    #[test]
    fn overspending_gives_negative_balance_and_rate() {
        let entries = vec![
            entry(100.0, EntryKind::Income, 2025, 1, 1),
            entry(150.0, EntryKind::Expense, 2025, 1, 1),
        ];
        let summary = LedgerSummary::compute(&entries);
        assert_eq!(summary.balance, -50.0);
        assert_eq!(summary.savings_rate, -50.0);
    }

    #[test]
    fn months_are_ordered_by_calendar_not_insertion() {
        let entries = vec![
            entry(10.0, EntryKind::Expense, 2025, 11, 5),
            entry(500.0, EntryKind::Income, 2025, 2, 1),
            entry(20.0, EntryKind::Expense, 2024, 2, 14),
            entry(7.0, EntryKind::Expense, 2025, 11, 30),
        ];

        let months = monthly_breakdown(&entries);
        assert_eq!(months.len(), 2);

        assert_eq!(months[0].month, Month::February);
        assert_eq!(months[0].label(), "Feb");
        assert_eq!(months[0].income, 500.0);
        assert_eq!(months[0].expense, 20.0);

        assert_eq!(months[1].month, Month::November);
        assert_eq!(months[1].income, 0.0);
        assert_eq!(months[1].expense, 17.0);
    }
}
