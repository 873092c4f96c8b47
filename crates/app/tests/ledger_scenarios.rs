//! End-to-end scenarios over a full `AppContext`.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use pocketledger_app::{AppConfig, AppContext, StorageBackend, Theme};
use pocketledger_auth::{AUTH_USER_KEY, AuthError, USERS_KEY};
use pocketledger_core::{InMemoryStore, KeyValueStore};
use pocketledger_ledger::{EntryKind, NewEntry, entries_key};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn coffee() -> NewEntry {
    NewEntry::new("Coffee", 5.0, "Food", date(2025, 1, 1), EntryKind::Expense)
}

fn salary() -> NewEntry {
    NewEntry::new("Salary", 1000.0, "Income", date(2025, 1, 2), EntryKind::Income)
}

fn file_config(dir: PathBuf) -> AppConfig {
    AppConfig {
        storage: StorageBackend::File,
        data_dir: dir,
        default_theme: Theme::Light,
        log_filter: "info".to_string(),
    }
}

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("pocketledger-it-{}", uuid::Uuid::now_v7()))
}

#[test]
fn signup_add_logout_login_restores_entries() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let mut ctx = AppContext::with_storage(storage, Theme::Light);

    ctx.session_mut().signup("a@x.com", "p").unwrap();
    ctx.ledger().add(coffee()).unwrap();
    ctx.ledger().add(salary()).unwrap();

    assert_eq!(ctx.ledger().total_income(), 1000.0);
    assert_eq!(ctx.ledger().total_expense(), 5.0);
    assert_eq!(ctx.ledger().total_balance(), 995.0);
    let saved = ctx.ledger().list();
    let titles: Vec<_> = saved.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Salary", "Coffee"]);

    ctx.session_mut().logout();
    assert!(ctx.ledger().list().is_empty());
    assert_eq!(ctx.ledger().total_balance(), 0.0);

    ctx.session_mut().login("a@x.com", "anything").unwrap();
    assert_eq!(ctx.ledger().list(), saved);
}

#[test]
fn failed_login_leaves_ledger_untouched() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let mut ctx = AppContext::with_storage(storage, Theme::Light);
    ctx.session_mut().signup("a@x.com", "p").unwrap();
    ctx.ledger().add(coffee()).unwrap();
    ctx.ledger().add(salary()).unwrap();
    let before = ctx.ledger().list();

    let err = ctx.session_mut().login("nobody@x.com", "p").unwrap_err();
    assert!(matches!(err, AuthError::UnknownIdentity { .. }));

    assert_eq!(ctx.ledger().list(), before);
    assert_eq!(ctx.ledger().total_balance(), 995.0);
}

#[test]
fn second_identity_starts_empty_and_stays_separate() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let mut ctx = AppContext::with_storage(storage.clone(), Theme::Light);

    let a = ctx.session_mut().signup("a@x.com", "p").unwrap();
    ctx.ledger().add(coffee()).unwrap();
    ctx.session_mut().logout();

    let b = ctx.session_mut().signup("b@x.com", "p").unwrap();
    assert!(ctx.ledger().list().is_empty());
    ctx.ledger().add(salary()).unwrap();

    assert!(storage.get(&entries_key(a.id)).unwrap().unwrap().contains("Coffee"));
    let b_slot = storage.get(&entries_key(b.id)).unwrap().unwrap();
    assert!(b_slot.contains("Salary"));
    assert!(!b_slot.contains("Coffee"));
}

#[test]
fn state_survives_restart_with_file_storage() {
    let dir = temp_dir();
    let config = file_config(dir.clone());

    let entry_id = {
        let mut ctx = AppContext::open(&config).unwrap();
        ctx.session_mut().signup("a@x.com", "p").unwrap();
        ctx.ledger().add(coffee()).unwrap();
        let id = ctx.ledger().add(salary()).unwrap();
        ctx.theme_mut().set(Theme::Dark).unwrap();
        id
    };

    let ctx = AppContext::open(&config).unwrap();
    let identity = ctx.session().current_identity().cloned().unwrap();
    assert_eq!(identity.email, "a@x.com");
    assert!(ctx.ledger().is_loaded());
    assert_eq!(ctx.ledger().list().len(), 2);
    assert_eq!(ctx.ledger().list()[0].id, entry_id);
    assert_eq!(ctx.theme().theme(), Theme::Dark);

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn persisted_layout_uses_expected_keys() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let mut ctx = AppContext::with_storage(storage.clone(), Theme::Light);
    let identity = ctx.session_mut().signup("a@x.com", "p").unwrap();
    ctx.ledger().add(coffee()).unwrap();

    let users: serde_json::Value =
        serde_json::from_str(&storage.get(USERS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(users[0]["email"], "a@x.com");

    let session: serde_json::Value =
        serde_json::from_str(&storage.get(AUTH_USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(session["id"], identity.id.to_string());

    let entries: serde_json::Value =
        serde_json::from_str(&storage.get(&entries_key(identity.id)).unwrap().unwrap()).unwrap();
    assert_eq!(entries[0]["userId"], identity.id.to_string());
    assert_eq!(entries[0]["type"], "expense");
    assert_eq!(entries[0]["date"], "2025-01-01");
}

#[test]
fn dashboard_figures() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let mut ctx = AppContext::with_storage(storage, Theme::Light);
    ctx.session_mut().signup("a@x.com", "p").unwrap();
    ctx.ledger().add(coffee()).unwrap();
    ctx.ledger().add(salary()).unwrap();
    ctx.ledger().add(NewEntry::new("Rent", 495.0, "Housing", date(2025, 2, 1), EntryKind::Expense));

    let summary = ctx.ledger().summary();
    assert_eq!(summary.balance, 500.0);
    assert_eq!(summary.savings_rate, 50.0);

    let months = ctx.ledger().monthly_breakdown();
    let labels: Vec<_> = months.iter().map(|m| m.label()).collect();
    assert_eq!(labels, vec!["Jan", "Feb"]);
    assert_eq!(months[0].income, 1000.0);
    assert_eq!(months[0].expense, 5.0);
    assert_eq!(months[1].expense, 495.0);
}
