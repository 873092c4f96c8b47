//! Light/dark preference.
//!
//! Independent of the session and the ledger; it only shares the storage
//! backend.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use pocketledger_core::storage::write_json;
use pocketledger_core::{KeyValueStore, StorageResult};

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

pub struct ThemeStore {
    storage: Arc<dyn KeyValueStore>,
    theme: Theme,
}

impl core::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ThemeStore").field("theme", &self.theme).finish()
    }
}

impl ThemeStore {
    /// Read the saved preference, falling back to `default`.
    ///
    /// Accepts both a JSON string (`"dark"`) and the bare word (`dark`).
    pub fn load(storage: Arc<dyn KeyValueStore>, default: Theme) -> Self {
        let saved = match storage.get(THEME_KEY) {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!("failed to read theme preference: {err}");
                None
            }
        };

        let theme = saved
            .and_then(|raw| {
                let word = serde_json::from_str::<String>(&raw).unwrap_or(raw);
                Theme::parse(&word)
            })
            .unwrap_or(default);

        Self { storage, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set(&mut self, theme: Theme) -> StorageResult<()> {
        write_json(&self.storage, THEME_KEY, &theme)?;
        self.theme = theme;
        Ok(())
    }

    /// Flip between light and dark; returns the new theme.
    pub fn toggle(&mut self) -> StorageResult<Theme> {
        let next = self.theme.toggled();
        self.set(next)?;
        Ok(next)
    }
}
