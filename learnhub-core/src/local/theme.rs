use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::storage::{LocalStore, LocalStoreError, THEME_KEY};

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

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persists the light/dark preference.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    store: Arc<dyn LocalStore>,
}

impl ThemeManager {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Unknown stored values read as the default theme.
    pub fn current(&self) -> Theme {
        self.store
            .get_item(THEME_KEY)
            .and_then(|raw| Theme::parse(&raw))
            .unwrap_or_default()
    }

    pub fn set(&self, theme: Theme) -> Result<(), LocalStoreError> {
        self.store.set_item(THEME_KEY, theme.as_str())
    }

    /// Flips the theme and returns the screen-reader announcement.
    pub fn toggle(&self) -> Result<String, LocalStoreError> {
        let next = self.current().toggled();
        self.set(next)?;
        Ok(format!("Theme changed to {next} mode"))
    }
}
