//! Persisted light/dark theme preference.
//!
//! Stored as a small JSON key/value file in the config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Preference key for the theme flag.
pub const THEME_KEY: &str = "weatherDashboardTheme";

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
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

    /// Parse a stored value. Anything other than `"dark"` reads as light.
    pub fn from_stored(value: &str) -> Self {
        if value == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// File-backed preference store holding the theme flag.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            path: config_dir.join(PREFERENCES_FILE),
        }
    }

    /// Read the saved theme. Missing or unreadable preferences mean light.
    pub fn load(&self) -> Theme {
        match self.read_preferences() {
            Ok(prefs) => prefs
                .get(THEME_KEY)
                .map(|v| Theme::from_stored(v.as_str()))
                .unwrap_or_default(),
            Err(e) => {
                if self.path.exists() {
                    tracing::warn!("Ignoring unreadable preferences at {:?}: {}", self.path, e);
                }
                Theme::default()
            }
        }
    }

    /// Write the theme, keeping any other stored preferences.
    pub fn save(&self, theme: Theme) -> Result<()> {
        let mut prefs = self.read_preferences().unwrap_or_default();
        prefs.insert(THEME_KEY.to_string(), theme.as_str().to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create preferences directory")?;
        }

        let json =
            serde_json::to_string_pretty(&prefs).context("Failed to serialize preferences")?;
        fs::write(&self.path, json).context("Failed to write preferences file")?;

        tracing::info!("Saved theme preference: {}", theme.as_str());
        Ok(())
    }

    /// Flip the saved theme and return the new value.
    pub fn toggle(&self) -> Result<Theme> {
        let next = self.load().toggled();
        self.save(next)?;
        Ok(next)
    }

    fn read_preferences(&self) -> Result<BTreeMap<String, String>> {
        let json = fs::read_to_string(&self.path).context("Failed to read preferences file")?;
        serde_json::from_str(&json).context("Failed to parse preferences file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_defaults_to_light() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path());
        assert_eq!(store.load(), Theme::Light);
    }

    #[test]
    fn toggle_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path());

        assert_eq!(store.toggle().unwrap(), Theme::Dark);
        assert_eq!(ThemeStore::new(dir.path()).load(), Theme::Dark);

        assert_eq!(store.toggle().unwrap(), Theme::Light);
        assert_eq!(ThemeStore::new(dir.path()).load(), Theme::Light);
    }

    #[test]
    fn stored_under_theme_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path());
        store.save(Theme::Dark).unwrap();

        let raw = fs::read_to_string(dir.path().join(PREFERENCES_FILE)).unwrap();
        let prefs: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(prefs.get(THEME_KEY).map(String::as_str), Some("dark"));
    }

    #[test]
    fn corrupt_file_reads_as_light_and_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(PREFERENCES_FILE), "{not json").unwrap();
        let store = ThemeStore::new(dir.path());

        assert_eq!(store.load(), Theme::Light);
        store.save(Theme::Dark).unwrap();
        assert_eq!(store.load(), Theme::Dark);
    }

    #[test]
    fn unknown_value_reads_as_light() {
        assert_eq!(Theme::from_stored("solarized"), Theme::Light);
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
    }
}
