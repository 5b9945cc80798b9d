use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "board-tally";
const SETTINGS_FILE: &str = "settings.json";

/// Feature flags for the engine. Read once at startup; changes need a restart.
///
/// Every flag defaults to enabled, including when the key is missing from the
/// settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Highlight the short card number in front of each title.
    #[serde(default = "enabled")]
    pub show_card_numbers: bool,
    /// Extract and badge story points `(n)`.
    #[serde(default = "enabled")]
    pub show_story_points: bool,
    /// Extract and badge post points `[n]`.
    #[serde(default = "enabled")]
    pub show_post_points: bool,
    /// Draw totals in each list header.
    #[serde(default = "enabled")]
    pub show_column_totals: bool,
    /// Draw totals in the board header.
    #[serde(default = "enabled")]
    pub show_board_totals: bool,
    /// Accept values from the point picker.
    #[serde(default = "enabled")]
    pub show_picker: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_card_numbers: true,
            show_story_points: true,
            show_post_points: true,
            show_column_totals: true,
            show_board_totals: true,
            show_picker: true,
        }
    }
}

impl Settings {
    /// Load settings from the user's config directory.
    /// Returns defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self> {
        let path = settings_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load settings from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;

        let settings =
            serde_json::from_str(&content).context("Failed to parse settings file")?;

        Ok(settings)
    }

    /// Save the settings to the user's config directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        fs::write(path, content).context("Failed to write settings file")?;

        Ok(())
    }
}

/// Location of the settings file in the user's config directory.
pub fn settings_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(SETTINGS_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_enabled() {
        let settings: Settings =
            serde_json::from_str(r#"{ "showPostPoints": false }"#).unwrap();

        assert!(!settings.show_post_points);
        assert!(settings.show_story_points);
        assert!(settings.show_card_numbers);
        assert!(settings.show_column_totals);
        assert!(settings.show_board_totals);
        assert!(settings.show_picker);
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            show_board_totals: false,
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_from_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();

        assert!(Settings::load_from(&path).is_err());
    }
}
