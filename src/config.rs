use crate::playback::PlaybackConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Persistent replay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySettings {
    /// Time spent on each recorded sample
    pub tick_interval_ms: u64,
    /// How often the journey clock refreshes
    pub elapsed_interval_ms: u64,
    pub loop_playback: bool,
    /// Route file used when none is given on the command line
    pub route_path: Option<PathBuf>,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2_000,
            elapsed_interval_ms: 1_000,
            loop_playback: false,
            route_path: None,
        }
    }
}

impl ReplaySettings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("route-replay").join("settings.json"))
    }

    /// Load settings from the user config directory, or defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load settings from `path`. A missing or unreadable file gives defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Self::default();
        }

        let parsed = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))
            .and_then(|contents| {
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse settings file: {:?}", path))
            });

        match parsed {
            Ok(settings) => settings,
            Err(e) => {
                warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to the user config directory
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("No config directory on this platform")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings file: {:?}", path))?;
        Ok(())
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            elapsed_interval: Duration::from_millis(self.elapsed_interval_ms),
            loop_playback: self.loop_playback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("route-replay-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults_match_playback_defaults() {
        assert_eq!(ReplaySettings::default().playback_config(), PlaybackConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = temp_settings_path("missing.json");
        assert_eq!(ReplaySettings::load_from(&path), ReplaySettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_settings_path("saved.json");
        let settings = ReplaySettings {
            tick_interval_ms: 500,
            loop_playback: true,
            route_path: Some(PathBuf::from("dummy-route.json")),
            ..ReplaySettings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(ReplaySettings::load_from(&path), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_settings_path("partial.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"loop_playback": true}"#).unwrap();

        let settings = ReplaySettings::load_from(&path);
        assert!(settings.loop_playback);
        assert_eq!(settings.tick_interval_ms, 2_000);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let path = temp_settings_path("invalid.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(ReplaySettings::load_from(&path), ReplaySettings::default());
        let _ = fs::remove_file(&path);
    }
}
