use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::AppSettings;

/// Environment variable that overrides the configured API base URL
pub const API_URL_ENV: &str = "PLANNER_API_URL";

const SETTINGS_FILE: &str = "settings.toml";

pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file in the platform config directory
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = ProjectDirs::from("com", "PomodoroPlanner", "Planner") {
            dirs.config_dir().join(SETTINGS_FILE)
        } else {
            log::warn!("Unable to resolve project directory; using current dir for settings");
            PathBuf::from(SETTINGS_FILE)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. A missing file yields the defaults.
    pub fn load(&self) -> Result<AppSettings> {
        if !self.path.exists() {
            log::info!("No settings file at {}; using defaults", self.path.display());
            return Ok(AppSettings::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let settings: AppSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        Ok(settings)
    }

    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;

        log::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// API base URL to use: the environment override first, then the settings.
pub fn effective_api_url(settings: &AppSettings) -> Option<String> {
    std::env::var(API_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .or_else(|| settings.api_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let service = SettingsService::new(dir.path().join("settings.toml"));
        assert_eq!(service.load().unwrap(), AppSettings::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let service = SettingsService::new(dir.path().join("nested").join("settings.toml"));

        let settings = AppSettings {
            api_url: Some("https://planner.example".to_string()),
            user_id: Some("u1".to_string()),
            timezone: Some("Europe/Madrid".to_string()),
            music_enabled: false,
            volume: 0.25,
            muted: true,
        };
        service.save(&settings).unwrap();

        assert_eq!(service.load().unwrap(), settings);
    }

    #[test]
    fn test_save_rejects_invalid_settings() {
        let dir = tempdir().unwrap();
        let service = SettingsService::new(dir.path().join("settings.toml"));
        let settings = AppSettings {
            volume: -0.1,
            ..AppSettings::default()
        };
        assert!(service.save(&settings).is_err());
        assert!(!service.path().exists());
    }

    #[test]
    fn test_load_reports_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "volume = \"loud\"").unwrap();

        let err = SettingsService::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse settings"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_api_url() {
        let settings = AppSettings {
            api_url: Some("https://from-file.example".to_string()),
            ..AppSettings::default()
        };

        std::env::set_var(API_URL_ENV, "https://from-env.example");
        assert_eq!(
            effective_api_url(&settings).as_deref(),
            Some("https://from-env.example")
        );

        std::env::remove_var(API_URL_ENV);
        assert_eq!(
            effective_api_url(&settings).as_deref(),
            Some("https://from-file.example")
        );
    }

    #[test]
    #[serial]
    fn test_no_api_url_anywhere() {
        std::env::remove_var(API_URL_ENV);
        assert!(effective_api_url(&AppSettings::default()).is_none());
    }
}
