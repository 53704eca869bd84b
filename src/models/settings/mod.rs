// Settings module
// Local application settings, persisted as TOML

use serde::{Deserialize, Serialize};

use crate::utils::date::DisplayZone;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Base URL of the planner backend
    pub api_url: Option<String>,
    /// Account whose plans are shown
    pub user_id: Option<String>,
    /// IANA zone used to place plans on the grid; system zone when unset
    pub timezone: Option<String>,
    pub music_enabled: bool,
    /// Background music volume, 0.0 to 1.0
    pub volume: f32,
    pub muted: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: None,
            user_id: None,
            timezone: None,
            music_enabled: true,
            volume: 0.5,
            muted: false,
        }
    }
}

impl AppSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(format!("Volume must be between 0.0 and 1.0, got {}", self.volume));
        }

        if let Some(url) = self.api_url.as_deref() {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err("API URL must start with http:// or https://".to_string());
            }
        }

        self.display_zone()?;
        Ok(())
    }

    pub fn display_zone(&self) -> Result<DisplayZone, String> {
        DisplayZone::from_name(self.timezone.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = AppSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.display_zone().unwrap(), DisplayZone::Local);
    }

    #[test]
    fn test_validate_volume_range() {
        let settings = AppSettings {
            volume: 1.5,
            ..AppSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_api_url_scheme() {
        let settings = AppSettings {
            api_url: Some("ftp://planner.example".to_string()),
            ..AppSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_timezone() {
        let settings = AppSettings {
            timezone: Some("Atlantis/Capital".to_string()),
            ..AppSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: AppSettings = toml::from_str("api_url = \"https://api.example\"\n").unwrap();
        assert_eq!(settings.api_url.as_deref(), Some("https://api.example"));
        assert!(settings.music_enabled);
        assert_eq!(settings.volume, 0.5);
    }
}
