//! Configuration loading for the Ergo Jr client

use crate::address::{RobotAddress, DEFAULT_HOST, DEFAULT_SCHEME};
use crate::locale::{LabelOverrides, Locale};
use crate::motors::{MotorId, MotorSet};
use crate::{PoppyError, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Default WebSocket endpoint of the robot's status server
pub const DEFAULT_STATUS_URL: &str = "ws://poppy.local:9009";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub robot: RobotConfig,
    pub motors: Option<Vec<String>>,
    #[serde(default)]
    pub locale: LocaleConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RobotConfig {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub status_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocaleConfig {
    #[serde(default = "default_locale_name")]
    pub name: String,
    #[serde(default)]
    pub labels: LabelOverrides,
}

fn default_locale_name() -> String {
    "fr".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            name: default_locale_name(),
            labels: LabelOverrides::default(),
        }
    }
}

impl Config {
    pub fn load_from_path(config_path: &str) -> Result<Self> {
        let contents = fs::read_to_string(config_path)
            .map_err(|e| PoppyError::Config(format!("Failed to read {}: {}", config_path, e)))?;
        Self::load_from_str(&contents)
    }

    pub fn load_from_str(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(motors) = &self.motors {
            if motors.iter().all(|m| m.trim().is_empty()) {
                return Err(PoppyError::Config("motor list must not be empty".to_string()));
            }
        }
        Ok(())
    }

    /// Robot address with default fallback
    pub fn address(&self) -> RobotAddress {
        RobotAddress::from_parts(
            self.robot.scheme.as_deref().unwrap_or(DEFAULT_SCHEME),
            self.robot.host.as_deref().unwrap_or(DEFAULT_HOST),
        )
    }

    /// Status channel URL with default fallback
    pub fn status_url(&self) -> String {
        self.robot
            .status_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_STATUS_URL)
            .to_string()
    }

    /// Motor set with the Ergo Jr default
    pub fn motor_set(&self) -> MotorSet {
        match &self.motors {
            Some(motors) => MotorSet::new(
                motors
                    .iter()
                    .map(|m| m.trim())
                    .filter(|m| !m.is_empty())
                    .map(MotorId::new)
                    .collect(),
            ),
            None => MotorSet::ergo_jr(),
        }
    }

    /// Built-in locale extended with configured labels
    pub fn locale(&self) -> Locale {
        Locale::by_name(&self.locale.name).with_overrides(&self.locale.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::LedColor;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::load_from_str("{}").unwrap();
        assert_eq!(config.address().as_str(), "http://poppy.local:8080");
        assert_eq!(config.status_url(), DEFAULT_STATUS_URL);
        assert_eq!(config.motor_set(), MotorSet::ergo_jr());
        assert_eq!(config.locale().name, "fr");
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
robot:
  scheme: https
  host: ergo.lan:8443
  status_url: ws://ergo.lan:9009
motors: [m1, m2, m3]
locale:
  name: en
  labels:
    colors:
      rot: red
"#;
        let config = Config::load_from_str(yaml).unwrap();
        assert_eq!(config.address().as_str(), "https://ergo.lan:8443");
        assert_eq!(config.status_url(), "ws://ergo.lan:9009");
        assert_eq!(config.motor_set().ids().len(), 3);
        let locale = config.locale();
        assert_eq!(locale.name, "en");
        assert_eq!(locale.color("rot"), LedColor::Red);
    }

    #[test]
    fn test_empty_motor_list_rejected() {
        let result = Config::load_from_str("motors: []");
        assert!(matches!(result, Err(PoppyError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Config::load_from_path("does/not/exist.yaml");
        assert!(matches!(result, Err(PoppyError::Config(_))));
    }
}
