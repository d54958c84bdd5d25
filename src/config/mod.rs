use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    allocation::TotalScope,
    domain::Currency,
    errors::SubscriptionError,
    schedule::ReportingMode,
    utils::paths::{app_data_dir, config_file_in, ensure_dir, write_atomic},
};

const DEFAULT_HORIZON_MONTHS: u32 = 12;
const MAX_HORIZON_MONTHS: u32 = 120;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub default_currency: Currency,
    #[serde(default)]
    pub reporting_mode: ReportingMode,
    #[serde(default)]
    pub total_scope: TotalScope,
    #[serde(default = "default_reminder_time")]
    pub reminder_time: NaiveTime,
    #[serde(default = "default_horizon_months")]
    pub open_ended_horizon_months: u32,
}

fn default_reminder_time() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_horizon_months() -> u32 {
    DEFAULT_HORIZON_MONTHS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_currency: Currency::default(),
            reporting_mode: ReportingMode::default(),
            total_scope: TotalScope::default(),
            reminder_time: default_reminder_time(),
            open_ended_horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        if self.open_ended_horizon_months == 0 || self.open_ended_horizon_months > MAX_HORIZON_MONTHS
        {
            return Err(SubscriptionError::Config(format!(
                "open_ended_horizon_months must be between 1 and {MAX_HORIZON_MONTHS} (got {})",
                self.open_ended_horizon_months
            )));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, SubscriptionError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, SubscriptionError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Reads the configuration, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<Config, SubscriptionError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), SubscriptionError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reminder_time, NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert_eq!(config.total_scope, TotalScope::AnchoredInWindow);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            default_currency: Currency::Gbp,
            reporting_mode: ReportingMode::Year,
            total_scope: TotalScope::Active,
            reminder_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            open_ended_horizon_months: 6,
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{ "reporting_mode": "year" }"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.reporting_mode, ReportingMode::Year);
        assert_eq!(config.open_ended_horizon_months, 12);
    }

    #[test]
    fn zero_horizon_is_rejected() {
        let config = Config {
            open_ended_horizon_months: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(SubscriptionError::Config(_))));
    }
}
