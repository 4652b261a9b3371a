use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::currency::{CurrencyCode, DateFormatStyle, LocaleConfig, MoneyFormat};
use crate::domain::appointment::hh_mm;
use crate::domain::validation::{default_earliest_date, ValidationRules};
use crate::engine::workflow::WorkflowSettings;
use crate::errors::ConfigError;
use crate::utils::paths::{app_data_dir, config_file_in, ensure_dir, tmp_path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub date_style: DateFormatStyle,
    pub validation: ValidationConfig,
    pub appointments: AppointmentDefaults,
    pub seed_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            date_style: DateFormatStyle::Long,
            validation: ValidationConfig::default(),
            appointments: AppointmentDefaults::default(),
            seed_on_start: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub earliest_date: NaiveDate,
    /// When false, entry dates after today are rejected.
    pub allow_future_dates: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            earliest_date: default_earliest_date(),
            allow_future_dates: true,
        }
    }
}

/// Times pre-filled in a new appointment form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentDefaults {
    #[serde(with = "hh_mm")]
    pub default_start: NaiveTime,
    #[serde(with = "hh_mm")]
    pub default_end: NaiveTime,
}

impl Default for AppointmentDefaults {
    fn default() -> Self {
        Self {
            default_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            default_end: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let code = self.currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "currency `{}` is not a three-letter ISO code",
                self.currency
            )));
        }
        if self.locale.trim().is_empty() {
            return Err(ConfigError::Invalid("locale must not be empty".into()));
        }
        Ok(())
    }

    pub fn money_format(&self) -> MoneyFormat {
        let mut locale = LocaleConfig::for_tag(self.locale.trim());
        locale.date_format = self.date_style;
        MoneyFormat::new(CurrencyCode::new(self.currency.trim()), locale)
    }

    pub fn validation_rules(&self, today: NaiveDate) -> ValidationRules {
        ValidationRules {
            earliest_date: self.validation.earliest_date,
            latest_date: if self.validation.allow_future_dates {
                None
            } else {
                Some(today)
            },
            ..ValidationRules::default()
        }
    }

    /// Settings handed to every workflow of a session started on `today`.
    pub fn workflow_settings(&self, today: NaiveDate) -> Result<WorkflowSettings, ConfigError> {
        self.validate()?;
        Ok(WorkflowSettings {
            rules: self.validation_rules(today),
            money: self.money_format(),
            default_start: self.appointments.default_start,
            default_end: self.appointments.default_end,
        })
    }

    /// Applies a `config set` style assignment; on error `self` is unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = self.clone();
        next.assign(key, value.trim())?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    fn assign(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "locale" => self.locale = value.to_string(),
            "currency" => self.currency = value.to_uppercase(),
            "date_style" => {
                self.date_style = match value.to_lowercase().as_str() {
                    "short" => DateFormatStyle::Short,
                    "medium" => DateFormatStyle::Medium,
                    "long" => DateFormatStyle::Long,
                    other => {
                        return Err(ConfigError::Invalid(format!(
                            "unknown date style `{other}` (short, medium, long)"
                        )))
                    }
                }
            }
            "earliest_date" => {
                self.validation.earliest_date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map_err(|_| ConfigError::Invalid(format!("invalid date `{value}`")))?
            }
            "allow_future_dates" => self.validation.allow_future_dates = parse_bool(value)?,
            "seed_on_start" => self.seed_on_start = parse_bool(value)?,
            "default_start" => self.appointments.default_start = parse_time(value)?,
            "default_end" => self.appointments.default_end = parse_time(value)?,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs in the order `config` lists them.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let style = match self.date_style {
            DateFormatStyle::Short => "short",
            DateFormatStyle::Medium => "medium",
            DateFormatStyle::Long => "long",
        };
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            ("date_style", style.to_string()),
            (
                "earliest_date",
                self.validation.earliest_date.format("%Y-%m-%d").to_string(),
            ),
            (
                "allow_future_dates",
                self.validation.allow_future_dates.to_string(),
            ),
            (
                "default_start",
                self.appointments.default_start.format("%H:%M").to_string(),
            ),
            (
                "default_end",
                self.appointments.default_end.format("%H:%M").to_string(),
            ),
            ("seed_on_start", self.seed_on_start.to_string()),
        ]
    }
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(ConfigError::Invalid(format!("expected true/false, got `{other}`"))),
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ConfigError::Invalid(format!("invalid time `{value}`, use HH:MM")))
}

/// Loads and saves [`Config`] as JSON under the application directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults_and_save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().join("home")).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());

        let mut config = Config::default();
        config.set("currency", "eur").unwrap();
        config.set("default_start", "08:30").unwrap();
        manager.save(&config).unwrap();

        assert_eq!(manager.load().unwrap(), config);
        assert!(!tmp_path(manager.path()).exists());
    }

    #[test]
    fn future_dates_cap_at_today_when_disallowed() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 10).unwrap();
        let mut config = Config::default();
        assert_eq!(config.validation_rules(today).latest_date, None);
        config.set("allow_future_dates", "false").unwrap();
        assert_eq!(config.validation_rules(today).latest_date, Some(today));
    }

    #[test]
    fn rejects_unknown_keys_and_bad_currency() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("theme", "dark"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(config.set("currency", "dollars").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"currency":"GBP"}"#).unwrap();
        assert_eq!(config.currency, "GBP");
        assert!(config.seed_on_start);
        assert_eq!(config.money_format().format(12.5), "£12.50");
    }
}
