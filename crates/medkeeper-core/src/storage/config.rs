//! TOML-based application configuration.
//!
//! Stores the scheduling knobs:
//! - timezone offset for users' local wall-clock times
//! - day-rollover offset from local midnight
//! - polling cadence
//! - snapshot location override
//! - log filter for the CLI
//!
//! Configuration is stored at `~/.config/medkeeper/config.toml`.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::clock;
use crate::error::ConfigError;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/medkeeper/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hours east of UTC for users' local wall-clock times.
    #[serde(default)]
    pub timezone_offset: i32,
    /// Minutes after local midnight when the day rolls over and streaks are
    /// evaluated.
    #[serde(default)]
    pub rollover_offset_min: u32,
    /// Scheduler polling cadence in seconds. Must stay well under a minute
    /// so reminder times keep whole-minute precision.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    /// Snapshot path override; defaults to `roster.json` in the data dir.
    #[serde(default)]
    pub snapshot_file: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default functions
fn default_tick_interval() -> u64 {
    5
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone_offset: 0,
            rollover_offset_min: 0,
            tick_interval_secs: default_tick_interval(),
            snapshot_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err("config key is empty".into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| format!("unknown config key: {key}"))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| format!("unknown config key: {key}"))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>()?),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            return Err(format!("cannot parse '{value}' as number").into());
                        }
                    }
                    serde_json::Value::Null => serde_json::Value::String(value.into()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
        }

        Err(format!("unknown config key: {key}").into())
    }

    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rollover_offset_min >= 24 * 60 {
            return Err(ConfigError::InvalidValue {
                key: "rollover_offset_min".into(),
                message: "must be under 1440 (one day)".into(),
            });
        }
        if self.tick_interval_secs == 0 || self.tick_interval_secs > 60 {
            // Reminder times have whole-minute precision; the poll must not
            // be coarser than that.
            return Err(ConfigError::InvalidValue {
                key: "tick_interval_secs".into(),
                message: "must be between 1 and 60".into(),
            });
        }
        if self.timezone_offset < -12 || self.timezone_offset > 14 {
            return Err(ConfigError::InvalidValue {
                key: "timezone_offset".into(),
                message: "must be between -12 and +14 hours".into(),
            });
        }
        Ok(())
    }

    /// The configured local timezone.
    pub fn timezone(&self) -> FixedOffset {
        clock::fixed_offset(self.timezone_offset)
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        self.save()?;
        Ok(())
    }
}
