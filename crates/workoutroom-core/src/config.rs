//! TOML-based application configuration.
//!
//! Stores:
//! - Timing limits and defaults used by the wizard and validator
//! - Tick scheduler settings (interval, drift guard, history size)
//! - Feedback preferences (volume, vibration, suppression window)
//! - Validation cache size
//!
//! Configuration is stored at `~/.config/workoutroom/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Range limits and defaults for workout timing, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingLimits {
    pub min_work_seconds: u32,
    pub max_work_seconds: u32,
    pub min_rest_seconds: u32,
    pub max_rest_seconds: u32,
    pub min_prep_seconds: u32,
    pub max_prep_seconds: u32,
    pub min_rounds: u32,
    pub max_rounds: u32,
    pub default_work_seconds: u32,
    pub default_rest_seconds: u32,
    pub default_prep_seconds: u32,
    pub default_rounds: u32,
}

impl Default for TimingLimits {
    fn default() -> Self {
        Self {
            min_work_seconds: 15,
            max_work_seconds: 300,
            min_rest_seconds: 5,
            max_rest_seconds: 300,
            min_prep_seconds: 0,
            max_prep_seconds: 60,
            min_rounds: 1,
            max_rounds: 10,
            default_work_seconds: 30,
            default_rest_seconds: 15,
            default_prep_seconds: 10,
            default_rounds: 3,
        }
    }
}

impl TimingLimits {
    /// Each range must be ordered with its default inside it, and at least
    /// one round is required.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ranges = [
            (
                "work_seconds",
                self.min_work_seconds,
                self.max_work_seconds,
                self.default_work_seconds,
            ),
            (
                "rest_seconds",
                self.min_rest_seconds,
                self.max_rest_seconds,
                self.default_rest_seconds,
            ),
            (
                "prep_seconds",
                self.min_prep_seconds,
                self.max_prep_seconds,
                self.default_prep_seconds,
            ),
            (
                "rounds",
                self.min_rounds,
                self.max_rounds,
                self.default_rounds,
            ),
        ];
        for (name, min, max, default) in ranges {
            if min > max {
                return Err(invalid(
                    format!("timing.min_{name}"),
                    format!("min_{name} ({min}) exceeds max_{name} ({max})"),
                ));
            }
            if !(min..=max).contains(&default) {
                return Err(invalid(
                    format!("timing.default_{name}"),
                    format!("default_{name} ({default}) is outside {min}..={max}"),
                ));
            }
        }
        if self.min_rounds == 0 {
            return Err(invalid("timing.min_rounds".into(), "must be at least 1".into()));
        }
        Ok(())
    }
}

/// Tick scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub tick_interval_ms: u64,
    /// Fires closer together than this are treated as coalesced and ignored.
    pub min_tick_interval_ms: u64,
    /// Number of phase-change notifications retained.
    pub history_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            min_tick_interval_ms: 900,
            history_limit: 20,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(invalid(
                "scheduler.tick_interval_ms".into(),
                "must be greater than zero".into(),
            ));
        }
        if self.min_tick_interval_ms > self.tick_interval_ms {
            return Err(invalid(
                "scheduler.min_tick_interval_ms".into(),
                format!(
                    "min_tick_interval_ms ({}) exceeds tick_interval_ms ({})",
                    self.min_tick_interval_ms, self.tick_interval_ms
                ),
            ));
        }
        Ok(())
    }
}

/// Volume multipliers per intensity level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityMultipliers {
    pub low: f64,
    pub building: f64,
    pub peak: f64,
    pub sustain: f64,
    pub final_push: f64,
    pub recovery: f64,
}

impl Default for IntensityMultipliers {
    fn default() -> Self {
        Self {
            low: 0.6,
            building: 0.75,
            peak: 1.0,
            sustain: 0.9,
            final_push: 1.0,
            recovery: 0.5,
        }
    }
}

/// Feedback configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub enabled: bool,
    pub vibration: bool,
    /// Master volume, 0-100.
    pub volume: u32,
    pub suppression_window_ms: u64,
    pub intensity_multipliers: IntensityMultipliers,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            vibration: true,
            volume: 80,
            suppression_window_ms: 1000,
            intensity_multipliers: IntensityMultipliers::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub cache_capacity: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { cache_capacity: 64 }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/workoutroom/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingLimits,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

fn invalid(key: String, message: String) -> ConfigError {
    ConfigError::InvalidValue { key, message }
}

/// Returns `~/.config/workoutroom[-dev]/` based on WORKOUTROOM_ENV.
///
/// Set WORKOUTROOM_ENV=dev to use the development data directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("WORKOUTROOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("workoutroom-dev")
    } else {
        base_dir.join("workoutroom")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DirUnavailable(e.to_string()))?;
    Ok(dir)
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
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(n) => {
                        if n.is_f64() {
                            let f = value
                                .parse::<f64>()
                                .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                            serde_json::Number::from_f64(f)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("'{value}' is not finite")))?
                        } else {
                            let u = value.parse::<u64>().map_err(|_| {
                                invalid(format!("cannot parse '{value}' as an unsigned integer"))
                            })?;
                            serde_json::Value::Number(u.into())
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default path, writing defaults if the file is missing.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field constraints that the types alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;
        self.scheduler.validate()
    }

    /// Persist to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default config");
                Self::default()
            }
        }
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

    /// Set a config value by key in memory. The caller decides when to save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timing]\nmin_work_seconds = 20\n").unwrap();
        assert_eq!(parsed.timing.min_work_seconds, 20);
        assert_eq!(parsed.timing.max_work_seconds, 300);
        assert_eq!(parsed.scheduler.history_limit, 20);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timing.min_work_seconds").as_deref(), Some("15"));
        assert_eq!(cfg.get("feedback.enabled").as_deref(), Some("true"));
        assert!(cfg.get("timing.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("feedback.vibration", "false").unwrap();
        cfg.set("scheduler.history_limit", "5").unwrap();
        cfg.set("feedback.intensity_multipliers.low", "0.4").unwrap();
        assert!(!cfg.feedback.vibration);
        assert_eq!(cfg.scheduler.history_limit, 5);
        assert_eq!(cfg.feedback.intensity_multipliers.low, 0.4);
    }

    #[test]
    fn set_rejects_unknown_key_and_bad_type() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timing.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("feedback.enabled", "maybe"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("timing.min_work_seconds", "-3"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.timing.default_rounds = 5;
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timing.default_rounds, 5);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::LoadFailed { .. }));
    }

    #[test]
    fn set_rejects_inverted_timing_range() {
        let mut cfg = Config::default();
        let err = cfg.set("timing.min_work_seconds", "400").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "timing.min_work_seconds"
        ));
        assert!(cfg.set("timing.default_rounds", "11").is_err());
        assert!(cfg.set("timing.min_rounds", "0").is_err());
        assert_eq!(cfg, Config::default());

        cfg.set("timing.max_work_seconds", "600").unwrap();
        cfg.set("timing.default_work_seconds", "60").unwrap();
        cfg.set("timing.min_work_seconds", "45").unwrap();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn set_rejects_unusable_tick_interval() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("scheduler.tick_interval_ms", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(cfg.set("scheduler.min_tick_interval_ms", "1500").is_err());
        assert_eq!(cfg.scheduler, SchedulerConfig::default());
        assert!(cfg.set("scheduler.tick_interval_ms", "500").is_err());
    }

    #[test]
    fn load_from_rejects_inconsistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scheduler]\ntick_interval_ms = 0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
        std::fs::write(&path, "[timing]\nmin_prep_seconds = 90\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
