//! Configuration with layered hierarchy
//!
//! Defaults, then the global user config, then `capstat.yaml` in the working
//! directory, then environment variables. Engine thresholds live here too;
//! they are handed to the engine once at construction and never change for
//! the life of the process.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tunable thresholds for the analysis engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Budget overrun tolerance in percent before a project counts as over
    /// budget (0 = any increase counts)
    pub budget_tolerance_pct: f64,

    /// Maximum representative rows attached to an answer
    pub max_rows: usize,

    /// Delay in days that makes a schedule slip headline-worthy
    pub delay_alert_days: i64,

    /// Mean category budget variance (percent) that trips the budget-trend
    /// insight
    pub budget_trend_threshold_pct: f64,

    /// Delayed-project ratio (percent) that trips the delay-pattern insight
    pub delay_ratio_threshold_pct: f64,

    /// On-time/on-budget rate floor (percent) that trips the vendor alert
    pub vendor_rate_floor_pct: f64,

    /// Points by which spend rate may lead completion before the efficiency
    /// insight fires
    pub efficiency_margin_pct: f64,

    /// Window in days for the upcoming-completions view
    pub upcoming_window_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            budget_tolerance_pct: 0.0,
            max_rows: 5,
            delay_alert_days: 30,
            budget_trend_threshold_pct: 10.0,
            delay_ratio_threshold_pct: 30.0,
            vendor_rate_floor_pct: 50.0,
            efficiency_margin_pct: 20.0,
            upcoming_window_days: 90,
        }
    }
}

/// CLI configuration merged from all sources
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default snapshot path when --snapshot is not given
    pub snapshot: Option<PathBuf>,

    /// Default output format
    pub default_format: Option<String>,

    /// Engine thresholds
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/capstat/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            config.merge_file(&global_path);
        }

        // 3. Local config (./capstat.yaml)
        config.merge_file(Path::new("capstat.yaml"));

        // 4. Environment variables
        if let Ok(snapshot) = std::env::var("CAPSTAT_SNAPSHOT") {
            config.snapshot = Some(PathBuf::from(snapshot));
        }
        if let Ok(format) = std::env::var("CAPSTAT_FORMAT") {
            config.default_format = Some(format);
        }

        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "capstat")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn merge_file(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }
        if let Ok(contents) = std::fs::read_to_string(path) {
            if let Ok(layer) = serde_yml::from_str::<Config>(&contents) {
                self.merge(layer);
            }
        }
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.snapshot.is_some() {
            self.snapshot = other.snapshot;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        self.engine = other.engine;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults() {
        let engine = EngineConfig::default();
        assert_eq!(engine.max_rows, 5);
        assert_eq!(engine.delay_alert_days, 30);
        assert_eq!(engine.budget_trend_threshold_pct, 10.0);
        assert_eq!(engine.upcoming_window_days, 90);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config =
            serde_yml::from_str("engine:\n  max_rows: 3\n").unwrap();
        assert_eq!(config.engine.max_rows, 3);
        assert_eq!(config.engine.delay_alert_days, 30);
        assert!(config.snapshot.is_none());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config::default();
        let layer: Config =
            serde_yml::from_str("snapshot: portfolio.yaml\ndefault_format: json\n").unwrap();
        base.merge(layer);
        assert_eq!(base.snapshot, Some(PathBuf::from("portfolio.yaml")));
        assert_eq!(base.default_format.as_deref(), Some("json"));
    }
}
