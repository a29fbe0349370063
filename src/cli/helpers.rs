//! Shared helper functions for CLI commands

use chrono::NaiveDate;
use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Snapshot, SnapshotError};

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Resolve the snapshot path from the CLI flag or the config layers and
/// load it
pub fn load_snapshot(global: &GlobalOpts, config: &Config) -> Result<Snapshot> {
    let path = global
        .snapshot
        .clone()
        .or_else(|| config.snapshot.clone())
        .ok_or_else(|| SnapshotError::NotFound("<unset>".into()))?;
    Ok(Snapshot::from_path(&path)?)
}

/// Evaluation date: the --as-of override or today
pub fn as_of(global: &GlobalOpts) -> NaiveDate {
    global.as_of.unwrap_or_else(|| chrono::Utc::now().date_naive())
}

/// Effective output format once the config default is applied
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    match config.default_format.as_deref() {
        Some("json") => OutputFormat::Json,
        Some("yaml") => OutputFormat::Yaml,
        _ => OutputFormat::Auto,
    }
}

/// Serialize a value as JSON or YAML for machine-readable output
pub fn print_serialized<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(value).map_err(|e| miette::miette!("{e}"))?
            );
        }
        _ => {
            print!(
                "{}",
                serde_yml::to_string(value).map_err(|e| miette::miette!("{e}"))?
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
    }

    #[test]
    fn test_effective_format_prefers_flag() {
        let global = GlobalOpts {
            format: OutputFormat::Json,
            quiet: false,
            verbose: false,
            snapshot: None,
            as_of: None,
        };
        let config = Config {
            default_format: Some("yaml".to_string()),
            ..Config::default()
        };
        assert_eq!(effective_format(&global, &config), OutputFormat::Json);
    }

    #[test]
    fn test_effective_format_falls_back_to_config() {
        let global = GlobalOpts {
            format: OutputFormat::Auto,
            quiet: false,
            verbose: false,
            snapshot: None,
            as_of: None,
        };
        let config = Config {
            default_format: Some("json".to_string()),
            ..Config::default()
        };
        assert_eq!(effective_format(&global, &config), OutputFormat::Json);
    }
}
