//! Stop-range configuration.
//!
//! The config file is JSON, in either of two forms: the legacy bare array of
//! range objects (`[{"max": 49}]`) with all tunables defaulted, or a full
//! object carrying the range list and the timing tunables. Ranges are
//! evaluated in declaration order; validation happens once at load time and
//! a bad file refuses to start the daemon.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SilentfanError};

/// Ceiling of the single default range used when no config file is given.
const DEFAULT_MAX_C: f64 = 49.0;

fn default_confirm_secs() -> u64 {
    30
}

fn default_delay_short_secs() -> u64 {
    5
}

fn default_delay_long_secs() -> u64 {
    60
}

/// One temperature range in which stopping the fan is considered safe.
///
/// At least one bound must be present. `max` is inclusive, `min` exclusive.
/// `threshold`, when set, widens the ceiling for the remainder of a streak
/// that matched this range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StopRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub ranges: Vec<StopRange>,
    /// How long the stoppable condition must hold before a stop is issued.
    #[serde(default = "default_confirm_secs")]
    pub confirm_secs: u64,
    /// Poll delay while a stop is being confirmed or was just issued.
    #[serde(default = "default_delay_short_secs")]
    pub delay_short_secs: u64,
    /// Poll delay when the fan is off or the condition was just broken.
    #[serde(default = "default_delay_long_secs")]
    pub delay_long_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ranges: vec![StopRange {
                min: None,
                max: Some(DEFAULT_MAX_C),
                threshold: None,
            }],
            confirm_secs: default_confirm_secs(),
            delay_short_secs: default_delay_short_secs(),
            delay_long_secs: default_delay_long_secs(),
        }
    }
}

impl Config {
    pub fn confirm_window(&self) -> Duration {
        Duration::from_secs(self.confirm_secs)
    }

    pub fn delay_short(&self) -> Duration {
        Duration::from_secs(self.delay_short_secs)
    }

    pub fn delay_long(&self) -> Duration {
        Duration::from_secs(self.delay_long_secs)
    }
}

/// Parse and validate config text. A top-level array is the legacy
/// ranges-only form; anything else must be the full object form.
pub fn parse_config(data: &str) -> Result<Config> {
    let cfg = if data.trim_start().starts_with('[') {
        let ranges: Vec<StopRange> = serde_json::from_str(data)?;
        Config {
            ranges,
            ..Config::default()
        }
    } else {
        serde_json::from_str(data)?
    };
    validate_config(&cfg)?;
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path).map_err(|source| SilentfanError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&data)
}

pub fn validate_config(cfg: &Config) -> Result<()> {
    if cfg.ranges.is_empty() {
        return Err(SilentfanError::config("range list is empty"));
    }
    if cfg.delay_short_secs == 0 || cfg.delay_long_secs == 0 {
        return Err(SilentfanError::config("poll delays must be nonzero"));
    }
    for (i, r) in cfg.ranges.iter().enumerate() {
        match (r.min, r.max) {
            (None, None) => {
                return Err(SilentfanError::config(format!(
                    "range #{} has neither min nor max",
                    i + 1
                )));
            }
            (Some(min), Some(max)) if min >= max => {
                return Err(SilentfanError::config(format!(
                    "range #{}: min ({}) must be below max ({})",
                    i + 1,
                    min,
                    max
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn default_config_is_single_49_ceiling() {
        let cfg = Config::default();
        assert_eq!(cfg.ranges.len(), 1);
        assert_eq!(cfg.ranges[0].max, Some(49.0));
        assert_eq!(cfg.ranges[0].min, None);
        assert_eq!(cfg.confirm_secs, 30);
        assert_eq!(cfg.delay_short_secs, 5);
        assert_eq!(cfg.delay_long_secs, 60);
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn parses_legacy_array_form() {
        let cfg = parse_config(r#"[{"max": 49}, {"min": 49, "max": 55, "threshold": 58}]"#).unwrap();
        assert_eq!(cfg.ranges.len(), 2);
        assert_eq!(cfg.ranges[1].threshold, Some(58.0));
        // Array form keeps the default tunables
        assert_eq!(cfg.confirm_secs, 30);
    }

    #[test]
    fn parses_object_form_with_tunables() {
        let cfg = parse_config(
            r#"{"ranges": [{"max": 45}], "confirm_secs": 10, "delay_short_secs": 2, "delay_long_secs": 20}"#,
        )
        .unwrap();
        assert_eq!(cfg.ranges[0].max, Some(45.0));
        assert_eq!(cfg.confirm_window(), Duration::from_secs(10));
        assert_eq!(cfg.delay_short(), Duration::from_secs(2));
        assert_eq!(cfg.delay_long(), Duration::from_secs(20));
    }

    #[test]
    fn object_form_defaults_missing_tunables() {
        let cfg = parse_config(r#"{"ranges": [{"max": 45}]}"#).unwrap();
        assert_eq!(cfg.confirm_secs, 30);
        assert_eq!(cfg.delay_long_secs, 60);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(parse_config(r#"[{"max": 49, "bogus": 1}]"#).is_err());
        assert!(parse_config(r#"{"ranges": [{"max": 49}], "bogus": 1}"#).is_err());
    }

    #[test]
    fn rejects_range_with_neither_bound() {
        let err = parse_config(r#"[{"max": 49}, {"threshold": 55}]"#).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("range #2"));
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(parse_config(r#"[{"min": 55, "max": 49}]"#).is_err());
        assert!(parse_config(r#"[{"min": 49, "max": 49}]"#).is_err());
    }

    #[test]
    fn rejects_empty_range_list() {
        assert!(parse_config("[]").is_err());
        assert!(parse_config(r#"{"ranges": []}"#).is_err());
    }

    #[test]
    fn rejects_zero_delays() {
        assert!(parse_config(r#"{"ranges": [{"max": 49}], "delay_short_secs": 0}"#).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(br#"[{"max": 49}]"#).unwrap();
        f.flush().unwrap();
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(cfg.ranges[0].max, Some(49.0));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_config(Path::new("/nonexistent/silentfan.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
