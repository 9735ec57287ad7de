use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::order::{Algorithm, ConvergenceDirection, OrderDirection};
use crate::sequence::{MAX_LENGTH, MAX_VALUE, MIN_LENGTH, MIN_VALUE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub values: ValueRange,
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Per-session policies fixed at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub order: OrderDirection,
    #[serde(default)]
    pub convergence: ConvergenceDirection,
    #[serde(default = "default_length")]
    pub length: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            order: OrderDirection::default(),
            convergence: ConvergenceDirection::default(),
            length: default_length(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    #[serde(default = "default_min_value")]
    pub min: i32,
    #[serde(default = "default_max_value")]
    pub max: i32,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            min: default_min_value(),
            max: default_max_value(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl QuizConfig {
    /// Reject settings outside the session contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is outside `[MIN_LENGTH, MAX_LENGTH]` or
    /// the value range is empty or leaves `[MIN_VALUE, MAX_VALUE]`.
    pub fn validate(&self) -> Result<()> {
        let length = self.session.length;
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            bail!("session.length must be between {MIN_LENGTH} and {MAX_LENGTH}, got {length}");
        }
        let ValueRange { min, max } = self.values;
        if min > max {
            bail!("values.min ({min}) must not exceed values.max ({max})");
        }
        if min < MIN_VALUE || max > MAX_VALUE {
            bail!("values must lie within {MIN_VALUE}..={MAX_VALUE}, got {min}..={max}");
        }
        Ok(())
    }

    /// Apply `SORTDRILL_ALGORITHM`, `SORTDRILL_ORDER` and `SORTDRILL_CONVERGENCE`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unknown value.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup("SORTDRILL_ALGORITHM") {
            self.session.algorithm = raw
                .parse::<Algorithm>()
                .context("SORTDRILL_ALGORITHM")?;
        }
        if let Some(raw) = lookup("SORTDRILL_ORDER") {
            self.session.order = raw.parse::<OrderDirection>().context("SORTDRILL_ORDER")?;
        }
        if let Some(raw) = lookup("SORTDRILL_CONVERGENCE") {
            self.session.convergence = raw
                .parse::<ConvergenceDirection>()
                .context("SORTDRILL_CONVERGENCE")?;
        }
        Ok(())
    }
}

/// Load an explicit config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<QuizConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<QuizConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load `<config_dir>/sortdrill/config.toml`, or defaults when absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<QuizConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(QuizConfig::default());
    };

    let path = config_dir.join("sortdrill/config.toml");
    if !path.exists() {
        return Ok(QuizConfig::default());
    }

    load_config(&path)
}

const fn default_length() -> usize {
    8
}

const fn default_min_value() -> i32 {
    MIN_VALUE
}

const fn default_max_value() -> i32 {
    MAX_VALUE
}

const fn default_settle_delay_ms() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let cfg = QuizConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.session.length, 8);
        assert_eq!(cfg.values, ValueRange { min: 1, max: 99 });
        assert_eq!(cfg.pacing.settle_delay_ms, 300);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[session]
algorithm = "selection"
convergence = "left"

[pacing]
settle_delay_ms = 0
"#,
        )
        .expect("write config");

        let cfg = load_config(&path).expect("load should succeed");
        assert_eq!(cfg.session.algorithm, Algorithm::Selection);
        assert_eq!(cfg.session.convergence, ConvergenceDirection::Left);
        assert_eq!(cfg.session.order, OrderDirection::Ascending);
        assert_eq!(cfg.session.length, 8);
        assert_eq!(cfg.pacing.settle_delay_ms, 0);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir must be created");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\norder = \"sideways\"\n").expect("write config");

        let err = load_config(&path).unwrap_err();
        assert!(format!("{err}").contains("Failed to parse"));
    }

    #[test]
    fn length_bounds_are_enforced() {
        let mut cfg = QuizConfig::default();
        cfg.session.length = 4;
        assert!(cfg.validate().is_err());
        cfg.session.length = 21;
        assert!(cfg.validate().is_err());
        cfg.session.length = 20;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn value_range_is_enforced() {
        let mut cfg = QuizConfig::default();
        cfg.values = ValueRange { min: 50, max: 10 };
        assert!(cfg.validate().is_err());
        cfg.values = ValueRange { min: 0, max: 10 };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn env_overrides_replace_policies() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SORTDRILL_ORDER", "desc"),
            ("SORTDRILL_ALGORITHM", "insertion"),
        ]);
        let mut cfg = QuizConfig::default();
        cfg.apply_overrides(|key| vars.get(key).map(ToString::to_string))
            .expect("overrides should parse");
        assert_eq!(cfg.session.order, OrderDirection::Descending);
        assert_eq!(cfg.session.algorithm, Algorithm::Insertion);
        assert_eq!(cfg.session.convergence, ConvergenceDirection::Right);
    }

    #[test]
    fn bad_env_override_is_an_error() {
        let mut cfg = QuizConfig::default();
        let err = cfg
            .apply_overrides(|key| (key == "SORTDRILL_CONVERGENCE").then(|| "up".to_string()))
            .unwrap_err();
        assert!(format!("{err:#}").contains("SORTDRILL_CONVERGENCE"));
    }
}
