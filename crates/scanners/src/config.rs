//! Analysis configuration
//!
//! Every field has a serde default, so a config file only needs the keys it
//! changes. The heuristic thresholds default to the calibrated values.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// A function with more external call sites than this is a DoS candidate.
    #[serde(default = "default_dos_max_external_calls")]
    pub dos_max_external_calls: usize,

    /// `approve` functions with at least this many parameters are flagged.
    #[serde(default = "default_front_running_min_params")]
    pub front_running_min_params: usize,

    /// Analyze contracts of one source unit on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default = "default_actor_count")]
    pub actor_count: usize,

    #[serde(default = "default_max_reentries")]
    pub max_reentries: u32,

    /// Solidity expression bounding `msg.value` in handler calls.
    #[serde(default = "default_max_eth")]
    pub max_eth: String,

    /// Solidity expression bounding fuzzed uint256 arguments.
    #[serde(default = "default_max_amount")]
    pub max_amount: String,

    #[serde(default = "default_solidity_version")]
    pub solidity_version: String,

    /// Directory the generated tests import the contract under test from.
    #[serde(default = "default_source_import_path")]
    pub source_import_path: String,
}

fn default_dos_max_external_calls() -> usize {
    1
}
fn default_front_running_min_params() -> usize {
    2
}
fn default_parallel() -> bool {
    true
}
fn default_actor_count() -> usize {
    3
}
fn default_max_reentries() -> u32 {
    5
}
fn default_max_eth() -> String {
    "100 ether".to_string()
}
fn default_max_amount() -> String {
    "1e30".to_string()
}
fn default_solidity_version() -> String {
    "^0.8.20".to_string()
}
fn default_source_import_path() -> String {
    "../src".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dos_max_external_calls: default_dos_max_external_calls(),
            front_running_min_params: default_front_running_min_params(),
            parallel: default_parallel(),
            synthesis: SynthesisConfig::default(),
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            actor_count: default_actor_count(),
            max_reentries: default_max_reentries(),
            max_eth: default_max_eth(),
            max_amount: default_max_amount(),
            solidity_version: default_solidity_version(),
            source_import_path: default_source_import_path(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read(path.as_ref())?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| AnalysisError::Config(e.to_string()))?;
        config.validate()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read(path.as_ref())?;
        let config: Self =
            serde_json::from_str(&content).map_err(|e| AnalysisError::Config(e.to_string()))?;
        config.validate()
    }

    /// Picks the format from the extension; anything but `.json` is read as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_yaml_file(path),
        }
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("KENSA_DOS_MAX_CALLS") {
            config.dos_max_external_calls = parse_env("KENSA_DOS_MAX_CALLS", &value)?;
        }

        if let Ok(value) = std::env::var("KENSA_FRONTRUN_MIN_PARAMS") {
            config.front_running_min_params = parse_env("KENSA_FRONTRUN_MIN_PARAMS", &value)?;
        }

        if let Ok(value) = std::env::var("KENSA_MAX_REENTRIES") {
            config.synthesis.max_reentries = parse_env("KENSA_MAX_REENTRIES", &value)?;
        }

        config.validate()
    }

    fn validate(self) -> Result<Self> {
        if self.synthesis.actor_count == 0 {
            return Err(AnalysisError::Config(
                "synthesis.actor_count must be at least 1".to_string(),
            ));
        }
        if self.synthesis.max_reentries == 0 {
            return Err(AnalysisError::Config(
                "synthesis.max_reentries must be at least 1".to_string(),
            ));
        }
        debug!(?self, "loaded analysis config");
        Ok(self)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AnalysisError::Config(format!("{} has invalid value '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.dos_max_external_calls, 1);
        assert_eq!(config.front_running_min_params, 2);
        assert!(config.parallel);
        assert_eq!(config.synthesis.actor_count, 3);
        assert_eq!(config.synthesis.max_reentries, 5);
        assert_eq!(config.synthesis.max_eth, "100 ether");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "dos_max_external_calls: 3\nsynthesis:\n  actor_count: 5").unwrap();

        let config = AnalysisConfig::from_path(file.path()).unwrap();
        assert_eq!(config.dos_max_external_calls, 3);
        assert_eq!(config.front_running_min_params, 2);
        assert_eq!(config.synthesis.actor_count, 5);
        assert_eq!(config.synthesis.max_reentries, 5);
    }

    #[test]
    fn test_json_by_extension() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"parallel": false}}"#).unwrap();

        let config = AnalysisConfig::from_path(file.path()).unwrap();
        assert!(!config.parallel);
    }

    #[test]
    fn test_zero_actors_rejected() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "synthesis:\n  actor_count: 0").unwrap();

        let err = AnalysisConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AnalysisConfig::from_path("/nonexistent/kensa.yaml").unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
    }
}
