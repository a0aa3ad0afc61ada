//! Engine configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::sandbox::harness::PROBLEM_ID;
use crate::sandbox::SandboxConfig;

/// Configuration for the session manager and its collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManagerConfig {
    /// Root directory for session logs and the active-session pointer.
    pub data_dir: PathBuf,

    /// Problem presented by this installation.
    pub problem_id: String,

    /// Sandbox limits.
    pub sandbox: SandboxConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            problem_id: PROBLEM_ID.to_string(),
            sandbox: SandboxConfig::default(),
        }
    }
}

impl ManagerConfig {
    /// Default configuration with environment overrides applied:
    /// `ONSITE_DATA_DIR`, `ONSITE_PYTHON`, `ONSITE_EVAL_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = std::env::var_os("ONSITE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(bin) = std::env::var("ONSITE_PYTHON") {
            if !bin.is_empty() {
                config.sandbox.python_bin = bin;
            }
        }
        if let Ok(timeout) = std::env::var("ONSITE_EVAL_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse::<u64>() {
                config.sandbox.timeout_ms = ms;
            }
        }

        config
    }
}

/// `$HOME/.onsite`, falling back to `./.onsite` when HOME is unset.
fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".onsite"),
        None => PathBuf::from(".onsite"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ManagerConfig::default();
        assert_eq!(config.problem_id, "lru_cache");
        assert!(config.data_dir.ends_with(".onsite"));
        assert_eq!(config.sandbox.timeout_ms, 10_000);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = ManagerConfig {
            data_dir: PathBuf::from("/tmp/onsite"),
            problem_id: "lru_cache".to_string(),
            sandbox: SandboxConfig::default(),
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let back: ManagerConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, back);
    }
}
