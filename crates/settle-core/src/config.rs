//! Provider configuration
//!
//! 設定ファイルは以下の優先順位で検索する:
//! 1. 環境変数 SETTLE_CONFIG_PATH (直接パス指定)
//! 2. カレントディレクトリ: settle.local.yaml, settle.yaml
//! 3. ~/.config/settle/config.yaml (グローバル設定)
//!
//! どれも見つからなければデフォルト値で動く。

use crate::error::ConfigError;
use crate::waiter::{DEFAULT_NOT_FOUND_CHECKS, PollPolicy, StateChangeConf};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "SETTLE_CONFIG_PATH";

const LOCAL_CANDIDATES: &[&str] = &["settle.local.yaml", "settle.yaml"];

/// Top-level provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// AWS region; falls back to the SDK's default chain when unset
    pub region: Option<String>,

    /// Shared-config profile name
    pub profile: Option<String>,

    /// Default tracing directive (overridden by RUST_LOG)
    pub log_level: String,

    pub timeouts: Timeouts,

    pub polling: Polling,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            log_level: "info".to_string(),
            timeouts: Timeouts::default(),
            polling: Polling::default(),
        }
    }
}

/// Per-operation time budgets, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub fleet_operation: u64,
    pub cluster_create: u64,
    pub cluster_update: u64,
    pub cluster_delete: u64,
    pub configuration_delete: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            fleet_operation: 15 * 60,
            cluster_create: 120 * 60,
            cluster_update: 120 * 60,
            cluster_delete: 120 * 60,
            configuration_delete: 5 * 60,
        }
    }
}

impl Timeouts {
    pub fn fleet_operation(&self) -> Duration {
        Duration::from_secs(self.fleet_operation)
    }

    pub fn cluster_create(&self) -> Duration {
        Duration::from_secs(self.cluster_create)
    }

    pub fn cluster_update(&self) -> Duration {
        Duration::from_secs(self.cluster_update)
    }

    pub fn cluster_delete(&self) -> Duration {
        Duration::from_secs(self.cluster_delete)
    }

    pub fn configuration_delete(&self) -> Duration {
        Duration::from_secs(self.configuration_delete)
    }
}

/// Poll schedule shared by every waiter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Polling {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub min_timeout_ms: u64,
    pub not_found_checks: u32,
}

impl Default for Polling {
    fn default() -> Self {
        let policy = PollPolicy::default();
        Self {
            min_delay_ms: policy.initial_delay.as_millis() as u64,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            multiplier: policy.multiplier,
            min_timeout_ms: 0,
            not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
        }
    }
}

impl Polling {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            initial_delay: Duration::from_millis(self.min_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            multiplier: self.multiplier,
        }
    }

    pub fn min_timeout(&self) -> Duration {
        Duration::from_millis(self.min_timeout_ms)
    }

    /// Waiter configuration carrying this poll schedule
    pub fn apply(&self, conf: StateChangeConf) -> StateChangeConf {
        conf.with_policy(self.policy())
            .with_min_timeout(self.min_timeout())
            .with_not_found_checks(self.not_found_checks)
    }
}

impl ProviderConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an explicit path, or search the default locations
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.display().to_string()));
                }
                Some(path.to_path_buf())
            }
            None => find_config_file(),
        };

        match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                let config = Self::from_yaml(&content)?;
                tracing::debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            None => {
                tracing::debug!("Config file not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.multiplier < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "polling.multiplier must be >= 1.0 (got {})",
                self.polling.multiplier
            )));
        }
        if self.polling.min_delay_ms == 0 {
            return Err(ConfigError::Invalid(
                "polling.min_delay_ms must be greater than 0".to_string(),
            ));
        }
        if self.polling.max_delay_ms < self.polling.min_delay_ms {
            return Err(ConfigError::Invalid(
                "polling.max_delay_ms must be >= polling.min_delay_ms".to_string(),
            ));
        }
        Ok(())
    }
}

/// 設定ファイルを探す
pub fn find_config_file() -> Option<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. カレントディレクトリで検索
    if let Ok(current_dir) = std::env::current_dir() {
        for filename in LOCAL_CANDIDATES {
            let path = current_dir.join(filename);
            if path.exists() {
                return Some(path);
            }
        }
    }

    // 3. グローバル設定ファイル
    dirs::config_dir()
        .map(|dir| dir.join("settle").join("config.yaml"))
        .filter(|path| path.exists())
}
