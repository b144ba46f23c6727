//! 测试驱动配置
//!
//! 虚拟时钟的起点与默认步长。可从 JSON 读取，缺省字段取默认值。

use crate::clock::{DEFAULT_STEADY_START, DEFAULT_WALL_START};
use crate::sim::{SimDuration, SimTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("default_tick must be positive, got {0:?}")]
    NonPositiveTick(SimDuration),
}

/// 时间均为纳秒
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub steady_start: SimTime,
    pub wall_start: SimTime,
    pub default_tick: SimDuration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            steady_start: DEFAULT_STEADY_START,
            wall_start: DEFAULT_WALL_START,
            default_tick: SimDuration::from_millis(1),
        }
    }
}

impl HarnessConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: HarnessConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_tick.is_positive() {
            return Err(ConfigError::NonPositiveTick(self.default_tick));
        }
        Ok(())
    }
}
