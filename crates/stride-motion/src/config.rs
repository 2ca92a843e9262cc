//! # 拟合配置
//!
//! 控制关节轨迹后台拟合的行为，可从 TOML 文件加载：
//!
//! ```toml
//! policy = "reject"          # 或 "cancel_and_restart"（默认）
//! parallel = true            # 每个关节通道并行拟合
//! join_timeout_ms = 2000     # Drop / 重启时等待拟合线程退出的上限
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// 重入 compute 策略
///
/// 上一次拟合仍在进行时再次调用 `compute()` 的处理方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputePolicy {
    /// 取消并等待旧拟合线程退出，然后重新开始（默认）
    #[default]
    CancelAndRestart,

    /// 拒绝，返回 `ConcurrentComputeConflict`
    Reject,
}

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读取文件失败
    #[error("Failed to read config: {0}")]
    Io(#[from] io::Error),

    /// TOML 解析失败
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// 配置值非法
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 拟合配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// 重入 compute 策略
    pub policy: ComputePolicy,

    /// 是否并行拟合各关节通道
    pub parallel: bool,

    /// 等待拟合线程退出的上限（毫秒）
    ///
    /// 超时后记录错误日志并放弃等待。
    pub join_timeout_ms: u64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            policy: ComputePolicy::CancelAndRestart,
            parallel: true,
            join_timeout_ms: 2000,
        }
    }
}

impl FitConfig {
    /// 从 TOML 字符串解析
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FitConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 校验配置值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.join_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "join_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// 等待拟合线程退出的上限
    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }
}
