// ==========================================
// 腌制计算系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、环境变量覆写
// 存储: JSON 文件（缺省位于用户配置目录）
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "MARINATION_CALC_CONFIG";

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 门店
    pub const DEFAULT_LOCATION_ID: &str = "default_location_id";

    // 历史销售汇总窗口（天）
    pub const HISTORY_WINDOW_DAYS: &str = "history_window_days";

    // 语言
    pub const LOCALE: &str = "locale";

    // 日志级别
    pub const LOG_LEVEL: &str = "log_level";
}

// ==========================================
// 环境变量覆写
// ==========================================
pub mod env_keys {
    pub const LOCATION: &str = "MARINATION_CALC_LOCATION";
    pub const HISTORY_DAYS: &str = "MARINATION_CALC_HISTORY_DAYS";
    pub const LOCALE: &str = "MARINATION_CALC_LOCALE";
    pub const LOG_LEVEL: &str = "MARINATION_CALC_LOG_LEVEL";
}

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    FileNotFound(String),

    #[error("配置文件读取失败: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ValueError {
        key: String,
        value: String,
        message: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// AppConfig - 应用配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 请求未指定门店时使用
    #[serde(default)]
    pub default_location_id: Option<String>,

    /// 历史汇总只取最近 N 天（缺省为全部历史）
    #[serde(default)]
    pub history_window_days: Option<u32>,

    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_locale() -> String {
    "zh-CN".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_location_id: None,
            history_window_days: None,
            locale: default_locale(),
            log_level: default_log_level(),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 直接使用给定配置（测试/嵌入场景）
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// 加载配置
    ///
    /// # 路径选择
    /// 1. 显式传入的路径（不存在则报错）
    /// 2. 环境变量 MARINATION_CALC_CONFIG（不存在则报错）
    /// 3. 用户配置目录/marination-calc/config.json（不存在则使用默认值）
    ///
    /// 加载后应用环境变量覆写
    pub fn load(explicit_path: Option<&Path>) -> ConfigResult<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let mut manager = match explicit_path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    tracing::debug!("未找到配置文件, 使用默认配置");
                    Self::from_config(AppConfig::default())
                }
            },
        };

        manager.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(manager)
    }

    /// 从 JSON 文件读取
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&raw)?;
        tracing::info!(path = %path.display(), "配置文件已加载");
        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 应用覆写（lookup 返回 None 表示未设置）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(location) = get(env_keys::LOCATION) {
            self.config.default_location_id = Some(location);
        }
        if let Some(days) = get(env_keys::HISTORY_DAYS) {
            let parsed = days.parse::<u32>().map_err(|e| ConfigError::ValueError {
                key: env_keys::HISTORY_DAYS.to_string(),
                value: days.clone(),
                message: e.to_string(),
            })?;
            self.config.history_window_days = Some(parsed);
        }
        if let Some(locale) = get(env_keys::LOCALE) {
            self.config.locale = locale;
        }
        if let Some(level) = get(env_keys::LOG_LEVEL) {
            self.config.log_level = level;
        }
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 按配置键读取（字符串形式）
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            config_keys::DEFAULT_LOCATION_ID => self.config.default_location_id.clone(),
            config_keys::HISTORY_WINDOW_DAYS => {
                self.config.history_window_days.map(|d| d.to_string())
            }
            config_keys::LOCALE => Some(self.config.locale.clone()),
            config_keys::LOG_LEVEL => Some(self.config.log_level.clone()),
            _ => None,
        }
    }

    /// 获取配置值, 带默认值
    pub fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// 获取所有配置的快照（JSON格式, 用于审计输出）
    pub fn snapshot(&self) -> ConfigResult<String> {
        let keys = [
            config_keys::DEFAULT_LOCATION_ID,
            config_keys::HISTORY_WINDOW_DAYS,
            config_keys::LOCALE,
            config_keys::LOG_LEVEL,
        ];
        let map: BTreeMap<&str, String> = keys
            .iter()
            .filter_map(|k| self.get(k).map(|v| (*k, v)))
            .collect();
        Ok(serde_json::to_string(&map)?)
    }
}

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("marination-calc").join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.locale, "zh-CN");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"default_location_id":"LOC_A","history_window_days":28,"locale":"en"}}"#
        )
        .unwrap();

        let manager = ConfigManager::from_file(file.path()).unwrap();
        assert_eq!(manager.config().default_location_id.as_deref(), Some("LOC_A"));
        assert_eq!(manager.config().history_window_days, Some(28));
        assert_eq!(manager.config().log_level, "info");
        assert_eq!(manager.source(), Some(file.path()));
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let result = ConfigManager::from_file(Path::new("/nonexistent/marination.json"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (env_keys::LOCATION, "LOC_ENV"),
            (env_keys::HISTORY_DAYS, "14"),
            (env_keys::LOCALE, " "),
        ]
        .into_iter()
        .collect();

        let mut manager = ConfigManager::from_config(AppConfig::default());
        manager
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(manager.get(config_keys::DEFAULT_LOCATION_ID).as_deref(), Some("LOC_ENV"));
        assert_eq!(manager.get(config_keys::HISTORY_WINDOW_DAYS).as_deref(), Some("14"));
        // 空白值不覆写
        assert_eq!(manager.get(config_keys::LOCALE).as_deref(), Some("zh-CN"));
    }

    #[test]
    fn test_override_bad_number() {
        let mut manager = ConfigManager::from_config(AppConfig::default());
        let result = manager.apply_overrides(|k| {
            (k == env_keys::HISTORY_DAYS).then(|| "two weeks".to_string())
        });
        assert!(matches!(result, Err(ConfigError::ValueError { .. })));
    }

    #[test]
    fn test_snapshot_skips_unset() {
        let manager = ConfigManager::from_config(AppConfig::default());
        let snapshot = manager.snapshot().unwrap();
        let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(value["locale"], "zh-CN");
        assert!(value.get("default_location_id").is_none());
        assert_eq!(manager.get_or_default(config_keys::DEFAULT_LOCATION_ID, "LOC_X"), "LOC_X");
    }
}
