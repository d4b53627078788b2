// ==========================================
// 腌制计算系统 - 配置层
// ==========================================
// 职责: 应用配置加载与覆写
// 红线: 酱料出成率/每盘克数是领域常量, 不进入配置
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{
    config_keys, default_config_path, env_keys, AppConfig, ConfigError, ConfigManager,
    ConfigResult, CONFIG_PATH_ENV,
};
