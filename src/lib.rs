// ==========================================
// 腌制计算系统 - 核心库
// ==========================================
// 技术栈: Rust + Tokio (无持久化, 无 HTTP)
// 系统定位: 门店每日腌制量决策支持 (人工最终控制权)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 销售汇总 / 腌制日志
pub mod repository;

// 引擎层 - 腌制量计算
pub mod engine;

// 导入层 - 历史销售文件
pub mod importer;

// 配置层 - 应用配置
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 请求网关
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{CalculationMode, MarinadeType};

// 领域实体
pub use domain::{
    AlreadyMarinated, CalculationResult, InventoryData, MarinationLog, MarinationRequest,
    ProjectedSales, SalesRecord, SalesTotals,
};

// 引擎
pub use engine::{MarinationBreakdown, MarinationEngine};

// 仓储
pub use repository::{InMemorySalesAggregator, MarinationLogBook, SalesAggregator};

// API
pub use api::{ApiError, CalculationResponse, MarinationApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "腌制计算系统";
