// ==========================================
// 腌制计算系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 向引擎/API 提供销售汇总与腌制日志
// 约束: 仅内存实现, 持久化由外部协作方负责
// ==========================================

pub mod error;
pub mod marination_log_repo;
pub mod sales_aggregator;
pub mod sales_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use marination_log_repo::MarinationLogBook;
pub use sales_aggregator::{aggregate_sales, SalesAggregator, SalesWindow};
pub use sales_repo::InMemorySalesAggregator;
