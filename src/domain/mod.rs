// ==========================================
// 腌制计算系统 - 领域模型层
// ==========================================
// ==========================================
// 职责: 定义领域实体、值对象、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod calculation;
pub mod inventory;
pub mod marination_log;
pub mod sales;
pub mod types;

// 重导出核心类型
pub use calculation::{AlreadyMarinated, CalculationResult, MarinationRequest};
pub use inventory::{InventoryData, ProjectedSales};
pub use marination_log::MarinationLog;
pub use sales::{SalesRecord, SalesTotals};
pub use types::{CalculationMode, MarinadeType};
