// ==========================================
// 腌制计算系统 - 引擎层
// ==========================================
// ==========================================
// 职责: 纯计算, 无 I/O, 无共享可变状态
// 红线: 引擎不返回错误, 异常数值一律钳制
// ==========================================

pub mod marination;

// 重导出核心引擎
pub use marination::{
    MarinadeBreakdown, MarinadeProfile, MarinationBreakdown, MarinationEngine, MARINADE_PROFILES,
};
