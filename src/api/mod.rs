// ==========================================
// 腌制计算系统 - API 层
// ==========================================
// 职责: 请求网关（无 HTTP）, 供 CLI / 外部服务调用
// ==========================================

pub mod dto;
pub mod error;
pub mod marination_api;

pub use dto::CalculationResponse;
pub use error::{ApiError, ApiResult};
pub use marination_api::MarinationApi;
