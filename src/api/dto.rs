// ==========================================
// 腌制计算系统 - API 数据传输对象
// ==========================================
// 序列化: camelCase, 计算结果字段平铺
// ==========================================

use crate::domain::calculation::CalculationResult;
use crate::domain::types::CalculationMode;
use serde::{Deserialize, Serialize};

/// 计算响应（CalculationResult + 门店上下文 + 提示）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub location_id: String,
    pub mode: CalculationMode,
    pub has_sales_data: bool,

    /// 无历史销售时的提示
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,

    /// 已腌制量被限量分配忽略时的提示
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,

    #[serde(flatten)]
    pub result: CalculationResult,
}
