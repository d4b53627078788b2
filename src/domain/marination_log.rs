// ==========================================
// 腌制计算系统 - 腌制日志领域模型
// ==========================================
// 用途: 记录实际腌制动作, 按门店+日期汇总得到已腌制量
// ==========================================

use crate::domain::types::MarinadeType;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// MarinationLog - 腌制日志
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarinationLog {
    pub log_id: String,              // 日志ID (uuid v4)
    pub location_id: String,         // 门店ID
    pub marinade: MarinadeType,      // 酱料类型
    pub raw_kg: f64,                 // 生鸡重量 (kg)
    pub marinated_at: NaiveDateTime, // 腌制时间
    pub operator: Option<String>,    // 操作人
    pub is_end_of_day: bool,         // 是否日终补腌
}

impl MarinationLog {
    pub fn new(
        location_id: &str,
        marinade: MarinadeType,
        raw_kg: f64,
        marinated_at: NaiveDateTime,
    ) -> Self {
        Self {
            log_id: Uuid::new_v4().to_string(),
            location_id: location_id.to_string(),
            marinade,
            raw_kg,
            marinated_at,
            operator: None,
            is_end_of_day: false,
        }
    }

    pub fn with_operator(mut self, operator: &str) -> Self {
        self.operator = Some(operator.to_string());
        self
    }

    pub fn end_of_day(mut self) -> Self {
        self.is_end_of_day = true;
        self
    }

    pub fn marinated_on(&self) -> NaiveDate {
        self.marinated_at.date()
    }
}
