// ==========================================
// 腌制计算系统 - 历史销售领域模型
// ==========================================
// 职责: 历史销售记录 + 门店级汇总
// ==========================================

use crate::domain::types::MarinadeType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// SalesTotals - 历史汇总（比率来源）
// ==========================================
// 红线: total_sales == 0 时比率无定义, 由引擎走零分支
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub total_sales: f64,
    pub total_portions_soy: f64,
    pub total_portions_teriyaki: f64,
    pub total_portions_turmeric: f64,
}

impl SalesTotals {
    pub fn new(
        total_sales: f64,
        total_portions_soy: f64,
        total_portions_teriyaki: f64,
        total_portions_turmeric: f64,
    ) -> Self {
        Self {
            total_sales,
            total_portions_soy,
            total_portions_teriyaki,
            total_portions_turmeric,
        }
    }

    pub fn portions(&self, marinade: MarinadeType) -> f64 {
        match marinade {
            MarinadeType::Soy => self.total_portions_soy,
            MarinadeType::Teriyaki => self.total_portions_teriyaki,
            MarinadeType::Turmeric => self.total_portions_turmeric,
        }
    }

    /// 是否存在可用的历史销售数据（total_sales 有限且 > 0）
    pub fn has_sales_data(&self) -> bool {
        self.total_sales.is_finite() && self.total_sales > 0.0
    }
}

// ==========================================
// SalesRecord - 单门店单日销售记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub location_id: String,
    pub sale_date: NaiveDate,
    pub total_sales: f64,
    pub portions_soy: f64,
    pub portions_teriyaki: f64,
    pub portions_turmeric: f64,
}

impl SalesRecord {
    pub fn portions(&self, marinade: MarinadeType) -> f64 {
        match marinade {
            MarinadeType::Soy => self.portions_soy,
            MarinadeType::Teriyaki => self.portions_teriyaki,
            MarinadeType::Turmeric => self.portions_turmeric,
        }
    }
}
