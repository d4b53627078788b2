// ==========================================
// 腌制计算系统 - 库存与预测销售
// ==========================================
// 单位: 库存=盘(pan), 销售额=货币
// ==========================================

use crate::domain::types::MarinadeType;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryData - 当前在手盘数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryData {
    pub pans_soy: f64,
    pub pans_teriyaki: f64,
    pub pans_turmeric: f64,
}

impl InventoryData {
    pub fn new(pans_soy: f64, pans_teriyaki: f64, pans_turmeric: f64) -> Self {
        Self {
            pans_soy,
            pans_teriyaki,
            pans_turmeric,
        }
    }

    /// 按酱料类型读取盘数（原值, 不做钳制）
    pub fn pans(&self, marinade: MarinadeType) -> f64 {
        match marinade {
            MarinadeType::Soy => self.pans_soy,
            MarinadeType::Teriyaki => self.pans_teriyaki,
            MarinadeType::Turmeric => self.pans_turmeric,
        }
    }
}

// ==========================================
// ProjectedSales - 未来4天预测销售额
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSales {
    pub day0: f64,
    pub day1: f64,
    pub day2: f64,
    pub day3: f64,
}

impl ProjectedSales {
    pub fn new(day0: f64, day1: f64, day2: f64, day3: f64) -> Self {
        Self {
            day0,
            day1,
            day2,
            day3,
        }
    }

    /// 4天合计（负数按原值计入, 由引擎在下游钳制）
    pub fn total(&self) -> f64 {
        self.days().iter().sum()
    }

    pub fn days(&self) -> [f64; 4] {
        [self.day0, self.day1, self.day2, self.day3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inventory_camel_case() {
        let inv: InventoryData =
            serde_json::from_str(r#"{"pansSoy":1.5,"pansTeriyaki":2,"pansTurmeric":0}"#).unwrap();
        assert_eq!(inv.pans(MarinadeType::Soy), 1.5);
        assert_eq!(inv.pans(MarinadeType::Teriyaki), 2.0);
        assert_eq!(inv.pans(MarinadeType::Turmeric), 0.0);
    }

    #[test]
    fn test_projected_sales_total_keeps_negative_days() {
        let sales = ProjectedSales::new(100.0, -40.0, 0.0, 10.0);
        assert_eq!(sales.total(), 70.0);
    }
}
