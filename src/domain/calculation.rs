// ==========================================
// 腌制计算系统 - 计算请求与结果
// ==========================================
// 序列化: camelCase（与前端 JSON 对齐）
// ==========================================

use crate::domain::inventory::{InventoryData, ProjectedSales};
use crate::domain::types::MarinadeType;
use serde::{Deserialize, Serialize};

// ==========================================
// MarinationRequest - 引擎输入
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarinationRequest {
    pub inventory: InventoryData,
    pub projected_sales: ProjectedSales,

    /// 可用生鸡总量上限 (kg)，缺省表示不限量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_raw_chicken_kg: Option<f64>,

    /// 当日已腌制量 (kg)，用于日终扣减
    #[serde(default)]
    pub already_marinated_soy: f64,
    #[serde(default)]
    pub already_marinated_teriyaki: f64,
    #[serde(default)]
    pub already_marinated_turmeric: f64,
}

impl MarinationRequest {
    pub fn new(inventory: InventoryData, projected_sales: ProjectedSales) -> Self {
        Self {
            inventory,
            projected_sales,
            ..Default::default()
        }
    }

    pub fn with_available_raw_chicken_kg(mut self, kg: f64) -> Self {
        self.available_raw_chicken_kg = Some(kg);
        self
    }

    pub fn with_already_marinated(mut self, already: AlreadyMarinated) -> Self {
        self.already_marinated_soy = already.soy_kg;
        self.already_marinated_teriyaki = already.teriyaki_kg;
        self.already_marinated_turmeric = already.turmeric_kg;
        self
    }

    pub fn already_marinated(&self) -> AlreadyMarinated {
        AlreadyMarinated {
            soy_kg: self.already_marinated_soy,
            teriyaki_kg: self.already_marinated_teriyaki,
            turmeric_kg: self.already_marinated_turmeric,
        }
    }
}

// ==========================================
// AlreadyMarinated - 当日已腌制量 (kg)
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlreadyMarinated {
    pub soy_kg: f64,
    pub teriyaki_kg: f64,
    pub turmeric_kg: f64,
}

impl AlreadyMarinated {
    pub fn kg(&self, marinade: MarinadeType) -> f64 {
        match marinade {
            MarinadeType::Soy => self.soy_kg,
            MarinadeType::Teriyaki => self.teriyaki_kg,
            MarinadeType::Turmeric => self.turmeric_kg,
        }
    }

    pub fn add_kg(&mut self, marinade: MarinadeType, kg: f64) {
        match marinade {
            MarinadeType::Soy => self.soy_kg += kg,
            MarinadeType::Teriyaki => self.teriyaki_kg += kg,
            MarinadeType::Turmeric => self.turmeric_kg += kg,
        }
    }

    /// 任一类型 > 0 即触发日终扣减路径
    pub fn any_positive(&self) -> bool {
        MarinadeType::ALL.iter().any(|&m| self.kg(m) > 0.0)
    }
}

// ==========================================
// CalculationResult - 引擎输出
// ==========================================
// 单位: raw_to_marinate_* = 克(g); portions_per_1000_* = 每千元销售份数
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub raw_to_marinate_soy: f64,
    pub raw_to_marinate_teriyaki: f64,
    pub raw_to_marinate_turmeric: f64,
    #[serde(rename = "portionsPer1000Soy")]
    pub portions_per_1000_soy: f64,
    #[serde(rename = "portionsPer1000Teriyaki")]
    pub portions_per_1000_teriyaki: f64,
    #[serde(rename = "portionsPer1000Turmeric")]
    pub portions_per_1000_turmeric: f64,
}

impl CalculationResult {
    /// 按 MarinadeType::ALL 顺序组装
    pub fn from_parts(raw_grams: [f64; 3], portions_per_1000: [f64; 3]) -> Self {
        Self {
            raw_to_marinate_soy: raw_grams[0],
            raw_to_marinate_teriyaki: raw_grams[1],
            raw_to_marinate_turmeric: raw_grams[2],
            portions_per_1000_soy: portions_per_1000[0],
            portions_per_1000_teriyaki: portions_per_1000[1],
            portions_per_1000_turmeric: portions_per_1000[2],
        }
    }

    pub fn raw_grams(&self, marinade: MarinadeType) -> f64 {
        match marinade {
            MarinadeType::Soy => self.raw_to_marinate_soy,
            MarinadeType::Teriyaki => self.raw_to_marinate_teriyaki,
            MarinadeType::Turmeric => self.raw_to_marinate_turmeric,
        }
    }

    pub fn portions_per_1000(&self, marinade: MarinadeType) -> f64 {
        match marinade {
            MarinadeType::Soy => self.portions_per_1000_soy,
            MarinadeType::Teriyaki => self.portions_per_1000_teriyaki,
            MarinadeType::Turmeric => self.portions_per_1000_turmeric,
        }
    }

    pub fn raw_grams_all(&self) -> [f64; 3] {
        MarinadeType::ALL.map(|m| self.raw_grams(m))
    }

    pub fn portions_per_1000_all(&self) -> [f64; 3] {
        MarinadeType::ALL.map(|m| self.portions_per_1000(m))
    }

    pub fn total_raw_grams(&self) -> f64 {
        self.raw_grams_all().iter().sum()
    }
}
