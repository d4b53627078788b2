// ==========================================
// 腌制计算系统 - 领域类型定义
// ==========================================
// 红线: 酱料类型只有三种, 不允许运行期扩展
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 酱料类型 (Marinade Type)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarinadeType {
    Soy,      // 酱油
    Teriyaki, // 照烧
    Turmeric, // 姜黄
}

impl MarinadeType {
    /// 固定遍历顺序: 酱油 → 照烧 → 姜黄
    pub const ALL: [MarinadeType; 3] = [
        MarinadeType::Soy,
        MarinadeType::Teriyaki,
        MarinadeType::Turmeric,
    ];
}

impl fmt::Display for MarinadeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarinadeType::Soy => write!(f, "SOY"),
            MarinadeType::Teriyaki => write!(f, "TERIYAKI"),
            MarinadeType::Turmeric => write!(f, "TURMERIC"),
        }
    }
}

impl FromStr for MarinadeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SOY" | "酱油" => Ok(MarinadeType::Soy),
            "TERIYAKI" | "照烧" => Ok(MarinadeType::Teriyaki),
            "TURMERIC" | "姜黄" => Ok(MarinadeType::Turmeric),
            other => Err(format!("未知酱料类型: {}", other)),
        }
    }
}

// ==========================================
// 计算模式 (Calculation Mode)
// ==========================================
// 标识结果由哪条引擎路径产生
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationMode {
    Standard,        // 标准计算（不限量）
    Constrained,     // 限量生鸡分配
    EndOfDayOffset,  // 日终扣减已腌制量
}

impl fmt::Display for CalculationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalculationMode::Standard => write!(f, "STANDARD"),
            CalculationMode::Constrained => write!(f, "CONSTRAINED"),
            CalculationMode::EndOfDayOffset => write!(f, "END_OF_DAY_OFFSET"),
        }
    }
}
