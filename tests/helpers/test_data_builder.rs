// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use marination_calc::domain::{
    AlreadyMarinated, InventoryData, MarinationRequest, ProjectedSales, SalesRecord, SalesTotals,
};

pub const EPS: f64 = 1e-6;

/// 浮点近似断言
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {} ≈ {}",
        actual,
        expected
    );
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn datetime(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hour, 0, 0).unwrap()
}

/// 三种酱料均有历史的汇总
///
/// 比率: soy 0.1, teriyaki 0.05, turmeric 0.02
pub fn mixed_totals() -> SalesTotals {
    SalesTotals::new(10_000.0, 1_000.0, 500.0, 200.0)
}

/// 只有酱油的汇总 (ratio = 0.1)
pub fn soy_only_totals() -> SalesTotals {
    SalesTotals::new(1_000.0, 100.0, 0.0, 0.0)
}

/// 四天平均分配的预测销售
pub fn even_sales(total: f64) -> ProjectedSales {
    let day = total / 4.0;
    ProjectedSales::new(day, day, day, day)
}

// ==========================================
// MarinationRequest 构建器
// ==========================================

pub struct RequestBuilder {
    inventory: InventoryData,
    projected_sales: ProjectedSales,
    available_raw_chicken_kg: Option<f64>,
    already: AlreadyMarinated,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            inventory: InventoryData::default(),
            projected_sales: even_sales(100_000.0),
            available_raw_chicken_kg: None,
            already: AlreadyMarinated::default(),
        }
    }

    pub fn pans(mut self, soy: f64, teriyaki: f64, turmeric: f64) -> Self {
        self.inventory = InventoryData::new(soy, teriyaki, turmeric);
        self
    }

    pub fn sales(mut self, sales: ProjectedSales) -> Self {
        self.projected_sales = sales;
        self
    }

    pub fn available_kg(mut self, kg: f64) -> Self {
        self.available_raw_chicken_kg = Some(kg);
        self
    }

    pub fn already(mut self, soy_kg: f64, teriyaki_kg: f64, turmeric_kg: f64) -> Self {
        self.already = AlreadyMarinated {
            soy_kg,
            teriyaki_kg,
            turmeric_kg,
        };
        self
    }

    pub fn build(self) -> MarinationRequest {
        let mut request = MarinationRequest::new(self.inventory, self.projected_sales)
            .with_already_marinated(self.already);
        if let Some(kg) = self.available_raw_chicken_kg {
            request = request.with_available_raw_chicken_kg(kg);
        }
        request
    }
}

// ==========================================
// SalesRecord 构建器
// ==========================================

pub fn sales_record(
    location_id: &str,
    sale_date: NaiveDate,
    total_sales: f64,
    portions: [f64; 3],
) -> SalesRecord {
    SalesRecord {
        location_id: location_id.to_string(),
        sale_date,
        total_sales,
        portions_soy: portions[0],
        portions_teriyaki: portions[1],
        portions_turmeric: portions[2],
    }
}

/// 连续 days 天、每天相同的销售记录
pub fn daily_records(
    location_id: &str,
    start: NaiveDate,
    days: u32,
    total_sales: f64,
    portions: [f64; 3],
) -> Vec<SalesRecord> {
    (0..days)
        .map(|offset| {
            let day = start + chrono::Duration::days(offset as i64);
            sales_record(location_id, day, total_sales, portions)
        })
        .collect()
}
