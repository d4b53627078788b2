// ==========================================
// 腌制计算系统 - 销售汇总 Trait
// ==========================================
// 职责: 为门店提供 SalesTotals（引擎比率来源）
// 红线: 汇总只做求和与过滤, 不计算比率
// ==========================================

use crate::domain::sales::{SalesRecord, SalesTotals};
use crate::domain::types::MarinadeType;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::NaiveDate;

// ==========================================
// SalesAggregator Trait
// ==========================================
// 实现者: InMemorySalesAggregator
#[async_trait]
pub trait SalesAggregator: Send + Sync {
    /// 获取门店历史销售汇总
    ///
    /// # 返回
    /// - Ok(SalesTotals): 汇总结果（无记录时为全零, 不报错）
    /// - Err: 数据访问失败
    async fn sales_totals(&self, location_id: &str) -> RepositoryResult<SalesTotals>;
}

// ==========================================
// SalesWindow - 汇总日期窗口（闭区间）
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalesWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SalesWindow {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// 截至 reference 的最近 days 天（含 reference 当天）
    pub fn trailing_days(reference: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            from: reference.checked_sub_signed(chrono::Duration::days(span)),
            to: Some(reference),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// 汇总指定门店、指定窗口内的销售记录
///
/// 字段级容错: 负数或非有限数值的字段跳过（记 warn）, 同一记录的其他字段照常计入
pub fn aggregate_sales<'a, I>(records: I, location_id: &str, window: SalesWindow) -> SalesTotals
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let mut totals = SalesTotals::default();
    let mut matched = 0usize;

    for record in records {
        if record.location_id != location_id || !window.contains(record.sale_date) {
            continue;
        }
        matched += 1;

        totals.total_sales += accepted(record, "total_sales", record.total_sales);
        for marinade in MarinadeType::ALL {
            let value = accepted(record, "portions", record.portions(marinade));
            match marinade {
                MarinadeType::Soy => totals.total_portions_soy += value,
                MarinadeType::Teriyaki => totals.total_portions_teriyaki += value,
                MarinadeType::Turmeric => totals.total_portions_turmeric += value,
            }
        }
    }

    tracing::debug!(location_id, matched, total_sales = totals.total_sales, "销售汇总完成");
    totals
}

fn accepted(record: &SalesRecord, field: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!(
            location_id = %record.location_id,
            sale_date = %record.sale_date,
            field,
            value,
            "销售记录字段异常, 已跳过"
        );
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(location: &str, day: u32, sales: f64, soy: f64) -> SalesRecord {
        SalesRecord {
            location_id: location.to_string(),
            sale_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            total_sales: sales,
            portions_soy: soy,
            portions_teriyaki: 1.0,
            portions_turmeric: 2.0,
        }
    }

    #[test]
    fn test_aggregate_filters_location() {
        let records = vec![
            record("LOC_A", 1, 100.0, 10.0),
            record("LOC_B", 1, 999.0, 99.0),
            record("LOC_A", 2, 200.0, 20.0),
        ];
        let totals = aggregate_sales(&records, "LOC_A", SalesWindow::all());
        assert_eq!(totals.total_sales, 300.0);
        assert_eq!(totals.total_portions_soy, 30.0);
        assert_eq!(totals.total_portions_teriyaki, 2.0);
        assert_eq!(totals.total_portions_turmeric, 4.0);
    }

    #[test]
    fn test_aggregate_window_inclusive() {
        let records = vec![
            record("LOC_A", 1, 100.0, 10.0),
            record("LOC_A", 5, 200.0, 20.0),
            record("LOC_A", 10, 400.0, 40.0),
        ];
        let window = SalesWindow::between(
            NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        );
        let totals = aggregate_sales(&records, "LOC_A", window);
        assert_eq!(totals.total_sales, 600.0);
    }

    #[test]
    fn test_aggregate_skips_bad_fields() {
        let records = vec![record("LOC_A", 1, -50.0, f64::NAN), record("LOC_A", 2, 100.0, 5.0)];
        let totals = aggregate_sales(&records, "LOC_A", SalesWindow::all());
        assert_eq!(totals.total_sales, 100.0);
        assert_eq!(totals.total_portions_soy, 5.0);
        assert_eq!(totals.total_portions_teriyaki, 2.0);
    }

    #[test]
    fn test_trailing_days_window() {
        let reference = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let window = SalesWindow::trailing_days(reference, 7);
        assert!(window.contains(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()));
    }
}
