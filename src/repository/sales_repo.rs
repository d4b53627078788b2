// ==========================================
// 腌制计算系统 - 内存销售记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::sales::{SalesRecord, SalesTotals};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sales_aggregator::{aggregate_sales, SalesAggregator, SalesWindow};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

// ==========================================
// InMemorySalesAggregator - 内存销售仓储
// ==========================================
pub struct InMemorySalesAggregator {
    records: RwLock<Vec<SalesRecord>>,
    history_window_days: Option<u32>,
    reference_date: Option<NaiveDate>,
}

impl Default for InMemorySalesAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySalesAggregator {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            history_window_days: None,
            reference_date: None,
        }
    }

    pub fn with_records(records: Vec<SalesRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::new()
        }
    }

    /// 只汇总截至 reference_date 的最近 days 天
    ///
    /// reference_date 缺省时取该门店最新一条记录的日期
    pub fn with_history_window(mut self, days: u32, reference_date: Option<NaiveDate>) -> Self {
        self.history_window_days = Some(days);
        self.reference_date = reference_date;
        self
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Vec<SalesRecord>>> {
        self.records
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Vec<SalesRecord>>> {
        self.records
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加销售记录
    ///
    /// # 返回
    /// - Ok(usize): 追加条数
    pub fn add_records(&self, records: Vec<SalesRecord>) -> RepositoryResult<usize> {
        for record in &records {
            if record.location_id.trim().is_empty() {
                return Err(RepositoryError::FieldValueError {
                    field: "location_id".to_string(),
                    message: format!("销售记录 {} 缺少门店ID", record.sale_date),
                });
            }
        }
        let count = records.len();
        self.write()?.extend(records);
        tracing::info!(count, "追加销售记录");
        Ok(count)
    }

    pub fn record_count(&self) -> RepositoryResult<usize> {
        Ok(self.read()?.len())
    }

    /// 已有记录的门店列表（去重、排序）
    pub fn locations(&self) -> RepositoryResult<Vec<String>> {
        let records = self.read()?;
        let set: BTreeSet<String> = records.iter().map(|r| r.location_id.clone()).collect();
        Ok(set.into_iter().collect())
    }

    pub fn list_by_location(&self, location_id: &str) -> RepositoryResult<Vec<SalesRecord>> {
        let records = self.read()?;
        let mut list: Vec<SalesRecord> = records
            .iter()
            .filter(|r| r.location_id == location_id)
            .cloned()
            .collect();
        list.sort_by_key(|r| r.sale_date);
        Ok(list)
    }

    /// 同步版本汇总（供 CLI / 测试直接调用）
    pub fn totals_for(&self, location_id: &str) -> RepositoryResult<SalesTotals> {
        let records = self.read()?;
        let window = self.window_for(&records, location_id);
        Ok(aggregate_sales(records.iter(), location_id, window))
    }

    fn window_for(&self, records: &[SalesRecord], location_id: &str) -> SalesWindow {
        let days = match self.history_window_days {
            Some(days) => days,
            None => return SalesWindow::all(),
        };

        let reference = self.reference_date.or_else(|| {
            records
                .iter()
                .filter(|r| r.location_id == location_id)
                .map(|r| r.sale_date)
                .max()
        });

        match reference {
            Some(reference) => SalesWindow::trailing_days(reference, days),
            None => SalesWindow::all(),
        }
    }
}

#[async_trait]
impl SalesAggregator for InMemorySalesAggregator {
    async fn sales_totals(&self, location_id: &str) -> RepositoryResult<SalesTotals> {
        self.totals_for(location_id)
    }
}
