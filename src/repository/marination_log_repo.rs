// ==========================================
// 腌制计算系统 - 腌制日志仓储
// ==========================================
// 职责: 记录实际腌制, 汇总门店当日已腌制量
// ==========================================

use crate::domain::calculation::AlreadyMarinated;
use crate::domain::marination_log::MarinationLog;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

// ==========================================
// MarinationLogBook - 腌制日志簿
// ==========================================
#[derive(Default)]
pub struct MarinationLogBook {
    logs: RwLock<Vec<MarinationLog>>,
}

impl MarinationLogBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, Vec<MarinationLog>>> {
        self.logs
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, Vec<MarinationLog>>> {
        self.logs
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 记录一次腌制
    ///
    /// # 返回
    /// - Ok(String): log_id
    /// - Err(ValidationError): 门店为空或 raw_kg 非正/非有限
    pub fn record(&self, log: MarinationLog) -> RepositoryResult<String> {
        if log.location_id.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "腌制日志缺少门店ID".to_string(),
            ));
        }
        if !log.raw_kg.is_finite() || log.raw_kg <= 0.0 {
            return Err(RepositoryError::FieldValueError {
                field: "raw_kg".to_string(),
                message: format!("腌制量必须为正数, 实际 {}", log.raw_kg),
            });
        }

        let log_id = log.log_id.clone();
        tracing::info!(
            log_id = %log_id,
            location_id = %log.location_id,
            marinade = %log.marinade,
            raw_kg = log.raw_kg,
            "记录腌制日志"
        );
        self.write()?.push(log);
        Ok(log_id)
    }

    /// 按门店查询（按腌制时间升序）
    pub fn list_by_location(&self, location_id: &str) -> RepositoryResult<Vec<MarinationLog>> {
        let logs = self.read()?;
        let mut list: Vec<MarinationLog> = logs
            .iter()
            .filter(|l| l.location_id == location_id)
            .cloned()
            .collect();
        list.sort_by_key(|l| l.marinated_at);
        Ok(list)
    }

    /// 按门店 + 日期查询
    pub fn list_by_date(
        &self,
        location_id: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<MarinationLog>> {
        Ok(self
            .list_by_location(location_id)?
            .into_iter()
            .filter(|l| l.marinated_on() == date)
            .collect())
    }

    pub fn remove(&self, log_id: &str) -> RepositoryResult<MarinationLog> {
        let mut logs = self.write()?;
        let idx = logs
            .iter()
            .position(|l| l.log_id == log_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "MarinationLog".to_string(),
                id: log_id.to_string(),
            })?;
        Ok(logs.remove(idx))
    }

    /// 门店当日已腌制量（按类型求和, kg）
    pub fn already_marinated(
        &self,
        location_id: &str,
        date: NaiveDate,
    ) -> RepositoryResult<AlreadyMarinated> {
        let mut already = AlreadyMarinated::default();
        for log in self.list_by_date(location_id, date)? {
            already.add_kg(log.marinade, log.raw_kg);
        }
        Ok(already)
    }
}
