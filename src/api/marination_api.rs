// ==========================================
// 腌制计算系统 - 腌制计算 API
// ==========================================
// 职责: 请求解析 → 附加门店上下文 → 汇总历史销售 → 调用引擎
// 红线: 形状错误在此拦截, 数值异常交由引擎钳制
// ==========================================

use crate::api::dto::CalculationResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::calculation::{AlreadyMarinated, MarinationRequest};
use crate::domain::types::{CalculationMode, MarinadeType};
use crate::engine::{MarinationBreakdown, MarinationEngine};
use crate::i18n;
use crate::repository::{MarinationLogBook, SalesAggregator};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// MarinationApi - 腌制计算接口
// ==========================================
pub struct MarinationApi {
    engine: MarinationEngine,
    aggregator: Arc<dyn SalesAggregator>,
    log_book: Option<Arc<MarinationLogBook>>,
}

impl MarinationApi {
    /// 创建新的 MarinationApi 实例
    ///
    /// # 参数
    /// - aggregator: 历史销售汇总来源
    /// - log_book: 腌制日志簿（日终扣减需要, 可选）
    pub fn new(
        aggregator: Arc<dyn SalesAggregator>,
        log_book: Option<Arc<MarinationLogBook>>,
    ) -> Self {
        Self {
            engine: MarinationEngine::new(),
            aggregator,
            log_book,
        }
    }

    pub fn engine(&self) -> &MarinationEngine {
        &self.engine
    }

    /// 解析请求 JSON
    ///
    /// # 返回
    /// - Ok(MarinationRequest)
    /// - Err(ApiError::InvalidInput): 缺字段/非数值/JSON 语法错误
    pub fn parse_request(json: &str) -> ApiResult<MarinationRequest> {
        if json.trim().is_empty() {
            return Err(ApiError::InvalidInput("请求体为空".to_string()));
        }
        Ok(serde_json::from_str(json)?)
    }

    /// 门店是否有历史销售数据
    pub async fn has_sales_data(&self, location_id: &str) -> ApiResult<bool> {
        let location_id = validate_location(location_id)?;
        let totals = self.aggregator.sales_totals(location_id).await?;
        Ok(self.engine.has_sales_data(&totals))
    }

    /// 计算需腌制生鸡量
    #[instrument(skip(self, request))]
    pub async fn calculate(
        &self,
        location_id: &str,
        request: &MarinationRequest,
    ) -> ApiResult<CalculationResponse> {
        let location_id = validate_location(location_id)?;
        let totals = self.aggregator.sales_totals(location_id).await?;

        let (mode, result) = self.engine.calculate(request, &totals);
        let has_sales_data = self.engine.has_sales_data(&totals);

        let warning = if has_sales_data {
            None
        } else {
            tracing::warn!(location_id, "门店无历史销售数据");
            Some(i18n::t_with_args(
                "calculator.no_sales_data",
                &[("location", location_id)],
            ))
        };

        let notice = (mode == CalculationMode::Constrained
            && request.already_marinated().any_positive())
        .then(|| i18n::t("calculator.offset_ignored"));

        tracing::info!(
            location_id,
            mode = %mode,
            total_raw_grams = result.total_raw_grams(),
            "腌制量计算完成"
        );

        Ok(CalculationResponse {
            location_id: location_id.to_string(),
            mode,
            has_sales_data,
            warning,
            notice,
            result,
        })
    }

    /// 日终计算: 已腌制量取自日志簿
    ///
    /// 请求中显式 > 0 的已腌制量优先于日志簿汇总
    #[instrument(skip(self, request))]
    pub async fn calculate_end_of_day(
        &self,
        location_id: &str,
        request: &MarinationRequest,
        date: NaiveDate,
    ) -> ApiResult<CalculationResponse> {
        let location_id = validate_location(location_id)?;
        let log_book = self
            .log_book
            .as_ref()
            .ok_or_else(|| ApiError::InternalError("未配置腌制日志簿".to_string()))?;

        let logged = log_book.already_marinated(location_id, date)?;
        let requested = request.already_marinated();

        let mut merged = AlreadyMarinated::default();
        for marinade in MarinadeType::ALL {
            let kg = if requested.kg(marinade) > 0.0 {
                requested.kg(marinade)
            } else {
                logged.kg(marinade)
            };
            merged.add_kg(marinade, kg);
        }
        tracing::debug!(?logged, ?merged, "日终已腌制量");

        let request = request.clone().with_already_marinated(merged);
        self.calculate(location_id, &request).await
    }

    /// 字符串进、字符串出的完整边界
    pub async fn calculate_json(&self, location_id: &str, json: &str) -> ApiResult<String> {
        let request = Self::parse_request(json)?;
        let response = self.calculate(location_id, &request).await?;
        Ok(serde_json::to_string(&response)?)
    }

    /// 逐类型计算明细
    pub async fn explain(
        &self,
        location_id: &str,
        request: &MarinationRequest,
    ) -> ApiResult<MarinationBreakdown> {
        let location_id = validate_location(location_id)?;
        let totals = self.aggregator.sales_totals(location_id).await?;
        Ok(self.engine.explain(request, &totals))
    }
}

fn validate_location(location_id: &str) -> ApiResult<&str> {
    let trimmed = location_id.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("门店ID不能为空".to_string()));
    }
    Ok(trimmed)
}
