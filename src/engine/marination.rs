// ==========================================
// 腌制计算系统 - 腌制量计算引擎
// ==========================================
// 红线: 引擎不失败, 任何数值输入都返回非负有限结果
// ==========================================
// 职责: 历史比率 + 在手盘数 → 需腌制生鸡克数
// 输入: InventoryData + ProjectedSales + SalesTotals (+ 限量 / 已腌制量)
// 输出: CalculationResult
// ==========================================

use crate::domain::calculation::{AlreadyMarinated, CalculationResult, MarinationRequest};
use crate::domain::inventory::{InventoryData, ProjectedSales};
use crate::domain::sales::SalesTotals;
use crate::domain::types::{CalculationMode, MarinadeType};
use serde::Serialize;
use tracing::instrument;

/// 每千元销售额
const SALES_UNIT_PER_1000: f64 = 1000.0;

/// kg → g
const GRAMS_PER_KG: f64 = 1000.0;

// ==========================================
// MarinadeProfile - 酱料常量表
// ==========================================
// 出成率与每盘克数为固定领域常量, 不开放配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarinadeProfile {
    pub marinade: MarinadeType,
    pub yield_factor: f64,      // 出成率 (熟重/生重)
    pub grams_per_pan: f64,     // 每盘熟重 (g)
    pub grams_per_portion: f64, // 每份熟重 (g), 历史份数按熟重克计
}

impl MarinadeProfile {
    /// 每盘份数
    pub fn portions_per_pan(&self) -> f64 {
        self.grams_per_pan / self.grams_per_portion
    }
}

/// 酱料常量表（顺序与 MarinadeType::ALL 一致）
pub const MARINADE_PROFILES: [MarinadeProfile; 3] = [
    MarinadeProfile {
        marinade: MarinadeType::Soy,
        yield_factor: 0.73,
        grams_per_pan: 3000.0,
        grams_per_portion: 1.0,
    },
    MarinadeProfile {
        marinade: MarinadeType::Teriyaki,
        yield_factor: 0.88,
        grams_per_pan: 3200.0,
        grams_per_portion: 1.0,
    },
    MarinadeProfile {
        marinade: MarinadeType::Turmeric,
        yield_factor: 0.86,
        grams_per_pan: 1500.0,
        grams_per_portion: 1.0,
    },
];

// ==========================================
// 计算明细（审计/调试用）
// ==========================================

/// 单一酱料的计算明细
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarinadeBreakdown {
    pub marinade: MarinadeType,
    pub ratio: f64,              // 每元销售份数
    pub portions_per_1000: f64,  // 每千元销售份数
    pub projected_portions: f64, // 4天预测份数
    pub pans_needed: f64,        // 需求盘数
    pub pans_on_hand: f64,       // 在手盘数（已钳制）
    pub deficit_pans: f64,       // 缺口盘数
    pub ideal_raw_grams: f64,    // 理想生鸡量 (g)
    pub raw_grams: f64,          // 最终生鸡量 (g)
}

/// 一次计算的完整明细
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarinationBreakdown {
    pub mode: CalculationMode,
    pub has_sales_data: bool,
    pub projected_sales_total: f64,
    pub ideal_total_grams: f64,
    pub available_grams: Option<f64>,
    pub scale_factor: Option<f64>,
    pub items: Vec<MarinadeBreakdown>,
}

impl MarinationBreakdown {
    pub fn result(&self) -> CalculationResult {
        let mut raw = [0.0; 3];
        let mut per_1000 = [0.0; 3];
        for (idx, item) in self.items.iter().enumerate().take(3) {
            raw[idx] = item.raw_grams;
            per_1000[idx] = item.portions_per_1000;
        }
        CalculationResult::from_parts(raw, per_1000)
    }
}

// ==========================================
// MarinationEngine - 腌制量计算引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct MarinationEngine {
    profiles: [MarinadeProfile; 3],
}

impl Default for MarinationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MarinationEngine {
    /// 创建新的腌制量计算引擎
    pub fn new() -> Self {
        Self {
            profiles: MARINADE_PROFILES,
        }
    }

    pub fn profile(&self, marinade: MarinadeType) -> &MarinadeProfile {
        match marinade {
            MarinadeType::Soy => &self.profiles[0],
            MarinadeType::Teriyaki => &self.profiles[1],
            MarinadeType::Turmeric => &self.profiles[2],
        }
    }

    // ==========================================
    // 比率
    // ==========================================

    /// 是否有历史销售数据（total_sales 有限且 > 0）
    ///
    /// 引擎只提供判定, 是否阻断/提示由调用方决定
    pub fn has_sales_data(&self, totals: &SalesTotals) -> bool {
        totals.has_sales_data()
    }

    /// 历史比率: 每元销售额对应份数
    ///
    /// 规则:
    /// - total_sales <= 0 或非有限 → 0（显式零分支, 不依赖 NaN 传播）
    /// - 负份数 → 0
    /// - 极小 total_sales 导致溢出 → 饱和到 f64::MAX
    pub fn ratio(&self, totals: &SalesTotals, marinade: MarinadeType) -> f64 {
        if !self.has_sales_data(totals) {
            return 0.0;
        }
        let portions = finite_or_zero(totals.portions(marinade)).max(0.0);
        saturate(portions / totals.total_sales)
    }

    // ==========================================
    // 标准路径 (不限量)
    // ==========================================

    /// 标准腌制量计算
    ///
    /// 每种酱料:
    /// 1) ratio = 历史份数 / 历史销售额
    /// 2) 预测份数 = ratio × 4天销售额合计（钳制 ≥ 0）
    /// 3) 需求盘数 = 预测份数 / 每盘份数
    /// 4) 缺口盘数 = max(0, 需求盘数 - 在手盘数)
    /// 5) 生鸡克数 = 缺口盘数 × 每盘克数 / 出成率
    #[instrument(skip(self))]
    pub fn calculate_marination(
        &self,
        inventory: &InventoryData,
        projected_sales: &ProjectedSales,
        totals: &SalesTotals,
    ) -> CalculationResult {
        let items = self.ideal_breakdowns(inventory, projected_sales, totals);
        breakdowns_to_result(&items)
    }

    // ==========================================
    // 限量路径 (生鸡总量受限)
    // ==========================================

    /// 限量生鸡分配
    ///
    /// 规则:
    /// - 理想总量 == 0 → 全零（显式零分支）
    /// - 理想总量 <= 可用量 → 原样返回
    /// - 否则按各类型理想量占比等比缩放
    ///
    /// portions_per_1000 始终取不限量比率。
    /// 已腌制量参数与限量分配不组合, 传入 > 0 时仅记录告警。
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self, inventory, projected_sales, totals))]
    pub fn distribute_raw_chicken(
        &self,
        inventory: &InventoryData,
        projected_sales: &ProjectedSales,
        totals: &SalesTotals,
        available_raw_chicken_kg: f64,
        already_marinated_soy: f64,
        already_marinated_teriyaki: f64,
        already_marinated_turmeric: f64,
    ) -> CalculationResult {
        let already = AlreadyMarinated {
            soy_kg: already_marinated_soy,
            teriyaki_kg: already_marinated_teriyaki,
            turmeric_kg: already_marinated_turmeric,
        };
        warn_if_offset_ignored(&already);

        let mut items = self.ideal_breakdowns(inventory, projected_sales, totals);
        let available_grams = available_grams(available_raw_chicken_kg);
        self.apply_scarcity(&mut items, available_grams);
        breakdowns_to_result(&items)
    }

    // ==========================================
    // 日终扣减路径
    // ==========================================

    /// 从标准需求中扣减当日已腌制量
    ///
    /// raw = max(0, 需求克数 - 已腌制kg × 1000); 负的已腌制量视为 0
    pub fn apply_already_marinated(
        &self,
        total_needed: &CalculationResult,
        already: &AlreadyMarinated,
    ) -> CalculationResult {
        let raw = MarinadeType::ALL
            .map(|m| offset_raw_grams(total_needed.raw_grams(m), already.kg(m)));
        CalculationResult::from_parts(raw, total_needed.portions_per_1000_all())
    }

    /// 标准计算 + 日终扣减
    #[instrument(skip(self, inventory, projected_sales, totals))]
    pub fn calculate_with_offset(
        &self,
        inventory: &InventoryData,
        projected_sales: &ProjectedSales,
        totals: &SalesTotals,
        already: &AlreadyMarinated,
    ) -> CalculationResult {
        let total_needed = self.calculate_marination(inventory, projected_sales, totals);
        self.apply_already_marinated(&total_needed, already)
    }

    // ==========================================
    // 统一入口
    // ==========================================

    /// 按请求内容选择计算路径
    ///
    /// 顺序（命中即返回）:
    /// 1) available_raw_chicken_kg 存在 → 限量分配
    /// 2) 任一已腌制量 > 0 → 日终扣减
    /// 3) 标准计算
    #[instrument(skip(self, request, totals))]
    pub fn calculate(
        &self,
        request: &MarinationRequest,
        totals: &SalesTotals,
    ) -> (CalculationMode, CalculationResult) {
        let breakdown = self.explain(request, totals);
        tracing::debug!(
            mode = %breakdown.mode,
            ideal_total_grams = breakdown.ideal_total_grams,
            scale_factor = ?breakdown.scale_factor,
            "腌制量计算完成"
        );
        (breakdown.mode, breakdown.result())
    }

    /// 计算并返回逐类型明细
    pub fn explain(&self, request: &MarinationRequest, totals: &SalesTotals) -> MarinationBreakdown {
        let mut items =
            self.ideal_breakdowns(&request.inventory, &request.projected_sales, totals);
        let ideal_total_grams = ideal_total(&items);

        let already = request.already_marinated();
        let (mode, available, scale_factor) = match request.available_raw_chicken_kg {
            Some(kg) => {
                warn_if_offset_ignored(&already);
                let available = available_grams(kg);
                let scale = self.apply_scarcity(&mut items, available);
                (CalculationMode::Constrained, Some(available), scale)
            }
            None if already.any_positive() => {
                for item in items.iter_mut() {
                    item.raw_grams = offset_raw_grams(item.ideal_raw_grams, already.kg(item.marinade));
                }
                (CalculationMode::EndOfDayOffset, None, None)
            }
            None => (CalculationMode::Standard, None, None),
        };

        MarinationBreakdown {
            mode,
            has_sales_data: self.has_sales_data(totals),
            projected_sales_total: projected_sales_total(&request.projected_sales),
            ideal_total_grams,
            available_grams: available,
            scale_factor,
            items: items.to_vec(),
        }
    }

    // ==========================================
    // 内部方法
    // ==========================================

    fn ideal_breakdowns(
        &self,
        inventory: &InventoryData,
        projected_sales: &ProjectedSales,
        totals: &SalesTotals,
    ) -> [MarinadeBreakdown; 3] {
        let sales_total = projected_sales_total(projected_sales);
        MarinadeType::ALL.map(|m| self.breakdown_for(m, inventory, sales_total, totals))
    }

    fn breakdown_for(
        &self,
        marinade: MarinadeType,
        inventory: &InventoryData,
        sales_total: f64,
        totals: &SalesTotals,
    ) -> MarinadeBreakdown {
        let profile = self.profile(marinade);
        let ratio = self.ratio(totals, marinade);

        let projected_portions = saturate(ratio * sales_total).max(0.0);
        let pans_needed = projected_portions / profile.portions_per_pan();
        let pans_on_hand = finite_or_zero(inventory.pans(marinade)).max(0.0);
        let deficit_pans = (pans_needed - pans_on_hand).max(0.0);
        let ideal_raw_grams =
            saturate(deficit_pans * profile.grams_per_pan / profile.yield_factor);

        MarinadeBreakdown {
            marinade,
            ratio,
            portions_per_1000: saturate(ratio * SALES_UNIT_PER_1000),
            projected_portions,
            pans_needed,
            pans_on_hand,
            deficit_pans,
            ideal_raw_grams,
            raw_grams: ideal_raw_grams,
        }
    }

    /// 按可用量等比缩放, 返回实际使用的缩放系数（未缩放为 None）
    fn apply_scarcity(&self, items: &mut [MarinadeBreakdown; 3], available_grams: f64) -> Option<f64> {
        // 按 1/4 量求和, 三项单项均 <= f64::MAX 时总和不溢出
        let quarter_total: f64 = items.iter().map(|i| i.ideal_raw_grams / 4.0).sum();
        let quarter_available = available_grams / 4.0;

        // 无需求: 跳过缩放（避免除零）
        if quarter_total <= 0.0 {
            for item in items.iter_mut() {
                item.raw_grams = 0.0;
            }
            return None;
        }

        // 生鸡充足
        if quarter_total <= quarter_available {
            return None;
        }

        let scale = quarter_available / quarter_total;
        tracing::info!(
            ideal_total_grams = ideal_total(items),
            available_grams,
            scale,
            "生鸡不足, 按比例分配"
        );
        for item in items.iter_mut() {
            item.raw_grams = item.ideal_raw_grams * scale;
        }
        Some(scale)
    }
}

// ==========================================
// 工具函数
// ==========================================

/// 输入边界: NaN / ±∞ 视为 0
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// 中间结果: 溢出饱和到 ±f64::MAX, NaN 视为 0
fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-f64::MAX, f64::MAX)
    }
}

fn saturating_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(0.0, |acc, v| saturate(acc + v))
}

/// 4 天预测销售额合计（逐日清洗, 负值保留）
fn projected_sales_total(projected_sales: &ProjectedSales) -> f64 {
    saturating_sum(projected_sales.days().map(finite_or_zero))
}

fn available_grams(available_raw_chicken_kg: f64) -> f64 {
    saturate(finite_or_zero(available_raw_chicken_kg).max(0.0) * GRAMS_PER_KG)
}

fn offset_raw_grams(needed_grams: f64, already_kg: f64) -> f64 {
    let already_grams = saturate(finite_or_zero(already_kg).max(0.0) * GRAMS_PER_KG);
    (saturate(needed_grams) - already_grams).max(0.0)
}

fn ideal_total(items: &[MarinadeBreakdown; 3]) -> f64 {
    saturating_sum(items.iter().map(|i| i.ideal_raw_grams))
}

fn warn_if_offset_ignored(already: &AlreadyMarinated) {
    if already.any_positive() {
        tracing::warn!(?already, "限量分配不叠加日终扣减, 已腌制量被忽略");
    }
}

fn breakdowns_to_result(items: &[MarinadeBreakdown; 3]) -> CalculationResult {
    CalculationResult::from_parts(
        items.map(|i| i.raw_grams),
        items.map(|i| i.portions_per_1000),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn totals_soy_only() -> SalesTotals {
        SalesTotals::new(1000.0, 100.0, 0.0, 0.0)
    }

    fn even_sales() -> ProjectedSales {
        ProjectedSales::new(250.0, 250.0, 250.0, 250.0)
    }

    fn mixed_totals() -> SalesTotals {
        SalesTotals::new(10_000.0, 60_000.0, 40_000.0, 20_000.0)
    }

    #[test]
    fn test_profile_table_matches_marinade_order() {
        for (idx, m) in MarinadeType::ALL.iter().enumerate() {
            assert_eq!(MARINADE_PROFILES[idx].marinade, *m);
        }
        let engine = MarinationEngine::new();
        assert_eq!(engine.profile(MarinadeType::Soy).grams_per_pan, 3000.0);
        assert_eq!(engine.profile(MarinadeType::Teriyaki).yield_factor, 0.88);
        assert_eq!(engine.profile(MarinadeType::Turmeric).grams_per_pan, 1500.0);
    }

    #[test]
    fn test_soy_only_full_need() {
        let engine = MarinationEngine::new();
        let result = engine.calculate_marination(
            &InventoryData::default(),
            &even_sales(),
            &totals_soy_only(),
        );

        // ratio 0.1 × 1000 = 100 份 → 100 g 熟重 → 100 / 0.73 g 生重
        assert!((result.portions_per_1000_soy - 100.0).abs() < EPS);
        assert!((result.raw_to_marinate_soy - 100.0 / 0.73).abs() < EPS);
        assert_eq!(result.raw_to_marinate_teriyaki, 0.0);
        assert_eq!(result.raw_to_marinate_turmeric, 0.0);
    }

    #[test]
    fn test_zero_sales_yields_zero() {
        let engine = MarinationEngine::new();
        let totals = SalesTotals::new(0.0, 100.0, 50.0, 10.0);
        let result = engine.calculate_marination(&InventoryData::default(), &even_sales(), &totals);

        assert_eq!(result, CalculationResult::default());
        assert!(!engine.has_sales_data(&totals));
    }

    #[test]
    fn test_nan_inputs_never_leak() {
        let engine = MarinationEngine::new();
        let totals = SalesTotals::new(f64::NAN, f64::INFINITY, 1.0, 1.0);
        let inventory = InventoryData::new(f64::NAN, -1.0, f64::NEG_INFINITY);
        let sales = ProjectedSales::new(f64::INFINITY, 10.0, 10.0, 10.0);

        let result = engine.calculate_marination(&inventory, &sales, &totals);
        for v in result.raw_grams_all().iter().chain(result.portions_per_1000_all().iter()) {
            assert!(v.is_finite());
            assert!(*v >= 0.0);
        }
    }

    #[test]
    fn test_explain_standard_breakdown() {
        let engine = MarinationEngine::new();
        let request = MarinationRequest::new(InventoryData::new(0.0, 1.0, 0.0), even_sales());
        let breakdown = engine.explain(&request, &mixed_totals());

        assert_eq!(breakdown.mode, CalculationMode::Standard);
        assert_eq!(breakdown.items.len(), 3);
        let teriyaki = &breakdown.items[1];
        // ratio 4 × 1000 = 4000 份 → 1.25 盘, 在手 1 盘 → 缺口 0.25 盘
        assert!((teriyaki.pans_needed - 1.25).abs() < EPS);
        assert!((teriyaki.deficit_pans - 0.25).abs() < EPS);
        assert_eq!(breakdown.result(), engine.calculate_marination(
            &request.inventory,
            &request.projected_sales,
            &mixed_totals(),
        ));
    }

    #[test]
    fn test_scarcity_zero_available() {
        let engine = MarinationEngine::new();
        let result = engine.distribute_raw_chicken(
            &InventoryData::default(),
            &even_sales(),
            &mixed_totals(),
            0.0,
            0.0,
            0.0,
            0.0,
        );
        assert_eq!(result.total_raw_grams(), 0.0);
        assert!((result.portions_per_1000_soy - 6000.0).abs() < EPS);
    }

    #[test]
    fn test_scarcity_negative_available_treated_as_zero() {
        let engine = MarinationEngine::new();
        let result = engine.distribute_raw_chicken(
            &InventoryData::default(),
            &even_sales(),
            &mixed_totals(),
            -5.0,
            0.0,
            0.0,
            0.0,
        );
        assert_eq!(result.total_raw_grams(), 0.0);
    }

    #[test]
    fn test_calculate_dispatch() {
        let engine = MarinationEngine::new();
        let base = MarinationRequest::new(InventoryData::default(), even_sales());

        let (mode, _) = engine.calculate(&base, &mixed_totals());
        assert_eq!(mode, CalculationMode::Standard);

        let constrained = base.clone().with_available_raw_chicken_kg(1.0);
        let (mode, result) = engine.calculate(&constrained, &mixed_totals());
        assert_eq!(mode, CalculationMode::Constrained);
        assert!(result.total_raw_grams() <= 1000.0 + EPS);

        let offset = base.with_already_marinated(AlreadyMarinated {
            soy_kg: 1.0,
            teriyaki_kg: 0.0,
            turmeric_kg: 0.0,
        });
        let (mode, _) = engine.calculate(&offset, &mixed_totals());
        assert_eq!(mode, CalculationMode::EndOfDayOffset);
    }

    #[test]
    fn test_constrained_ignores_offset() {
        let engine = MarinationEngine::new();
        let request = MarinationRequest::new(InventoryData::default(), even_sales())
            .with_available_raw_chicken_kg(1_000_000.0)
            .with_already_marinated(AlreadyMarinated {
                soy_kg: 1_000.0,
                teriyaki_kg: 1_000.0,
                turmeric_kg: 1_000.0,
            });

        let (mode, result) = engine.calculate(&request, &mixed_totals());
        let standard = engine.calculate_marination(
            &request.inventory,
            &request.projected_sales,
            &mixed_totals(),
        );
        assert_eq!(mode, CalculationMode::Constrained);
        assert_eq!(result, standard);
    }

    #[test]
    fn test_has_sales_data_matches_domain_predicate() {
        let engine = MarinationEngine::new();
        for total in [f64::INFINITY, f64::NAN, -1.0, 0.0, 1e-310, 1000.0] {
            let totals = SalesTotals::new(total, 1.0, 0.0, 0.0);
            assert_eq!(engine.has_sales_data(&totals), totals.has_sales_data());
        }
    }

    #[test]
    fn test_saturate_keeps_order() {
        assert_eq!(saturate(f64::INFINITY), f64::MAX);
        assert_eq!(saturate(f64::NEG_INFINITY), -f64::MAX);
        assert_eq!(saturate(f64::NAN), 0.0);
        assert_eq!(saturate(12.5), 12.5);
        assert_eq!(saturating_sum([f64::MAX, f64::MAX, -1.0]), f64::MAX);
        assert_eq!(
            projected_sales_total(&ProjectedSales::new(f64::NAN, 1.0, 2.0, 3.0)),
            6.0
        );
    }

    #[test]
    fn test_distribute_ignores_offset_arguments() {
        let engine = MarinationEngine::new();
        let with_offset = engine.distribute_raw_chicken(
            &InventoryData::default(),
            &even_sales(),
            &mixed_totals(),
            1.0,
            5.0,
            5.0,
            5.0,
        );
        let without_offset = engine.distribute_raw_chicken(
            &InventoryData::default(),
            &even_sales(),
            &mixed_totals(),
            1.0,
            0.0,
            0.0,
            0.0,
        );
        assert_eq!(with_offset, without_offset);
    }
}
