// ==========================================
// 腌制计算系统 - 命令行主入口
// ==========================================
// 流程: 加载配置 → 初始化日志 → 导入历史销售 → 计算 → stdout 输出 JSON
// 约束: 日志写 stderr, stdout 只输出结果
// ==========================================

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use marination_calc::config::{AppConfig, ConfigManager};
use marination_calc::i18n;
use marination_calc::importer::SalesImporter;
use marination_calc::{
    logging, CalculationMode, InMemorySalesAggregator, MarinationApi, SalesAggregator,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "marination-calc", version, about = "门店每日腌制量计算")]
struct Cli {
    /// 日志级别（覆盖配置文件, RUST_LOG 优先）
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 以 JSON 行输出日志
    #[arg(long, global = true)]
    json_logs: bool,

    /// 配置文件路径
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 计算需腌制生鸡量
    Calculate {
        /// 请求 JSON 文件
        #[arg(long)]
        request: PathBuf,

        /// 历史销售文件（CSV / Excel）
        #[arg(long)]
        sales: PathBuf,

        #[arg(long)]
        location: Option<String>,

        /// 同时输出逐类型计算明细
        #[arg(long)]
        explain: bool,
    },

    /// 输出门店历史销售汇总
    Totals {
        #[arg(long)]
        sales: PathBuf,

        #[arg(long)]
        location: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let manager = ConfigManager::load(cli.config.as_deref()).context("加载配置失败")?;
    let config = manager.config().clone();

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    logging::init_with(level, cli.json_logs);
    i18n::set_locale(&config.locale);

    tracing::info!(
        version = marination_calc::VERSION,
        config_source = ?manager.source(),
        "{}",
        marination_calc::APP_NAME
    );

    match cli.command {
        Command::Calculate {
            request,
            sales,
            location,
            explain,
        } => run_calculate(&config, &request, &sales, location, explain).await,
        Command::Totals { sales, location } => run_totals(&config, &sales, location).await,
    }
}

async fn run_calculate(
    config: &AppConfig,
    request_path: &Path,
    sales_path: &Path,
    location: Option<String>,
    explain: bool,
) -> Result<()> {
    let location_id = resolve_location(config, location)?;
    let aggregator = load_sales(config, sales_path, &location_id)?;

    let body = std::fs::read_to_string(request_path)
        .with_context(|| format!("读取请求文件失败: {}", request_path.display()))?;
    let request = MarinationApi::parse_request(&body)?;

    let api = MarinationApi::new(aggregator, None);
    let response = api.calculate(&location_id, &request).await?;
    tracing::info!(mode = %mode_label(response.mode), "计算路径");

    if explain {
        let breakdown = api.explain(&location_id, &request).await?;
        let output = serde_json::json!({
            "response": response,
            "breakdown": breakdown,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

async fn run_totals(config: &AppConfig, sales_path: &Path, location: Option<String>) -> Result<()> {
    let location_id = resolve_location(config, location)?;
    let aggregator = load_sales(config, sales_path, &location_id)?;

    let totals = aggregator.sales_totals(&location_id).await?;
    if !totals.has_sales_data() {
        tracing::warn!(
            "{}",
            i18n::t_with_args("calculator.no_sales_data", &[("location", &location_id)])
        );
    }
    println!("{}", serde_json::to_string_pretty(&totals)?);
    Ok(())
}

fn resolve_location(config: &AppConfig, location: Option<String>) -> Result<String> {
    match location
        .or_else(|| config.default_location_id.clone())
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
    {
        Some(location_id) => Ok(location_id),
        None => bail!("未指定门店: 请使用 --location 或在配置中设置 default_location_id"),
    }
}

fn load_sales(
    config: &AppConfig,
    sales_path: &Path,
    location_id: &str,
) -> Result<Arc<InMemorySalesAggregator>> {
    let importer = SalesImporter::new(Some(location_id.to_string()));
    let outcome = importer
        .import_file(sales_path)
        .with_context(|| format!("导入销售文件失败: {}", sales_path.display()))?;

    for rejected in &outcome.rejected {
        tracing::warn!(row = rejected.row, reason = %rejected.reason, "跳过销售记录");
    }
    tracing::info!(
        "{}",
        i18n::t_with_args(
            "import.summary",
            &[
                ("accepted", &outcome.accepted_count().to_string()),
                ("rejected", &outcome.rejected_count().to_string()),
            ],
        )
    );

    let mut aggregator = InMemorySalesAggregator::with_records(outcome.records);
    if let Some(days) = config.history_window_days {
        aggregator = aggregator.with_history_window(days, None);
    }
    Ok(Arc::new(aggregator))
}

fn mode_label(mode: CalculationMode) -> String {
    match mode {
        CalculationMode::Standard => i18n::t("calculator.mode_standard"),
        CalculationMode::Constrained => i18n::t("calculator.mode_constrained"),
        CalculationMode::EndOfDayOffset => i18n::t("calculator.mode_end_of_day"),
    }
}
