// ==========================================
// 腌制计算系统 - 销售字段映射器
// ==========================================
// 职责: 源字段 → SalesRecord 映射 + 类型转换
// 列名: 英文/中文别名, 不区分大小写
// ==========================================

use crate::domain::sales::SalesRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::ParsedRow;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

// 标准字段名
pub const FIELD_LOCATION: &str = "location_id";
pub const FIELD_DATE: &str = "sale_date";
pub const FIELD_TOTAL_SALES: &str = "total_sales";
pub const FIELD_PORTIONS_SOY: &str = "portions_soy";
pub const FIELD_PORTIONS_TERIYAKI: &str = "portions_teriyaki";
pub const FIELD_PORTIONS_TURMERIC: &str = "portions_turmeric";

/// 标准字段 → 可接受的列名
fn aliases(field: &str) -> &'static [&'static str] {
    match field {
        FIELD_LOCATION => &["location_id", "location", "locationid", "门店", "门店id"],
        FIELD_DATE => &["sale_date", "date", "saledate", "日期", "销售日期"],
        FIELD_TOTAL_SALES => &["total_sales", "sales", "totalsales", "销售额", "营业额"],
        FIELD_PORTIONS_SOY => &["portions_soy", "soy", "portionssoy", "酱油份数", "酱油"],
        FIELD_PORTIONS_TERIYAKI => &[
            "portions_teriyaki",
            "teriyaki",
            "portionsteriyaki",
            "照烧份数",
            "照烧",
        ],
        FIELD_PORTIONS_TURMERIC => &[
            "portions_turmeric",
            "turmeric",
            "portionsturmeric",
            "姜黄份数",
            "姜黄",
        ],
        _ => &[],
    }
}

pub struct SalesFieldMapper {
    default_location: Option<String>,
}

impl SalesFieldMapper {
    pub fn new(default_location: Option<String>) -> Self {
        Self { default_location }
    }

    /// 映射单行为 SalesRecord
    ///
    /// 必填: 日期、销售额; 门店缺失时取默认门店; 份数缺失按 0
    pub fn map_row(&self, row: &ParsedRow) -> ImportResult<SalesRecord> {
        let fields = normalize(&row.fields);
        let row_number = row.row_number;

        let location_id = match get_string(&fields, FIELD_LOCATION) {
            Some(v) => v,
            None => self
                .default_location
                .clone()
                .ok_or_else(|| ImportError::MissingField {
                    row: row_number,
                    field: FIELD_LOCATION.to_string(),
                })?,
        };

        let sale_date = parse_date(&fields, FIELD_DATE, row_number)?;
        let total_sales = parse_amount(&fields, FIELD_TOTAL_SALES, row_number)?.ok_or_else(|| {
            ImportError::MissingField {
                row: row_number,
                field: FIELD_TOTAL_SALES.to_string(),
            }
        })?;

        Ok(SalesRecord {
            location_id,
            sale_date,
            total_sales,
            portions_soy: parse_amount(&fields, FIELD_PORTIONS_SOY, row_number)?.unwrap_or(0.0),
            portions_teriyaki: parse_amount(&fields, FIELD_PORTIONS_TERIYAKI, row_number)?
                .unwrap_or(0.0),
            portions_turmeric: parse_amount(&fields, FIELD_PORTIONS_TURMERIC, row_number)?
                .unwrap_or(0.0),
        })
    }
}

/// 列名统一小写、去空白
fn normalize(fields: &HashMap<String, String>) -> HashMap<String, String> {
    fields
        .iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v.clone()))
        .collect()
}

fn get_string(fields: &HashMap<String, String>, field: &str) -> Option<String> {
    for alias in aliases(field) {
        if let Some(v) = fields.get(*alias) {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// 解析非负数值（允许千分位逗号）
fn parse_amount(
    fields: &HashMap<String, String>,
    field: &str,
    row_number: usize,
) -> ImportResult<Option<f64>> {
    let raw = match get_string(fields, field) {
        Some(v) => v,
        None => return Ok(None),
    };

    let value = raw
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ImportError::TypeConversionError {
            row: row_number,
            field: field.to_string(),
            message: format!("无法解析为数值: {}", raw),
        })?;

    if value < 0.0 {
        return Err(ImportError::NegativeValue {
            row: row_number,
            field: field.to_string(),
            value,
        });
    }
    Ok(Some(value))
}

/// 解析日期: YYYY-MM-DD / YYYYMMDD / YYYY/MM/DD / Excel 序列号
fn parse_date(
    fields: &HashMap<String, String>,
    field: &str,
    row_number: usize,
) -> ImportResult<NaiveDate> {
    let value = get_string(fields, field).ok_or_else(|| ImportError::MissingField {
        row: row_number,
        field: field.to_string(),
    })?;

    // 取日期部分（Excel 可能带时间）
    let date_part = value.split_whitespace().next().unwrap_or(&value);

    for format in ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Ok(date);
        }
    }

    if let Some(date) = excel_serial_date(date_part) {
        return Ok(date);
    }

    Err(ImportError::DateFormatError {
        row: row_number,
        field: field.to_string(),
        value,
    })
}

/// Excel 日期序列号（1900 日期系统, 基准 1899-12-30）
fn excel_serial_date(value: &str) -> Option<NaiveDate> {
    let serial = value.parse::<f64>().ok()?;
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.trunc() as i64))
}
