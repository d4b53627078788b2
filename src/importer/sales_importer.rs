// ==========================================
// 腌制计算系统 - 历史销售导入器
// ==========================================
// 流程: 文件解析 → 字段映射 → 行级容错
// 红线: 单行错误不阻断整个导入, 文件级错误直接返回
// ==========================================

use crate::domain::sales::SalesRecord;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::SalesFieldMapper;
use crate::importer::file_parser::{FileParser, UniversalFileParser};
use serde::Serialize;
use std::path::Path;
use tracing::instrument;

/// 被拒绝的行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: String,
}

/// 导入结果
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportOutcome {
    pub records: Vec<SalesRecord>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportOutcome {
    pub fn accepted_count(&self) -> usize {
        self.records.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

// ==========================================
// SalesImporter - 历史销售导入器
// ==========================================
pub struct SalesImporter {
    parser: Box<dyn FileParser>,
    mapper: SalesFieldMapper,
}

impl SalesImporter {
    /// 创建导入器
    ///
    /// # 参数
    /// - default_location: 文件未提供门店列时使用的门店ID
    pub fn new(default_location: Option<String>) -> Self {
        Self {
            parser: Box::new(UniversalFileParser),
            mapper: SalesFieldMapper::new(default_location),
        }
    }

    pub fn with_parser(parser: Box<dyn FileParser>, default_location: Option<String>) -> Self {
        Self {
            parser,
            mapper: SalesFieldMapper::new(default_location),
        }
    }

    /// 导入销售文件
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 成功行 + 被拒绝行
    /// - Err(ImportError): 文件不存在/格式不支持/解析失败
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportOutcome> {
        let rows = self.parser.parse_rows(file_path.as_ref())?;

        let mut outcome = ImportOutcome::default();
        for row in &rows {
            match self.mapper.map_row(row) {
                Ok(record) => outcome.records.push(record),
                Err(e) if e.is_row_level() => {
                    tracing::warn!(row = row.row_number, error = %e, "销售记录被拒绝");
                    outcome.rejected.push(RejectedRow {
                        row: row.row_number,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            accepted = outcome.accepted_count(),
            rejected = outcome.rejected_count(),
            "销售导入完成"
        );
        Ok(outcome)
    }
}
