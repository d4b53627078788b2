// ==========================================
// 腌制计算系统 - 导入层
// ==========================================
// 职责: 历史销售文件 → SalesRecord
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod sales_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::SalesFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, ParsedRow, UniversalFileParser};
pub use sales_importer::{ImportOutcome, RejectedRow, SalesImporter};
