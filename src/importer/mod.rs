// ==========================================
// AEO 供应链数据看板 - 数据导入层
// ==========================================
// 流程: 文件解析 → 清洗 → 写入 SQLite 表
// ==========================================

pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod table_loader;

pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, RawTable, TableParser, UniversalFileParser};
pub use table_loader::{load_table, LoadSummary, DEFAULT_TABLE_NAME};
