// ==========================================
// AEO 供应链数据看板 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls/.xlsb/.ods) / CSV (.csv)
// 输出: RawTable（保持列顺序；单元格统一为文本，缺失为 None）
// ==========================================

use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// 默认工作表名
pub const DEFAULT_SHEET_NAME: &str = "Output";

// ==========================================
// RawTable - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}

/// 文件解析器 trait
pub trait TableParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 按表头宽度对齐一行，清洗后追加（整行缺失则跳过）
fn push_row(table: &mut RawTable, cleaner: &DataCleaner, cells: Vec<String>) {
    let width = table.headers.len();
    let mut row: Vec<Option<String>> = cells
        .iter()
        .take(width)
        .map(|v| cleaner.normalize_null(v))
        .collect();
    row.resize(width, None);

    if cleaner.is_blank_row(&row) {
        return;
    }
    table.rows.push(row);
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl TableParser for CsvParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let cleaner = DataCleaner;
        let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = RawTable {
            headers: cleaner.clean_headers(&raw_headers)?,
            rows: Vec::new(),
        };

        for result in reader.records() {
            let record = result?;
            push_row(&mut table, &cleaner, record.iter().map(str::to_string).collect());
        }

        Ok(table)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    /// 目标工作表；不存在时回退到第一个工作表
    pub sheet_name: String,
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl ExcelParser {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }
}

/// 单元格转文本
///
/// - 整数值浮点去掉 `.0`（件号/数量常被 Excel 存成浮点）
/// - 日期单元格转 ISO 日期
pub fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => ndt.date().format("%Y-%m-%d").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

impl TableParser for ExcelParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !matches!(ext.as_str(), "xlsx" | "xls" | "xlsb" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet = if sheet_names.iter().any(|s| s == &self.sheet_name) {
            self.sheet_name.clone()
        } else {
            let first = sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
            tracing::warn!(
                wanted = %self.sheet_name,
                using = %first,
                "工作表不存在，改用第一个工作表"
            );
            first
        };

        let range = workbook.worksheet_range(&sheet)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;

        let cleaner = DataCleaner;
        let raw_headers: Vec<String> = header_row.iter().map(cell_to_text).collect();
        let mut table = RawTable {
            headers: cleaner.clean_headers(&raw_headers)?,
            rows: Vec::new(),
        };

        for data_row in rows {
            push_row(&mut table, &cleaner, data_row.iter().map(cell_to_text).collect());
        }

        tracing::info!(
            sheet = %sheet,
            rows = table.row_count(),
            columns = table.column_count(),
            "Excel 解析完成"
        );
        Ok(table)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    pub sheet_name: String,
}

impl Default for UniversalFileParser {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl UniversalFileParser {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_table(path),
            "xlsx" | "xls" | "xlsb" | "ods" => ExcelParser::new(self.sheet_name.clone()).parse_table(path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let file = csv_file(&[
            "ENGINE_PROGRAM,Configuration,ESN",
            "LM2500,Standard,ESN-1",
            "LM6000,nan,ESN-2",
        ]);

        let table = CsvParser.parse_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["ENGINE_PROGRAM", "Configuration", "ESN"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0][0].as_deref(), Some("LM2500"));
        assert_eq!(table.rows[1][1], None);
    }

    #[test]
    fn test_csv_parser_skip_empty_rows_and_pad() {
        let file = csv_file(&["A,B,C", "1,2,3", ",,", "4"]);

        let table = CsvParser.parse_table(file.path()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1], vec![Some("4".to_string()), None, None]);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_table(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_universal_parser_rejects_unknown_extension() {
        let file = Builder::new().suffix(".txt").tempfile().unwrap();
        let result = UniversalFileParser::default().parse(file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_cell_to_text() {
        assert_eq!(cell_to_text(&Data::Float(12345.0)), "12345");
        assert_eq!(cell_to_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_text(&Data::String("x".into())), "x");
        assert_eq!(cell_to_text(&Data::Empty), "");
    }
}
