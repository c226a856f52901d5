// ==========================================
// 导入 → 服务 集成测试
// ==========================================
// 测试目标:
// 1. CSV 解析 + 写入 SQLite 文件 → 只读打开 → 查询
// 2. nan / 空单元格不进入下拉选项
// 3. 表头拼写差异（空格写法）仍能解析
// ==========================================

use aeo_dashboard::config::AppConfig;
use aeo_dashboard::db::open_sqlite_connection;
use aeo_dashboard::importer::{load_table, UniversalFileParser, DEFAULT_TABLE_NAME};
use aeo_dashboard::query::filter::FilterSet;
use aeo_dashboard::{AppState, DataSource};
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, TempDir};

const CSV_LINES: &[&str] = &[
    "ENGINE PROGRAM,Configuration,ESN,Target Ship Date,Part Number,Parent Part Supplier,Have Gap,Priority",
    "LM2500,Standard,ESN-1,2025-11-15,PN-100,Acme,Y,P1",
    "LM2500,nan,ESN-2,2026-01-10,PN-100,Acme,N,",
    "nan,Marine,ESN-3,,PN-200,NaN,Y,P2",
    "LM6000,Standard,ESN-4,12/01/2025,PN-300,Bolt Inc,Y,P4",
    ",,,,,,,",
];

fn write_csv(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("aeo.csv");
    let mut file = std::fs::File::create(&path).expect("无法创建CSV");
    for line in CSV_LINES {
        writeln!(file, "{}", line).expect("写入CSV失败");
    }
    path
}

/// 解析 CSV 并写入 SQLite 文件
fn convert(csv: &Path, db: &Path) -> usize {
    let raw = UniversalFileParser::default().parse(csv).expect("解析失败");
    let mut conn = open_sqlite_connection(&db.to_string_lossy()).expect("无法打开数据库");
    let summary = load_table(&mut conn, DEFAULT_TABLE_NAME, &raw).expect("写入失败");
    summary.rows
}

fn config_for(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.data.db_path = dir.path().join("aeo.db");
    config.data.excel_path = dir.path().join("missing.xlsx");
    config.cache.warm_on_startup = false;
    config
}

#[test]
fn test_csv_转换为数据库后只读服务() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir);
    let config = config_for(&dir);

    // 全空行被跳过
    assert_eq!(convert(&csv, &config.data.db_path), 4);

    let state = AppState::new(&config).expect("初始化失败");
    assert_eq!(
        DataSource::select(&config).unwrap(),
        DataSource::SqliteFile(config.data.db_path.clone())
    );
    assert_eq!(state.table, DEFAULT_TABLE_NAME);
    assert_eq!(state.report_api.row_count().unwrap(), 4);

    // 只读连接拒绝写入
    let _ = state.report_api.run_query("SELECT 1; DELETE FROM output");
    assert_eq!(state.report_api.row_count().unwrap(), 4);
}

#[test]
fn test_下拉选项排除缺失占位() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir);
    let config = config_for(&dir);
    convert(&csv, &config.data.db_path);

    let state = AppState::new(&config).expect("初始化失败");
    let options = state.report_api.filter_options(false).expect("查询失败");

    assert_eq!(options.product_lines, vec!["LM2500", "LM6000"]);
    assert_eq!(options.configs, vec!["Marine", "Standard"]);
    assert_eq!(options.suppliers, vec!["Acme", "Bolt Inc"]);
    assert_eq!(options.years, vec!["2026", "2025"]);
    for value in options.product_lines.iter().chain(options.configs.iter()) {
        assert!(!value.eq_ignore_ascii_case("nan"));
        assert!(!value.is_empty());
    }
}

#[test]
fn test_空格写法表头可解析() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir);
    let config = config_for(&dir);
    convert(&csv, &config.data.db_path);

    let state = AppState::new(&config).expect("初始化失败");
    let values = state
        .report_api
        .field_values("program", false)
        .expect("查询失败");
    assert_eq!(values.column, "ENGINE PROGRAM");

    let gaps = state
        .gap_api
        .gap_analysis(&FilterSet::new(), None, None)
        .expect("查询失败");
    assert_eq!(gaps.page.total, 3);
    assert_eq!(gaps.gap_column.as_deref(), Some("Have Gap"));
}

#[test]
fn test_csv_直接作为数据源() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(&dir);
    let mut config = config_for(&dir);
    config.data.csv_path = Some(csv.clone());
    config.cache.warm_on_startup = true;

    // db 文件不存在时回退到 CSV，数据装入内存库
    let state = AppState::new(&config).expect("初始化失败");
    assert_eq!(state.source, csv.display().to_string());
    assert_eq!(state.report_api.row_count().unwrap(), 4);
    assert!(state.demand_api.chart_cached());
}

#[test]
fn test_不支持的扩展名() {
    let file = Builder::new().suffix(".txt").tempfile().unwrap();
    let result = UniversalFileParser::default().parse(file.path());
    assert!(result.is_err());
}
