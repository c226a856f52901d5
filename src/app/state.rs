// ==========================================
// AEO 供应链数据看板 - 应用状态
// ==========================================
// 职责: 选择数据源、装载主数据表、解析语义字段，
//       构建共享的 Repository / API / 聚合缓存实例
// 数据源优先级: SQLite 文件 > Excel 工作簿 > CSV
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{DemandApi, GapApi, PageLimits, ReportApi, SupplierApi};
use crate::config::AppConfig;
use crate::db::{
    enable_query_only, find_main_table, open_memory_connection, open_readonly_connection,
    table_columns,
};
use crate::domain::report::ChartPoint;
use crate::engine::aggregate_cache::AggregateCache;
use crate::importer::{load_table, UniversalFileParser, DEFAULT_TABLE_NAME};
use crate::repository::{DemandRepository, ReportRepository};
use crate::schema::ResolvedSchema;

/// 数据源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// 预转换的 SQLite 文件
    SqliteFile(PathBuf),
    /// Excel 工作簿（.xlsx / .xls）
    Workbook(PathBuf),
    /// CSV 文件
    Csv(PathBuf),
}

impl DataSource {
    /// 按配置选择数据源（取第一个存在的文件）
    pub fn select(config: &AppConfig) -> Result<Self, String> {
        let data = &config.data;
        if data.db_path.is_file() {
            return Ok(DataSource::SqliteFile(data.db_path.clone()));
        }
        if data.excel_path.is_file() {
            return Ok(DataSource::Workbook(data.excel_path.clone()));
        }
        if let Some(csv_path) = data.csv_path.as_ref().filter(|p| p.is_file()) {
            return Ok(DataSource::Csv(csv_path.clone()));
        }

        Err(format!(
            "未找到数据源: db_path={}, excel_path={}, csv_path={}",
            data.db_path.display(),
            data.excel_path.display(),
            data.csv_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string())
        ))
    }

    pub fn path(&self) -> &Path {
        match self {
            DataSource::SqliteFile(p) | DataSource::Workbook(p) | DataSource::Csv(p) => p,
        }
    }
}

/// 应用状态
///
/// 持有唯一的共享连接；所有 API 实例共用同一个 ResolvedSchema
pub struct AppState {
    /// 数据源描述
    pub source: String,

    /// 主数据表
    pub table: String,

    pub schema: Arc<ResolvedSchema>,

    pub report_api: Arc<ReportApi>,
    pub gap_api: Arc<GapApi>,
    pub supplier_api: Arc<SupplierApi>,
    pub demand_api: Arc<DemandApi>,
}

impl AppState {
    /// 按配置创建应用状态
    pub fn new(config: &AppConfig) -> Result<Self, String> {
        let source = DataSource::select(config)?;
        tracing::info!(source = ?source, "初始化AppState");

        let conn = match &source {
            DataSource::SqliteFile(path) => {
                open_readonly_connection(&path.to_string_lossy())
                    .map_err(|e| format!("无法打开数据库: {}", e))?
            }
            DataSource::Workbook(path) | DataSource::Csv(path) => {
                load_into_memory(path, &config.data.sheet_name)?
            }
        };

        let state = Self::from_connection(
            conn,
            config.data.table.as_deref(),
            source.path().display().to_string(),
            PageLimits {
                default_limit: config.pagination.default_limit,
                max_limit: config.pagination.max_limit,
            },
        )?;

        if config.cache.warm_on_startup {
            match state.demand_api.chart_data() {
                Ok(points) => tracing::info!(points = points.len(), "图表缓存已预热"),
                Err(e) => tracing::warn!("图表缓存预热失败(将继续启动): {}", e),
            }
        }

        Ok(state)
    }

    /// 从已装载数据的连接创建应用状态
    ///
    /// # 参数
    /// - conn: 已包含主数据表的连接
    /// - preferred_table: 优先使用的表名（不存在时自动选择）
    /// - source: 数据源描述（仅用于日志 / health）
    pub fn from_connection(
        conn: Connection,
        preferred_table: Option<&str>,
        source: String,
        limits: PageLimits,
    ) -> Result<Self, String> {
        let table = find_main_table(&conn, preferred_table)
            .map_err(|e| format!("无法读取表清单: {}", e))?
            .ok_or_else(|| format!("数据源中没有数据表: {}", source))?;
        let columns =
            table_columns(&conn, &table).map_err(|e| format!("无法读取列信息: {}", e))?;

        let schema = Arc::new(ResolvedSchema::resolve(&table, &columns));
        schema.log_resolution();

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let report_repo = Arc::new(ReportRepository::from_connection(
            conn.clone(),
            schema.clone(),
        ));
        let demand_repo = Arc::new(DemandRepository::from_connection(conn, schema.clone()));

        // ==========================================
        // 初始化API层
        // ==========================================
        let chart_cache: Arc<AggregateCache<Vec<ChartPoint>>> =
            Arc::new(AggregateCache::new("demand_chart"));

        let report_api = Arc::new(ReportApi::new(report_repo.clone(), limits));
        let gap_api = Arc::new(GapApi::new(report_repo.clone(), limits));
        let supplier_api = Arc::new(SupplierApi::new(report_repo, limits));
        let demand_api = Arc::new(DemandApi::new(demand_repo, chart_cache, limits));

        tracing::info!(
            table = %table,
            columns = columns.len(),
            "AppState初始化完成"
        );

        Ok(Self {
            source,
            table,
            schema,
            report_api,
            gap_api,
            supplier_api,
            demand_api,
        })
    }
}

/// 解析表格文件并装载到只读内存库
fn load_into_memory(path: &Path, sheet_name: &str) -> Result<Connection, String> {
    let raw = UniversalFileParser::new(sheet_name)
        .parse(path)
        .map_err(|e| format!("无法解析数据文件 {}: {}", path.display(), e))?;

    let mut conn = open_memory_connection().map_err(|e| format!("无法创建内存数据库: {}", e))?;
    let summary = load_table(&mut conn, DEFAULT_TABLE_NAME, &raw)
        .map_err(|e| format!("无法装载数据: {}", e))?;
    tracing::info!(
        file = %path.display(),
        rows = summary.rows,
        columns = summary.columns,
        "数据文件已装载到内存库"
    );

    enable_query_only(&conn).map_err(|e| format!("无法设置只读: {}", e))?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_select_prefers_db_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("data.db");
        let xlsx = dir.path().join("data.xlsx");
        std::fs::write(&db, b"").unwrap();
        std::fs::write(&xlsx, b"").unwrap();

        let mut config = AppConfig::default();
        config.data.db_path = db.clone();
        config.data.excel_path = xlsx;
        assert_eq!(DataSource::select(&config).unwrap(), DataSource::SqliteFile(db));
    }

    #[test]
    fn test_select_falls_back_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("data.csv");
        std::fs::write(&csv, b"a\n1\n").unwrap();

        let mut config = AppConfig::default();
        config.data.db_path = dir.path().join("missing.db");
        config.data.excel_path = dir.path().join("missing.xlsx");
        config.data.csv_path = Some(csv.clone());
        assert_eq!(DataSource::select(&config).unwrap(), DataSource::Csv(csv));
    }

    #[test]
    fn test_select_without_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.data.db_path = dir.path().join("missing.db");
        config.data.excel_path = dir.path().join("missing.xlsx");
        assert!(DataSource::select(&config).is_err());
    }

    #[test]
    fn test_new_from_csv_source() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "ENGINE_PROGRAM,ESN,Have_Gap").unwrap();
        writeln!(file, "LM2500,ESN-1,Y").unwrap();
        writeln!(file, "LM6000,ESN-2,N").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.data.db_path = dir.path().join("missing.db");
        config.data.excel_path = dir.path().join("missing.xlsx");
        config.data.csv_path = Some(file.path().to_path_buf());
        config.cache.warm_on_startup = true;

        let state = AppState::new(&config).unwrap();
        assert_eq!(state.table, DEFAULT_TABLE_NAME);
        assert_eq!(state.report_api.row_count().unwrap(), 2);
        assert!(state.demand_api.chart_cached());
    }
}
