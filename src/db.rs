// ==========================================
// AEO 供应链数据看板 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一连接配置（busy_timeout / 日期函数 / 慢 SQL 观测）
// - 主数据表发现（Output > output > Sheet1 > 第一张表）
// - 加载完成后切换为只读（PRAGMA query_only）
// ==========================================

use crate::perf::install_sqlite_profiling;
use crate::query::sql_builder::quote_ident;
use crate::query::sql_functions::register_date_functions;
use rusqlite::{Connection, OpenFlags};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 主数据表候选名（按优先级）
pub const MAIN_TABLE_CANDIDATES: &[&str] = &["Output", "output", "Sheet1"];

/// 配置 SQLite 连接
pub fn configure_sqlite_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    register_date_functions(conn)?;
    install_sqlite_profiling(conn);
    Ok(())
}

/// 以只读方式打开已转换的数据库文件
pub fn open_readonly_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
    )?;
    configure_sqlite_connection(&mut conn)?;
    Ok(conn)
}

/// 打开读写连接（转换工具使用）
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&mut conn)?;
    Ok(conn)
}

/// 打开内存数据库（表格文件直接加载时使用）
pub fn open_memory_connection() -> rusqlite::Result<Connection> {
    let mut conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&mut conn)?;
    Ok(conn)
}

/// 切换为只读（加载完成后调用）
pub fn enable_query_only(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA query_only = ON;")
}

/// 列出全部用户表（按创建顺序）
pub fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}

/// 选择主数据表
///
/// # 参数
/// - preferred: 配置指定的表名（存在时优先）
///
/// # 返回
/// - Some(name): 选中的表
/// - None: 库中无表
pub fn find_main_table(conn: &Connection, preferred: Option<&str>) -> rusqlite::Result<Option<String>> {
    let tables = list_tables(conn)?;

    if let Some(name) = preferred {
        if tables.iter().any(|t| t == name) {
            return Ok(Some(name.to_string()));
        }
        tracing::warn!(table = name, "配置的数据表不存在，改为自动选择");
    }

    for candidate in MAIN_TABLE_CANDIDATES {
        if tables.iter().any(|t| t == candidate) {
            return Ok(Some(candidate.to_string()));
        }
    }

    Ok(tables.into_iter().next())
}

/// 读取表的列名（按定义顺序）
pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let sql = format!("PRAGMA table_info({})", quote_ident(table));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_main_table_preference() {
        let conn = open_memory_connection().unwrap();
        conn.execute_batch(
            "CREATE TABLE misc (a TEXT); CREATE TABLE Sheet1 (a TEXT); CREATE TABLE output (a TEXT);",
        )
        .unwrap();

        assert_eq!(find_main_table(&conn, None).unwrap().as_deref(), Some("output"));
        assert_eq!(find_main_table(&conn, Some("misc")).unwrap().as_deref(), Some("misc"));
        assert_eq!(find_main_table(&conn, Some("nope")).unwrap().as_deref(), Some("output"));
    }

    #[test]
    fn test_find_main_table_falls_back_to_first() {
        let conn = open_memory_connection().unwrap();
        conn.execute_batch("CREATE TABLE zeta (a TEXT); CREATE TABLE alpha (a TEXT);")
            .unwrap();
        assert_eq!(find_main_table(&conn, None).unwrap().as_deref(), Some("zeta"));
    }

    #[test]
    fn test_table_columns_and_query_only() {
        let conn = open_memory_connection().unwrap();
        conn.execute_batch("CREATE TABLE output (\"ENGINE PROGRAM\" TEXT, \"ESN\" TEXT);")
            .unwrap();
        assert_eq!(
            table_columns(&conn, "output").unwrap(),
            vec!["ENGINE PROGRAM".to_string(), "ESN".to_string()]
        );

        enable_query_only(&conn).unwrap();
        assert!(conn.execute("INSERT INTO output VALUES ('a', 'b')", []).is_err());
    }
}
