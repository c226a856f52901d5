// ==========================================
// AEO 供应链数据看板 - 数据表加载器
// ==========================================
// 职责: RawTable → SQLite 表（全部列为 TEXT，行序即 rowid）
// 说明: 目标表若已存在则整表重建
// ==========================================

use crate::importer::error::ImportResult;
use crate::importer::file_parser::RawTable;
use crate::query::sql_builder::quote_ident;
use rusqlite::{params_from_iter, Connection};

/// 默认目标表名
pub const DEFAULT_TABLE_NAME: &str = "output";

/// 加载结果摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
}

/// 写入数据表
///
/// # 参数
/// - conn: 可写连接
/// - table_name: 目标表名
/// - table: 解析结果
///
/// # 返回
/// - Ok(LoadSummary): 写入行数 / 列数
pub fn load_table(conn: &mut Connection, table_name: &str, table: &RawTable) -> ImportResult<LoadSummary> {
    let quoted_table = quote_ident(table_name);
    let column_defs = table
        .headers
        .iter()
        .map(|h| format!("{} TEXT", quote_ident(h)))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; table.headers.len()].join(", ");

    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {t}; CREATE TABLE {t} ({cols});",
        t = quoted_table,
        cols = column_defs
    ))?;

    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} VALUES ({})",
            quoted_table, placeholders
        ))?;
        for row in &table.rows {
            stmt.execute(params_from_iter(row.iter()))?;
        }
    }
    tx.commit()?;

    tracing::info!(
        table = table_name,
        rows = table.rows.len(),
        columns = table.headers.len(),
        "数据表加载完成"
    );

    Ok(LoadSummary {
        table: table_name.to_string(),
        rows: table.rows.len(),
        columns: table.headers.len(),
    })
}
