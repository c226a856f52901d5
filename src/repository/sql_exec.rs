// ==========================================
// AEO 供应链数据看板 - 查询执行辅助
// ==========================================
// 职责: 绑定参数执行 / 行 → JSON / 行 → 文本元组
// ==========================================

use crate::domain::report::JsonRow;
use crate::importer::data_cleaner::DataCleaner;
use crate::repository::error::RepositoryResult;
use rusqlite::types::{Value, ValueRef};
use rusqlite::{params_from_iter, Connection, Row};
use serde_json::Value as JsonValue;

/// SQLite 值 → JSON 值
pub fn value_ref_to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// SQLite 值 → 可选文本（数值转字符串）
pub fn value_ref_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// 缺失占位（空白 / nan / NaN）→ None
///
/// 只读打开的外部数据库未经导入清洗，读取层级数据时需再次归一
pub fn present_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| DataCleaner.normalize_null(&v))
}

/// 读取整行为文本元组
pub fn row_texts(row: &Row<'_>, width: usize) -> rusqlite::Result<Vec<Option<String>>> {
    (0..width)
        .map(|i| row.get_ref(i).map(value_ref_to_text))
        .collect()
}

/// 执行查询，返回 (列名, JSON 行)
pub fn query_json_rows(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> RepositoryResult<(Vec<String>, Vec<JsonRow>)> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut obj = JsonRow::new();
        for (idx, name) in columns.iter().enumerate() {
            obj.insert(name.clone(), value_ref_to_json(row.get_ref(idx)?));
        }
        out.push(obj);
    }
    Ok((columns, out))
}

/// 执行查询，返回文本元组
pub fn query_text_rows(
    conn: &Connection,
    sql: &str,
    params: &[Value],
) -> RepositoryResult<Vec<Vec<Option<String>>>> {
    let mut stmt = conn.prepare(sql)?;
    let width = stmt.column_count();
    let rows = stmt.query_map(params_from_iter(params.iter()), |row| row_texts(row, width))?;
    let out = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(out)
}

/// 执行单值整数查询
pub fn query_count(conn: &Connection, sql: &str, params: &[Value]) -> RepositoryResult<i64> {
    let n: i64 = conn.query_row(sql, params_from_iter(params.iter()), |row| row.get(0))?;
    Ok(n)
}
