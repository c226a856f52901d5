// ==========================================
// AEO 供应链数据看板 - SQLite 标量函数
// ==========================================
// 职责: 把日期猜测逻辑暴露给 SQL，年份过滤与季度分桶留在数据库内完成
// 函数:
// - ship_date(text)    -> 'YYYY-MM-DD' | NULL
// - ship_year(text)    -> 'YYYY' | NULL
// - ship_quarter(text) -> 'YYYY-Qn' | NULL
// ==========================================

use crate::query::dates::{iso_date, parse_flexible_date, quarter_key};
use chrono::{Datelike, NaiveDate};
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// 读取第 0 个参数并尝试解析为日期
fn date_arg(ctx: &Context<'_>) -> Option<NaiveDate> {
    match ctx.get_raw(0) {
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().and_then(parse_flexible_date),
        ValueRef::Integer(i) => parse_flexible_date(&i.to_string()),
        ValueRef::Real(f) => parse_flexible_date(&f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

/// 注册全部标量函数（每个连接一次）
pub fn register_date_functions(conn: &Connection) -> rusqlite::Result<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function("ship_date", 1, flags, |ctx| {
        Ok(date_arg(ctx).map(iso_date))
    })?;

    conn.create_scalar_function("ship_year", 1, flags, |ctx| {
        Ok(date_arg(ctx).map(|d| d.year().to_string()))
    })?;

    conn.create_scalar_function("ship_quarter", 1, flags, |ctx| {
        Ok(date_arg(ctx).map(quarter_key))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_functions_in_sql() {
        let conn = Connection::open_in_memory().unwrap();
        register_date_functions(&conn).unwrap();

        let (d, y, q): (Option<String>, Option<String>, Option<String>) = conn
            .query_row(
                "SELECT ship_date('11-15-25'), ship_year('11-15-25'), ship_quarter('11-15-25')",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(d.as_deref(), Some("2025-11-15"));
        assert_eq!(y.as_deref(), Some("2025"));
        assert_eq!(q.as_deref(), Some("2025-Q4"));

        let bad: Option<String> = conn
            .query_row("SELECT ship_quarter('not a date')", [], |row| row.get(0))
            .unwrap();
        assert!(bad.is_none());

        let null: Option<String> = conn
            .query_row("SELECT ship_year(NULL)", [], |row| row.get(0))
            .unwrap();
        assert!(null.is_none());
    }
}
