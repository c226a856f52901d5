// ==========================================
// AEO 供应链数据看板 - 日期解析工具
// ==========================================
// 职责: 发运日期多格式猜测 / 季度分桶 / 展示格式
// 说明: 同一解析器同时注册为 SQLite 标量函数（见 sql_functions）
// ==========================================

use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// 日期格式候选（按优先级）
pub const DATE_FORMATS: &[&str] = &[
    "%m-%d-%y", "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y",
];

/// 日期时间格式候选（Excel 导出常带时间部分）
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"];

/// 展示格式
pub const DISPLAY_FORMAT: &str = "%m/%d/%Y";

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 解析日期（多格式猜测）
///
/// # 返回
/// - Some(date): 任一格式解析成功
/// - None: 空值 / nan / 无法识别
pub fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") || value.eq_ignore_ascii_case("nat") {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// 季度键: "YYYY-Qn"，n = ceil(month / 3)
pub fn quarter_key(date: NaiveDate) -> String {
    let quarter = (date.month() + 2) / 3;
    format!("{}-Q{}", date.year(), quarter)
}

/// ISO 日期（YYYY-MM-DD）
pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 展示日期（MM/DD/YYYY）
pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_FORMAT).to_string()
}

/// 原始值转展示格式；无法解析时原样返回
pub fn display_or_raw(raw: &str) -> String {
    match parse_flexible_date(raw) {
        Some(date) => display_date(date),
        None => raw.trim().to_string(),
    }
}

/// 月份缩写（1~12）
pub fn month_abbr(month: u32) -> &'static str {
    MONTH_ABBR
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_flexible_date_formats() {
        assert_eq!(parse_flexible_date("11-15-25"), Some(ymd(2025, 11, 15)));
        assert_eq!(parse_flexible_date("2025-11-15"), Some(ymd(2025, 11, 15)));
        assert_eq!(parse_flexible_date("11/15/2025"), Some(ymd(2025, 11, 15)));
        assert_eq!(parse_flexible_date("2025/11/15"), Some(ymd(2025, 11, 15)));
        assert_eq!(parse_flexible_date("11-15-2025"), Some(ymd(2025, 11, 15)));
        assert_eq!(parse_flexible_date("2025-11-15 00:00:00"), Some(ymd(2025, 11, 15)));
    }

    #[test]
    fn test_parse_flexible_date_day_first_fallback() {
        // 月份位 > 12 时落到 %d/%m/%Y
        assert_eq!(parse_flexible_date("25/12/2025"), Some(ymd(2025, 12, 25)));
    }

    #[test]
    fn test_parse_flexible_date_invalid() {
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("nan"), None);
        assert_eq!(parse_flexible_date("TBD"), None);
    }

    #[test]
    fn test_quarter_key() {
        assert_eq!(quarter_key(ymd(2025, 11, 15)), "2025-Q4");
        assert_eq!(quarter_key(ymd(2025, 1, 1)), "2025-Q1");
        assert_eq!(quarter_key(ymd(2026, 3, 31)), "2026-Q1");
        assert_eq!(quarter_key(ymd(2026, 4, 1)), "2026-Q2");
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(display_or_raw("11-15-25"), "11/15/2025");
        assert_eq!(display_or_raw("TBD"), "TBD");
        assert_eq!(month_abbr(10), "Oct");
        assert_eq!(month_abbr(13), "");
    }
}
