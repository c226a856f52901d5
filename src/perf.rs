// ==========================================
// AEO 供应链数据看板 - 性能观测
// ==========================================
// - SQLite profile 回调: 慢 SQL 告警（target = slow_sql）
// - QueryTimer: 操作耗时 + 本线程 SQL 条数（target = perf）
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(200);

thread_local! {
    static SQL_COUNT: Cell<u64> = Cell::new(0);
}

fn one_line(sql: &str, max_chars: usize) -> String {
    let flat: String = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}…", cut)
}

/// 安装慢 SQL 观测
///
/// 环境变量：
/// - `AEO_PERF_SQL=0` 关闭
/// - `AEO_SLOW_SQL_MS=200` 慢 SQL 阈值（毫秒）
pub fn install_sqlite_profiling(conn: &mut Connection) {
    let disabled = std::env::var("AEO_PERF_SQL")
        .map(|v| matches!(v.trim(), "0" | "false" | "off" | "no"))
        .unwrap_or(false);
    if disabled {
        conn.profile(None);
        return;
    }

    if let Some(ms) = std::env::var("AEO_SLOW_SQL_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
    {
        SLOW_SQL_THRESHOLD_MS.store(ms, Ordering::Relaxed);
    }

    conn.profile(Some(on_statement_finished));
}

fn on_statement_finished(sql: &str, duration: Duration) {
    SQL_COUNT.with(|c| c.set(c.get().saturating_add(1)));

    let ms = duration.as_millis() as u64;
    let threshold = SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed);
    if threshold > 0 && ms >= threshold {
        tracing::warn!(
            target: "slow_sql",
            duration_ms = ms,
            sql = %one_line(sql, 400),
            "slow sql"
        );
    }
}

/// 操作计时器
///
/// ```ignore
/// let timer = aeo_dashboard::perf::QueryTimer::new("gap_analysis_all");
/// // do work...
/// let elapsed = timer.elapsed_ms();
/// ```
pub struct QueryTimer {
    op: &'static str,
    start: Instant,
    sql_start: u64,
}

impl QueryTimer {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            sql_start: SQL_COUNT.with(|c| c.get()),
        }
    }

    /// 已耗时（毫秒，保留小数）
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// 响应体使用的耗时字符串（两位小数）
    pub fn elapsed_label(&self) -> String {
        format!("{:.2}", self.elapsed_ms())
    }
}

impl Drop for QueryTimer {
    fn drop(&mut self) {
        let sql_count = SQL_COUNT
            .with(|c| c.get())
            .saturating_sub(self.sql_start);
        tracing::debug!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.elapsed_ms(),
            sql_count,
            "done"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line_truncates() {
        assert_eq!(one_line("SELECT *\n  FROM t", 100), "SELECT * FROM t");
        assert_eq!(one_line("abcdef", 3), "abc…");
    }

    #[test]
    fn test_timer_label_format() {
        let timer = QueryTimer::new("test");
        let label = timer.elapsed_label();
        assert!(label.contains('.'));
        assert_eq!(label.split('.').nth(1).map(str::len), Some(2));
    }
}
