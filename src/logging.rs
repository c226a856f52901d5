// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别与输出格式
// actix 访问日志（log crate）经 tracing-log 桥接输出
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量（text | json）
pub const ENV_LOG_FORMAT: &str = "AEO_LOG_FORMAT";

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=aeo_dashboard=trace,slow_sql=warn
/// - AEO_LOG_FORMAT: json 时输出结构化 JSON 行
///
/// # 示例
/// ```no_run
/// use aeo_dashboard::logging;
/// logging::init();
/// ```
pub fn init() {
    // 从环境变量读取日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("日志系统初始化失败: {}", e);
    }
}

/// 初始化测试环境的日志系统
///
/// 本 crate 输出 debug，慢 SQL 与 perf 仅保留 warn；可重复调用
pub fn init_test() {
    let filter = EnvFilter::new("aeo_dashboard=debug,slow_sql=warn,perf=warn");
    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
