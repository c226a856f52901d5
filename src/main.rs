// ==========================================
// AEO 供应链数据看板 - 服务主入口
// ==========================================
// 流程: 日志 → 配置 → 数据装载 / 语义字段解析 → HTTP 服务
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use aeo_dashboard::app::AppState;
use aeo_dashboard::config::AppConfig;
use aeo_dashboard::http::HttpServer;
use aeo_dashboard::logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("AEO 供应链数据看板");
    tracing::info!("系统版本: {}", aeo_dashboard::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::load().context("加载配置失败")?;
    tracing::info!(
        db_path = %config.data.db_path.display(),
        excel_path = %config.data.excel_path.display(),
        "配置加载完成"
    );

    // 数据装载在阻塞线程池执行
    let state_config = config.clone();
    let app_state = tokio::task::spawn_blocking(move || AppState::new(&state_config))
        .await
        .context("初始化任务异常退出")?
        .map_err(anyhow::Error::msg)
        .context("无法初始化AppState")?;
    tracing::info!("AppState初始化成功");

    HttpServer::new(
        Arc::new(app_state),
        config.server.bind_address(),
        config.server.workers,
    )
    .run()
    .await
    .context("HTTP 服务异常退出")?;

    Ok(())
}
