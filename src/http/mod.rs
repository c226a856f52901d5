// ==========================================
// AEO 供应链数据看板 - HTTP 服务
// ==========================================
// 职责: actix-web 服务器装配（状态注入 / 访问日志 / 压缩 / CORS / 路由）
// ==========================================

pub mod handlers;
pub mod response;
pub mod routes;

use actix_web::{middleware, web, App, HttpServer as ActixHttpServer};
use std::io;
use std::sync::Arc;

use crate::app::AppState;

/// HTTP 服务器
pub struct HttpServer {
    /// 应用状态
    app_state: Arc<AppState>,

    /// 监听地址
    bind_address: String,

    /// 工作线程数（0 = actix 默认）
    workers: usize,
}

impl HttpServer {
    pub fn new(app_state: Arc<AppState>, bind_address: String, workers: usize) -> Self {
        Self {
            app_state,
            bind_address,
            workers,
        }
    }

    /// 启动 HTTP 服务器
    pub async fn run(self) -> io::Result<()> {
        tracing::info!("HTTP 服务启动: {}", self.bind_address);

        let app_state = self.app_state.clone();

        let mut server = ActixHttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(app_state.clone()))
                // 中间件
                .wrap(middleware::Logger::default())
                .wrap(middleware::Compress::default())
                // CORS 支持
                .wrap(
                    actix_cors::Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header()
                        .max_age(3600),
                )
                .configure(routes::configure)
        });
        if self.workers > 0 {
            server = server.workers(self.workers);
        }

        server.bind(&self.bind_address)?.run().await
    }
}
