// ==========================================
// AEO 供应链数据看板 - 核心库
// ==========================================
// 技术栈: actix-web + Rust + SQLite
// 系统定位: 只读报表后端（过滤 / 分页 / 聚合 / 层级 / KPI / 图表）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 语义字段与响应模型
pub mod domain;

// 语义字段解析 - 同义词表 → 物理列
pub mod schema;

// 查询构建 - SQL 片段 / 过滤条件 / 日期解析
pub mod query;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 层级构建 / 图表整形 / 聚合缓存
pub mod engine;

// 导入层 - 工作簿与 CSV
pub mod importer;

// 配置层 - 服务配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能计时 / 慢 SQL
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 共享状态装配
pub mod app;

// HTTP 层 - actix-web 服务
pub mod http;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, DemandApi, GapApi, ReportApi, SupplierApi};
pub use app::{AppState, DataSource};
pub use config::AppConfig;
pub use domain::types::{PriorityTier, SemanticField};
pub use query::filter::FilterSet;
pub use schema::ResolvedSchema;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "aeo-dashboard";
