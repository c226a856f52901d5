// ==========================================
// AEO 供应链数据看板 - 配置层
// ==========================================
// 职责: 服务 / 数据源 / 缓存 / 分页配置，支持环境变量覆写
// ==========================================

pub mod app_config;

pub use app_config::{AppConfig, CacheConfig, ConfigError, DataConfig, PaginationConfig, ServerConfig};
