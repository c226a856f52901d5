// ==========================================
// AEO 供应链数据看板 - 应用层
// ==========================================
// 职责: 数据源选择与共享状态装配
// ==========================================

pub mod state;

// 重导出
pub use state::{AppState, DataSource};
