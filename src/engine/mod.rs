// ==========================================
// AEO 供应链数据看板 - 引擎层
// ==========================================
// 职责: 纯内存整形（层级 / 图表）与聚合缓存，不访问数据库
// ==========================================

pub mod aggregate_cache;
pub mod chart;
pub mod hierarchy;

pub use aggregate_cache::AggregateCache;
pub use chart::build_chart_points;
pub use hierarchy::{build_demand_hierarchy, build_tree};
