// ==========================================
// AEO 供应链数据看板 - 领域模型层
// ==========================================

pub mod demand;
pub mod report;
pub mod types;

pub use demand::{ConfigDemand, DemandProgram, DemandRow, EsnEntry, Level1Part, Level2Part};
pub use report::{
    ChartPoint, ComplexityBreakdown, FilterOptions, GapKpis, GroupedCount, HierarchyNode, JsonRow,
    KpiCard, Page, SupplierDetail, TableStats,
};
pub use types::{PriorityTier, SemanticField};
