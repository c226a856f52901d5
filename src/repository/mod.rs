// ==========================================
// AEO 供应链数据看板 - 数据仓储层
// ==========================================
// 红线: Repository 只负责数据访问，不做响应整形
// ==========================================

pub mod demand_repo;
pub mod error;
pub mod report_repo;
pub mod sql_exec;

pub use demand_repo::DemandRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use report_repo::{ReportRepository, RowOrder, RowScope};
