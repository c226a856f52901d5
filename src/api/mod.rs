// ==========================================
// AEO 供应链数据看板 - API 层
// ==========================================
// 职责: 业务 API，供 HTTP handler 调用（同步、可在阻塞线程池执行）
// ==========================================

pub mod demand_api;
pub mod error;
pub mod gap_api;
pub mod report_api;
pub mod supplier_api;
pub mod validator;

// 重导出核心类型
pub use demand_api::DemandApi;
pub use error::{ApiError, ApiResult};
pub use gap_api::{GapApi, GapPage};
pub use report_api::{FieldValues, QueryOutput, ReportApi};
pub use supplier_api::SupplierApi;
pub use validator::PageLimits;
