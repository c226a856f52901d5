// ==========================================
// AEO 供应链数据看板 - 查询构建层
// ==========================================

pub mod dates;
pub mod filter;
pub mod sql_builder;
pub mod sql_functions;

pub use filter::{FilterSet, FilterTarget};
pub use sql_builder::{quote_ident, SqlQueryBuilder};
