// ==========================================
// AEO 供应链数据看板 - 列名解析层
// ==========================================

pub mod resolver;
pub mod synonyms;

pub use resolver::ResolvedSchema;
pub use synonyms::{normalize_column_name, synonyms_of, SYNONYM_TABLE};
