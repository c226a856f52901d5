// ==========================================
// AEO 供应链数据看板 - 请求校验器
// ==========================================
// 职责: 分页参数 / 字段名 / 只读 SQL 的入口校验
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::SemanticField;
use crate::schema::ResolvedSchema;

// ==========================================
// 分页
// ==========================================

/// 分页上下限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 1000,
            max_limit: 10_000,
        }
    }
}

/// 校验分页参数
///
/// # 返回
/// - Ok((skip, limit))
/// - Err(InvalidInput): skip < 0 / limit <= 0 / limit 超上限
pub fn validate_page(skip: Option<i64>, limit: Option<i64>, limits: PageLimits) -> ApiResult<(i64, i64)> {
    let skip = skip.unwrap_or(0);
    let limit = limit.unwrap_or(limits.default_limit);

    if skip < 0 {
        return Err(ApiError::InvalidInput(format!("skip 不能为负数: {}", skip)));
    }
    if limit <= 0 {
        return Err(ApiError::InvalidInput(format!("limit 必须为正数: {}", limit)));
    }
    if limit > limits.max_limit {
        return Err(ApiError::InvalidInput(format!(
            "limit 超出上限 {}: {}",
            limits.max_limit, limit
        )));
    }
    Ok((skip, limit))
}

// ==========================================
// 字段名
// ==========================================

/// 解析外部传入的字段名
pub fn validate_field(schema: &ResolvedSchema, name: &str) -> ApiResult<SemanticField> {
    schema
        .lookup_field(name)
        .ok_or_else(|| ApiError::UnknownField(name.to_string()))
}

// ==========================================
// 只读 SQL
// ==========================================

/// 只读 SQL 校验
///
/// 仅检查语句以 SELECT 开头（忽略前导空白，大小写不敏感）。
/// 这是入口提示性校验，不是安全边界；连接本身处于 query_only 模式。
pub fn validate_select(sql: &str) -> ApiResult<&str> {
    let trimmed = sql.trim();
    let is_select = trimmed
        .get(..6)
        .map(|head| head.eq_ignore_ascii_case("select"))
        .unwrap_or(false);

    if !is_select {
        return Err(ApiError::DisallowedStatement(
            "Only SELECT queries allowed".to_string(),
        ));
    }
    Ok(trimmed)
}
