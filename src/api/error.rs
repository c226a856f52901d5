// ==========================================
// AEO 供应链数据看板 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository错误为可读的错误消息
// 分类: 输入校验(4xx) / 配置缺失(422) / 数据访问(5xx)
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入校验错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("未知字段: {0}")]
    UnknownField(String),

    #[error("仅允许 SELECT 查询: {0}")]
    DisallowedStatement(String),

    // ==========================================
    // 配置错误
    // ==========================================
    #[error("缺少列: 语义字段 {field} 未能解析（已尝试: {tried}）")]
    MissingColumn { field: String, tried: String },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::UnknownField(_)
            | ApiError::DisallowedStatement(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::MissingColumn { .. } => 422,
            ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_)
            | ApiError::InternalError(_) => 500,
        }
    }

    /// 机器可读错误码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::UnknownField(_) => "UNKNOWN_FIELD",
            ApiError::DisallowedStatement(_) => "DISALLOWED_STATEMENT",
            ApiError::MissingColumn { .. } => "MISSING_COLUMN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::MissingColumn { field, tried } => {
                ApiError::MissingColumn { field, tried }
            }
            RepositoryError::NoDataTable => ApiError::NotFound("主数据表".to_string()),
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
