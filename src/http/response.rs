// ==========================================
// AEO 供应链数据看板 - HTTP 响应整形
// ==========================================
// 成功: {status: "success", execution_time_ms, ...}
// 失败: {status: "error", code, message}
// ==========================================

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::api::ApiError;
use crate::domain::report::Page;

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "请求失败: {}", self);
        } else {
            tracing::warn!(code = self.code(), "请求被拒绝: {}", self);
        }

        HttpResponse::build(status).json(json!({
            "status": "error",
            "code": self.code(),
            "message": self.to_string(),
        }))
    }
}

/// 成功响应体构建器
pub struct Envelope {
    body: Map<String, Value>,
}

impl Envelope {
    pub fn success(execution_time_ms: String) -> Self {
        let mut body = Map::new();
        body.insert("status".to_string(), Value::from("success"));
        body.insert("execution_time_ms".to_string(), Value::from(execution_time_ms));
        Self { body }
    }

    /// 追加字段（序列化失败时写入 null）
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.body.insert(key.to_string(), value);
        self
    }

    /// 追加分页字段: total / skip / limit / hasMore / returned_rows / data
    pub fn page<T: Serialize>(self, page: &Page<T>) -> Self {
        self.field("total", page.total)
            .field("skip", page.skip)
            .field("limit", page.limit)
            .field("hasMore", page.has_more)
            .field("returned_rows", page.data.len())
            .field("data", &page.data)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.body)
    }

    pub fn respond(self) -> HttpResponse {
        HttpResponse::Ok().json(self.into_value())
    }
}

/// 分组计数按端点重命名 label 键
///
/// 例如 supplier_type / raw_material
pub fn relabel<T: Serialize>(items: &[T], label_key: &str) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| match serde_json::to_value(item) {
            Ok(Value::Object(mut map)) => {
                let mut out = Map::new();
                if let Some(label) = map.remove("label") {
                    out.insert(label_key.to_string(), label);
                }
                out.extend(map);
                Some(Value::Object(out))
            }
            _ => None,
        })
        .collect()
}
