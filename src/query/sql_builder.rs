// ==========================================
// AEO 供应链数据看板 - SQL 构建工具模块
// ==========================================
// 职责: 动态 SQL 组装（WHERE / GROUP BY / ORDER BY / LIMIT / OFFSET）
// 约束: 标识符只来自已解析 schema 且统一加引号；取值一律参数绑定
// ==========================================

use rusqlite::types::Value;

/// 标识符加双引号（内部双引号转义）
///
/// # 示例
/// ```
/// use aeo_dashboard::query::sql_builder::quote_ident;
///
/// assert_eq!(quote_ident("Target Ship Date"), "\"Target Ship Date\"");
/// assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
/// ```
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 构建 IN 子句的 SQL 片段
///
/// # 参数
/// - `column_sql`: 已加引号的列表达式
/// - `count`: 占位符数量
///
/// # 返回
/// - count = 0: None（空集合表示不过滤）
/// - 否则: `col IN (?, ?, ?)`
///
/// # 示例
/// ```
/// use aeo_dashboard::query::sql_builder::build_in_clause;
///
/// assert_eq!(build_in_clause("\"ESN\"", 2).as_deref(), Some("\"ESN\" IN (?, ?)"));
/// assert_eq!(build_in_clause("\"ESN\"", 0), None);
/// ```
pub fn build_in_clause(column_sql: &str, count: usize) -> Option<String> {
    if count == 0 {
        return None;
    }
    let placeholders = vec!["?"; count].join(", ");
    Some(format!("{} IN ({})", column_sql, placeholders))
}

/// "有值" 条件：非 NULL、非空白、非 nan/NaN
pub fn present_clause(column_sql: &str) -> String {
    format!(
        "{col} IS NOT NULL AND TRIM({col}) <> '' AND TRIM({col}) NOT IN ('nan', 'NaN')",
        col = column_sql
    )
}

/// SQL 查询构建器（流式 API，携带绑定参数）
///
/// # 示例
/// ```
/// use aeo_dashboard::query::sql_builder::SqlQueryBuilder;
///
/// let (sql, params) = SqlQueryBuilder::new("SELECT * FROM \"output\"")
///     .where_clause("\"ESN\" = ?", vec!["ESN-1".to_string().into()])
///     .order_by("rowid")
///     .limit(10)
///     .offset(20)
///     .build();
///
/// assert_eq!(sql, "SELECT * FROM \"output\" WHERE \"ESN\" = ? ORDER BY rowid LIMIT ? OFFSET ?");
/// assert_eq!(params.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    params: Vec<Value>,
    group_by_clause: Option<String>,
    order_by_clause: Option<String>,
    limit_clause: Option<i64>,
    offset_clause: Option<i64>,
}

impl SqlQueryBuilder {
    /// 创建新的 SQL 查询构建器
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by_clause: None,
            order_by_clause: None,
            limit_clause: None,
            offset_clause: None,
        }
    }

    /// 添加 WHERE 条件及其绑定参数
    pub fn where_clause(mut self, condition: &str, params: Vec<Value>) -> Self {
        self.where_clauses.push(condition.to_string());
        self.params.extend(params);
        self
    }

    /// 条件添加 AND 子句
    pub fn and_if(self, condition: Option<(String, Vec<Value>)>) -> Self {
        match condition {
            Some((cond, params)) => self.where_clause(&cond, params),
            None => self,
        }
    }

    /// 批量追加条件（来自 FilterSet 等）
    pub fn extend_where(mut self, conditions: Vec<(String, Vec<Value>)>) -> Self {
        for (cond, params) in conditions {
            self.where_clauses.push(cond);
            self.params.extend(params);
        }
        self
    }

    /// 添加 GROUP BY 子句
    pub fn group_by(mut self, group: &str) -> Self {
        self.group_by_clause = Some(group.to_string());
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// 添加 LIMIT 子句
    pub fn limit(mut self, n: i64) -> Self {
        self.limit_clause = Some(n);
        self
    }

    /// 添加 OFFSET 子句（需配合 LIMIT）
    pub fn offset(mut self, n: i64) -> Self {
        self.offset_clause = Some(n);
        self
    }

    /// 仅构建 WHERE 片段（含前导空格；无条件时为空串）
    pub fn where_sql(&self) -> String {
        if self.where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.where_clauses.join(" AND "))
        }
    }

    /// 构建 COUNT(*) 语句（复用同一 WHERE，忽略 ORDER/LIMIT/OFFSET）
    pub fn build_count(&self, from: &str) -> (String, Vec<Value>) {
        let sql = format!("SELECT COUNT(*) FROM {}{}", from, self.where_sql());
        (sql, self.params.clone())
    }

    /// 构建最终的 SQL 语句与参数
    pub fn build(&self) -> (String, Vec<Value>) {
        let mut sql = self.select_clause.clone();
        let mut params = self.params.clone();

        sql.push_str(&self.where_sql());

        if let Some(group) = &self.group_by_clause {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        match (self.limit_clause, self.offset_clause) {
            (Some(limit), Some(offset)) => {
                sql.push_str(" LIMIT ? OFFSET ?");
                params.push(Value::Integer(limit));
                params.push(Value::Integer(offset));
            }
            (Some(limit), None) => {
                sql.push_str(" LIMIT ?");
                params.push(Value::Integer(limit));
            }
            (None, Some(offset)) => {
                sql.push_str(" LIMIT -1 OFFSET ?");
                params.push(Value::Integer(offset));
            }
            (None, None) => {}
        }

        (sql, params)
    }
}

// ==========================================
// 单元测试
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_builder_basic() {
        let (sql, params) = SqlQueryBuilder::new("SELECT * FROM t").build();
        assert_eq!(sql, "SELECT * FROM t");
        assert!(params.is_empty());
    }

    #[test]
    fn test_sql_builder_group_order() {
        let (sql, params) = SqlQueryBuilder::new("SELECT \"a\", COUNT(*) FROM t")
            .where_clause("\"b\" = ?", vec![Value::Text("Y".into())])
            .group_by("\"a\"")
            .order_by("2 DESC")
            .build();

        assert_eq!(
            sql,
            "SELECT \"a\", COUNT(*) FROM t WHERE \"b\" = ? GROUP BY \"a\" ORDER BY 2 DESC"
        );
        assert_eq!(params, vec![Value::Text("Y".into())]);
    }

    #[test]
    fn test_sql_builder_and_if_none() {
        let (sql, _) = SqlQueryBuilder::new("SELECT * FROM t")
            .and_if(None)
            .build();
        assert_eq!(sql, "SELECT * FROM t");
    }

    #[test]
    fn test_sql_builder_offset_without_limit() {
        let (sql, params) = SqlQueryBuilder::new("SELECT * FROM t").offset(5).build();
        assert_eq!(sql, "SELECT * FROM t LIMIT -1 OFFSET ?");
        assert_eq!(params, vec![Value::Integer(5)]);
    }

    #[test]
    fn test_build_count_ignores_paging() {
        let builder = SqlQueryBuilder::new("SELECT * FROM t")
            .where_clause("\"x\" IN (?, ?)", vec!["a".to_string().into(), "b".to_string().into()])
            .order_by("rowid")
            .limit(10)
            .offset(10);
        let (sql, params) = builder.build_count("t");
        assert_eq!(sql, "SELECT COUNT(*) FROM t WHERE \"x\" IN (?, ?)");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_present_clause() {
        let clause = present_clause("\"ESN\"");
        assert!(clause.contains("\"ESN\" IS NOT NULL"));
        assert!(clause.contains("NOT IN ('nan', 'NaN')"));
    }
}
