// ==========================================
// AEO 供应链数据看板 - 报表数据仓储
// ==========================================
// 职责: 主数据表上的只读查询（去重列表 / 过滤分页 / 分组计数 / 季度需求）
// 约束: 标识符来自 ResolvedSchema 并统一加引号；取值参数绑定
// 降级: 语义字段未解析时，列表与聚合返回空结果
// ==========================================

use crate::domain::report::{GroupedCount, JsonRow, TableStats};
use crate::domain::types::{PriorityTier, SemanticField};
use crate::query::filter::FilterSet;
use crate::query::sql_builder::{present_clause, quote_ident, SqlQueryBuilder};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_exec::{present_text, query_count, query_json_rows, query_text_rows};
use crate::schema::ResolvedSchema;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 行范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    /// 全部行
    All,
    /// 仅缺口行（缺口列 = Y）；缺口列未解析时等同 All
    GapOnly,
}

/// 行排序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// 原始行序（rowid）
    Insertion,
    /// 优先级（P1 在前），同级按原始行序
    Priority,
}

/// 过滤条件（WHERE 片段 + 参数）
type Condition = (String, Vec<Value>);

// ==========================================
// ReportRepository - 报表仓储
// ==========================================
pub struct ReportRepository {
    conn: Arc<Mutex<Connection>>,
    schema: Arc<ResolvedSchema>,
}

impl ReportRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>, schema: Arc<ResolvedSchema>) -> Self {
        Self { conn, schema }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn schema(&self) -> &ResolvedSchema {
        &self.schema
    }

    fn table_sql(&self) -> String {
        quote_ident(self.schema.table())
    }

    fn column_sql(&self, field: SemanticField) -> Option<String> {
        self.schema.column(field).map(quote_ident)
    }

    /// 缺口条件（缺口列未解析时为 None）
    pub fn gap_condition(&self) -> Option<Condition> {
        self.column_sql(SemanticField::HaveGap)
            .map(|col| (format!("UPPER(TRIM({})) = 'Y'", col), Vec::new()))
    }

    /// 优先级排序表达式（优先级列未解析时为 None）
    pub fn priority_rank_sql(&self) -> Option<String> {
        self.column_sql(SemanticField::Priority).map(|col| {
            let mut sql = format!("CASE UPPER(TRIM({}))", col);
            for tier in [PriorityTier::P1, PriorityTier::P2, PriorityTier::P3, PriorityTier::P4] {
                for spelling in tier.spellings() {
                    sql.push_str(&format!(" WHEN '{}' THEN {}", spelling, tier.rank()));
                }
            }
            sql.push_str(&format!(" ELSE {} END", PriorityTier::Unranked.rank()));
            sql
        })
    }

    /// 汇总过滤条件：请求过滤 + 行范围
    fn conditions(&self, filters: &FilterSet, scope: RowScope) -> RepositoryResult<Vec<Condition>> {
        let mut conds = filters.to_conditions(&self.schema)?;
        if scope == RowScope::GapOnly {
            if let Some(gap) = self.gap_condition() {
                conds.push(gap);
            }
        }
        Ok(conds)
    }

    // ==========================================
    // 去重列表
    // ==========================================

    /// 某字段的去重取值（升序；排除空值 / nan）
    ///
    /// # 返回
    /// - 字段未解析: 空列表
    pub fn list_unique(&self, field: SemanticField, scope: RowScope) -> RepositoryResult<Vec<String>> {
        let col = match self.column_sql(field) {
            Some(col) => col,
            None => return Ok(Vec::new()),
        };

        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT DISTINCT {col} FROM {t}",
            col = col,
            t = self.table_sql()
        ))
        .where_clause(&present_clause(&col), Vec::new())
        .extend_where(self.conditions(&FilterSet::new(), scope)?)
        .order_by(&format!("{} ASC", col))
        .build();

        let conn = self.get_conn()?;
        let rows = query_text_rows(&conn, &sql, &params)?;
        Ok(rows.into_iter().filter_map(|r| r.into_iter().next().flatten()).collect())
    }

    /// 发运年份去重列表（降序）
    pub fn list_years(&self, scope: RowScope) -> RepositoryResult<Vec<String>> {
        let col = match self.column_sql(SemanticField::TargetShipDate) {
            Some(col) => col,
            None => return Ok(Vec::new()),
        };

        let expr = format!("ship_year({})", col);
        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT DISTINCT {e} AS y FROM {t}",
            e = expr,
            t = self.table_sql()
        ))
        .where_clause(&format!("{} IS NOT NULL", expr), Vec::new())
        .extend_where(self.conditions(&FilterSet::new(), scope)?)
        .order_by("y DESC")
        .build();

        let conn = self.get_conn()?;
        let rows = query_text_rows(&conn, &sql, &params)?;
        Ok(rows.into_iter().filter_map(|r| r.into_iter().next().flatten()).collect())
    }

    // ==========================================
    // 过滤 + 分页
    // ==========================================

    /// 过滤行（分页）
    ///
    /// # 参数
    /// - filters: 请求过滤
    /// - scope: 行范围
    /// - order: 排序方式
    /// - offset / limit: 分页（limit = None 表示不限）
    ///
    /// # 返回
    /// - (当前页行, 与分页无关的总数)
    pub fn filter_rows(
        &self,
        filters: &FilterSet,
        scope: RowScope,
        order: RowOrder,
        offset: i64,
        limit: Option<i64>,
    ) -> RepositoryResult<(Vec<JsonRow>, i64)> {
        let table = self.table_sql();
        let order_sql = match (order, self.priority_rank_sql()) {
            (RowOrder::Priority, Some(rank)) => format!("{}, rowid", rank),
            _ => "rowid".to_string(),
        };

        let mut builder = SqlQueryBuilder::new(&format!("SELECT * FROM {}", table))
            .extend_where(self.conditions(filters, scope)?)
            .order_by(&order_sql)
            .offset(offset);
        if let Some(limit) = limit {
            builder = builder.limit(limit);
        }

        let (count_sql, count_params) = builder.build_count(&table);
        let (sql, params) = builder.build();

        let conn = self.get_conn()?;
        let total = query_count(&conn, &count_sql, &count_params)?;
        let (_, rows) = query_json_rows(&conn, &sql, &params)?;
        Ok((rows, total))
    }

    /// 满足过滤条件的行数
    pub fn count_rows(&self, filters: &FilterSet, scope: RowScope) -> RepositoryResult<i64> {
        let table = self.table_sql();
        let (sql, params) = SqlQueryBuilder::new("")
            .extend_where(self.conditions(filters, scope)?)
            .build_count(&table);
        let conn = self.get_conn()?;
        query_count(&conn, &sql, &params)
    }

    /// 某字段的去重取值个数（未解析为 0）
    pub fn count_distinct(&self, field: SemanticField) -> RepositoryResult<i64> {
        let col = match self.column_sql(field) {
            Some(col) => col,
            None => return Ok(0),
        };
        let sql = format!(
            "SELECT COUNT(DISTINCT {col}) FROM {t} WHERE {present}",
            col = col,
            t = self.table_sql(),
            present = present_clause(&col)
        );
        let conn = self.get_conn()?;
        query_count(&conn, &sql, &[])
    }

    // ==========================================
    // 分组计数
    // ==========================================

    /// 分组计数 + 占比
    ///
    /// # 参数
    /// - group: 分组字段
    /// - flag: 可选标记字段，仅统计该字段 = 'Y' 的行
    /// - filters: 请求过滤
    ///
    /// # 返回
    /// - 按 count 降序、label 升序；占比之和为 100（四舍五入到两位小数）
    /// - 分组字段（或标记字段）未解析: 空列表
    pub fn grouped_counts(
        &self,
        group: SemanticField,
        flag: Option<SemanticField>,
        filters: &FilterSet,
    ) -> RepositoryResult<Vec<GroupedCount>> {
        let col = match self.column_sql(group) {
            Some(col) => col,
            None => return Ok(Vec::new()),
        };

        let mut builder = SqlQueryBuilder::new(&format!(
            "SELECT {col} AS label, COUNT(*) AS n FROM {t}",
            col = col,
            t = self.table_sql()
        ))
        .where_clause(&present_clause(&col), Vec::new())
        .extend_where(self.conditions(filters, RowScope::All)?);

        if let Some(flag) = flag {
            match self.column_sql(flag) {
                Some(flag_col) => {
                    builder = builder.where_clause(&format!("UPPER(TRIM({})) = 'Y'", flag_col), Vec::new());
                }
                None => return Ok(Vec::new()),
            }
        }

        let (sql, params) = builder
            .group_by(&col)
            .order_by("n DESC, label ASC")
            .build();

        let conn = self.get_conn()?;
        let rows = query_text_rows(&conn, &sql, &params)?;
        drop(conn);

        let counts: Vec<(String, i64)> = rows
            .into_iter()
            .filter_map(|r| {
                let label = r.first().cloned().flatten()?;
                let n = r.get(1).cloned().flatten()?.parse::<i64>().ok()?;
                Some((label, n))
            })
            .collect();

        Ok(with_percentages(counts))
    }

    /// 两字段交叉计数: (行字段值, 列字段值, 行数)
    ///
    /// 列字段缺失值记为空串；任一字段未解析返回空
    pub fn cross_counts(
        &self,
        row_field: SemanticField,
        col_field: SemanticField,
        filters: &FilterSet,
    ) -> RepositoryResult<Vec<(String, String, i64)>> {
        let (row_col, col_col) = match (self.column_sql(row_field), self.column_sql(col_field)) {
            (Some(a), Some(b)) => (a, b),
            _ => return Ok(Vec::new()),
        };

        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT {r}, COALESCE(TRIM({c}), ''), COUNT(*) FROM {t}",
            r = row_col,
            c = col_col,
            t = self.table_sql()
        ))
        .where_clause(&present_clause(&row_col), Vec::new())
        .extend_where(self.conditions(filters, RowScope::All)?)
        .group_by("1, 2")
        .order_by("1 ASC, 2 ASC")
        .build();

        let conn = self.get_conn()?;
        let rows = query_text_rows(&conn, &sql, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let a = r.first().cloned().flatten()?;
                let b = r.get(1).cloned().flatten().unwrap_or_default();
                let n = r.get(2).cloned().flatten()?.parse::<i64>().ok()?;
                Some((a, b, n))
            })
            .collect())
    }

    /// 缺口行按优先级计数（缺口列未解析返回空）
    pub fn priority_counts(&self, filters: &FilterSet) -> RepositoryResult<BTreeMap<PriorityTier, i64>> {
        let gap = match self.gap_condition() {
            Some(gap) => gap,
            None => return Ok(BTreeMap::new()),
        };
        let rank = self
            .priority_rank_sql()
            .unwrap_or_else(|| PriorityTier::Unranked.rank().to_string());

        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT {rank} AS r, COUNT(*) FROM {t}",
            rank = rank,
            t = self.table_sql()
        ))
        .extend_where(filters.to_conditions(&self.schema)?)
        .where_clause(&gap.0, gap.1)
        .group_by("r")
        .build();

        let conn = self.get_conn()?;
        let rows = query_text_rows(&conn, &sql, &params)?;

        let mut out = BTreeMap::new();
        for r in rows {
            let rank = r.first().cloned().flatten().and_then(|v| v.parse::<i64>().ok());
            let n = r.get(1).cloned().flatten().and_then(|v| v.parse::<i64>().ok());
            if let (Some(rank), Some(n)) = (rank, n) {
                let tier = match rank {
                    1 => PriorityTier::P1,
                    2 => PriorityTier::P2,
                    3 => PriorityTier::P3,
                    4 => PriorityTier::P4,
                    _ => PriorityTier::Unranked,
                };
                *out.entry(tier).or_insert(0) += n;
            }
        }
        Ok(out)
    }

    // ==========================================
    // 明细分组 + 季度需求
    // ==========================================

    /// 明细分组（每组取首行的属性值）
    ///
    /// # 参数
    /// - keys: 分组字段（必须已解析）
    /// - attrs: 属性字段（未解析时为 NULL）
    /// - extra: 额外的等值条件
    /// - offset / limit: 分组级分页
    ///
    /// # 返回
    /// - (每组 keys + attrs 的文本值, 分组总数)
    pub fn grouped_details(
        &self,
        keys: &[SemanticField],
        attrs: &[SemanticField],
        extra: &[(SemanticField, String)],
        filters: &FilterSet,
        offset: i64,
        limit: Option<i64>,
    ) -> RepositoryResult<(Vec<Vec<Option<String>>>, i64)> {
        if keys.is_empty() {
            return Ok((Vec::new(), 0));
        }
        let key_cols = keys
            .iter()
            .map(|f| self.schema.require(*f).map(quote_ident))
            .collect::<RepositoryResult<Vec<_>>>()?;
        let attr_cols: Vec<String> = attrs
            .iter()
            .map(|f| self.column_sql(*f).unwrap_or_else(|| "NULL".to_string()))
            .collect();

        let mut conds = self.conditions(filters, RowScope::All)?;
        for col in &key_cols {
            conds.push((present_clause(col), Vec::new()));
        }
        for (field, value) in extra {
            let col = quote_ident(self.schema.require(*field)?);
            conds.push((format!("{} = ?", col), vec![Value::Text(value.clone())]));
        }

        let group_sql = key_cols.join(", ");
        let order_sql = (1..=keys.len())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let mut select_cols = key_cols.clone();
        select_cols.extend(attr_cols);

        // MIN(rowid) 使同组属性取自首行
        let mut builder = SqlQueryBuilder::new(&format!(
            "SELECT {cols}, MIN(rowid) AS first_row FROM {t}",
            cols = select_cols.join(", "),
            t = self.table_sql()
        ))
        .extend_where(conds.clone())
        .group_by(&group_sql)
        .order_by(&order_sql)
        .offset(offset);
        if let Some(limit) = limit {
            builder = builder.limit(limit);
        }
        let (sql, params) = builder.build();

        let (count_sql, count_params) = SqlQueryBuilder::new(&format!(
            "SELECT COUNT(*) FROM (SELECT 1 FROM {t}",
            t = self.table_sql()
        ))
        .extend_where(conds)
        .build();
        let count_sql = format!("{} GROUP BY {})", count_sql, group_sql);

        let conn = self.get_conn()?;
        let total = query_count(&conn, &count_sql, &count_params)?;
        let mut rows = query_text_rows(&conn, &sql, &params)?;
        for row in rows.iter_mut() {
            row.truncate(keys.len() + attrs.len());
        }
        Ok((rows, total))
    }

    /// 季度需求
    ///
    /// # 参数
    /// - keys: 实体键字段（未解析返回空）
    /// - date_field: 日期字段
    /// - extra: 额外的等值条件
    ///
    /// # 返回
    /// - 实体键 → {"YYYY-Qn": 行数}；日期无法解析的行不计入
    pub fn quarterly_demand(
        &self,
        keys: &[SemanticField],
        date_field: SemanticField,
        extra: &[(SemanticField, String)],
        filters: &FilterSet,
    ) -> RepositoryResult<BTreeMap<Vec<String>, BTreeMap<String, i64>>> {
        let mut key_cols = Vec::with_capacity(keys.len());
        for field in keys {
            match self.column_sql(*field) {
                Some(col) => key_cols.push(col),
                None => return Ok(BTreeMap::new()),
            }
        }
        let date_col = match self.column_sql(date_field) {
            Some(col) => col,
            None => return Ok(BTreeMap::new()),
        };

        let quarter = format!("ship_quarter({})", date_col);
        let mut conds = self.conditions(filters, RowScope::All)?;
        conds.push((format!("{} IS NOT NULL", quarter), Vec::new()));
        for col in &key_cols {
            conds.push((present_clause(col), Vec::new()));
        }
        for (field, value) in extra {
            match self.column_sql(*field) {
                Some(col) => conds.push((format!("{} = ?", col), vec![Value::Text(value.clone())])),
                None => return Ok(BTreeMap::new()),
            }
        }

        let mut select_cols = key_cols.clone();
        select_cols.push(quarter);
        let group_sql = (1..=select_cols.len())
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT {cols}, COUNT(*) FROM {t}",
            cols = select_cols.join(", "),
            t = self.table_sql()
        ))
        .extend_where(conds)
        .group_by(&group_sql)
        .build();

        let conn = self.get_conn()?;
        let rows = query_text_rows(&conn, &sql, &params)?;

        let mut out: BTreeMap<Vec<String>, BTreeMap<String, i64>> = BTreeMap::new();
        let width = keys.len();
        for row in rows {
            let key: Option<Vec<String>> = row.iter().take(width).cloned().collect();
            let quarter = row.get(width).cloned().flatten();
            let n = row.get(width + 1).cloned().flatten().and_then(|v| v.parse::<i64>().ok());
            if let (Some(key), Some(quarter), Some(n)) = (key, quarter, n) {
                *out.entry(key).or_default().entry(quarter).or_insert(0) += n;
            }
        }
        Ok(out)
    }

    // ==========================================
    // 层级
    // ==========================================

    /// 去重元组（层级构建输入）
    ///
    /// # 返回
    /// - 各字段按顺序的文本元组，首字段非空；字段未解析返回 MissingColumn
    pub fn distinct_tuples(
        &self,
        fields: &[SemanticField],
        filters: &FilterSet,
    ) -> RepositoryResult<Vec<Vec<Option<String>>>> {
        let cols = fields
            .iter()
            .map(|f| self.schema.require(*f).map(quote_ident))
            .collect::<RepositoryResult<Vec<_>>>()?;
        let first = match cols.first() {
            Some(first) => first.clone(),
            None => return Ok(Vec::new()),
        };

        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT DISTINCT {cols} FROM {t}",
            cols = cols.join(", "),
            t = self.table_sql()
        ))
        .where_clause(&present_clause(&first), Vec::new())
        .extend_where(self.conditions(filters, RowScope::All)?)
        .build();

        let conn = self.get_conn()?;
        let rows = query_text_rows(&conn, &sql, &params)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().map(present_text).collect())
            .collect())
    }

    // ==========================================
    // 只读透传 / 概况
    // ==========================================

    /// 执行只读 SQL（调用方已完成 SELECT 校验）
    pub fn run_select(&self, sql: &str) -> RepositoryResult<(Vec<String>, Vec<JsonRow>)> {
        let conn = self.get_conn()?;
        query_json_rows(&conn, sql, &[])
    }

    /// 数据表概况
    pub fn stats(&self) -> RepositoryResult<TableStats> {
        let total_rows = self.count_rows(&FilterSet::new(), RowScope::All)?;
        Ok(TableStats {
            total_rows,
            unique_programs: self.count_distinct(SemanticField::Program)?,
            unique_configs: self.count_distinct(SemanticField::Configuration)?,
            unique_parts: self.count_distinct(SemanticField::PartNumber)?,
            unique_suppliers: self.count_distinct(SemanticField::ParentPartSupplier)?,
            columns: self.schema.columns().to_vec(),
        })
    }
}

/// 计算占比（两位小数）
pub fn with_percentages(counts: Vec<(String, i64)>) -> Vec<GroupedCount> {
    let total: i64 = counts.iter().map(|(_, n)| *n).sum();
    counts
        .into_iter()
        .map(|(label, count)| {
            let percentage = if total > 0 {
                ((count as f64) * 10000.0 / (total as f64)).round() / 100.0
            } else {
                0.0
            };
            GroupedCount {
                label,
                count,
                percentage,
            }
        })
        .collect()
}
