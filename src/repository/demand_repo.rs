// ==========================================
// AEO 供应链数据看板 - 需求数据仓储
// ==========================================
// 职责: 需求层级的分页取数 / 月度去重 ESN 计数
// 降级: 发动机项目列未解析时返回空
// ==========================================

use crate::domain::demand::DemandRow;
use crate::domain::types::SemanticField;
use crate::query::sql_builder::{build_in_clause, present_clause, quote_ident, SqlQueryBuilder};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_exec::{present_text, query_count, query_text_rows};
use crate::schema::ResolvedSchema;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// 需求明细列（顺序与 DemandRow 字段一致）
const DEMAND_FIELDS: [SemanticField; 11] = [
    SemanticField::Program,
    SemanticField::Configuration,
    SemanticField::Esn,
    SemanticField::TargetShipDate,
    SemanticField::PartNumber,
    SemanticField::HwOwner,
    SemanticField::ParentPartSupplier,
    SemanticField::Qpe,
    SemanticField::Level2Pn,
    SemanticField::Level2RawType,
    SemanticField::RmSupplier,
];

/// 月度计数行: (发动机项目, "YYYY-MM", 去重 ESN 数)
pub type MonthlyCount = (String, String, i64);

// ==========================================
// DemandRepository - 需求仓储
// ==========================================
pub struct DemandRepository {
    conn: Arc<Mutex<Connection>>,
    schema: Arc<ResolvedSchema>,
}

impl DemandRepository {
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

    fn table_sql(&self) -> String {
        quote_ident(self.schema.table())
    }

    /// 发动机项目分页
    ///
    /// # 返回
    /// - (当前页项目名（升序）, 项目总数)
    pub fn program_page(&self, offset: i64, limit: i64) -> RepositoryResult<(Vec<String>, i64)> {
        let col = match self.schema.column(SemanticField::Program) {
            Some(col) => quote_ident(col),
            None => return Ok((Vec::new(), 0)),
        };

        let present = present_clause(&col);
        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT DISTINCT {col} FROM {t}",
            col = col,
            t = self.table_sql()
        ))
        .where_clause(&present, Vec::new())
        .order_by(&format!("{} ASC", col))
        .limit(limit)
        .offset(offset)
        .build();

        let count_sql = format!(
            "SELECT COUNT(DISTINCT {col}) FROM {t} WHERE {present}",
            col = col,
            t = self.table_sql(),
            present = present
        );

        let conn = self.get_conn()?;
        let total = query_count(&conn, &count_sql, &[])?;
        let programs = query_text_rows(&conn, &sql, &params)?
            .into_iter()
            .filter_map(|r| r.into_iter().next().flatten())
            .collect();
        Ok((programs, total))
    }

    /// 指定项目的需求明细行（原始行序）
    pub fn demand_rows(&self, programs: &[String]) -> RepositoryResult<Vec<DemandRow>> {
        let program_col = match self.schema.column(SemanticField::Program) {
            Some(col) => quote_ident(col),
            None => return Ok(Vec::new()),
        };
        let clause = match build_in_clause(&program_col, programs.len()) {
            Some(clause) => clause,
            None => return Ok(Vec::new()),
        };

        let select_cols: Vec<String> = DEMAND_FIELDS
            .iter()
            .map(|f| {
                self.schema
                    .column(*f)
                    .map(quote_ident)
                    .unwrap_or_else(|| "NULL".to_string())
            })
            .collect();

        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT {cols} FROM {t}",
            cols = select_cols.join(", "),
            t = self.table_sql()
        ))
        .where_clause(&clause, programs.iter().cloned().map(Value::Text).collect())
        .order_by("rowid")
        .build();

        let conn = self.get_conn()?;
        let rows = query_text_rows(&conn, &sql, &params)?;
        Ok(rows.into_iter().map(to_demand_row).collect())
    }

    /// 按项目 + 月份统计去重 ESN 数
    ///
    /// # 返回
    /// - 项目 / 日期 / ESN 任一列未解析: 空
    pub fn monthly_esn_counts(&self) -> RepositoryResult<Vec<MonthlyCount>> {
        let (program, date, esn) = match (
            self.schema.column(SemanticField::Program),
            self.schema.column(SemanticField::TargetShipDate),
            self.schema.column(SemanticField::Esn),
        ) {
            (Some(p), Some(d), Some(e)) => (quote_ident(p), quote_ident(d), quote_ident(e)),
            _ => return Ok(Vec::new()),
        };

        let month_expr = format!("substr(ship_date({}), 1, 7)", date);
        let (sql, params) = SqlQueryBuilder::new(&format!(
            "SELECT {p}, {m} AS ym, COUNT(DISTINCT {e}) FROM {t}",
            p = program,
            m = month_expr,
            e = esn,
            t = self.table_sql()
        ))
        .where_clause(&present_clause(&program), Vec::new())
        .where_clause(&present_clause(&esn), Vec::new())
        .where_clause(&format!("ship_date({}) IS NOT NULL", date), Vec::new())
        .group_by("1, 2")
        .build();

        let conn = self.get_conn()?;
        let rows = query_text_rows(&conn, &sql, &params)?;
        Ok(rows
            .into_iter()
            .filter_map(|r| {
                let program = r.first().cloned().flatten()?;
                let month = r.get(1).cloned().flatten()?;
                let n = r.get(2).cloned().flatten()?.parse::<i64>().ok()?;
                Some((program, month, n))
            })
            .collect())
    }
}

/// 明细元组 → DemandRow（缺失占位视为 None）
fn to_demand_row(values: Vec<Option<String>>) -> DemandRow {
    let mut it = values.into_iter();
    let mut next = || it.next().and_then(present_text);
    DemandRow {
        program: next(),
        config: next(),
        esn: next(),
        target_ship_date: next(),
        part_number: next(),
        hw_owner: next(),
        supplier: next(),
        qpe: next(),
        level2_pn: next(),
        level2_raw_type: next(),
        rm_supplier: next(),
    }
}
