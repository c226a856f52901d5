// ==========================================
// AEO 供应链数据看板 - 报表查询 API
// ==========================================
// 职责: 下拉选项 / 多值过滤分页 / 全表分页 / 只读 SQL / 概况 / 通用层级
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_field, validate_page, validate_select, PageLimits};
use crate::domain::report::{FilterOptions, HierarchyNode, JsonRow, Page, TableStats};
use crate::domain::types::SemanticField;
use crate::engine::hierarchy::build_tree;
use crate::query::filter::FilterSet;
use crate::repository::report_repo::{ReportRepository, RowOrder, RowScope};
use std::sync::Arc;

/// 年份列表为空时的兜底值
pub const FALLBACK_YEARS: [&str; 4] = ["2025", "2026", "2027", "2028"];

/// 单字段取值结果
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValues {
    /// 物理列名
    pub column: String,
    pub values: Vec<String>,
}

/// 只读查询结果
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<JsonRow>,
}

// ==========================================
// ReportApi - 报表查询 API
// ==========================================
pub struct ReportApi {
    repo: Arc<ReportRepository>,
    limits: PageLimits,
}

impl ReportApi {
    pub fn new(repo: Arc<ReportRepository>, limits: PageLimits) -> Self {
        Self { repo, limits }
    }

    /// 批量下拉选项
    ///
    /// # 参数
    /// - gap_only: 仅统计缺口行（缺口列未解析时不限制）
    pub fn filter_options(&self, gap_only: bool) -> ApiResult<FilterOptions> {
        let scope = if gap_only { RowScope::GapOnly } else { RowScope::All };
        let list = |field| self.repo.list_unique(field, scope);

        let mut years = self.repo.list_years(scope)?;
        if years.is_empty() {
            years = FALLBACK_YEARS.iter().map(|y| y.to_string()).collect();
        }

        Ok(FilterOptions {
            product_lines: list(SemanticField::Program)?,
            years,
            configs: list(SemanticField::Configuration)?,
            suppliers: list(SemanticField::ParentPartSupplier)?,
            rm_suppliers: list(SemanticField::RmSupplier)?,
            hw_owners: list(SemanticField::HwOwner)?,
            modules: list(SemanticField::Module)?,
            part_numbers: list(SemanticField::PartNumber)?,
        })
    }

    /// 单字段去重取值
    ///
    /// # 参数
    /// - field_name: 语义键 / 同义词 / 物理列名
    /// - extract_year: 只对发运日期字段有效，返回年份（降序）
    ///
    /// # 返回
    /// - Err(UnknownField): 字段名无法识别
    /// - Err(MissingColumn): 字段可识别但表中不存在
    pub fn field_values(&self, field_name: &str, extract_year: bool) -> ApiResult<FieldValues> {
        let schema = self.repo.schema();
        let field = validate_field(schema, field_name)?;
        let column = schema.require(field)?.to_string();

        let values = if extract_year {
            if field != SemanticField::TargetShipDate {
                return Err(ApiError::InvalidInput(format!(
                    "extract=year 仅适用于发运日期字段，实际: {}",
                    field_name
                )));
            }
            let years = self.repo.list_years(RowScope::All)?;
            if years.is_empty() {
                FALLBACK_YEARS.iter().map(|y| y.to_string()).collect()
            } else {
                years
            }
        } else {
            self.repo.list_unique(field, RowScope::All)?
        };

        Ok(FieldValues { column, values })
    }

    /// 多值过滤（分页）
    pub fn filter_rows(
        &self,
        filters: &FilterSet,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> ApiResult<Page<JsonRow>> {
        let (skip, limit) = validate_page(skip, limit, self.limits)?;
        let (rows, total) =
            self.repo
                .filter_rows(filters, RowScope::All, RowOrder::Insertion, skip, Some(limit))?;
        Ok(Page::new(rows, total, skip, limit))
    }

    /// 全表分页
    pub fn all_rows(&self, skip: Option<i64>, limit: Option<i64>) -> ApiResult<Page<JsonRow>> {
        self.filter_rows(&FilterSet::new(), skip, limit)
    }

    /// 只读 SQL 透传
    pub fn run_query(&self, sql: &str) -> ApiResult<QueryOutput> {
        let sql = validate_select(sql)?;
        tracing::info!(sql = %sql, "只读查询");
        let (columns, rows) = self.repo.run_select(sql)?;
        Ok(QueryOutput { columns, rows })
    }

    /// 数据表概况
    pub fn stats(&self) -> ApiResult<TableStats> {
        Ok(self.repo.stats()?)
    }

    /// 总行数
    pub fn row_count(&self) -> ApiResult<i64> {
        Ok(self.repo.count_rows(&FilterSet::new(), RowScope::All)?)
    }

    /// 通用层级
    ///
    /// # 参数
    /// - levels: 自上而下的字段名（至少一个）
    pub fn hierarchy(&self, levels: &[String], filters: &FilterSet) -> ApiResult<Vec<HierarchyNode>> {
        if levels.is_empty() {
            return Err(ApiError::InvalidInput("levels 不能为空".to_string()));
        }
        let schema = self.repo.schema();
        let fields = levels
            .iter()
            .map(|name| validate_field(schema, name))
            .collect::<ApiResult<Vec<_>>>()?;

        let tuples = self.repo.distinct_tuples(&fields, filters)?;
        Ok(build_tree(&tuples))
    }
}
