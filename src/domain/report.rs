// ==========================================
// AEO 供应链数据看板 - 报表领域模型
// ==========================================
// 序列化格式: camelCase（与前端约定一致），个别字段显式 rename
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 一行数据（列名 → 值，保持列顺序）
pub type JsonRow = serde_json::Map<String, serde_json::Value>;

// ==========================================
// Page - 分页结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    /// 与分页无关的总数
    pub total: i64,
    pub skip: i64,
    pub limit: i64,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: i64, skip: i64, limit: i64) -> Self {
        let has_more = skip + (data.len() as i64) < total;
        Self {
            data,
            total,
            skip,
            limit,
            has_more,
        }
    }

    pub fn empty(skip: i64, limit: i64) -> Self {
        Self::new(Vec::new(), 0, skip, limit)
    }
}

// ==========================================
// GroupedCount - 分组计数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedCount {
    pub label: String,
    pub count: i64,
    /// 占比（%），保留两位小数
    pub percentage: f64,
}

/// HW 负责人 × 零件复杂度 交叉计数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityBreakdown {
    pub hw_owner: String,
    #[serde(rename = "High")]
    pub high: i64,
    #[serde(rename = "Low")]
    pub low: i64,
    #[serde(rename = "Moderate")]
    pub moderate: i64,
    pub total: i64,
}

// ==========================================
// FilterOptions - 下拉选项
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub product_lines: Vec<String>,
    pub years: Vec<String>,
    pub configs: Vec<String>,
    pub suppliers: Vec<String>,
    pub rm_suppliers: Vec<String>,
    pub hw_owners: Vec<String>,
    pub modules: Vec<String>,
    pub part_numbers: Vec<String>,
}

// ==========================================
// Gap KPI
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiCard {
    pub count: i64,
    pub status: String,
}

impl KpiCard {
    pub fn new(count: i64, status: impl Into<String>) -> Self {
        Self {
            count,
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapKpis {
    pub total_gaps: KpiCard,
    pub critical_priority: KpiCard,
    pub high_priority: KpiCard,
    pub medium_priority: KpiCard,
    pub low_priority: KpiCard,
    pub on_track: KpiCard,
}

// ==========================================
// ChartPoint - 月度需求图表点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(rename = "PL")]
    pub program: String,
    #[serde(rename = "Mon")]
    pub month_abbr: String,
    #[serde(rename = "Year")]
    pub year: i32,
    /// 去重 ESN 数
    #[serde(rename = "No")]
    pub esn_count: i64,
    /// 例: "2025Oct"
    #[serde(rename = "Mon-Yr")]
    pub month_year: String,
    /// 例: "10/1/2025"
    #[serde(rename = "Month")]
    pub month_start: String,
    #[serde(skip)]
    pub month: u32,
}

// ==========================================
// SupplierDetail - 供应商明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierDetail {
    pub name: String,
    pub part_number: String,
    pub parent_part_no: Option<String>,
    pub parent_part_supplier: Option<String>,
    pub description: Option<String>,
    pub hwo: Option<String>,
    /// L1 / L2
    pub level: String,
    pub qpe: Option<String>,
    #[serde(rename = "mfgLT")]
    pub mfg_lt: Option<String>,
    /// "YYYY-Qn" → 需求行数
    pub quarters: BTreeMap<String, i64>,
}

// ==========================================
// TableStats - 数据表概况
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStats {
    pub total_rows: i64,
    pub unique_programs: i64,
    pub unique_configs: i64,
    pub unique_parts: i64,
    pub unique_suppliers: i64,
    pub columns: Vec<String>,
}

// ==========================================
// HierarchyNode - 通用层级节点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub value: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<HierarchyNode>,
}
