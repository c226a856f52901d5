// ==========================================
// AEO 供应链数据看板 - 需求层级模型
// ==========================================
// 层级: 发动机项目 → 构型 → (ESN 列表, 一级件 → 二级件)
// ==========================================

use serde::{Deserialize, Serialize};

/// 需求明细行（层级构建的输入）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemandRow {
    pub program: Option<String>,
    pub config: Option<String>,
    pub esn: Option<String>,
    pub target_ship_date: Option<String>,
    pub part_number: Option<String>,
    pub hw_owner: Option<String>,
    pub supplier: Option<String>,
    pub qpe: Option<String>,
    pub level2_pn: Option<String>,
    pub level2_raw_type: Option<String>,
    pub rm_supplier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandProgram {
    pub engine_program: String,
    pub configs: Vec<ConfigDemand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDemand {
    pub config: String,
    pub esns: Vec<EsnEntry>,
    pub level1_parts: Vec<Level1Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsnEntry {
    pub esn: String,
    /// MM/DD/YYYY；无法解析时保留原值
    pub target_ship_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level1Part {
    pub pn: String,
    /// 逗号分隔的负责人拆分结果
    pub hwo: Vec<String>,
    pub supplier: Option<String>,
    /// 单机用量，缺失或非法时为 1
    pub qpe: i64,
    pub level2_parts: Vec<Level2Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level2Part {
    pub pn: String,
    pub raw_type: Option<String>,
    pub rm_supplier: Option<String>,
}
