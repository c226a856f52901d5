// ==========================================
// AEO 供应链数据看板 - 领域类型定义
// ==========================================
// 语义字段: 与物理列名解耦，物理列名由 schema::resolver 启动时解析
// 优先级: Priority 列的多种写法统一归并为 P1~P4
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 语义字段 (Semantic Field)
// ==========================================
// 序列化格式: snake_case (与 HTTP 参数一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticField {
    Program,            // 发动机项目
    Configuration,      // 构型
    Esn,                // 发动机序列号
    TargetShipDate,     // 目标发运日期
    PartNumber,         // 一级件号
    PartDescription,    // 一级件描述
    Qpe,                // 单机用量
    ParentPartSupplier, // 一级件供应商
    SupplierType,       // 供应商类型 (Internal/AEO/External)
    HwOwner,            // 硬件负责人
    Module,             // 模块
    Level1RawType,      // 一级原材料类型
    Level2Pn,           // 二级件号
    Level2Description,  // 二级件描述
    Level2RawType,      // 二级原材料类型
    RmSupplier,         // 原材料供应商
    MfgLeadTime,        // 制造周期
    PartComplexity,     // 零件复杂度 (High/Low/Moderate)
    EngineDemandFamily, // 需求族
    HaveGap,            // 缺口标记 (Y/N)
    Priority,           // 优先级
}

impl SemanticField {
    /// 全部语义字段（解析顺序）
    pub const ALL: [SemanticField; 21] = [
        SemanticField::Program,
        SemanticField::Configuration,
        SemanticField::Esn,
        SemanticField::TargetShipDate,
        SemanticField::PartNumber,
        SemanticField::PartDescription,
        SemanticField::Qpe,
        SemanticField::ParentPartSupplier,
        SemanticField::SupplierType,
        SemanticField::HwOwner,
        SemanticField::Module,
        SemanticField::Level1RawType,
        SemanticField::Level2Pn,
        SemanticField::Level2Description,
        SemanticField::Level2RawType,
        SemanticField::RmSupplier,
        SemanticField::MfgLeadTime,
        SemanticField::PartComplexity,
        SemanticField::EngineDemandFamily,
        SemanticField::HaveGap,
        SemanticField::Priority,
    ];

    /// 语义键（snake_case）
    pub fn key(&self) -> &'static str {
        match self {
            SemanticField::Program => "program",
            SemanticField::Configuration => "configuration",
            SemanticField::Esn => "esn",
            SemanticField::TargetShipDate => "target_ship_date",
            SemanticField::PartNumber => "part_number",
            SemanticField::PartDescription => "part_description",
            SemanticField::Qpe => "qpe",
            SemanticField::ParentPartSupplier => "parent_part_supplier",
            SemanticField::SupplierType => "supplier_type",
            SemanticField::HwOwner => "hw_owner",
            SemanticField::Module => "module",
            SemanticField::Level1RawType => "level1_raw_type",
            SemanticField::Level2Pn => "level2_pn",
            SemanticField::Level2Description => "level2_description",
            SemanticField::Level2RawType => "level2_raw_type",
            SemanticField::RmSupplier => "rm_supplier",
            SemanticField::MfgLeadTime => "mfg_lead_time",
            SemanticField::PartComplexity => "part_complexity",
            SemanticField::EngineDemandFamily => "engine_demand_family",
            SemanticField::HaveGap => "have_gap",
            SemanticField::Priority => "priority",
        }
    }

    /// 按语义键查找
    pub fn from_key(key: &str) -> Option<SemanticField> {
        SemanticField::ALL.iter().copied().find(|f| f.key() == key)
    }
}

impl fmt::Display for SemanticField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ==========================================
// 缺口优先级 (Gap Priority)
// ==========================================
// P1 最紧急；Unranked 表示无法识别的写法（排序置后）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    P1,       // Critical - 已逾期
    P2,       // High - 即将到期
    P3,       // Medium - 近期
    P4,       // Low - 低风险
    Unranked, // 未识别
}

impl PriorityTier {
    /// 排序秩（1~5）
    pub fn rank(&self) -> i64 {
        match self {
            PriorityTier::P1 => 1,
            PriorityTier::P2 => 2,
            PriorityTier::P3 => 3,
            PriorityTier::P4 => 4,
            PriorityTier::Unranked => 5,
        }
    }

    /// 归类原始写法（P1/1/CRITICAL 等，大小写不敏感）
    pub fn classify(raw: &str) -> PriorityTier {
        match raw.trim().to_uppercase().as_str() {
            "P1" | "1" | "CRITICAL" => PriorityTier::P1,
            "P2" | "2" | "HIGH" => PriorityTier::P2,
            "P3" | "3" | "MEDIUM" => PriorityTier::P3,
            "P4" | "4" | "LOW" => PriorityTier::P4,
            _ => PriorityTier::Unranked,
        }
    }

    /// 每个等级接受的写法（用于生成 SQL CASE）
    pub fn spellings(&self) -> &'static [&'static str] {
        match self {
            PriorityTier::P1 => &["P1", "1", "CRITICAL"],
            PriorityTier::P2 => &["P2", "2", "HIGH"],
            PriorityTier::P3 => &["P3", "3", "MEDIUM"],
            PriorityTier::P4 => &["P4", "4", "LOW"],
            PriorityTier::Unranked => &[],
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityTier::P1 => write!(f, "P1"),
            PriorityTier::P2 => write!(f, "P2"),
            PriorityTier::P3 => write!(f, "P3"),
            PriorityTier::P4 => write!(f, "P4"),
            PriorityTier::Unranked => write!(f, "UNRANKED"),
        }
    }
}

// ==========================================
// 明细件层级 (Detail Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetailLevel {
    L1, // 一级件（父件供应商）
    L2, // 二级件（原材料供应商）
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailLevel::L1 => write!(f, "L1"),
            DetailLevel::L2 => write!(f, "L2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_field_key_roundtrip() {
        for field in SemanticField::ALL {
            assert_eq!(SemanticField::from_key(field.key()), Some(field));
        }
        assert_eq!(SemanticField::from_key("unknown"), None);
    }

    #[test]
    fn test_priority_classify() {
        assert_eq!(PriorityTier::classify("P1"), PriorityTier::P1);
        assert_eq!(PriorityTier::classify(" critical "), PriorityTier::P1);
        assert_eq!(PriorityTier::classify("2"), PriorityTier::P2);
        assert_eq!(PriorityTier::classify("Medium"), PriorityTier::P3);
        assert_eq!(PriorityTier::classify("low"), PriorityTier::P4);
        assert_eq!(PriorityTier::classify("urgent"), PriorityTier::Unranked);
        assert!(PriorityTier::P1.rank() < PriorityTier::Unranked.rank());
    }

    #[test]
    fn test_detail_level_display() {
        assert_eq!(DetailLevel::L1.to_string(), "L1");
        assert_eq!(DetailLevel::L2.to_string(), "L2");
    }
}
