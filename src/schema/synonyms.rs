// ==========================================
// AEO 供应链数据看板 - 列名同义词表
// ==========================================
// 职责: 语义字段 → 物理列名候选（按优先级排列）
// 说明: 唯一的同义词来源，所有查询共享同一张表
// ==========================================

use crate::domain::types::SemanticField;

/// 同义词表（声明式）
///
/// 每个语义字段对应一组候选列名，越靠前优先级越高。
/// 导出工具产生的大小写/空格/下划线差异由解析器的归一化匹配兜底。
pub const SYNONYM_TABLE: &[(SemanticField, &[&str])] = &[
    (
        SemanticField::Program,
        &["ENGINE_PROGRAM", "ENGINE PROGRAM", "Engine_Program", "Engine Program"],
    ),
    (SemanticField::Configuration, &["Configuration", "CONFIGURATION"]),
    (SemanticField::Esn, &["ESN", "esn"]),
    (
        SemanticField::TargetShipDate,
        &["Target_Ship_Date", "Target Ship Date"],
    ),
    (
        SemanticField::PartNumber,
        &["Part_Number", "Part Number", "Level_1_PN", "Level 1 PN"],
    ),
    (
        SemanticField::PartDescription,
        &["Part_Description", "Part Description"],
    ),
    (SemanticField::Qpe, &["QPE", "Qty_Per_Engine"]),
    (
        SemanticField::ParentPartSupplier,
        &["Parent_Part_Supplier", "Parent Part Supplier"],
    ),
    (SemanticField::SupplierType, &["Supplier_Type", "Supplier Type"]),
    (
        SemanticField::HwOwner,
        &["HW_OWNER", "HW OWNER", "HW_Owner", "HW Owner"],
    ),
    (SemanticField::Module, &["Module", "MODULE"]),
    (
        SemanticField::Level1RawType,
        &["Level_1_Raw_Type", "Level 1 Raw Type"],
    ),
    (SemanticField::Level2Pn, &["Level_2_PN", "Level 2 PN"]),
    (SemanticField::Level2Description, &["Level_2_Desc", "Level 2 Desc"]),
    (
        SemanticField::Level2RawType,
        &["Level_2_Raw_Type", "Level 2 Raw Type"],
    ),
    (
        SemanticField::RmSupplier,
        &[
            "Level_2_Raw_Material_Supplier",
            "Level 2 Raw Material Supplier",
        ],
    ),
    (SemanticField::MfgLeadTime, &["Mfg_LT", "MFG_LT", "Mfg LT"]),
    (
        SemanticField::PartComplexity,
        &["Part_Complexity", "Part Complexity"],
    ),
    (
        SemanticField::EngineDemandFamily,
        &["Engine_Demand_Family", "Engine Demand Family"],
    ),
    (
        SemanticField::HaveGap,
        &["Have_Gap", "Gap_Y_N", "Gap (Y/N)", "Gap_YN", "Have Gap"],
    ),
    (SemanticField::Priority, &["Priority", "PRIORITY"]),
];

/// 退化映射：字段自身未解析时借用另一字段的物理列
///
/// 无独立 Module 列时使用二级原材料类型列
pub const FIELD_FALLBACKS: &[(SemanticField, SemanticField)] =
    &[(SemanticField::Module, SemanticField::Level2RawType)];

/// 字段的退化目标
pub fn fallback_of(field: SemanticField) -> Option<SemanticField> {
    FIELD_FALLBACKS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, target)| *target)
}

/// 查询某个语义字段的候选列名
pub fn synonyms_of(field: SemanticField) -> &'static [&'static str] {
    SYNONYM_TABLE
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

/// 列名归一化：去首尾空白、小写、空格与下划线视为同一分隔符
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_sep = false;
    for ch in lowered.chars() {
        if ch == ' ' || ch == '_' {
            if !last_sep && !out.is_empty() {
                out.push('_');
            }
            last_sep = true;
        } else {
            out.push(ch);
            last_sep = false;
        }
    }
    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_synonyms() {
        for field in SemanticField::ALL {
            assert!(!synonyms_of(field).is_empty(), "{} 缺少同义词", field);
        }
    }

    #[test]
    fn test_synonyms_have_single_owner() {
        let mut seen = std::collections::HashMap::new();
        for (field, names) in SYNONYM_TABLE {
            for name in names.iter() {
                if let Some(prev) = seen.insert(normalize_column_name(name), *field) {
                    assert_eq!(prev, *field, "{} 同时属于 {} 与 {}", name, prev, field);
                }
            }
        }
    }

    #[test]
    fn test_module_fallback() {
        assert_eq!(fallback_of(SemanticField::Module), Some(SemanticField::Level2RawType));
        assert_eq!(fallback_of(SemanticField::Program), None);
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name(" Have Gap"), "have_gap");
        assert_eq!(normalize_column_name("HW  OWNER"), "hw_owner");
        assert_eq!(normalize_column_name("Target_Ship_Date "), "target_ship_date");
        assert_eq!(normalize_column_name("Gap (Y/N)"), "gap_(y/n)");
    }
}
