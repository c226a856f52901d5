// ==========================================
// AEO 供应链数据看板 - 列名解析器
// ==========================================
// 职责: 启动时一次性把语义字段映射到物理列名
// 规则: 先精确匹配（按同义词优先级），再归一化匹配，再按退化映射借列，否则为未解析
// 结果: ResolvedSchema 不可变，全进程共享
// ==========================================

use crate::domain::types::SemanticField;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::schema::synonyms::{fallback_of, normalize_column_name, synonyms_of, SYNONYM_TABLE};
use std::collections::BTreeMap;

// ==========================================
// ResolvedSchema - 已解析的表结构
// ==========================================
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    table: String,
    columns: Vec<String>,
    mapping: BTreeMap<SemanticField, String>,
}

impl ResolvedSchema {
    /// 解析表结构
    ///
    /// # 参数
    /// - table: 物理表名
    /// - columns: 物理列名（按表定义顺序）
    ///
    /// # 返回
    /// 已解析的 schema；未命中的语义字段不出现在映射中
    pub fn resolve(table: &str, columns: &[String]) -> Self {
        let mut mapping = BTreeMap::new();
        for field in SemanticField::ALL {
            if let Some(column) = resolve_one(field, columns) {
                mapping.insert(field, column);
            }
        }

        // 退化映射只在字段自身未命中时生效
        for field in SemanticField::ALL {
            if mapping.contains_key(&field) {
                continue;
            }
            let borrowed = fallback_of(field).and_then(|target| mapping.get(&target).cloned());
            if let Some(column) = borrowed {
                tracing::debug!(field = field.key(), column = %column, "语义字段借用退化列");
                mapping.insert(field, column);
            }
        }

        Self {
            table: table.to_string(),
            columns: columns.to_vec(),
            mapping,
        }
    }

    /// 物理表名
    pub fn table(&self) -> &str {
        &self.table
    }

    /// 全部物理列名
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 语义字段对应的物理列名（未解析返回 None）
    pub fn column(&self, field: SemanticField) -> Option<&str> {
        self.mapping.get(&field).map(String::as_str)
    }

    /// 语义字段对应的物理列名（未解析返回 MissingColumn）
    pub fn require(&self, field: SemanticField) -> RepositoryResult<&str> {
        self.column(field)
            .ok_or_else(|| RepositoryError::MissingColumn {
                field: field.key().to_string(),
                tried: synonyms_of(field).join(", "),
            })
    }

    /// 是否已解析
    pub fn has(&self, field: SemanticField) -> bool {
        self.mapping.contains_key(&field)
    }

    /// 未解析的语义字段列表
    pub fn unresolved(&self) -> Vec<SemanticField> {
        SemanticField::ALL
            .iter()
            .copied()
            .filter(|f| !self.mapping.contains_key(f))
            .collect()
    }

    /// 把外部传入的字段名（语义键 / 同义词 / 物理列名）解析为语义字段
    ///
    /// # 返回
    /// - Some(field): 已识别
    /// - None: 未知字段名
    pub fn lookup_field(&self, name: &str) -> Option<SemanticField> {
        if let Some(field) = SemanticField::from_key(name.trim()) {
            return Some(field);
        }

        // 每种写法只归属一个语义字段；物理列名也经同义词归属
        let wanted = normalize_column_name(name);
        SYNONYM_TABLE
            .iter()
            .find(|(_, names)| names.iter().any(|s| normalize_column_name(s) == wanted))
            .map(|(field, _)| *field)
    }

    /// 记录未解析字段（启动时调用一次）
    pub fn log_resolution(&self) {
        for (field, column) in &self.mapping {
            tracing::debug!(field = field.key(), column = %column, "列名解析");
        }
        for field in self.unresolved() {
            tracing::warn!(
                field = field.key(),
                tried = %synonyms_of(field).join(", "),
                "语义字段未解析，相关功能将降级为空结果"
            );
        }
    }
}

/// 解析单个语义字段
fn resolve_one(field: SemanticField, columns: &[String]) -> Option<String> {
    let candidates = synonyms_of(field);

    // 1. 精确匹配（按优先级）
    for candidate in candidates {
        if let Some(col) = columns.iter().find(|c| c.as_str() == *candidate) {
            return Some(col.clone());
        }
    }

    // 2. 归一化匹配（大小写 / 空格 / 下划线）
    for candidate in candidates {
        let wanted = normalize_column_name(candidate);
        if let Some(col) = columns.iter().find(|c| normalize_column_name(c) == wanted) {
            return Some(col.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_first_synonym_wins() {
        let schema = ResolvedSchema::resolve(
            "output",
            &cols(&["Gap_Y_N", "Have_Gap", "ENGINE PROGRAM"]),
        );
        assert_eq!(schema.column(SemanticField::HaveGap), Some("Have_Gap"));
        assert_eq!(schema.column(SemanticField::Program), Some("ENGINE PROGRAM"));
    }

    #[test]
    fn test_resolve_normalized_match() {
        let schema = ResolvedSchema::resolve("output", &cols(&[" Have Gap", "hw owner"]));
        assert_eq!(schema.column(SemanticField::HaveGap), Some(" Have Gap"));
        assert_eq!(schema.column(SemanticField::HwOwner), Some("hw owner"));
    }

    #[test]
    fn test_resolve_missing_column() {
        let schema = ResolvedSchema::resolve("output", &cols(&["ESN"]));
        assert!(!schema.has(SemanticField::Priority));
        let err = schema.require(SemanticField::Priority).unwrap_err();
        match err {
            RepositoryError::MissingColumn { field, tried } => {
                assert_eq!(field, "priority");
                assert!(tried.contains("PRIORITY"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_idempotent() {
        let columns = cols(&["ENGINE_PROGRAM", "Configuration", "Level_2_Raw_Type"]);
        let a = ResolvedSchema::resolve("output", &columns);
        let b = ResolvedSchema::resolve("output", &columns);
        for field in SemanticField::ALL {
            assert_eq!(a.column(field), b.column(field));
        }
    }

    #[test]
    fn test_module_falls_back_to_raw_type() {
        let schema = ResolvedSchema::resolve("output", &cols(&["Level_2_Raw_Type"]));
        assert_eq!(schema.column(SemanticField::Module), Some("Level_2_Raw_Type"));
        assert_eq!(schema.column(SemanticField::Level2RawType), Some("Level_2_Raw_Type"));
    }

    #[test]
    fn test_module_prefers_own_column() {
        let schema = ResolvedSchema::resolve(
            "output",
            &cols(&["ENGINE_PROGRAM", "Module", "Level_2_Raw_Type"]),
        );
        assert_eq!(schema.column(SemanticField::Module), Some("Module"));
        assert_eq!(schema.column(SemanticField::Level2RawType), Some("Level_2_Raw_Type"));
    }

    #[test]
    fn test_lookup_raw_type_with_module_present() {
        let schema = ResolvedSchema::resolve(
            "output",
            &cols(&["ENGINE_PROGRAM", "Module", "Level_2_Raw_Type"]),
        );
        assert_eq!(schema.lookup_field("Level 2 Raw Type"), Some(SemanticField::Level2RawType));
        assert_eq!(schema.lookup_field("Level_2_Raw_Type"), Some(SemanticField::Level2RawType));
        assert_eq!(schema.lookup_field("MODULE"), Some(SemanticField::Module));

        // 仅有原材料类型列时，物理列名仍归属原材料类型字段
        let fallback = ResolvedSchema::resolve("output", &cols(&["Level 2 Raw Type"]));
        assert_eq!(fallback.column(SemanticField::Module), Some("Level 2 Raw Type"));
        assert_eq!(fallback.lookup_field("Level 2 Raw Type"), Some(SemanticField::Level2RawType));
    }

    #[test]
    fn test_lookup_field() {
        let schema = ResolvedSchema::resolve("output", &cols(&["ENGINE_PROGRAM", "HW OWNER"]));
        assert_eq!(schema.lookup_field("ENGINE_PROGRAM"), Some(SemanticField::Program));
        assert_eq!(schema.lookup_field("program"), Some(SemanticField::Program));
        assert_eq!(schema.lookup_field("HW OWNER"), Some(SemanticField::HwOwner));
        assert_eq!(schema.lookup_field("hw_owner"), Some(SemanticField::HwOwner));
        assert_eq!(schema.lookup_field("Engine Program"), Some(SemanticField::Program));
        assert_eq!(schema.lookup_field("DROP TABLE"), None);
    }
}
