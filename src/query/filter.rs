// ==========================================
// AEO 供应链数据看板 - 过滤条件集合
// ==========================================
// 职责: 请求级多值过滤（语义字段 → 可接受值集合 + 发运年份集合）
// 规则:
// - 某字段值集合为空 = 不过滤该字段
// - 字段之间 AND，同一字段内 OR (IN)
// - 取值全部参数绑定
// ==========================================

use crate::domain::types::SemanticField;
use crate::query::sql_builder::{build_in_clause, quote_ident};
use crate::repository::error::RepositoryResult;
use crate::schema::ResolvedSchema;
use rusqlite::types::Value;
use std::collections::{BTreeMap, BTreeSet};

/// 过滤目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    Field(SemanticField),
    ShipYear,
}

/// HTTP 过滤参数名 → 过滤目标（snake_case 与 camelCase 两套命名）
pub const FILTER_PARAMS: &[(&str, FilterTarget)] = &[
    ("product_lines", FilterTarget::Field(SemanticField::Program)),
    ("productLines", FilterTarget::Field(SemanticField::Program)),
    ("years", FilterTarget::ShipYear),
    ("year", FilterTarget::ShipYear),
    ("configs", FilterTarget::Field(SemanticField::Configuration)),
    ("suppliers", FilterTarget::Field(SemanticField::ParentPartSupplier)),
    ("rm_suppliers", FilterTarget::Field(SemanticField::RmSupplier)),
    ("rmSuppliers", FilterTarget::Field(SemanticField::RmSupplier)),
    ("hw_owners", FilterTarget::Field(SemanticField::HwOwner)),
    ("hwOwners", FilterTarget::Field(SemanticField::HwOwner)),
    ("part_numbers", FilterTarget::Field(SemanticField::PartNumber)),
    ("partNumbers", FilterTarget::Field(SemanticField::PartNumber)),
    ("modules", FilterTarget::Field(SemanticField::Module)),
];

/// 查找过滤参数名
pub fn filter_target(param: &str) -> Option<FilterTarget> {
    FILTER_PARAMS
        .iter()
        .find(|(name, _)| *name == param)
        .map(|(_, target)| *target)
}

// ==========================================
// FilterSet - 过滤条件集合
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    values: BTreeMap<SemanticField, BTreeSet<String>>,
    years: BTreeSet<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 (参数名, 值) 列表构建；未知参数名忽略，空值忽略
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = FilterSet::new();
        for (name, value) in pairs {
            if let Some(target) = filter_target(name) {
                set.add(target, value);
            }
        }
        set
    }

    /// 追加单个取值
    pub fn add(&mut self, target: FilterTarget, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        match target {
            FilterTarget::Field(field) => {
                self.values.entry(field).or_default().insert(value.to_string());
            }
            FilterTarget::ShipYear => {
                self.years.insert(value.to_string());
            }
        }
    }

    /// 链式追加多个取值
    pub fn with<I, S>(mut self, field: SemanticField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for v in values {
            self.add(FilterTarget::Field(field), v.as_ref());
        }
        self
    }

    /// 链式追加年份
    pub fn with_years<I, S>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for y in years {
            self.add(FilterTarget::ShipYear, y.as_ref());
        }
        self
    }

    /// 是否无任何有效过滤
    pub fn is_empty(&self) -> bool {
        self.values.values().all(BTreeSet::is_empty) && self.years.is_empty()
    }

    /// 某字段的取值集合
    pub fn values_of(&self, field: SemanticField) -> Option<&BTreeSet<String>> {
        self.values.get(&field).filter(|s| !s.is_empty())
    }

    /// 转换为 WHERE 条件
    ///
    /// # 返回
    /// - Ok(conditions): 每个非空字段一条 IN 条件
    /// - Err(MissingColumn): 对未解析字段指定了取值
    pub fn to_conditions(
        &self,
        schema: &ResolvedSchema,
    ) -> RepositoryResult<Vec<(String, Vec<Value>)>> {
        let mut conditions = Vec::new();

        for (field, values) in &self.values {
            let column = quote_ident(schema.require(*field)?);
            if let Some(clause) = build_in_clause(&column, values.len()) {
                let params = values.iter().cloned().map(Value::Text).collect();
                conditions.push((clause, params));
            }
        }

        if !self.years.is_empty() {
            let column = quote_ident(schema.require(SemanticField::TargetShipDate)?);
            let expr = format!("ship_year({})", column);
            if let Some(clause) = build_in_clause(&expr, self.years.len()) {
                let params = self.years.iter().cloned().map(Value::Text).collect();
                conditions.push((clause, params));
            }
        }

        Ok(conditions)
    }
}
