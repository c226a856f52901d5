// ==========================================
// AEO 供应链数据看板 - 供应商分析 API
// ==========================================
// 职责: 供应商类型分布 / 原材料类型分布 / HW 负责人复杂度交叉
//       供应商与原材料供应商明细（含季度需求）
// 降级: 分组字段未解析时返回空
// ==========================================

use crate::api::validator::{validate_page, PageLimits};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::report::{ComplexityBreakdown, GroupedCount, Page, SupplierDetail};
use crate::domain::types::{DetailLevel, SemanticField};
use crate::query::filter::FilterSet;
use crate::repository::report_repo::ReportRepository;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 明细查询形态
struct DetailShape {
    level: DetailLevel,
    keys: &'static [SemanticField],
    attrs: &'static [SemanticField],
}

/// 一级件明细: (供应商, 件号) + 属性
const L1_SHAPE: DetailShape = DetailShape {
    level: DetailLevel::L1,
    keys: &[SemanticField::ParentPartSupplier, SemanticField::PartNumber],
    attrs: &[
        SemanticField::PartDescription,
        SemanticField::HwOwner,
        SemanticField::Qpe,
        SemanticField::MfgLeadTime,
    ],
};

/// 二级件明细: (原材料供应商, 二级件号, 父件号) + 属性
const L2_SHAPE: DetailShape = DetailShape {
    level: DetailLevel::L2,
    keys: &[
        SemanticField::RmSupplier,
        SemanticField::Level2Pn,
        SemanticField::PartNumber,
    ],
    attrs: &[
        SemanticField::ParentPartSupplier,
        SemanticField::Level2Description,
        SemanticField::HwOwner,
        SemanticField::Qpe,
        SemanticField::MfgLeadTime,
    ],
};

// ==========================================
// SupplierApi - 供应商分析 API
// ==========================================
pub struct SupplierApi {
    repo: Arc<ReportRepository>,
    limits: PageLimits,
}

impl SupplierApi {
    pub fn new(repo: Arc<ReportRepository>, limits: PageLimits) -> Self {
        Self { repo, limits }
    }

    /// 供应商类型分布
    pub fn supplier_type_distribution(&self, filters: &FilterSet) -> ApiResult<Vec<GroupedCount>> {
        Ok(self
            .repo
            .grouped_counts(SemanticField::SupplierType, None, filters)?)
    }

    /// 原材料类型分布（二级原材料类型）
    pub fn rm_supplier_by_raw_material(&self, filters: &FilterSet) -> ApiResult<Vec<GroupedCount>> {
        Ok(self
            .repo
            .grouped_counts(SemanticField::Level2RawType, None, filters)?)
    }

    /// 任意字段的分组计数
    ///
    /// # 参数
    /// - flag: 仅统计该标记字段 = Y 的行（可选）
    pub fn grouped_counts(
        &self,
        group: SemanticField,
        flag: Option<SemanticField>,
        filters: &FilterSet,
    ) -> ApiResult<Vec<GroupedCount>> {
        Ok(self.repo.grouped_counts(group, flag, filters)?)
    }

    /// HW 负责人 × 零件复杂度
    ///
    /// 复杂度取值大小写不敏感（Medium 视为 Moderate）；其他取值只计入 total。
    /// 按 total 降序、负责人升序。
    pub fn hw_owner_by_part_complexity(&self, filters: &FilterSet) -> ApiResult<Vec<ComplexityBreakdown>> {
        let cells =
            self.repo
                .cross_counts(SemanticField::HwOwner, SemanticField::PartComplexity, filters)?;

        let mut by_owner: BTreeMap<String, ComplexityBreakdown> = BTreeMap::new();
        for (owner, complexity, n) in cells {
            let entry = by_owner
                .entry(owner.clone())
                .or_insert_with(|| ComplexityBreakdown {
                    hw_owner: owner,
                    high: 0,
                    low: 0,
                    moderate: 0,
                    total: 0,
                });
            match complexity.to_lowercase().as_str() {
                "high" => entry.high += n,
                "low" => entry.low += n,
                "moderate" | "medium" => entry.moderate += n,
                _ => {}
            }
            entry.total += n;
        }

        let mut out: Vec<ComplexityBreakdown> = by_owner.into_values().collect();
        out.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.hw_owner.cmp(&b.hw_owner)));
        Ok(out)
    }

    /// 按供应商类型的一级件明细
    pub fn supplier_details_by_type(
        &self,
        supplier_type: &str,
        filters: &FilterSet,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> ApiResult<Page<SupplierDetail>> {
        let extra = vec![(SemanticField::SupplierType, non_blank(supplier_type)?)];
        self.details(&L1_SHAPE, &extra, filters, skip, limit)
    }

    /// 按供应商名称的一级件明细
    pub fn supplier_details_by_name(
        &self,
        supplier_name: &str,
        filters: &FilterSet,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> ApiResult<Page<SupplierDetail>> {
        let extra = vec![(SemanticField::ParentPartSupplier, non_blank(supplier_name)?)];
        self.details(&L1_SHAPE, &extra, filters, skip, limit)
    }

    /// 按二级原材料类型的原材料供应商明细
    pub fn rm_supplier_details(
        &self,
        raw_material_type: &str,
        filters: &FilterSet,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> ApiResult<Page<SupplierDetail>> {
        let extra = vec![(SemanticField::Level2RawType, non_blank(raw_material_type)?)];
        self.details(&L2_SHAPE, &extra, filters, skip, limit)
    }

    fn details(
        &self,
        shape: &DetailShape,
        extra: &[(SemanticField, String)],
        filters: &FilterSet,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> ApiResult<Page<SupplierDetail>> {
        let (skip, limit) = validate_page(skip, limit, self.limits)?;

        let schema = self.repo.schema();
        let implied_missing = shape
            .keys
            .iter()
            .chain(extra.iter().map(|(f, _)| f))
            .find(|f| !schema.has(**f));
        if let Some(field) = implied_missing {
            tracing::debug!(field = field.key(), "明细分组字段未解析，返回空");
            return Ok(Page::empty(skip, limit));
        }

        let (groups, total) = self.repo.grouped_details(
            shape.keys,
            shape.attrs,
            extra,
            filters,
            skip,
            Some(limit),
        )?;
        let quarters = self.repo.quarterly_demand(
            shape.keys,
            SemanticField::TargetShipDate,
            extra,
            filters,
        )?;

        let details = groups
            .into_iter()
            .filter_map(|values| to_detail(shape, values, &quarters))
            .collect();
        Ok(Page::new(details, total, skip, limit))
    }
}

fn non_blank(value: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("筛选值不能为空".to_string()));
    }
    Ok(trimmed.to_string())
}

/// 分组行 → 明细
fn to_detail(
    shape: &DetailShape,
    values: Vec<Option<String>>,
    quarters: &BTreeMap<Vec<String>, BTreeMap<String, i64>>,
) -> Option<SupplierDetail> {
    let width = shape.keys.len();
    let key: Vec<String> = values.iter().take(width).cloned().collect::<Option<Vec<_>>>()?;
    let attr = |field: SemanticField| -> Option<String> {
        shape
            .attrs
            .iter()
            .position(|f| *f == field)
            .and_then(|i| values.get(width + i).cloned().flatten())
    };
    let quarters = quarters.get(&key).cloned().unwrap_or_default();

    match shape.level {
        DetailLevel::L2 => Some(SupplierDetail {
            name: key[0].clone(),
            part_number: key[1].clone(),
            parent_part_no: Some(key[2].clone()),
            parent_part_supplier: attr(SemanticField::ParentPartSupplier),
            description: attr(SemanticField::Level2Description),
            hwo: attr(SemanticField::HwOwner),
            level: shape.level.to_string(),
            qpe: attr(SemanticField::Qpe),
            mfg_lt: attr(SemanticField::MfgLeadTime),
            quarters,
        }),
        DetailLevel::L1 => Some(SupplierDetail {
            name: key[0].clone(),
            part_number: key[1].clone(),
            parent_part_no: None,
            parent_part_supplier: None,
            description: attr(SemanticField::PartDescription),
            hwo: attr(SemanticField::HwOwner),
            level: shape.level.to_string(),
            qpe: attr(SemanticField::Qpe),
            mfg_lt: attr(SemanticField::MfgLeadTime),
            quarters,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_detail_l1() {
        let mut quarters = BTreeMap::new();
        quarters.insert(
            vec!["Acme".to_string(), "PN-1".to_string()],
            BTreeMap::from([("2025-Q4".to_string(), 2)]),
        );
        let values = vec![
            Some("Acme".to_string()),
            Some("PN-1".to_string()),
            Some("Bracket".to_string()),
            Some("Alice".to_string()),
            None,
            Some("12".to_string()),
        ];
        let detail = to_detail(&L1_SHAPE, values, &quarters).unwrap();
        assert_eq!(detail.name, "Acme");
        assert_eq!(detail.description.as_deref(), Some("Bracket"));
        assert_eq!(detail.qpe, None);
        assert_eq!(detail.mfg_lt.as_deref(), Some("12"));
        assert_eq!(detail.quarters.get("2025-Q4"), Some(&2));
        assert_eq!(detail.level, "L1");
    }

    #[test]
    fn test_to_detail_skips_missing_key() {
        let values = vec![None, Some("PN-1".to_string())];
        assert!(to_detail(&L1_SHAPE, values, &BTreeMap::new()).is_none());
    }

    #[test]
    fn test_to_detail_l2() {
        let values = vec![
            Some("MetalCo".to_string()),
            Some("L2-1".to_string()),
            Some("PN-1".to_string()),
            Some("Acme".to_string()),
            Some("Ring Blank".to_string()),
            Some("Bob".to_string()),
            Some("2".to_string()),
            None,
        ];
        let detail = to_detail(&L2_SHAPE, values, &BTreeMap::new()).unwrap();
        assert_eq!(detail.level, "L2");
        assert_eq!(detail.parent_part_no.as_deref(), Some("PN-1"));
        assert_eq!(detail.parent_part_supplier.as_deref(), Some("Acme"));
        assert_eq!(detail.description.as_deref(), Some("Ring Blank"));
        assert_eq!(detail.qpe.as_deref(), Some("2"));
    }
}
