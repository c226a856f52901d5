// ==========================================
// AEO 供应链数据看板 - 缺口分析 API
// ==========================================
// 职责: 缺口行（缺口列 = Y）按优先级分页 / 缺口 KPI
// 降级: 缺口列未解析时返回空数据并附说明
// ==========================================

use crate::api::error::ApiResult;
use crate::api::validator::{validate_page, PageLimits};
use crate::domain::report::{GapKpis, JsonRow, KpiCard, Page};
use crate::domain::types::{PriorityTier, SemanticField};
use crate::query::filter::FilterSet;
use crate::repository::report_repo::{ReportRepository, RowOrder, RowScope};
use std::sync::Arc;

/// 缺口列缺失时的提示
pub const NO_GAP_COLUMN_MESSAGE: &str = "No gap column found in data";

/// 缺口分析分页结果
#[derive(Debug, Clone, PartialEq)]
pub struct GapPage {
    pub page: Page<JsonRow>,
    /// 实际使用的缺口列
    pub gap_column: Option<String>,
    pub message: Option<String>,
}

// ==========================================
// GapApi - 缺口分析 API
// ==========================================
pub struct GapApi {
    repo: Arc<ReportRepository>,
    limits: PageLimits,
}

impl GapApi {
    pub fn new(repo: Arc<ReportRepository>, limits: PageLimits) -> Self {
        Self { repo, limits }
    }

    /// 缺口行分页（P1 在前，同级按原始行序）
    pub fn gap_analysis(
        &self,
        filters: &FilterSet,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> ApiResult<GapPage> {
        let (skip, limit) = validate_page(skip, limit, self.limits)?;

        let gap_column = match self.repo.schema().column(SemanticField::HaveGap) {
            Some(col) => col.to_string(),
            None => {
                return Ok(GapPage {
                    page: Page::empty(skip, limit),
                    gap_column: None,
                    message: Some(NO_GAP_COLUMN_MESSAGE.to_string()),
                })
            }
        };

        let (rows, total) =
            self.repo
                .filter_rows(filters, RowScope::GapOnly, RowOrder::Priority, skip, Some(limit))?;

        Ok(GapPage {
            page: Page::new(rows, total, skip, limit),
            gap_column: Some(gap_column),
            message: None,
        })
    }

    /// 缺口 KPI
    ///
    /// - totalGaps: 缺口行数，状态为缺口占比
    /// - P1~P4: 各优先级缺口行数
    /// - onTrack: 非缺口行数
    pub fn gap_kpis(&self, filters: &FilterSet) -> ApiResult<GapKpis> {
        let total_rows = self.repo.count_rows(filters, RowScope::All)?;
        let (gaps, by_tier) = if self.repo.schema().has(SemanticField::HaveGap) {
            (
                self.repo.count_rows(filters, RowScope::GapOnly)?,
                self.repo.priority_counts(filters)?,
            )
        } else {
            (0, Default::default())
        };

        let tier = |t: PriorityTier| by_tier.get(&t).copied().unwrap_or(0);
        let gap_pct = if total_rows > 0 {
            gaps as f64 * 100.0 / total_rows as f64
        } else {
            0.0
        };

        Ok(GapKpis {
            total_gaps: KpiCard::new(gaps, format!("{:.1}% Gap", gap_pct)),
            critical_priority: KpiCard::new(tier(PriorityTier::P1), "P1 - Past Due"),
            high_priority: KpiCard::new(tier(PriorityTier::P2), "P2 - Due Soon"),
            medium_priority: KpiCard::new(tier(PriorityTier::P3), "P3 - Upcoming"),
            low_priority: KpiCard::new(tier(PriorityTier::P4), "P4 - Low Risk"),
            on_track: KpiCard::new(total_rows - gaps, "Meeting targets"),
        })
    }
}
