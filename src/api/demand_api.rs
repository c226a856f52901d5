// ==========================================
// AEO 供应链数据看板 - 需求 API
// ==========================================
// 职责: 需求层级分页 / 月度需求图表（进程级缓存）
// ==========================================

use crate::api::error::ApiResult;
use crate::api::validator::{validate_page, PageLimits};
use crate::domain::demand::DemandProgram;
use crate::domain::report::{ChartPoint, Page};
use crate::engine::aggregate_cache::AggregateCache;
use crate::engine::chart::build_chart_points;
use crate::engine::hierarchy::build_demand_hierarchy;
use crate::repository::demand_repo::DemandRepository;
use crate::repository::error::RepositoryError;
use std::sync::Arc;

/// 需求层级默认每页项目数
pub const DEFAULT_PROGRAM_PAGE: i64 = 50;

// ==========================================
// DemandApi - 需求 API
// ==========================================
pub struct DemandApi {
    repo: Arc<DemandRepository>,
    chart_cache: Arc<AggregateCache<Vec<ChartPoint>>>,
    limits: PageLimits,
}

impl DemandApi {
    pub fn new(
        repo: Arc<DemandRepository>,
        chart_cache: Arc<AggregateCache<Vec<ChartPoint>>>,
        limits: PageLimits,
    ) -> Self {
        Self {
            repo,
            chart_cache,
            limits,
        }
    }

    /// 需求层级（按项目分页）
    ///
    /// # 返回
    /// - total 为项目总数；hasMore 以项目计
    pub fn demand_programs(&self, skip: Option<i64>, limit: Option<i64>) -> ApiResult<Page<DemandProgram>> {
        let limits = PageLimits {
            default_limit: DEFAULT_PROGRAM_PAGE,
            ..self.limits
        };
        let (skip, limit) = validate_page(skip, limit, limits)?;

        let (programs, total) = self.repo.program_page(skip, limit)?;
        let rows = self.repo.demand_rows(&programs)?;
        let data = build_demand_hierarchy(&programs, &rows);
        Ok(Page::new(data, total, skip, limit))
    }

    /// 月度需求图表（首次计算后缓存至进程结束）
    pub fn chart_data(&self) -> ApiResult<Arc<Vec<ChartPoint>>> {
        let points = self
            .chart_cache
            .get_or_try_init(|| -> Result<Vec<ChartPoint>, RepositoryError> {
                let counts = self.repo.monthly_esn_counts()?;
                Ok(build_chart_points(counts))
            })?;
        Ok(points)
    }

    /// 图表缓存是否已就绪
    pub fn chart_cached(&self) -> bool {
        self.chart_cache.is_warm()
    }
}
