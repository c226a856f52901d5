// ==========================================
// AEO 供应链数据看板 - 聚合结果缓存
// ==========================================
// 职责: 进程级一次性计算的聚合结果（显式注入，不使用全局变量）
// 并发: 多个首次请求同时到达时只计算一次，其余等待同一结果
// 失效: 仅随进程重启
// ==========================================

use once_cell::sync::OnceCell;
use std::sync::Arc;

pub struct AggregateCache<T> {
    name: &'static str,
    cell: OnceCell<Arc<T>>,
}

impl<T> AggregateCache<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceCell::new(),
        }
    }

    /// 取缓存值；未计算时执行 compute（失败不缓存，下次重试）
    pub fn get_or_try_init<E, F>(&self, compute: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.cell
            .get_or_try_init(|| {
                tracing::info!(cache = self.name, "聚合缓存计算");
                compute().map(Arc::new)
            })
            .map(Arc::clone)
    }

    /// 是否已计算
    pub fn is_warm(&self) -> bool {
        self.cell.get().is_some()
    }
}
