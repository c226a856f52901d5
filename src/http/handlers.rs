// ==========================================
// AEO 供应链数据看板 - HTTP 请求处理器
// ==========================================
// 职责: 解析查询参数（可重复）→ 阻塞线程池调用 API → 响应整形
// 约束: 数据库访问只在 web::block 内进行
// ==========================================

use actix_web::{web, HttpResponse};
use serde_json::json;
use std::sync::Arc;

use super::response::{relabel, Envelope};
use crate::api::validator::validate_field;
use crate::api::{ApiError, ApiResult};
use crate::app::AppState;
use crate::perf::QueryTimer;
use crate::query::filter::FilterSet;

type SharedState = web::Data<Arc<AppState>>;

/// 原始查询参数（保留重复键）
type Params = web::Query<Vec<(String, String)>>;

/// 供应商名称明细的默认每页条数
pub const SUPPLIER_DETAIL_PAGE: i64 = 10;

// ==========================================
// 参数工具
// ==========================================

/// 取第一个同名参数
fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// 取整数参数
fn int_param(params: &[(String, String)], name: &str) -> ApiResult<Option<i64>> {
    match param(params, name).map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::InvalidInput(format!("{} 必须为整数: {}", name, raw))),
    }
}

/// 取分页参数 (skip, limit)
fn page_params(params: &[(String, String)]) -> ApiResult<(Option<i64>, Option<i64>)> {
    Ok((int_param(params, "skip")?, int_param(params, "limit")?))
}

/// 从查询参数构建过滤条件（未知参数忽略）
fn filters_from(params: &[(String, String)]) -> FilterSet {
    FilterSet::from_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

/// 在阻塞线程池执行并计时
///
/// # 返回
/// - (结果, 耗时字符串)
async fn blocking<T, F>(op: &'static str, f: F) -> ApiResult<(T, String)>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || {
        let timer = QueryTimer::new(op);
        f().map(|value| (value, timer.elapsed_label()))
    })
    .await
    .map_err(|e| ApiError::InternalError(format!("阻塞任务失败: {}", e)))?
}

// ==========================================
// 健康检查
// ==========================================

pub async fn health_check(state: SharedState) -> ApiResult<HttpResponse> {
    let app = state.get_ref().clone();
    let (row_count, _) = blocking("health", move || app.report_api.row_count()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": crate::APP_NAME,
        "version": crate::VERSION,
        "source": state.source,
        "table": state.table,
        "row_count": row_count,
    })))
}

// ==========================================
// 下拉选项
// ==========================================

/// GET /api/filter-options
pub async fn filter_options(state: SharedState) -> ApiResult<HttpResponse> {
    let app = state.get_ref().clone();
    let (options, elapsed) =
        blocking("filter_options", move || app.report_api.filter_options(false)).await?;
    Ok(Envelope::success(elapsed).field("data", options).respond())
}

/// GET /api/filter-options/{field}?extract=year
pub async fn field_values(
    state: SharedState,
    path: web::Path<String>,
    params: Params,
) -> ApiResult<HttpResponse> {
    let field = path.into_inner();
    let extract_year = match param(&params, "extract") {
        None => false,
        Some(v) if v.eq_ignore_ascii_case("year") => true,
        Some(v) => {
            return Err(ApiError::InvalidInput(format!(
                "extract 仅支持 year，实际: {}",
                v
            )))
        }
    };

    let app = state.get_ref().clone();
    let name = field.clone();
    let (result, elapsed) = blocking("field_values", move || {
        app.report_api.field_values(&name, extract_year)
    })
    .await?;

    Ok(Envelope::success(elapsed)
        .field("column", &field)
        .field("resolved_column", &result.column)
        .field("value_count", result.values.len())
        .field("values", &result.values)
        .respond())
}

/// GET /api/datatable/filter-options（仅缺口行）
pub async fn datatable_filter_options(state: SharedState) -> ApiResult<HttpResponse> {
    let app = state.get_ref().clone();
    let (options, elapsed) = blocking("datatable_filter_options", move || {
        app.report_api.filter_options(true)
    })
    .await?;
    Ok(Envelope::success(elapsed).field("filterOptions", options).respond())
}

// ==========================================
// 过滤 / 明细表
// ==========================================

/// POST /api/filter（snake_case 参数）
pub async fn filter_rows(state: SharedState, params: Params) -> ApiResult<HttpResponse> {
    paged_rows("filter", state, params).await
}

/// GET|POST /api/datatable/filter（camelCase 参数 + year）
pub async fn datatable_filter(state: SharedState, params: Params) -> ApiResult<HttpResponse> {
    paged_rows("datatable_filter", state, params).await
}

async fn paged_rows(op: &'static str, state: SharedState, params: Params) -> ApiResult<HttpResponse> {
    let filters = filters_from(&params);
    let (skip, limit) = page_params(&params)?;

    let app = state.get_ref().clone();
    let (page, elapsed) =
        blocking(op, move || app.report_api.filter_rows(&filters, skip, limit)).await?;
    Ok(Envelope::success(elapsed).page(&page).respond())
}

/// GET /api/datatable/all
pub async fn datatable_all(state: SharedState, params: Params) -> ApiResult<HttpResponse> {
    let (skip, limit) = page_params(&params)?;

    let app = state.get_ref().clone();
    let (page, elapsed) =
        blocking("datatable_all", move || app.report_api.all_rows(skip, limit)).await?;
    Ok(Envelope::success(elapsed).page(&page).respond())
}

// ==========================================
// 通用查询
// ==========================================

/// GET /api/query?sql=（仅 SELECT；连接本身为 query_only）
pub async fn run_query(state: SharedState, params: Params) -> ApiResult<HttpResponse> {
    let sql = param(&params, "sql")
        .map(str::to_string)
        .ok_or_else(|| ApiError::InvalidInput("缺少参数 sql".to_string()))?;

    let app = state.get_ref().clone();
    let (output, elapsed) = blocking("run_query", move || app.report_api.run_query(&sql)).await?;

    Ok(Envelope::success(elapsed)
        .field("row_count", output.rows.len())
        .field("columns", &output.columns)
        .field("data", &output.rows)
        .respond())
}

/// GET /api/stats
pub async fn stats(state: SharedState) -> ApiResult<HttpResponse> {
    let app = state.get_ref().clone();
    let (stats, elapsed) = blocking("stats", move || app.report_api.stats()).await?;

    Ok(Envelope::success(elapsed)
        .field("total_rows", stats.total_rows)
        .field("unique_programs", stats.unique_programs)
        .field("unique_configs", stats.unique_configs)
        .field("unique_parts", stats.unique_parts)
        .field("unique_suppliers", stats.unique_suppliers)
        .field("columns", &stats.columns)
        .respond())
}

/// GET /api/hierarchy?levels=a&levels=b 或 levels=a,b
pub async fn hierarchy(state: SharedState, params: Params) -> ApiResult<HttpResponse> {
    let levels: Vec<String> = params
        .iter()
        .filter(|(k, _)| k == "levels")
        .flat_map(|(_, v)| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    let filters = filters_from(&params);

    let app = state.get_ref().clone();
    let names = levels.clone();
    let (nodes, elapsed) =
        blocking("hierarchy", move || app.report_api.hierarchy(&names, &filters)).await?;

    Ok(Envelope::success(elapsed)
        .field("levels", &levels)
        .field("data", &nodes)
        .respond())
}

/// GET /api/grouped-counts/{field}?flag=
pub async fn grouped_counts(
    state: SharedState,
    path: web::Path<String>,
    params: Params,
) -> ApiResult<HttpResponse> {
    let field_name = path.into_inner();
    let flag_name = param(&params, "flag").map(str::to_string);
    let filters = filters_from(&params);

    let app = state.get_ref().clone();
    let (counts, elapsed) = blocking("grouped_counts", move || {
        let group = validate_field(&app.schema, &field_name)?;
        let flag = flag_name
            .as_deref()
            .map(|name| validate_field(&app.schema, name))
            .transpose()?;
        app.supplier_api.grouped_counts(group, flag, &filters)
    })
    .await?;

    Ok(Envelope::success(elapsed).field("data", &counts).respond())
}

// ==========================================
// 需求
// ==========================================

/// GET /api/demand/programs
pub async fn demand_programs(state: SharedState, params: Params) -> ApiResult<HttpResponse> {
    let (skip, limit) = page_params(&params)?;

    let app = state.get_ref().clone();
    let (page, elapsed) =
        blocking("demand_programs", move || app.demand_api.demand_programs(skip, limit)).await?;
    Ok(Envelope::success(elapsed).page(&page).respond())
}

/// GET /api/demand/chart-data
pub async fn demand_chart_data(state: SharedState) -> ApiResult<HttpResponse> {
    let app = state.get_ref().clone();
    let (points, elapsed) = blocking("demand_chart_data", move || app.demand_api.chart_data()).await?;

    Ok(Envelope::success(elapsed)
        .field("row_count", points.len())
        .field("data", points.as_slice())
        .respond())
}

// ==========================================
// 缺口分析
// ==========================================

/// GET /api/gap-analysis/all
pub async fn gap_analysis(state: SharedState, params: Params) -> ApiResult<HttpResponse> {
    let filters = filters_from(&params);
    let (skip, limit) = page_params(&params)?;

    let app = state.get_ref().clone();
    let (result, elapsed) = blocking("gap_analysis_all", move || {
        app.gap_api.gap_analysis(&filters, skip, limit)
    })
    .await?;

    let mut envelope = Envelope::success(elapsed).page(&result.page);
    if let Some(col) = &result.gap_column {
        envelope = envelope.field("gap_column_used", col);
    }
    if let Some(message) = &result.message {
        envelope = envelope.field("message", message);
    }
    Ok(envelope.respond())
}

/// GET /api/gap-analysis/kpis
pub async fn gap_kpis(state: SharedState, params: Params) -> ApiResult<HttpResponse> {
    let filters = filters_from(&params);

    let app = state.get_ref().clone();
    let (kpis, elapsed) = blocking("gap_kpis", move || app.gap_api.gap_kpis(&filters)).await?;
    Ok(Envelope::success(elapsed).field("kpis", kpis).respond())
}

// ==========================================
// 供应商分析
// ==========================================

/// GET /api/supplier-type-distribution
pub async fn supplier_type_distribution(
    state: SharedState,
    params: Params,
) -> ApiResult<HttpResponse> {
    let filters = filters_from(&params);

    let app = state.get_ref().clone();
    let (counts, elapsed) = blocking("supplier_type_distribution", move || {
        app.supplier_api.supplier_type_distribution(&filters)
    })
    .await?;
    Ok(Envelope::success(elapsed)
        .field("data", relabel(&counts, "supplier_type"))
        .respond())
}

/// GET /api/rm-supplier-by-raw-material
pub async fn rm_supplier_by_raw_material(
    state: SharedState,
    params: Params,
) -> ApiResult<HttpResponse> {
    let filters = filters_from(&params);

    let app = state.get_ref().clone();
    let (counts, elapsed) = blocking("rm_supplier_by_raw_material", move || {
        app.supplier_api.rm_supplier_by_raw_material(&filters)
    })
    .await?;
    Ok(Envelope::success(elapsed)
        .field("data", relabel(&counts, "raw_material"))
        .respond())
}

/// GET /api/hw-owner-by-part-complexity
pub async fn hw_owner_by_part_complexity(
    state: SharedState,
    params: Params,
) -> ApiResult<HttpResponse> {
    let filters = filters_from(&params);

    let app = state.get_ref().clone();
    let (rows, elapsed) = blocking("hw_owner_by_part_complexity", move || {
        app.supplier_api.hw_owner_by_part_complexity(&filters)
    })
    .await?;
    Ok(Envelope::success(elapsed).field("data", &rows).respond())
}

/// GET /api/supplier-details?supplier_name=
pub async fn supplier_details_by_name(
    state: SharedState,
    params: Params,
) -> ApiResult<HttpResponse> {
    let supplier_name = param(&params, "supplier_name")
        .map(str::to_string)
        .ok_or_else(|| ApiError::InvalidInput("缺少参数 supplier_name".to_string()))?;
    let filters = filters_from(&params);
    let (skip, limit) = page_params(&params)?;
    let limit = limit.or(Some(SUPPLIER_DETAIL_PAGE));

    let app = state.get_ref().clone();
    let name = supplier_name.clone();
    let (page, elapsed) = blocking("supplier_details_by_name", move || {
        app.supplier_api
            .supplier_details_by_name(&name, &filters, skip, limit)
    })
    .await?;

    Ok(Envelope::success(elapsed)
        .field("supplier", &supplier_name)
        .page(&page)
        .respond())
}

/// GET /api/supplier-details/{supplier_type}
pub async fn supplier_details_by_type(
    state: SharedState,
    path: web::Path<String>,
    params: Params,
) -> ApiResult<HttpResponse> {
    let supplier_type = path.into_inner();
    let filters = filters_from(&params);
    let (skip, limit) = page_params(&params)?;

    let app = state.get_ref().clone();
    let value = supplier_type.clone();
    let (page, elapsed) = blocking("supplier_details_by_type", move || {
        app.supplier_api
            .supplier_details_by_type(&value, &filters, skip, limit)
    })
    .await?;

    Ok(Envelope::success(elapsed)
        .field("supplier_type", &supplier_type)
        .page(&page)
        .respond())
}

/// GET /api/rm-supplier-details/{raw_material_type}
pub async fn rm_supplier_details(
    state: SharedState,
    path: web::Path<String>,
    params: Params,
) -> ApiResult<HttpResponse> {
    let raw_material_type = path.into_inner();
    let filters = filters_from(&params);
    let (skip, limit) = page_params(&params)?;

    let app = state.get_ref().clone();
    let value = raw_material_type.clone();
    let (page, elapsed) = blocking("rm_supplier_details", move || {
        app.supplier_api
            .rm_supplier_details(&value, &filters, skip, limit)
    })
    .await?;

    Ok(Envelope::success(elapsed)
        .field("raw_material_type", &raw_material_type)
        .page(&page)
        .respond())
}
