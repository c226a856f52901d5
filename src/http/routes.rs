// ==========================================
// AEO 供应链数据看板 - HTTP 路由
// ==========================================

use actix_web::web;

use super::handlers;

/// 配置所有路由
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // 健康检查
        .route("/health", web::get().to(handlers::health_check))
        .service(
            web::scope("/api")
                // 下拉选项
                .route("/filter-options", web::get().to(handlers::filter_options))
                .route("/filter-options/{field}", web::get().to(handlers::field_values))
                // 过滤 / 明细表
                .route("/filter", web::post().to(handlers::filter_rows))
                .route(
                    "/datatable/filter-options",
                    web::get().to(handlers::datatable_filter_options),
                )
                .route("/datatable/filter", web::get().to(handlers::datatable_filter))
                .route("/datatable/filter", web::post().to(handlers::datatable_filter))
                .route("/datatable/all", web::get().to(handlers::datatable_all))
                // 通用查询
                .route("/query", web::get().to(handlers::run_query))
                .route("/stats", web::get().to(handlers::stats))
                .route("/hierarchy", web::get().to(handlers::hierarchy))
                // 旧版 output-* 路径（同一张表，沿用上面的 handler）
                .route("/output-data", web::get().to(handlers::datatable_all))
                .route("/output-info", web::get().to(handlers::stats))
                .route("/output-query", web::get().to(handlers::run_query))
                .route("/grouped-counts/{field}", web::get().to(handlers::grouped_counts))
                // 需求
                .route("/demand/programs", web::get().to(handlers::demand_programs))
                .route("/demand/chart-data", web::get().to(handlers::demand_chart_data))
                // 缺口分析
                .route("/gap-analysis/all", web::get().to(handlers::gap_analysis))
                .route("/gap-analysis/kpis", web::get().to(handlers::gap_kpis))
                // 供应商分析
                .route(
                    "/supplier-type-distribution",
                    web::get().to(handlers::supplier_type_distribution),
                )
                .route(
                    "/rm-supplier-by-raw-material",
                    web::get().to(handlers::rm_supplier_by_raw_material),
                )
                .route(
                    "/hw-owner-by-part-complexity",
                    web::get().to(handlers::hw_owner_by_part_complexity),
                )
                .route("/supplier-details", web::get().to(handlers::supplier_details_by_name))
                .route(
                    "/supplier-details/{supplier_type}",
                    web::get().to(handlers::supplier_details_by_type),
                )
                .route(
                    "/rm-supplier-details/{raw_material_type}",
                    web::get().to(handlers::rm_supplier_details),
                ),
        );
}
