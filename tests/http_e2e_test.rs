// ==========================================
// HTTP 端到端测试
// ==========================================
// 测试目标: 路由 → handler → API → SQLite 的完整链路与响应结构
// ==========================================


use actix_web::{test, web, App};
use aeo_dashboard::http::routes;
use serde_json::Value;
use std::sync::Arc;
use test_helpers::{create_raw_sql_state, create_test_state, sample_state};

/// 最小缺口数据集
fn gap_state() -> aeo_dashboard::app::AppState {
    create_test_state(
        &["ENGINE_PROGRAM", "Configuration", "ESN", "Target_Ship_Date", "Have_Gap"],
        &[&["LM2500", "Standard", "ESN-1", "11-15-25", "Y"]],
    )
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(Arc::new($state)))
                .configure(routes::configure),
        )
        .await
    };
}

/// GET 请求并解析 JSON 响应 → (状态码, 响应体)
macro_rules! get_json {
    ($app:expr, $uri:expr) => {{
        let req = test::TestRequest::get().uri($uri).to_request();
        let resp = test::call_service($app, req).await;
        let status = resp.status().as_u16();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn test_gap_analysis_all_单行缺口() {
    let app = init_app!(gap_state());

    let (status, body) = get_json!(&app, "/api/gap-analysis/all");
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["total"], 1);
    assert_eq!(body["gap_column_used"], "Have_Gap");

    let data = body["data"].as_array().expect("data 应为数组");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["Have_Gap"], "Y");
    assert_eq!(data[0]["ESN"], "ESN-1");
}

#[actix_web::test]
async fn test_filter_options_单字段() {
    let app = init_app!(gap_state());

    let (status, body) = get_json!(&app, "/api/filter-options/ENGINE_PROGRAM");
    assert_eq!(status, 200);
    assert_eq!(body["column"], "ENGINE_PROGRAM");
    assert_eq!(body["value_count"], 1);
    assert_eq!(body["values"], serde_json::json!(["LM2500"]));
    assert!(body["execution_time_ms"].is_string());
}

#[actix_web::test]
async fn test_filter_options_提取年份() {
    let app = init_app!(gap_state());

    let (status, body) = get_json!(&app, "/api/filter-options/Target_Ship_Date?extract=year");
    assert_eq!(status, 200);
    assert_eq!(body["values"], serde_json::json!(["2025"]));
}

#[actix_web::test]
async fn test_filter_options_错误字段() {
    let app = init_app!(gap_state());

    let (status, body) = get_json!(&app, "/api/filter-options/NOT_A_COLUMN");
    assert_eq!(status, 400);
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "UNKNOWN_FIELD");

    // 语义可识别但数据中不存在
    let (status, body) = get_json!(&app, "/api/filter-options/Priority");
    assert_eq!(status, 422);
    assert_eq!(body["code"], "MISSING_COLUMN");
}

#[actix_web::test]
async fn test_query_拒绝非select() {
    let app = init_app!(gap_state());

    let (status, body) = get_json!(&app, "/api/query?sql=DROP%20TABLE%20output");
    assert_eq!(status, 400);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("Only SELECT queries allowed"));

    let (status, body) = get_json!(&app, "/api/query?sql=select%20ESN%20from%20output");
    assert_eq!(status, 200);
    assert_eq!(body["row_count"], 1);
    assert_eq!(body["data"][0]["ESN"], "ESN-1");
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!(gap_state());

    let (status, body) = get_json!(&app, "/health");
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["row_count"], 1);
}

#[actix_web::test]
async fn test_datatable_filter_重复参数() {
    let app = init_app!(sample_state());

    let uri = "/api/datatable/filter?productLines=LM2500&productLines=LM9000&skip=0&limit=2";
    let (status, body) = get_json!(&app, uri);
    assert_eq!(status, 200);
    assert_eq!(body["total"], 5);
    assert_eq!(body["returned_rows"], 2);
    assert_eq!(body["hasMore"], true);

    // POST 同样使用查询参数
    let req = test::TestRequest::post().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let post_body: Value = test::read_body_json(resp).await;
    assert_eq!(post_body["total"], body["total"]);
}

#[actix_web::test]
async fn test_filter_snake_case_参数() {
    let app = init_app!(sample_state());

    let req = test::TestRequest::post()
        .uri("/api/filter?product_lines=LM6000&hw_owners=Carol")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 2);
}

#[actix_web::test]
async fn test_分页参数非法() {
    let app = init_app!(sample_state());

    let (status, body) = get_json!(&app, "/api/datatable/all?skip=abc");
    assert_eq!(status, 400);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, _) = get_json!(&app, "/api/datatable/all?limit=0");
    assert_eq!(status, 400);
}

#[actix_web::test]
async fn test_supplier_type_distribution_响应键() {
    let app = init_app!(sample_state());

    let (status, body) = get_json!(&app, "/api/supplier-type-distribution");
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["supplier_type"], "Internal");
    assert_eq!(body["data"][0]["count"], 4);

    let (_, body) = get_json!(&app, "/api/rm-supplier-by-raw-material");
    assert_eq!(body["data"][0]["raw_material"], "Forging Ring");
}

#[actix_web::test]
async fn test_supplier_details_路由() {
    let app = init_app!(sample_state());

    let (status, body) = get_json!(&app, "/api/supplier-details?supplier_name=Acme");
    assert_eq!(status, 200);
    assert_eq!(body["supplier"], "Acme");
    assert_eq!(body["limit"], 10);
    assert_eq!(body["total"], 3);

    let (status, body) = get_json!(&app, "/api/supplier-details");
    assert_eq!(status, 400);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, body) = get_json!(&app, "/api/supplier-details/Internal");
    assert_eq!(status, 200);
    assert_eq!(body["supplier_type"], "Internal");
    assert_eq!(body["data"][0]["quarters"]["2025-Q4"], 1);

    let (status, body) =
        get_json!(&app, "/api/rm-supplier-details/Forging%20Ring?productLines=LM2500");
    assert_eq!(status, 200);
    assert_eq!(body["raw_material_type"], "Forging Ring");
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["parentPartNo"], "PN-100");
}

#[actix_web::test]
async fn test_gap_kpis_与图表() {
    let app = init_app!(sample_state());

    let (status, body) = get_json!(&app, "/api/gap-analysis/kpis");
    assert_eq!(status, 200);
    assert_eq!(body["kpis"]["totalGaps"]["count"], 4);
    assert_eq!(body["kpis"]["criticalPriority"]["status"], "P1 - Past Due");

    let (status, body) = get_json!(&app, "/api/demand/chart-data");
    assert_eq!(status, 200);
    assert_eq!(body["row_count"], 5);
    assert_eq!(body["data"][0]["PL"], "LM2500");
    assert_eq!(body["data"][0]["Mon-Yr"], "2025Nov");
    assert!(body["data"][0].get("month").is_none());
}

#[actix_web::test]
async fn test_demand_programs_与层级() {
    let app = init_app!(sample_state());

    let (status, body) = get_json!(&app, "/api/demand/programs?limit=1");
    assert_eq!(status, 200);
    assert_eq!(body["total"], 3);
    assert_eq!(body["hasMore"], true);
    assert_eq!(body["data"][0]["engineProgram"], "LM2500");

    let (status, body) = get_json!(&app, "/api/hierarchy?levels=program,configuration");
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["value"], "LM2500");
    assert_eq!(body["data"][0]["children"][0]["value"], "Marine");

    let (status, body) = get_json!(&app, "/api/grouped-counts/program?flag=have_gap");
    assert_eq!(status, 200);
    assert_eq!(body["data"][0]["label"], "LM2500");
    assert_eq!(body["data"][0]["count"], 2);
}

#[actix_web::test]
async fn test_stats_与筛选项() {
    let app = init_app!(sample_state());

    let (status, body) = get_json!(&app, "/api/stats");
    assert_eq!(status, 200);
    assert_eq!(body["total_rows"], 8);

    let (_, body) = get_json!(&app, "/api/filter-options");
    assert_eq!(
        body["data"]["productLines"],
        serde_json::json!(["LM2500", "LM6000", "LM9000"])
    );

    let (_, body) = get_json!(&app, "/api/datatable/filter-options");
    assert_eq!(
        body["filterOptions"]["productLines"],
        serde_json::json!(["LM2500", "LM6000"])
    );
}

/// 未经清洗的数据库：层级列中含字面量 'nan' 与空串
fn uncleaned_state() -> aeo_dashboard::app::AppState {
    create_raw_sql_state(
        "CREATE TABLE output (ENGINE_PROGRAM TEXT, Configuration TEXT, ESN TEXT, Part_Number TEXT);
         INSERT INTO output VALUES ('LM2500', 'nan', 'ESN-1', 'PN-1');
         INSERT INTO output VALUES ('LM2500', '', 'nan', 'nan');
         INSERT INTO output VALUES ('LM2500', 'Std', 'ESN-2', 'PN-2');
         INSERT INTO output VALUES ('LM2500', 'Std', 'NaN', ' ');",
    )
}

#[actix_web::test]
async fn test_hierarchy_跳过缺失占位() {
    let app = init_app!(uncleaned_state());

    let (status, body) = get_json!(&app, "/api/hierarchy?levels=program&levels=configuration&levels=esn");
    assert_eq!(status, 200);
    assert_eq!(
        body["data"],
        serde_json::json!([{
            "value": "LM2500",
            "children": [{
                "value": "Std",
                "children": [{"value": "ESN-2"}]
            }]
        }])
    );
}

#[actix_web::test]
async fn test_demand_programs_跳过缺失占位() {
    let app = init_app!(uncleaned_state());

    let (status, body) = get_json!(&app, "/api/demand/programs");
    assert_eq!(status, 200);
    assert_eq!(body["total"], 1);

    let configs = body["data"][0]["configs"].as_array().expect("configs 应为数组");
    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0]["config"], "Std");

    let esns: Vec<_> = configs[0]["esns"]
        .as_array()
        .expect("esns 应为数组")
        .iter()
        .map(|e| e["esn"].clone())
        .collect();
    assert_eq!(esns, vec![serde_json::json!("ESN-2")]);

    let parts: Vec<_> = configs[0]["level1Parts"]
        .as_array()
        .expect("level1Parts 应为数组")
        .iter()
        .map(|p| p["pn"].clone())
        .collect();
    assert_eq!(parts, vec![serde_json::json!("PN-2")]);
}

#[actix_web::test]
async fn test_output_旧路径() {
    let app = init_app!(sample_state());

    let (status, body) = get_json!(&app, "/api/output-data?skip=0&limit=3");
    assert_eq!(status, 200);
    assert_eq!(body["total"], 8);
    assert_eq!(body["returned_rows"], 3);

    let (status, body) = get_json!(&app, "/api/output-info");
    assert_eq!(status, 200);
    assert_eq!(body["total_rows"], 8);
    assert!(body["columns"].is_array());

    let (status, body) = get_json!(&app, "/api/output-query?sql=SELECT%20COUNT(*)%20AS%20n%20FROM%20output");
    assert_eq!(status, 200);
    assert_eq!(body["row_count"], 1);

    let (status, _) = get_json!(&app, "/api/output-query?sql=DELETE%20FROM%20output");
    assert_eq!(status, 400);
}
