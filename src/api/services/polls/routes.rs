//! Polls API 路由配置

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use super::chart::get_chart;
use super::error_code::ErrorCode;
use super::export::export_poll;
use super::listing::list_polls;
use super::statistics::get_statistics;

/// 投票路由 `/polls`
///
/// 包含：
/// - GET /polls/ - 列表（过滤 + 排序）
/// - GET /polls/{poll_id}/statistics/ - 统计
/// - GET /polls/{poll_id}/chart/ - 柱状图
/// - GET /polls/{poll_id}/export/ - 导出 JSON / CSV
///
/// 所有路径同时接受带 / 不带结尾斜杠；非数字 id 等未匹配路径返回 404。
pub fn polls_routes() -> actix_web::Scope {
    web::scope("/polls")
        .route("", web::get().to(list_polls))
        .route("/", web::get().to(list_polls))
        .route("/{poll_id:\\d+}/statistics", web::get().to(get_statistics))
        .route("/{poll_id:\\d+}/statistics/", web::get().to(get_statistics))
        .route("/{poll_id:\\d+}/chart", web::get().to(get_chart))
        .route("/{poll_id:\\d+}/chart/", web::get().to(get_chart))
        .route("/{poll_id:\\d+}/export", web::get().to(export_poll))
        .route("/{poll_id:\\d+}/export/", web::get().to(export_poll))
        .default_service(web::to(route_not_found))
}

async fn route_not_found() -> HttpResponse {
    super::helpers::error_response(StatusCode::NOT_FOUND, ErrorCode::NotFound, "Not found")
}
