//! `GET /polls/{poll_id}/chart/`

use actix_web::{HttpResponse, web};

use crate::services::ChartService;

use super::error_code::chart_error_code;
use super::helpers::api_result;

pub async fn get_chart(service: web::Data<ChartService>, path: web::Path<i64>) -> HttpResponse {
    api_result(service.get_chart(path.into_inner()).await, chart_error_code)
}
