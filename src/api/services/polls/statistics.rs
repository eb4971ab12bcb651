//! `GET /polls/{poll_id}/statistics/`

use actix_web::{HttpResponse, web};
use tracing::trace;

use crate::services::StatisticsService;

use super::error_code::statistics_error_code;
use super::helpers::api_result;

pub async fn get_statistics(
    service: web::Data<StatisticsService>,
    path: web::Path<i64>,
) -> HttpResponse {
    let poll_id = path.into_inner();
    trace!("Received statistics request for poll {}", poll_id);

    api_result(service.get_statistics(poll_id).await, statistics_error_code)
}
