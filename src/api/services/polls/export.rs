//! `GET /polls/{poll_id}/export/?format={json|csv}`

use actix_web::{HttpResponse, web};

use crate::services::{ExportFormat, ExportService};

use super::error_code::export_error_code;
use super::helpers::error_from_poll;
use super::types::ExportQuery;

pub async fn export_poll(
    service: web::Data<ExportService>,
    path: web::Path<i64>,
    query: web::Query<ExportQuery>,
) -> HttpResponse {
    let format = ExportFormat::parse(query.format.as_deref());

    match service.export(path.into_inner(), format).await {
        Ok(file) => HttpResponse::Ok()
            .content_type(file.content_type)
            .append_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", file.filename),
            ))
            .body(file.body),
        Err(e) => error_from_poll(&e, export_error_code(&e)),
    }
}
