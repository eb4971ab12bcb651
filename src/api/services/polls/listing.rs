//! `GET /polls/?date_from=&date_to=&search=&sort_by=&order=`

use actix_web::{HttpResponse, web};

use crate::services::{ListingQuery, ListingService};

use super::error_code::listing_error_code;
use super::helpers::api_result;

pub async fn list_polls(
    service: web::Data<ListingService>,
    query: web::Query<ListingQuery>,
) -> HttpResponse {
    api_result(service.list(&query).await, listing_error_code)
}
