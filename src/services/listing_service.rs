//! Listing service
//!
//! Turns raw listing parameters into a [`PollFilter`] / [`PollSort`] pair and
//! queries the repository.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{PollError, Result};
use crate::storage::{
    PollFilter, PollPredicate, PollRepository, PollSort, PollSummary, SortKey, SortOrder,
};

/// 列表查询参数（原样来自查询字符串）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollListItem {
    pub id: i64,
    pub question: String,
    pub pub_date: String,
    pub total_votes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollListing {
    pub count: usize,
    pub results: Vec<PollListItem>,
}

/// 日期边界的含义：纯日期作为下界取当天开始，作为上界取当天最后一刻
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

fn parse_bound(name: &str, raw: &str, bound: Bound) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        PollError::bad_request(format!(
            "Invalid {}: '{}'. Supported formats: RFC3339 or YYYY-MM-DD",
            name, raw
        ))
    })?;

    let naive = match bound {
        Bound::Start => date.and_hms_opt(0, 0, 0),
        Bound::End => date.and_hms_nano_opt(23, 59, 59, 999_999_999),
    };
    naive
        .map(|dt| dt.and_utc())
        .ok_or_else(|| PollError::bad_request(format!("Invalid {}: '{}'", name, raw)))
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ListingQuery {
    /// 构造过滤条件；日期无法解析时返回 BadRequest
    pub fn to_filter(&self) -> Result<PollFilter> {
        let mut filter = PollFilter::new();

        if let Some(raw) = non_blank(&self.date_from) {
            filter.push(PollPredicate::PublishedFrom(parse_bound(
                "date_from",
                raw,
                Bound::Start,
            )?));
        }
        if let Some(raw) = non_blank(&self.date_to) {
            filter.push(PollPredicate::PublishedTo(parse_bound(
                "date_to",
                raw,
                Bound::End,
            )?));
        }
        if let Some(search) = non_blank(&self.search) {
            filter.push(PollPredicate::QuestionContains(search.to_string()));
        }

        Ok(filter)
    }

    /// 未知的 sort_by 回退到按日期排序
    pub fn to_sort(&self) -> PollSort {
        let key = match non_blank(&self.sort_by).map(str::to_ascii_lowercase).as_deref() {
            Some("popularity") | Some("votes") => SortKey::Popularity,
            _ => SortKey::Date,
        };
        let order = match non_blank(&self.order) {
            Some(o) if o.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };
        PollSort::new(key, order)
    }
}

impl From<PollSummary> for PollListItem {
    fn from(summary: PollSummary) -> Self {
        Self {
            id: summary.id,
            question: summary.question,
            pub_date: summary.pub_date.to_rfc3339(),
            total_votes: summary.total_votes,
        }
    }
}

pub struct ListingService {
    repository: Arc<dyn PollRepository>,
}

impl ListingService {
    pub fn new(repository: Arc<dyn PollRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &ListingQuery) -> Result<PollListing> {
        info!("Listing: list polls with {:?}", query);

        let filter = query.to_filter()?;
        let sort = query.to_sort();
        let summaries = self.repository.find_filtered(&filter, sort).await?;

        let results: Vec<PollListItem> = summaries.into_iter().map(PollListItem::from).collect();
        debug!("Listing: returned {} polls", results.len());

        Ok(PollListing {
            count: results.len(),
            results,
        })
    }
}
