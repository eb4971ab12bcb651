//! Service layer tests
//!
//! Statistics, listing, export and chart services over a temporary SQLite database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, TimeZone, Utc};
use poll_analytics::config::{ChartConfig, DatabaseConfig};
use poll_analytics::errors::{PollError, Result};
use poll_analytics::services::chart::{BarChart, ChartRenderer, RenderedChart, SVG_MIME_TYPE};
use poll_analytics::services::{
    ChartService, ExportFormat, ExportService, ListingQuery, ListingService, PollStatistics,
    StatisticsService,
};
use poll_analytics::storage::{
    ChoiceTally, Poll, PollFilter, PollRepository, PollSort, PollSummary, SeaOrmStorage,
};
use tempfile::TempDir;

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("services.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        pool_size: 2,
    };

    let storage = SeaOrmStorage::new(&config)
        .await
        .expect("Failed to create storage");

    (Arc::new(storage), temp_dir)
}

fn repo(storage: &Arc<SeaOrmStorage>) -> Arc<dyn PollRepository> {
    storage.clone()
}

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, 9, 30, 0).unwrap()
}

/// 创建投票并按 (选项, 票数) 投票，返回投票 id
async fn create_poll_with_votes(
    storage: &SeaOrmStorage,
    question: &str,
    pub_date: DateTime<Utc>,
    choices: &[(&str, usize)],
) -> i64 {
    let poll = storage.create_poll(question, Some(pub_date)).await.unwrap();
    for (text, votes) in choices {
        let choice_id = storage.add_choice(poll.id, text).await.unwrap();
        storage
            .cast_votes(choice_id, &vec![Utc::now(); *votes])
            .await
            .unwrap();
    }
    poll.id
}

// =============================================================================
// Statistics
// =============================================================================

#[tokio::test]
async fn test_statistics_scenario_a() {
    let (storage, _dir) = create_temp_storage().await;
    let poll_id = create_poll_with_votes(&storage, "Q", day(1), &[("A", 3), ("B", 1)]).await;

    let service = StatisticsService::new(repo(&storage));
    let stats = service.get_statistics(poll_id).await.unwrap();

    assert_eq!(stats.poll_id, poll_id);
    assert_eq!(stats.question, "Q");
    assert_eq!(stats.total_votes, 4);
    assert_eq!(stats.choices.len(), 2);
    assert_eq!(stats.choices[0].choice_text, "A");
    assert_eq!(stats.choices[0].vote_count, 3);
    assert_eq!(stats.choices[0].percentage, 75.0);
    assert_eq!(stats.choices[1].choice_text, "B");
    assert_eq!(stats.choices[1].percentage, 25.0);

    let parsed = DateTime::parse_from_rfc3339(&stats.pub_date).unwrap();
    assert_eq!(parsed.with_timezone(&Utc), day(1));
}

#[tokio::test]
async fn test_statistics_rounding_and_zero_votes() {
    let (storage, _dir) = create_temp_storage().await;
    let poll_id =
        create_poll_with_votes(&storage, "Thirds?", day(1), &[("X", 1), ("Y", 2), ("Z", 0)]).await;

    let stats = StatisticsService::new(repo(&storage))
        .get_statistics(poll_id)
        .await
        .unwrap();

    let pcts: Vec<f64> = stats.choices.iter().map(|c| c.percentage).collect();
    assert_eq!(pcts, vec![33.33, 66.67, 0.0]);
}

#[tokio::test]
async fn test_statistics_poll_without_choices() {
    let (storage, _dir) = create_temp_storage().await;
    let poll_id = create_poll_with_votes(&storage, "B?", day(2), &[]).await;

    let stats = StatisticsService::new(repo(&storage))
        .get_statistics(poll_id)
        .await
        .unwrap();
    assert_eq!(stats.total_votes, 0);
    assert!(stats.choices.is_empty());
}

#[tokio::test]
async fn test_statistics_unknown_poll() {
    let (storage, _dir) = create_temp_storage().await;
    let err = StatisticsService::new(repo(&storage))
        .get_statistics(42)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

/// 投票可以查到，但统计查询总是失败的仓库
struct BrokenTallies {
    poll: Poll,
}

#[async_trait]
impl PollRepository for BrokenTallies {
    async fn find_by_id(&self, poll_id: i64) -> Result<Option<Poll>> {
        Ok((poll_id == self.poll.id).then(|| self.poll.clone()))
    }

    async fn choice_tallies(&self, _poll_id: i64) -> Result<Vec<ChoiceTally>> {
        Err(PollError::database_operation("disk I/O error"))
    }

    async fn find_filtered(
        &self,
        _filter: &PollFilter,
        _sort: PollSort,
    ) -> Result<Vec<PollSummary>> {
        Ok(Vec::new())
    }

    async fn count_votes(&self, _choice_id: i64) -> Result<u64> {
        Err(PollError::database_operation("disk I/O error"))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

fn broken_tallies() -> Arc<dyn PollRepository> {
    Arc::new(BrokenTallies {
        poll: Poll {
            id: 7,
            question: "Broken?".to_string(),
            pub_date: day(1),
        },
    })
}

#[tokio::test]
async fn test_statistics_storage_failure_is_internal() {
    let service = StatisticsService::new(broken_tallies());

    let err = service.get_statistics(7).await.unwrap_err();
    assert!(matches!(err, PollError::Internal(_)), "got {:?}", err);
    assert_eq!(err.message(), "Failed to compute statistics: disk I/O error");

    // 投票不存在时不查询选项，NotFound 原样返回
    let err = service.get_statistics(8).await.unwrap_err();
    assert!(err.is_not_found());
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_listing_sort_by_date_ascending() {
    let (storage, _dir) = create_temp_storage().await;
    create_poll_with_votes(&storage, "day3", day(3), &[]).await;
    create_poll_with_votes(&storage, "day1", day(1), &[]).await;
    create_poll_with_votes(&storage, "day2", day(2), &[]).await;

    let listing = ListingService::new(repo(&storage))
        .list(&ListingQuery {
            sort_by: Some("date".to_string()),
            order: Some("asc".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(listing.count, 3);
    let questions: Vec<&str> = listing.results.iter().map(|p| p.question.as_str()).collect();
    assert_eq!(questions, vec!["day1", "day2", "day3"]);
}

#[tokio::test]
async fn test_listing_default_is_newest_first() {
    let (storage, _dir) = create_temp_storage().await;
    create_poll_with_votes(&storage, "old", day(1), &[]).await;
    create_poll_with_votes(&storage, "new", day(9), &[]).await;

    let listing = ListingService::new(repo(&storage))
        .list(&ListingQuery::default())
        .await
        .unwrap();
    assert_eq!(listing.results[0].question, "new");
}

#[tokio::test]
async fn test_listing_popularity_descending() {
    let (storage, _dir) = create_temp_storage().await;
    create_poll_with_votes(&storage, "two", day(1), &[("a", 2)]).await;
    create_poll_with_votes(&storage, "five", day(2), &[("a", 3), ("b", 2)]).await;
    create_poll_with_votes(&storage, "none", day(3), &[("a", 0)]).await;

    let listing = ListingService::new(repo(&storage))
        .list(&ListingQuery {
            sort_by: Some("popularity".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let totals: Vec<u64> = listing.results.iter().map(|p| p.total_votes).collect();
    assert_eq!(totals, vec![5, 2, 0]);
    assert!(totals.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_listing_combined_filters() {
    let (storage, _dir) = create_temp_storage().await;
    create_poll_with_votes(&storage, "Summer holidays?", day(1), &[]).await;
    create_poll_with_votes(&storage, "Holiday destination?", day(4), &[]).await;
    create_poll_with_votes(&storage, "Lunch options?", day(4), &[]).await;
    create_poll_with_votes(&storage, "Holiday budget?", day(8), &[]).await;

    let listing = ListingService::new(repo(&storage))
        .list(&ListingQuery {
            date_from: Some("2024-03-02".to_string()),
            date_to: Some("2024-03-04".to_string()),
            search: Some("HOLIDAY".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(listing.count, 1);
    assert_eq!(listing.results[0].question, "Holiday destination?");
}

#[tokio::test]
async fn test_listing_invalid_date() {
    let (storage, _dir) = create_temp_storage().await;
    let err = ListingService::new(repo(&storage))
        .list(&ListingQuery {
            date_from: Some("yesterday".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, PollError::BadRequest(_)));
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_export_json_matches_statistics() {
    let (storage, _dir) = create_temp_storage().await;
    let poll_id = create_poll_with_votes(&storage, "Q", day(1), &[("A", 3), ("B", 1)]).await;

    let stats = StatisticsService::new(repo(&storage))
        .get_statistics(poll_id)
        .await
        .unwrap();
    let file = ExportService::new(repo(&storage))
        .export(poll_id, ExportFormat::Json)
        .await
        .unwrap();

    assert_eq!(file.filename, format!("poll_{}_statistics.json", poll_id));
    assert!(file.content_type.starts_with("application/json"));

    let exported: PollStatistics = serde_json::from_slice(&file.body).unwrap();
    assert_eq!(exported, stats);
}

#[tokio::test]
async fn test_export_csv_report() {
    let (storage, _dir) = create_temp_storage().await;
    let poll_id = create_poll_with_votes(
        &storage,
        "Lunch?",
        day(7),
        &[("Soup", 1), ("Salad", 3), ("Bread", 1), ("Pie", 0)],
    )
    .await;

    let file = ExportService::new(repo(&storage))
        .export(poll_id, ExportFormat::Csv)
        .await
        .unwrap();

    assert_eq!(file.filename, format!("poll_{}_statistics.csv", poll_id));
    assert!(file.content_type.starts_with("text/csv"));
    assert!(file.body.starts_with(b"\xEF\xBB\xBF"));

    let text = String::from_utf8(file.body[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.split("\r\n").collect();

    assert_eq!(lines[0], "POLL REPORT");
    assert_eq!(lines[2], "Question;Lunch?");
    assert_eq!(lines[3], "Published;07.03.2024 09:30");
    assert_eq!(lines[4], format!("Poll ID;{}", poll_id));
    assert_eq!(lines[5], "Total votes;5");
    assert_eq!(lines[6], "");
    assert_eq!(lines[7], "DETAILED STATISTICS");
    assert_eq!(lines[8], "Choice;Votes;Percentage (%);Share");

    // 票数降序，同票保持原始顺序
    assert!(lines[9].starts_with("Salad;3;60.0%;"));
    assert!(lines[10].starts_with("Soup;1;20.0%;"));
    assert!(lines[11].starts_with("Bread;1;20.0%;"));
    assert!(lines[12].starts_with("Pie;0;0.0%;"));
    assert_eq!(lines[10].split(';').nth(3), Some("████░░░░░░░░░░░░░░░░"));
    assert_eq!(lines[13], "");
    assert_eq!(lines[14], "Generated by poll analytics;");
}

#[tokio::test]
async fn test_export_unknown_poll() {
    let (storage, _dir) = create_temp_storage().await;
    let err = ExportService::new(repo(&storage))
        .export(7, ExportFormat::Csv)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// =============================================================================
// Chart
// =============================================================================

/// 记录收到的图表并返回固定字节
struct RecordingRenderer {
    seen: Mutex<Vec<BarChart>>,
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, chart: &BarChart) -> Result<RenderedChart> {
        self.seen.lock().unwrap().push(chart.clone());
        Ok(RenderedChart {
            bytes: b"fake-image".to_vec(),
            mime_type: "image/png",
        })
    }
}

struct FailingRenderer;

impl ChartRenderer for FailingRenderer {
    fn render(&self, _chart: &BarChart) -> Result<RenderedChart> {
        Err(PollError::internal("backend exploded"))
    }
}

#[tokio::test]
async fn test_chart_payload_with_svg_renderer() {
    let (storage, _dir) = create_temp_storage().await;
    let poll_id = create_poll_with_votes(&storage, "Q", day(1), &[("A", 3), ("B", 1)]).await;

    let service = ChartService::with_svg(repo(&storage), &ChartConfig::default());
    let payload = service.get_chart(poll_id).await.unwrap();

    assert_eq!(payload.poll_id, poll_id);
    assert_eq!(payload.mime_type, SVG_MIME_TYPE);
    assert_eq!(payload.data.choices, vec!["A", "B"]);
    assert_eq!(payload.data.votes, vec![3, 1]);
    assert_eq!(payload.data.percentages, vec![75.0, 25.0]);

    let svg = String::from_utf8(STANDARD.decode(&payload.chart_base64).unwrap()).unwrap();
    assert!(svg.contains("<svg"));
}

#[tokio::test]
async fn test_chart_uses_injected_renderer() {
    let (storage, _dir) = create_temp_storage().await;
    let poll_id =
        create_poll_with_votes(&storage, "Pick one", day(1), &[("A", 1), ("B", 1), ("C", 2)]).await;

    let renderer = Arc::new(RecordingRenderer {
        seen: Mutex::new(Vec::new()),
    });
    let service = ChartService::new(repo(&storage), renderer.clone(), &ChartConfig::default());
    let payload = service.get_chart(poll_id).await.unwrap();

    assert_eq!(payload.mime_type, "image/png");
    assert_eq!(STANDARD.decode(&payload.chart_base64).unwrap(), b"fake-image");

    let seen = renderer.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].title, "Poll results: Pick one");
    assert_eq!(seen[0].bars.len(), 3);
    assert_eq!(seen[0].bars[2].value, 50.0);
}

#[tokio::test]
async fn test_chart_poll_without_choices() {
    let (storage, _dir) = create_temp_storage().await;
    let poll_id = create_poll_with_votes(&storage, "B?", day(1), &[]).await;

    let err = ChartService::with_svg(repo(&storage), &ChartConfig::default())
        .get_chart(poll_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PollError::BadRequest(_)));
}

#[tokio::test]
async fn test_chart_renderer_failure() {
    let (storage, _dir) = create_temp_storage().await;
    let poll_id = create_poll_with_votes(&storage, "Q", day(1), &[("A", 1)]).await;

    let err = ChartService::new(repo(&storage), Arc::new(FailingRenderer), &ChartConfig::default())
        .get_chart(poll_id)
        .await
        .unwrap_err();
    assert!(matches!(err, PollError::ChartRender(_)));
}
