//! Statistics service
//!
//! Per-choice vote counts and percentages for a single poll. `StatisticsService`
//! backs the statistics endpoint. The export service calls `build_statistics`
//! directly and the chart service uses the percentage helpers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::errors::{PollError, Result};
use crate::storage::{ChoiceTally, Poll, PollRepository};

/// 单个选项的统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceStatistics {
    pub choice_text: String,
    pub vote_count: u64,
    pub percentage: f64,
}

/// 投票统计结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollStatistics {
    pub poll_id: i64,
    pub question: String,
    /// RFC 3339
    pub pub_date: String,
    pub total_votes: u64,
    pub choices: Vec<ChoiceStatistics>,
}

/// 未取整的百分比，总票数为 0 时返回 0
pub fn percentage(vote_count: u64, total_votes: u64) -> f64 {
    if total_votes == 0 {
        0.0
    } else {
        vote_count as f64 / total_votes as f64 * 100.0
    }
}

/// 保留两位小数，恰好落在中点时取偶数（3.125 -> 3.12）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

pub fn total_of(tallies: &[ChoiceTally]) -> u64 {
    tallies.iter().map(|t| t.vote_count).sum()
}

/// 由投票和选项票数构造统计结果
pub fn build_statistics(poll: &Poll, tallies: Vec<ChoiceTally>) -> PollStatistics {
    let total_votes = total_of(&tallies);
    let choices = tallies
        .into_iter()
        .map(|t| ChoiceStatistics {
            percentage: round2(percentage(t.vote_count, total_votes)),
            choice_text: t.choice_text,
            vote_count: t.vote_count,
        })
        .collect();

    PollStatistics {
        poll_id: poll.id,
        question: poll.question.clone(),
        pub_date: poll.pub_date.to_rfc3339(),
        total_votes,
        choices,
    }
}

pub struct StatisticsService {
    repository: Arc<dyn PollRepository>,
}

impl StatisticsService {
    pub fn new(repository: Arc<dyn PollRepository>) -> Self {
        Self { repository }
    }

    /// 计算投票统计
    ///
    /// 投票不存在时返回 NotFound；其他失败统一包装为 Internal。
    pub async fn get_statistics(&self, poll_id: i64) -> Result<PollStatistics> {
        info!("Statistics: get_statistics poll_id={}", poll_id);

        self.compute(poll_id).await.map_err(|e| {
            if e.is_not_found() {
                e
            } else {
                error!("Statistics for poll {} failed: {}", poll_id, e);
                PollError::internal(format!("Failed to compute statistics: {}", e.message()))
            }
        })
    }

    async fn compute(&self, poll_id: i64) -> Result<PollStatistics> {
        let poll = self
            .repository
            .find_by_id(poll_id)
            .await?
            .ok_or_else(|| PollError::poll_not_found(poll_id))?;

        let tallies = self.repository.choice_tallies(poll_id).await?;
        let statistics = build_statistics(&poll, tallies);

        debug!(
            "Statistics: poll {} has {} choices, {} votes",
            poll_id,
            statistics.choices.len(),
            statistics.total_votes
        );
        Ok(statistics)
    }
}
