//! Chart service
//!
//! Builds a bar chart of a poll's vote shares, renders it through a
//! [`ChartRenderer`] and returns the image as base64 together with the
//! numbers it was drawn from.

mod renderer;
mod svg;

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::ChartConfig;
use crate::errors::{PollError, Result};
use crate::services::statistics_service::{percentage, round2, total_of};
use crate::storage::{ChoiceTally, PollRepository};

pub use renderer::{Bar, BarChart, BarColor, ChartRenderer, RenderedChart};
pub use svg::{SVG_MIME_TYPE, SvgBarChartRenderer};

/// 柱子配色，按顺序循环使用
pub const PALETTE: [&str; 8] = [
    "#667eea", "#764ba2", "#f093fb", "#4facfe", "#00f2fe", "#43e97b", "#fa709a", "#fee140",
];

pub const TITLE_PREFIX: &str = "Poll results: ";
pub const X_AXIS_DESC: &str = "Choices";
pub const Y_AXIS_DESC: &str = "Share of votes (%)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub choices: Vec<String>,
    pub votes: Vec<u64>,
    pub percentages: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub poll_id: i64,
    pub question: String,
    pub chart_base64: String,
    pub mime_type: String,
    pub data: ChartData,
}

fn palette_color(index: usize) -> BarColor {
    BarColor::from_hex(PALETTE[index % PALETTE.len()]).unwrap_or(BarColor(0x66, 0x7e, 0xea))
}

/// 截取前 max_chars 个字符作为标题
pub fn chart_title(question: &str, max_chars: usize) -> String {
    let truncated: String = question.chars().take(max_chars).collect();
    format!("{}{}", TITLE_PREFIX, truncated)
}

/// 由选项票数构造柱状图描述（柱高使用未取整的百分比）
pub fn build_bar_chart(question: &str, tallies: &[ChoiceTally], title_max_chars: usize) -> BarChart {
    let total = total_of(tallies);
    let bars = tallies
        .iter()
        .enumerate()
        .map(|(i, tally)| {
            let pct = percentage(tally.vote_count, total);
            Bar {
                label: tally.choice_text.clone(),
                value: pct,
                annotation: format!("{} ({:.1}%)", tally.vote_count, pct),
                color: palette_color(i),
            }
        })
        .collect();

    BarChart {
        title: chart_title(question, title_max_chars),
        x_desc: X_AXIS_DESC.to_string(),
        y_desc: Y_AXIS_DESC.to_string(),
        bars,
    }
}

pub fn chart_data(tallies: &[ChoiceTally]) -> ChartData {
    let total = total_of(tallies);
    ChartData {
        choices: tallies.iter().map(|t| t.choice_text.clone()).collect(),
        votes: tallies.iter().map(|t| t.vote_count).collect(),
        percentages: tallies
            .iter()
            .map(|t| round2(percentage(t.vote_count, total)))
            .collect(),
    }
}

pub struct ChartService {
    repository: Arc<dyn PollRepository>,
    renderer: Arc<dyn ChartRenderer>,
    title_max_chars: usize,
}

impl ChartService {
    pub fn new(
        repository: Arc<dyn PollRepository>,
        renderer: Arc<dyn ChartRenderer>,
        config: &ChartConfig,
    ) -> Self {
        Self {
            repository,
            renderer,
            title_max_chars: config.title_max_chars,
        }
    }

    /// 使用默认 SVG 渲染器
    pub fn with_svg(repository: Arc<dyn PollRepository>, config: &ChartConfig) -> Self {
        Self::new(
            repository,
            Arc::new(SvgBarChartRenderer::from_config(config)),
            config,
        )
    }

    pub async fn get_chart(&self, poll_id: i64) -> Result<ChartPayload> {
        info!("Chart: get_chart poll_id={}", poll_id);

        let poll = self
            .repository
            .find_by_id(poll_id)
            .await?
            .ok_or_else(|| PollError::poll_not_found(poll_id))?;

        let tallies = self.repository.choice_tallies(poll_id).await?;
        if tallies.is_empty() {
            return Err(PollError::bad_request("No choices to display"));
        }

        let bar_chart = build_bar_chart(&poll.question, &tallies, self.title_max_chars);
        let rendered = self.renderer.render(&bar_chart).map_err(|e| {
            error!("Chart rendering for poll {} failed: {}", poll_id, e);
            match e {
                PollError::ChartRender(_) => e,
                other => PollError::chart_render(other.message()),
            }
        })?;

        debug!(
            "Chart: poll {} rendered {} bars into {} bytes",
            poll_id,
            bar_chart.bars.len(),
            rendered.bytes.len()
        );

        Ok(ChartPayload {
            poll_id: poll.id,
            question: poll.question,
            chart_base64: STANDARD.encode(&rendered.bytes),
            mime_type: rendered.mime_type.to_string(),
            data: chart_data(&tallies),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(id: i64, text: &str, votes: u64) -> ChoiceTally {
        ChoiceTally {
            choice_id: id,
            choice_text: text.to_string(),
            vote_count: votes,
        }
    }

    #[test]
    fn test_chart_title_truncates_by_chars() {
        let question = "é".repeat(60);
        let title = chart_title(&question, 50);
        assert_eq!(title.chars().count(), TITLE_PREFIX.len() + 50);
        assert_eq!(chart_title("Short?", 50), "Poll results: Short?");
    }

    #[test]
    fn test_build_bar_chart() {
        let bar_chart = build_bar_chart("A", &[tally(1, "X", 3), tally(2, "Y", 1)], 50);

        assert_eq!(bar_chart.title, "Poll results: A");
        assert_eq!(bar_chart.x_desc, "Choices");
        assert_eq!(bar_chart.bars[0].value, 75.0);
        assert_eq!(bar_chart.bars[0].annotation, "3 (75.0%)");
        assert_eq!(bar_chart.bars[1].annotation, "1 (25.0%)");
        assert_eq!(bar_chart.bars[0].color.to_hex(), "#667eea");
        assert_eq!(bar_chart.bars[1].color.to_hex(), "#764ba2");
    }

    #[test]
    fn test_palette_cycles() {
        let tallies: Vec<ChoiceTally> = (0..10).map(|i| tally(i, "c", 1)).collect();
        let bar_chart = build_bar_chart("Q", &tallies, 50);
        assert_eq!(bar_chart.bars[8].color, bar_chart.bars[0].color);
        assert_eq!(bar_chart.bars[9].color.to_hex(), "#764ba2");
    }

    #[test]
    fn test_chart_data_rounds_percentages() {
        let data = chart_data(&[tally(1, "a", 1), tally(2, "b", 2)]);
        assert_eq!(data.choices, ["a", "b"]);
        assert_eq!(data.votes, [1, 2]);
        assert_eq!(data.percentages, [33.33, 66.67]);
    }

    #[test]
    fn test_unrounded_bar_heights() {
        let bar_chart = build_bar_chart("Q", &[tally(1, "a", 1), tally(2, "b", 2)], 50);
        assert!((bar_chart.bars[0].value - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(bar_chart.bars[0].annotation, "1 (33.3%)");
    }

    #[test]
    fn test_zero_votes_chart() {
        let bar_chart = build_bar_chart("Q", &[tally(1, "a", 0)], 50);
        assert_eq!(bar_chart.bars[0].value, 0.0);
        assert_eq!(bar_chart.bars[0].annotation, "0 (0.0%)");
    }
}
