//! Export service
//!
//! Renders poll statistics as a downloadable JSON document or as a
//! spreadsheet-friendly CSV report.

use std::sync::Arc;

use strum::{AsRefStr, Display};
use tracing::{debug, info};

use crate::errors::{PollError, Result};
use crate::services::statistics_service::{PollStatistics, build_statistics};
use crate::storage::{Poll, PollRepository};

/// UTF-8 BOM，Excel 依赖它识别编码
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const CRLF: &[u8] = b"\r\n";
const BAR_WIDTH: usize = 20;
const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '░';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// 不区分大小写；除 csv 以外一律按 JSON 处理
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json; charset=utf-8",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// 导出结果（文件名 + 内容类型 + 字节）
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

pub fn export_filename(poll_id: i64, format: ExportFormat) -> String {
    format!("poll_{}_statistics.{}", poll_id, format)
}

/// 文本进度条：每 5% 一个实心字符，共 20 个字符
pub fn proportion_bar(percentage: f64) -> String {
    let filled = (percentage / 5.0).round_ties_even().clamp(0.0, BAR_WIDTH as f64) as usize;
    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    bar.extend(std::iter::repeat_n(BAR_FILLED, filled));
    bar.extend(std::iter::repeat_n(BAR_EMPTY, BAR_WIDTH - filled));
    bar
}

/// 百分比文本，整数值保留一位小数（75.0%）
pub fn format_percentage(percentage: f64) -> String {
    if percentage.fract() == 0.0 {
        format!("{:.1}%", percentage)
    } else {
        format!("{}%", percentage)
    }
}

pub fn render_json(statistics: &PollStatistics) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(statistics)?)
}

/// 单行 CSV 编码（分号分隔，CRLF 结尾，必要时加引号）
fn encode_row<I, T>(fields: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .terminator(csv::Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(fields)?;
    writer
        .into_inner()
        .map_err(|e| PollError::serialization(format!("Failed to flush CSV row: {}", e)))
}

/// 生成 CSV 报表；选项按票数降序（稳定排序）
pub fn render_csv_report(poll: &Poll, statistics: &PollStatistics) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(512);
    out.extend_from_slice(UTF8_BOM);

    let published = poll.pub_date.format("%d.%m.%Y %H:%M").to_string();
    let poll_id = statistics.poll_id.to_string();
    let total = statistics.total_votes.to_string();

    out.extend(encode_row(["POLL REPORT"])?);
    out.extend(encode_row(["-".repeat(40)])?);
    out.extend(encode_row(["Question", statistics.question.as_str()])?);
    out.extend(encode_row(["Published", published.as_str()])?);
    out.extend(encode_row(["Poll ID", poll_id.as_str()])?);
    out.extend(encode_row(["Total votes", total.as_str()])?);
    out.extend_from_slice(CRLF);
    out.extend(encode_row(["DETAILED STATISTICS"])?);
    out.extend(encode_row(["Choice", "Votes", "Percentage (%)", "Share"])?);

    let mut sorted: Vec<_> = statistics.choices.iter().collect();
    sorted.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));

    for choice in sorted {
        out.extend(encode_row([
            choice.choice_text.clone(),
            choice.vote_count.to_string(),
            format_percentage(choice.percentage),
            proportion_bar(choice.percentage),
        ])?);
    }

    out.extend_from_slice(CRLF);
    out.extend(encode_row(["Generated by poll analytics", ""])?);

    Ok(out)
}

pub struct ExportService {
    repository: Arc<dyn PollRepository>,
}

impl ExportService {
    pub fn new(repository: Arc<dyn PollRepository>) -> Self {
        Self { repository }
    }

    pub async fn export(&self, poll_id: i64, format: ExportFormat) -> Result<ExportFile> {
        info!("Export: poll_id={}, format={}", poll_id, format);

        let poll = self
            .repository
            .find_by_id(poll_id)
            .await?
            .ok_or_else(|| PollError::poll_not_found(poll_id))?;
        let tallies = self.repository.choice_tallies(poll_id).await?;
        let statistics = build_statistics(&poll, tallies);

        let body = match format {
            ExportFormat::Json => render_json(&statistics)?,
            ExportFormat::Csv => render_csv_report(&poll, &statistics)?,
        };

        debug!("Export: poll {} rendered {} bytes", poll_id, body.len());
        Ok(ExportFile {
            filename: export_filename(poll_id, format),
            content_type: format.content_type(),
            body,
        })
    }
}
