//! plotters-backed SVG bar chart renderer

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::renderer::{BarChart, ChartRenderer, RenderedChart};
use crate::config::ChartConfig;
use crate::errors::{PollError, Result};

pub const SVG_MIME_TYPE: &str = "image/svg+xml";

const FONT_FAMILY: &str = "sans-serif";

fn render_err<E: std::fmt::Display>(e: E) -> PollError {
    PollError::chart_render(format!("Failed to render chart: {}", e))
}

pub struct SvgBarChartRenderer {
    width: u32,
    height: u32,
}

impl SvgBarChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(200),
            height: height.max(200),
        }
    }

    pub fn from_config(config: &ChartConfig) -> Self {
        Self::new(config.width, config.height)
    }
}

impl Default for SvgBarChartRenderer {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

/// x 轴分段布局：`0..=upper` 共 upper + 1 个分段，第 i 根柱子位于分段 i + offset
///
/// n >= 2 时分段与柱子一一对应；单根柱子放在三个分段的中间，保持居中。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisLayout {
    offset: u32,
    upper: u32,
}

impl AxisLayout {
    fn for_bars(n: u32) -> Self {
        if n == 1 {
            Self { offset: 1, upper: 2 }
        } else {
            Self { offset: 0, upper: n - 1 }
        }
    }

    fn segments(&self) -> usize {
        self.upper as usize + 1
    }

    fn span(&self, i: u32) -> (SegmentValue<u32>, SegmentValue<u32>) {
        let pos = i + self.offset;
        let right = if pos < self.upper {
            SegmentValue::Exact(pos + 1)
        } else {
            SegmentValue::Last
        };
        (SegmentValue::Exact(pos), right)
    }

    fn center(&self, i: u32) -> SegmentValue<u32> {
        SegmentValue::CenterOf(i + self.offset)
    }

    fn bar_at(&self, segment: u32) -> Option<usize> {
        segment.checked_sub(self.offset).map(|i| i as usize)
    }
}

impl ChartRenderer for SvgBarChartRenderer {
    fn render(&self, chart: &BarChart) -> Result<RenderedChart> {
        let n = chart.bars.len() as u32;
        if n == 0 {
            return Err(PollError::chart_render("Chart has no bars"));
        }

        let layout = AxisLayout::for_bars(n);
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let mut ctx = ChartBuilder::on(&root)
                .caption(&chart.title, (FONT_FAMILY, 22))
                .margin(20)
                .x_label_area_size(140)
                .y_label_area_size(60)
                .build_cartesian_2d((0u32..layout.upper).into_segmented(), 0f64..chart.y_max())
                .map_err(render_err)?;

            ctx.configure_mesh()
                .disable_x_mesh()
                .x_desc(chart.x_desc.as_str())
                .y_desc(chart.y_desc.as_str())
                .x_labels(layout.segments())
                .x_label_style((FONT_FAMILY, 13).into_font().transform(FontTransform::Rotate90))
                .x_label_formatter(&|v| match v {
                    SegmentValue::CenterOf(segment) => layout
                        .bar_at(*segment)
                        .and_then(|i| labels.get(i))
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    _ => String::new(),
                })
                .y_label_formatter(&|v| format!("{:.0}", v))
                .draw()
                .map_err(render_err)?;

            ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
                let (left, right) = layout.span(i as u32);
                let color = RGBColor(bar.color.0, bar.color.1, bar.color.2);
                let mut rect = Rectangle::new(
                    [(left, 0.0), (right, bar.value)],
                    color.mix(0.85).filled(),
                );
                rect.set_margin(0, 0, 10, 10);
                rect
            }))
            .map_err(render_err)?;

            let annotation_style = TextStyle::from((FONT_FAMILY, 14).into_font())
                .pos(Pos::new(HPos::Center, VPos::Bottom));
            ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
                Text::new(
                    bar.annotation.clone(),
                    (layout.center(i as u32), bar.value),
                    annotation_style.clone(),
                )
            }))
            .map_err(render_err)?;

            root.present().map_err(render_err)?;
        }

        Ok(RenderedChart {
            bytes: svg.into_bytes(),
            mime_type: SVG_MIME_TYPE,
        })
    }
}
