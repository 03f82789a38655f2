//! Static Chart Renderer
//! Draws chart specs to PNG files with Plotters.
//!
//! Layout per chart:
//! 1. Title centered above the plot
//! 2. Plot area with axis descriptions and a light grid
//! 3. Legend (scatter only) in the upper left

use crate::charts::{ChartData, ChartSpec, Palette, PALETTE};
use crate::stats::{GroupTotal, MonthTotal, ScatterGroup};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 24;
const LABEL_SIZE: u32 = 14;
const LINE_COLOR: RGBColor = RGBColor(76, 114, 176);
const GRID_COLOR: RGBColor = RGBColor(225, 225, 225);

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to render chart {}: {message}", path.display())]
    Draw { path: PathBuf, message: String },
}

/// Anything that can turn a [`ChartSpec`] into a file.
pub trait ChartSink {
    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), RenderError>;
}

/// Writes PNG images and optionally opens them in the system viewer.
pub struct StaticChartRenderer {
    show_charts: bool,
}

impl StaticChartRenderer {
    pub fn new(show_charts: bool) -> Self {
        Self { show_charts }
    }

    fn draw(chart: &ChartSpec, path: &Path) -> DrawResult {
        let root = BitMapBackend::new(path, chart.size).into_drawing_area();
        root.fill(&WHITE)?;

        match &chart.data {
            ChartData::Bar {
                bars,
                palette,
                rotate_labels,
            } => Self::draw_bar(&root, chart, bars, *palette, *rotate_labels)?,
            ChartData::Scatter { groups } => Self::draw_scatter(&root, chart, groups)?,
            ChartData::Line { points } => Self::draw_line(&root, chart, points)?,
        }

        root.present()?;
        Ok(())
    }

    fn draw_bar(
        root: &Area<'_>,
        chart: &ChartSpec,
        bars: &[GroupTotal],
        palette: Palette,
        rotate_labels: bool,
    ) -> DrawResult {
        let (y_min, y_max) = Self::get_y_range(bars.iter().map(|b| b.total));
        let n = bars.len().max(1) as u32;

        let mut ctx = ChartBuilder::on(root)
            .caption(chart.title, (FONT, TITLE_SIZE).into_font())
            .margin(15)
            .x_label_area_size(if rotate_labels { 130 } else { 45 })
            .y_label_area_size(80)
            .build_cartesian_2d((0u32..n).into_segmented(), y_min..y_max)?;

        let label_of = |v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) => bars
                .get(*i as usize)
                .map(|b| b.label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };
        let x_label_style = if rotate_labels {
            (FONT, LABEL_SIZE).into_font().transform(FontTransform::Rotate90)
        } else {
            (FONT, LABEL_SIZE).into_font()
        };

        ctx.configure_mesh()
            .disable_x_mesh()
            .light_line_style(WHITE)
            .bold_line_style(GRID_COLOR)
            .x_labels(bars.len().max(1))
            .x_label_formatter(&label_of)
            .x_label_style(x_label_style)
            .y_label_formatter(&|v| format!("{:.0}", v))
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .draw()?;

        let colors = palette.colors(bars.len());
        ctx.draw_series(bars.iter().zip(colors).enumerate().map(|(i, (bar, color))| {
            let i = i as u32;
            let mut rect = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), bar.total)],
                color.filled(),
            );
            rect.set_margin(0, 0, 8, 8);
            rect
        }))?;

        Ok(())
    }

    fn draw_scatter(root: &Area<'_>, chart: &ChartSpec, groups: &[ScatterGroup]) -> DrawResult {
        let points = || groups.iter().flat_map(|g| g.points.iter());
        let (x_min, x_max) = Self::get_range(points().map(|p| p.0));
        let (y_min, y_max) = Self::get_range(points().map(|p| p.1));

        let mut ctx = ChartBuilder::on(root)
            .caption(chart.title, (FONT, TITLE_SIZE).into_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        ctx.configure_mesh()
            .light_line_style(WHITE)
            .bold_line_style(GRID_COLOR)
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()?;

        for (group, color) in groups.iter().zip(PALETTE.iter().cycle()) {
            let color = *color;
            ctx.draw_series(
                group
                    .points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.7).filled())),
            )?
            .label(group.label.as_str())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        Ok(())
    }

    fn draw_line(root: &Area<'_>, chart: &ChartSpec, points: &[MonthTotal]) -> DrawResult {
        let (y_min, y_max) = Self::get_range(points.iter().map(|p| p.total));
        let last = points.len().saturating_sub(1) as f64;

        let mut ctx = ChartBuilder::on(root)
            .caption(chart.title, (FONT, TITLE_SIZE).into_font())
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5..last + 0.5, y_min..y_max)?;

        // Month labels sit on integer positions; fractional ticks stay blank.
        let labels: Vec<String> = points.iter().map(MonthTotal::label).collect();
        let month_of = |v: &f64| {
            let idx = v.round();
            if (v - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        };

        ctx.configure_mesh()
            .light_line_style(WHITE)
            .bold_line_style(GRID_COLOR)
            .x_labels(points.len().clamp(1, 12))
            .x_label_formatter(&month_of)
            .y_label_formatter(&|v| format!("{:.0}", v))
            .x_desc(chart.x_label)
            .y_desc(chart.y_label)
            .draw()?;

        ctx.draw_series(LineSeries::new(
            points.iter().enumerate().map(|(i, p)| (i as f64, p.total)),
            LINE_COLOR.stroke_width(2),
        ))?;

        Ok(())
    }

    /// Value axis range for bars: always includes zero, padded away from it.
    fn get_y_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let (min, max) = values
            .filter(|v| v.is_finite())
            .fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if max - min <= f64::EPSILON {
            return (0.0, 1.0);
        }
        let pad = (max - min) * 0.08;
        (
            if min < 0.0 { min - pad } else { 0.0 },
            if max > 0.0 { max + pad } else { 0.0 },
        )
    }

    /// Data range padded on both sides, for scatter and line axes.
    fn get_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let (min, max) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min.is_infinite() {
            return (0.0, 1.0);
        }
        let pad = if max - min > f64::EPSILON {
            (max - min) * 0.05
        } else {
            min.abs().max(1.0) * 0.1
        };
        (min - pad, max + pad)
    }
}

impl ChartSink for StaticChartRenderer {
    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), RenderError> {
        Self::draw(chart, path).map_err(|err| RenderError::Draw {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        info!(path = %path.display(), title = chart.title, "saved chart");

        if self.show_charts {
            if let Err(err) = open::that(path) {
                warn!(path = %path.display(), error = %err, "could not open chart viewer");
            }
        }
        Ok(())
    }
}
