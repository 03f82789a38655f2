//! Chart Plotter Module
//! Derives the five report charts from the cleaned frame.

use crate::stats::{Aggregator, GroupTotal, MonthTotal, ScatterGroup};
use plotters::style::RGBColor;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Categorical palette for scatter groups.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(76, 114, 176),  // Blue
    RGBColor(221, 132, 82),  // Orange
    RGBColor(85, 168, 104),  // Green
    RGBColor(196, 78, 82),   // Red
    RGBColor(129, 114, 179), // Purple
    RGBColor(147, 120, 96),  // Brown
    RGBColor(218, 139, 195), // Pink
    RGBColor(140, 140, 140), // Grey
    RGBColor(204, 185, 116), // Olive
    RGBColor(100, 181, 205), // Cyan
];

const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

const COOLWARM: [RGBColor; 3] = [
    RGBColor(59, 76, 192),
    RGBColor(221, 221, 221),
    RGBColor(180, 4, 38),
];

const SET2: [RGBColor; 8] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
    RGBColor(229, 196, 148),
    RGBColor(179, 179, 179),
];

/// Bar colouring schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Viridis,
    Coolwarm,
    Set2,
}

impl Palette {
    /// One colour per bar. Sequential maps are sampled evenly, Set2 cycles.
    pub fn colors(&self, n: usize) -> Vec<RGBColor> {
        match self {
            Palette::Viridis => Self::sample(&VIRIDIS, n),
            Palette::Coolwarm => Self::sample(&COOLWARM, n),
            Palette::Set2 => SET2.iter().copied().cycle().take(n).collect(),
        }
    }

    fn sample(anchors: &[RGBColor], n: usize) -> Vec<RGBColor> {
        (0..n)
            .map(|i| {
                let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 };
                Self::interpolate(anchors, t)
            })
            .collect()
    }

    fn interpolate(anchors: &[RGBColor], t: f64) -> RGBColor {
        let segments = anchors.len().saturating_sub(1);
        if segments == 0 {
            return anchors.first().copied().unwrap_or(RGBColor(0, 0, 0));
        }
        let pos = t.clamp(0.0, 1.0) * segments as f64;
        let idx = (pos.floor() as usize).min(segments - 1);
        let frac = pos - idx as f64;

        let RGBColor(r0, g0, b0) = anchors[idx];
        let RGBColor(r1, g1, b1) = anchors[idx + 1];
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
    }
}

/// Series data of a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Bar {
        bars: Vec<GroupTotal>,
        palette: Palette,
        rotate_labels: bool,
    },
    Scatter {
        groups: Vec<ScatterGroup>,
    },
    Line {
        points: Vec<MonthTotal>,
    },
}

/// A fully derived chart: where it goes, how it is labelled, what it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub file_name: &'static str,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub size: (u32, u32),
    pub data: ChartData,
}

/// Builds the report's chart definitions.
pub struct ChartPlotter;

impl ChartPlotter {
    /// All five charts, in render order.
    pub fn build_all(df: &DataFrame) -> Result<Vec<ChartSpec>, ChartError> {
        Ok(vec![
            Self::bar(
                df,
                "sales_by_category.png",
                "Total Sales by Category",
                "Category",
                "Sales",
                (800, 500),
                Palette::Viridis,
                false,
            )?,
            Self::bar(
                df,
                "profit_by_subcategory.png",
                "Profit by Sub-Category",
                "Sub-Category",
                "Profit",
                (1200, 600),
                Palette::Coolwarm,
                true,
            )?,
            Self::bar(
                df,
                "sales_by_region.png",
                "Sales by Region",
                "Region",
                "Sales",
                (800, 500),
                Palette::Set2,
                false,
            )?,
            ChartSpec {
                file_name: "sales_vs_profit.png",
                title: "Sales vs Profit (Colored by Category)",
                x_label: "Sales",
                y_label: "Profit",
                size: (800, 600),
                data: ChartData::Scatter {
                    groups: Aggregator::scatter_groups(df, "Sales", "Profit", "Category")?,
                },
            },
            ChartSpec {
                file_name: "monthly_sales_trend.png",
                title: "Monthly Sales Trend",
                x_label: "Month",
                y_label: "Sales",
                size: (1200, 600),
                data: ChartData::Line {
                    points: Aggregator::monthly_totals(df, "Order Date", "Sales")?,
                },
            },
        ])
    }

    /// Bar chart of `value` summed per `key`; axes take the column names.
    #[allow(clippy::too_many_arguments)]
    fn bar(
        df: &DataFrame,
        file_name: &'static str,
        title: &'static str,
        key: &'static str,
        value: &'static str,
        size: (u32, u32),
        palette: Palette,
        rotate_labels: bool,
    ) -> Result<ChartSpec, ChartError> {
        Ok(ChartSpec {
            file_name,
            title,
            x_label: key,
            y_label: value,
            size,
            data: ChartData::Bar {
                bars: Aggregator::sum_by(df, key, value)?,
                palette,
                rotate_labels,
            },
        })
    }
}
