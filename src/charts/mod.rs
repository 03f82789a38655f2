//! Charts module - Chart derivation and rendering

mod plotter;
mod renderer;

pub use plotter::{ChartData, ChartError, ChartPlotter, ChartSpec, Palette, PALETTE};
pub use renderer::{ChartSink, RenderError, StaticChartRenderer};
