//! Superstore Report - sales dataset ETL, SQL summary and charts
//!
//! Reads `Superstore.csv`, stages it into `superstore.db`, prints the
//! aggregate report and writes the chart PNGs to the working directory.

use anyhow::Result;
use superstore_report::charts::StaticChartRenderer;
use superstore_report::config::PipelineConfig;
use superstore_report::pipeline::Pipeline;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report itself.
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let config = PipelineConfig::default();
    info!(input = %config.input_path.display(), "startup");

    let renderer = StaticChartRenderer::new(config.show_charts);
    Pipeline::new(config).run(&renderer)?;
    Ok(())
}
