//! Pipeline driver: load, clean, stage, report, visualize.
//!
//! Every stage runs to completion before the next starts and the first
//! failure ends the run. The database connection lives in the run's
//! [`PipelineContext`] and is released when the context drops.

use crate::charts::{ChartPlotter, ChartSink};
use crate::config::PipelineConfig;
use crate::data::{CleaningReport, DataCleaner, DataLoader};
use crate::report::{ReportSection, Reporter};
use crate::store::SqliteStore;
use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::{debug, info};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub cleaning: CleaningReport,
    pub staged_rows: usize,
    pub sections: Vec<ReportSection>,
    pub charts: Vec<PathBuf>,
}

/// State shared by the stages after loading: the cleaned frame and the
/// open store.
pub struct PipelineContext {
    frame: DataFrame,
    store: SqliteStore,
}

impl PipelineContext {
    pub fn new(frame: DataFrame, store: SqliteStore) -> Self {
        Self { frame, store }
    }

    pub fn stage(&mut self, table: &str) -> Result<usize> {
        let written = self
            .store
            .stage(table, &self.frame)
            .with_context(|| format!("Staging table '{table}' into {}", self.store.path().display()))?;
        debug_assert_eq!(written, self.frame.height());
        Ok(written)
    }

    pub fn report(&self, table: &str) -> Result<Vec<ReportSection>> {
        Reporter::run(&self.store, table).context("Running report queries")
    }

    /// Render every chart in order; charts saved before a failure stay on disk.
    pub fn visualize<S: ChartSink + ?Sized>(
        &self,
        sink: &S,
        config: &PipelineConfig,
    ) -> Result<Vec<PathBuf>> {
        let charts = ChartPlotter::build_all(&self.frame).context("Preparing chart data")?;

        let mut written = Vec::with_capacity(charts.len());
        for chart in &charts {
            let path = config.chart_path(chart.file_name);
            sink.render(chart, &path)
                .with_context(|| format!("Saving chart '{}'", chart.title))?;
            written.push(path);
        }
        Ok(written)
    }
}

/// One-shot report run over a fixed configuration.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn run<S: ChartSink + ?Sized>(&self, sink: &S) -> Result<RunSummary> {
        let config = &self.config;

        let mut frame = DataLoader::load_csv(&config.input_path).context("Loading dataset")?;
        println!("✅ Dataset loaded successfully!\n");

        let cleaning = DataCleaner::clean(&mut frame).context("Cleaning dataset")?;
        println!("{cleaning}");

        let store = SqliteStore::open(&config.database_path).with_context(|| {
            format!("Opening database {}", config.database_path.display())
        })?;
        let mut ctx = PipelineContext::new(frame, store);

        let staged_rows = ctx.stage(&config.table_name)?;
        println!(
            "\n✅ Data loaded into SQLite database: {}",
            config.database_label()
        );

        println!("\n📊 Running SQL Queries...\n");
        let sections = ctx.report(&config.table_name)?;
        println!("{}", Reporter::render(&sections));

        let charts = ctx.visualize(sink, config)?;
        debug!(charts = charts.len(), "charts rendered");

        println!("\n✅ Analysis completed. Charts saved as PNG files in project folder.");
        println!(
            "✅ SQL Queries executed. Database saved as {}",
            config.database_label()
        );
        info!(rows = staged_rows, "report run complete");

        Ok(RunSummary {
            cleaning,
            staged_rows,
            sections,
            charts,
        })
    }
}
