//! Fixed file names and locations for one report run.

use std::path::{Path, PathBuf};

pub const INPUT_FILE: &str = "Superstore.csv";
pub const DATABASE_FILE: &str = "superstore.db";
pub const TABLE_NAME: &str = "superstore";

/// Where the pipeline reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub database_path: PathBuf,
    pub table_name: String,
    pub output_dir: PathBuf,
    /// Open each saved chart in the system image viewer.
    pub show_charts: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::in_dir(".", true)
    }
}

impl PipelineConfig {
    /// All inputs and outputs under `dir`, with the fixed file names.
    pub fn in_dir(dir: impl AsRef<Path>, show_charts: bool) -> Self {
        let dir = dir.as_ref();
        Self {
            input_path: dir.join(INPUT_FILE),
            database_path: dir.join(DATABASE_FILE),
            table_name: TABLE_NAME.to_string(),
            output_dir: dir.to_path_buf(),
            show_charts,
        }
    }

    pub fn chart_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Database path as printed to the console, without a leading `./`.
    pub fn database_label(&self) -> String {
        self.database_path
            .strip_prefix(".")
            .unwrap_or(self.database_path.as_path())
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_working_directory_names() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_path, Path::new(".").join("Superstore.csv"));
        assert_eq!(config.database_path, Path::new(".").join("superstore.db"));
        assert_eq!(config.table_name, "superstore");
        assert!(config.show_charts);
    }

    #[test]
    fn database_label_drops_current_dir_prefix() {
        assert_eq!(PipelineConfig::default().database_label(), "superstore.db");
        assert_eq!(
            PipelineConfig::in_dir("/tmp/report", false).database_label(),
            "/tmp/report/superstore.db"
        );
    }

    #[test]
    fn chart_paths_live_in_output_dir() {
        let config = PipelineConfig::in_dir("/tmp/report", false);
        assert_eq!(
            config.chart_path("sales_by_region.png"),
            PathBuf::from("/tmp/report/sales_by_region.png")
        );
    }
}
