//! CSV Data Loader Module
//! Reads the sales CSV (Latin-1 text) into a Polars DataFrame.

use encoding_rs::WINDOWS_1252;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Columns every downstream stage relies on.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Order Date",
    "Ship Date",
    "Sales",
    "Profit",
    "Discount",
    "Region",
    "Category",
    "Sub-Category",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found at {}. Please check the dataset path.", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' is missing from the dataset")]
    MissingColumn(String),
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file, decoding it as Windows-1252 (the `latin1` label).
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.exists() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let raw = std::fs::read(file_path).map_err(|source| LoaderError::Io {
            path: file_path.to_path_buf(),
            source,
        })?;
        debug!(bytes = raw.len(), path = %file_path.display(), "read input file");

        let df = Self::parse_bytes(&raw)?;
        info!(
            rows = df.height(),
            columns = df.width(),
            path = %file_path.display(),
            "loaded dataset"
        );
        Ok(df)
    }

    /// Decode Latin-1 bytes and parse them as CSV with a header row.
    ///
    /// Date columns stay as text here; the cleaner retypes them.
    pub fn parse_bytes(raw: &[u8]) -> Result<DataFrame, LoaderError> {
        let (text, _, _) = WINDOWS_1252.decode(raw);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
            .finish()?;

        Self::check_required_columns(&df)?;
        Ok(df)
    }

    fn check_required_columns(df: &DataFrame) -> Result<(), LoaderError> {
        match REQUIRED_COLUMNS
            .iter()
            .find(|name| df.get_column_index(name).is_none())
        {
            Some(missing) => Err(LoaderError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Row ID,Order Date,Ship Date,Customer Name,Region,Category,Sub-Category,Sales,Discount,Profit\n";

    #[test]
    fn missing_file_names_the_path() {
        let err = DataLoader::load_csv(Path::new("no/such/Superstore.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
        assert!(err.to_string().contains("no/such/Superstore.csv"));
    }

    #[test]
    fn decodes_latin1_text() {
        let mut raw = HEADER.as_bytes().to_vec();
        // "Zoë" in Windows-1252
        raw.extend_from_slice(b"1,11/8/2016,11/11/2016,Zo\xEB,South,Furniture,Chairs,731.94,0,219.582\n");

        let df = DataLoader::parse_bytes(&raw).unwrap();
        let names = df.column("Customer Name").unwrap().str().unwrap().get(0);
        assert_eq!(names, Some("Zoë"));
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn keeps_dates_as_text_and_extra_columns() {
        let raw = format!("{HEADER}1,11/8/2016,11/11/2016,Claire,South,Furniture,Bookcases,261.96,0,41.9136\n");
        let df = DataLoader::parse_bytes(raw.as_bytes()).unwrap();

        assert_eq!(df.column("Order Date").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Sales").unwrap().dtype(), &DataType::Float64);
        assert!(df.get_column_index("Row ID").is_some());
    }

    #[test]
    fn late_decimal_widens_integer_looking_column() {
        let mut raw = HEADER.to_string();
        for i in 0..10_000 {
            raw.push_str(&format!("{i},1/3/2017,1/5/2017,A,West,Furniture,Chairs,10,0,1\n"));
        }
        raw.push_str("10000,1/3/2017,1/5/2017,B,East,Technology,Phones,20,0.2,3\n");

        let df = DataLoader::parse_bytes(raw.as_bytes()).unwrap();
        let discount = df.column("Discount").unwrap();
        assert_eq!(discount.dtype(), &DataType::Float64);
        assert_eq!(discount.f64().unwrap().get(10_000), Some(0.2));
        assert_eq!(df.height(), 10_001);
    }

    #[test]
    fn rejects_missing_required_column() {
        let raw = "Order Date,Ship Date,Sales,Profit,Discount,Region,Category\n1/1/2016,1/2/2016,1,1,0,East,Furniture\n";
        let err = DataLoader::parse_bytes(raw.as_bytes()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == "Sub-Category"));
    }
}
