//! Data Cleaner Module
//! Retypes the order/ship date columns and reports dataset shape and nulls.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// Columns that hold calendar dates in the raw file.
pub const DATE_COLUMNS: [&str; 2] = ["Order Date", "Ship Date"];

/// `num_days_from_ce()` of 1970-01-01, the epoch of Polars' `Date` type.
pub const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Date layouts seen in exports of the dataset. Slash forms are month-first.
/// `%y` must precede `%Y`, which would otherwise read "16" as year 16.
const DATE_FORMATS: [&str; 6] = [
    "%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%m-%d-%Y", "%d-%b-%Y",
];

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unparseable date '{value}' in column '{column}' at row {row}")]
    MalformedDate {
        column: String,
        row: usize,
        value: String,
    },
    #[error("Missing date in column '{column}' at row {row}")]
    MissingDate { column: String, row: usize },
}

/// Shape and per-column null counts of the cleaned dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleaningReport {
    pub rows: usize,
    pub columns: usize,
    pub missing: Vec<(String, usize)>,
}

impl CleaningReport {
    pub fn from_frame(df: &DataFrame) -> Self {
        let (rows, columns) = df.shape();
        let missing = df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect();

        Self {
            rows,
            columns,
            missing,
        }
    }

    pub fn total_missing(&self) -> usize {
        self.missing.iter().map(|(_, n)| n).sum()
    }
}

impl fmt::Display for CleaningReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Shape of dataset: ({}, {})", self.rows, self.columns)?;
        writeln!(f)?;
        writeln!(f, "Missing values:")?;

        let name_width = self
            .missing
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0);
        for (name, count) in &self.missing {
            writeln!(f, "{name:<name_width$}    {count}")?;
        }
        Ok(())
    }
}

/// Handles data cleaning on the loaded frame.
pub struct DataCleaner;

impl DataCleaner {
    /// Replace both date columns with `Date` columns, in place.
    ///
    /// Any null or unparseable value fails the whole run.
    pub fn clean(df: &mut DataFrame) -> Result<CleaningReport, CleanerError> {
        for name in DATE_COLUMNS {
            let parsed = Self::parse_date_column(df, name)?;
            df.with_column(parsed)?;
            debug!(column = name, "retyped column as Date");
        }

        let report = CleaningReport::from_frame(df);
        info!(
            rows = report.rows,
            columns = report.columns,
            missing = report.total_missing(),
            "cleaned dataset"
        );
        Ok(report)
    }

    fn parse_date_column(df: &DataFrame, name: &str) -> Result<Column, CleanerError> {
        let raw = df.column(name)?.cast(&DataType::String)?;
        let values = raw.str()?;

        let mut days: Vec<i32> = Vec::with_capacity(values.len());
        for (row, value) in values.into_iter().enumerate() {
            let value = value.ok_or_else(|| CleanerError::MissingDate {
                column: name.to_string(),
                row,
            })?;
            let date = Self::parse_date(value).ok_or_else(|| CleanerError::MalformedDate {
                column: name.to_string(),
                row,
                value: value.to_string(),
            })?;
            days.push(Self::days_since_epoch(date));
        }

        Ok(Column::new(name.into(), days).cast(&DataType::Date)?)
    }

    /// Parse a single raw date value, trying each known layout in turn.
    pub fn parse_date(value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                    .map(|dt| dt.date())
            })
    }

    pub fn days_since_epoch(date: NaiveDate) -> i32 {
        date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
    }

    pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
        NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(order: &[Option<&str>], ship: &[Option<&str>]) -> DataFrame {
        df!(
            "Order Date" => order,
            "Ship Date" => ship,
            "Sales" => vec![1.0; order.len()],
        )
        .unwrap()
    }

    #[test]
    fn parses_known_layouts() {
        let expected = NaiveDate::from_ymd_opt(2016, 11, 8).unwrap();
        for raw in ["11/8/2016", "11/08/16", "2016-11-08", "2016/11/08", "08-Nov-2016", " 11/8/2016 ", "2016-11-08 00:00:00"] {
            assert_eq!(DataCleaner::parse_date(raw), Some(expected), "{raw}");
        }
        assert_eq!(DataCleaner::parse_date("13/45/2016"), None);
        assert_eq!(DataCleaner::parse_date("soon"), None);
    }

    #[test]
    fn epoch_conversion_matches_polars() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(DataCleaner::days_since_epoch(epoch), 0);

        let date = NaiveDate::from_ymd_opt(2017, 4, 15).unwrap();
        let days = DataCleaner::days_since_epoch(date);
        assert_eq!(DataCleaner::date_from_epoch_days(days), Some(date));
    }

    #[test]
    fn clean_retypes_date_columns() {
        let mut df = frame(
            &[Some("11/8/2016"), Some("6/12/2016")],
            &[Some("11/11/2016"), Some("6/16/2016")],
        );
        let report = DataCleaner::clean(&mut df).unwrap();

        assert_eq!(df.column("Order Date").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("Ship Date").unwrap().dtype(), &DataType::Date);
        assert_eq!(report.rows, 2);
        assert_eq!(report.columns, 3);
        assert_eq!(report.total_missing(), 0);
    }

    #[test]
    fn malformed_date_fails() {
        let mut df = frame(&[Some("11/8/2016"), Some("not a date")], &[Some("11/11/2016"), Some("1/1/2017")]);
        let err = DataCleaner::clean(&mut df).unwrap_err();
        match err {
            CleanerError::MalformedDate { column, row, value } => {
                assert_eq!(column, "Order Date");
                assert_eq!(row, 1);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn null_date_fails() {
        let mut df = frame(&[Some("11/8/2016")], &[None]);
        let err = DataCleaner::clean(&mut df).unwrap_err();
        assert!(matches!(err, CleanerError::MissingDate { ref column, row: 0 } if column == "Ship Date"));
    }

    #[test]
    fn report_lists_missing_counts() {
        let df = df!(
            "Region" => [Some("East"), None],
            "Sales" => [Some(1.0), Some(2.0)],
        )
        .unwrap();
        let report = CleaningReport::from_frame(&df);
        let text = report.to_string();

        assert!(text.starts_with("Shape of dataset: (2, 2)"));
        assert!(text.contains("Region    1"));
        assert!(text.contains("Sales     0"));
    }
}
