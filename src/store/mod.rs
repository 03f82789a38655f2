//! Store module - staging the cleaned table into SQLite and querying it back

mod stager;

pub use stager::{SqliteStore, StoreError};
pub(crate) use stager::quote_ident;

use rusqlite::types::ValueRef;
use std::fmt;

/// A single cell returned by an aggregate query.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "None"),
            CellValue::Integer(v) => write!(f, "{v}"),
            // Whole reals keep one decimal so 5.0 does not read as an integer.
            CellValue::Real(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            CellValue::Real(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<ValueRef<'_>> for CellValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => CellValue::Null,
            ValueRef::Integer(v) => CellValue::Integer(v),
            ValueRef::Real(v) => CellValue::Real(v),
            ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => CellValue::Text(format!("<{} byte blob>", bytes.len())),
        }
    }
}

/// Ordered result of one query: column names plus rows in engine order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Anything that can answer a read-only aggregate query with ordered rows.
pub trait AggregateSource {
    fn fetch(&self, sql: &str) -> Result<QueryTable, StoreError>;
}
