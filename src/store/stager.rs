//! SQLite staging store.
//!
//! The cleaned frame is written as a full snapshot: the target table is
//! dropped, recreated from the frame's schema and bulk-inserted inside one
//! transaction. The same connection then serves the report queries.

use super::{AggregateSource, CellValue, QueryTable};
use crate::data::DataCleaner;
use polars::prelude::*;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// File-backed SQLite database holding the staged snapshot.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Open the database file, creating it if absent.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        debug!(path = %path.display(), "opened SQLite store");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace `table` with the full contents of `df`. Returns rows written.
    pub fn stage(&mut self, table: &str, df: &DataFrame) -> Result<usize, StoreError> {
        let columns = df.get_columns();
        let table_ident = quote_ident(table);

        let definitions = columns
            .iter()
            .map(|col| format!("{} {}", quote_ident(col.name()), sql_type(col.dtype())))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = vec!["?"; columns.len()].join(", ");

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table_ident}; CREATE TABLE {table_ident} ({definitions});"
        ))?;

        let mut written = 0usize;
        {
            let mut stmt =
                tx.prepare(&format!("INSERT INTO {table_ident} VALUES ({placeholders})"))?;
            let mut row: Vec<Value> = Vec::with_capacity(columns.len());

            for i in 0..df.height() {
                row.clear();
                for col in columns {
                    row.push(to_sql_value(col.get(i)?));
                }
                written += stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;

        info!(
            table,
            rows = written,
            path = %self.path.display(),
            "staged table"
        );
        Ok(written)
    }

    /// Number of rows currently in `table`.
    pub fn row_count(&self, table: &str) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count.max(0) as usize)
    }
}

impl AggregateSource for SqliteStore {
    fn fetch(&self, sql: &str) -> Result<QueryTable, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|idx| row.get_ref(idx).map(CellValue::from))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(rows = rows.len(), "fetched query result");
        Ok(QueryTable { columns, rows })
    }
}

/// Quote an identifier so names like `Sub-Category` survive verbatim.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Boolean
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => "INTEGER",
        DataType::Float32 | DataType::Float64 => "REAL",
        DataType::Date => "TIMESTAMP",
        _ => "TEXT",
    }
}

fn to_sql_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Integer(i64::from(v)),
        AnyValue::Int8(v) => Value::Integer(i64::from(v)),
        AnyValue::Int16(v) => Value::Integer(i64::from(v)),
        AnyValue::Int32(v) => Value::Integer(i64::from(v)),
        AnyValue::Int64(v) => Value::Integer(v),
        AnyValue::UInt8(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v)
            .map(Value::Integer)
            .unwrap_or(Value::Real(v as f64)),
        AnyValue::Float32(v) => Value::Real(f64::from(v)),
        AnyValue::Float64(v) => Value::Real(v),
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        AnyValue::Date(days) => match DataCleaner::date_from_epoch_days(days) {
            Some(date) => Value::Text(format!("{} 00:00:00", date.format("%Y-%m-%d"))),
            None => Value::Null,
        },
        other => Value::Text(other.to_string()),
    }
}
