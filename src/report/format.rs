//! Plain-text table rendering for query results.
//!
//! Layout follows the familiar dataframe print: a 0-based row index on the
//! left, then every column right-aligned to its widest cell.

use crate::store::{CellValue, QueryTable};

const COLUMN_GAP: &str = "  ";
const MAX_PRECISION: usize = 6;

/// Render `table` as aligned text, one line per row, each ending in `\n`.
///
/// A column holding only reals prints every value with the same number of
/// decimals, enough for its longest fraction.
pub fn format_table(table: &QueryTable) -> String {
    let precisions: Vec<Option<usize>> = (0..table.columns.len())
        .map(|idx| real_precision(table, idx))
        .collect();
    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&precisions)
                .map(|(cell, precision)| match (cell, *precision) {
                    (CellValue::Real(v), Some(p)) if v.is_finite() => format!("{v:.p$}"),
                    _ => cell.to_string(),
                })
                .collect()
        })
        .collect();

    let index_width = table.rows.len().saturating_sub(1).to_string().len();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (name, width) in table.columns.iter().zip(&widths) {
        out.push_str(COLUMN_GAP);
        out.push_str(&pad_left(name, *width));
    }
    out.push('\n');

    if cells.is_empty() {
        out.push_str("Empty result\n");
        return out;
    }

    for (i, row) in cells.iter().enumerate() {
        out.push_str(&pad_left(&i.to_string(), index_width));
        for (cell, width) in row.iter().zip(&widths) {
            out.push_str(COLUMN_GAP);
            out.push_str(&pad_left(cell, *width));
        }
        out.push('\n');
    }
    out
}

/// Shared decimal count for column `idx`, or `None` unless every non-null
/// cell is a real.
fn real_precision(table: &QueryTable, idx: usize) -> Option<usize> {
    let mut precision = None;
    for cell in table.rows.iter().filter_map(|row| row.get(idx)) {
        match cell {
            CellValue::Null => {}
            CellValue::Real(v) => {
                let decimals = v
                    .to_string()
                    .split_once('.')
                    .map_or(0, |(_, fraction)| fraction.len());
                precision = Some(precision.unwrap_or(1).max(decimals).min(MAX_PRECISION));
            }
            _ => return None,
        }
    }
    precision
}

fn pad_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", " ".repeat(width - len), text)
    }
}
