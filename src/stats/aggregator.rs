//! Aggregation Module
//! In-memory group sums and the monthly resample behind the charts.

use crate::data::DataCleaner;
use chrono::Datelike;
use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Label used when a group key is null.
pub const NULL_LABEL: &str = "(null)";

/// Summed value for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub label: String,
    pub total: f64,
}

/// Summed value for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthTotal {
    pub year: i32,
    pub month: u32,
    pub total: f64,
}

impl MonthTotal {
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Points of one scatter group.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Group-by/sum helpers over the cleaned frame.
pub struct Aggregator;

impl Aggregator {
    /// Sum `value` per distinct `key`, groups in first-appearance order.
    pub fn sum_by(df: &DataFrame, key: &str, value: &str) -> PolarsResult<Vec<GroupTotal>> {
        let grouped = df
            .clone()
            .lazy()
            .group_by_stable([col(key)])
            .agg([col(value).cast(DataType::Float64).sum()])
            .collect()?;

        let keys = grouped.column(key)?.cast(&DataType::String)?;
        let totals = grouped.column(value)?.cast(&DataType::Float64)?;

        Ok(keys
            .str()?
            .into_iter()
            .zip(totals.f64()?.into_iter())
            .map(|(label, total)| GroupTotal {
                label: label.unwrap_or(NULL_LABEL).to_string(),
                total: total.unwrap_or(0.0),
            })
            .collect())
    }

    /// Sum `value` per calendar month of the `Date` column `date`.
    ///
    /// Months come back in chronological order; months with no rows are
    /// absent rather than zero.
    pub fn monthly_totals(df: &DataFrame, date: &str, value: &str) -> PolarsResult<Vec<MonthTotal>> {
        let days = df.column(date)?.cast(&DataType::Int32)?;
        let values = df.column(value)?.cast(&DataType::Float64)?;

        let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for (day, v) in days.i32()?.into_iter().zip(values.f64()?.into_iter()) {
            let Some(date) = day.and_then(DataCleaner::date_from_epoch_days) else {
                continue;
            };
            *months.entry((date.year(), date.month())).or_insert(0.0) += v.unwrap_or(0.0);
        }

        Ok(months
            .into_iter()
            .map(|((year, month), total)| MonthTotal { year, month, total })
            .collect())
    }

    /// Per-row `(x, y)` points split by `label`, groups in first-appearance
    /// order. Rows with a null coordinate are skipped.
    pub fn scatter_groups(
        df: &DataFrame,
        x: &str,
        y: &str,
        label: &str,
    ) -> PolarsResult<Vec<ScatterGroup>> {
        let xs = df.column(x)?.cast(&DataType::Float64)?;
        let ys = df.column(y)?.cast(&DataType::Float64)?;
        let labels = df.column(label)?.cast(&DataType::String)?;

        let mut groups: Vec<ScatterGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        let rows = xs
            .f64()?
            .into_iter()
            .zip(ys.f64()?.into_iter())
            .zip(labels.str()?.into_iter());
        for ((x, y), label) in rows {
            let (Some(x), Some(y)) = (x, y) else {
                continue;
            };
            let label = label.unwrap_or(NULL_LABEL);
            let idx = *index.entry(label.to_string()).or_insert_with(|| {
                groups.push(ScatterGroup {
                    label: label.to_string(),
                    points: Vec::new(),
                });
                groups.len() - 1
            });
            groups[idx].points.push((x, y));
        }

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        let mut df = df!(
            "Order Date" => ["3/5/2015", "1/20/2015", "3/28/2015", "7/1/2016", "1/2/2015"],
            "Ship Date" => ["3/9/2015", "1/25/2015", "4/1/2015", "7/5/2016", "1/6/2015"],
            "Category" => ["Technology", "Furniture", "Technology", "Office Supplies", "Furniture"],
            "Sales" => [100.0, 50.5, 20.25, 10.0, 4.0],
            "Profit" => [Some(10.0), Some(-5.0), Some(2.0), Some(1.0), None],
        )
        .unwrap();
        DataCleaner::clean(&mut df).unwrap();
        df
    }

    #[test]
    fn sum_by_keeps_first_appearance_order() {
        let totals = Aggregator::sum_by(&sample(), "Category", "Sales").unwrap();
        let labels: Vec<&str> = totals.iter().map(|t| t.label.as_str()).collect();

        assert_eq!(labels, vec!["Technology", "Furniture", "Office Supplies"]);
        assert!((totals[0].total - 120.25).abs() < 1e-9);
        assert!((totals[1].total - 54.5).abs() < 1e-9);
        assert!((totals[2].total - 10.0).abs() < 1e-9);
    }

    #[test]
    fn sum_by_skips_null_values() {
        let totals = Aggregator::sum_by(&sample(), "Category", "Profit").unwrap();
        let furniture = totals.iter().find(|t| t.label == "Furniture").unwrap();
        assert!((furniture.total + 5.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_totals_are_chronological_without_gaps_filled() {
        let months = Aggregator::monthly_totals(&sample(), "Order Date", "Sales").unwrap();
        let labels: Vec<String> = months.iter().map(MonthTotal::label).collect();

        assert_eq!(labels, vec!["2015-01", "2015-03", "2016-07"]);
        assert!((months[0].total - 54.5).abs() < 1e-9);
        assert!((months[1].total - 120.25).abs() < 1e-9);
        assert!((months[2].total - 10.0).abs() < 1e-9);
    }

    #[test]
    fn scatter_groups_split_by_label() {
        let groups = Aggregator::scatter_groups(&sample(), "Sales", "Profit", "Category").unwrap();

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].label, "Technology");
        assert_eq!(groups[0].points, vec![(100.0, 10.0), (20.25, 2.0)]);
        // The row with a null profit is dropped.
        assert_eq!(groups[1].points, vec![(50.5, -5.0)]);
    }
}
