//! Report module - the fixed aggregate queries and their printed tables.

mod format;

pub use format::format_table;

use crate::store::{quote_ident, AggregateSource, QueryTable, StoreError};
use std::fmt;
use tracing::info;

/// The four report queries, in the order they are run and printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportQuery {
    OverallSummary,
    SalesByRegion,
    ProfitByCategory,
    TopSubCategories,
}

impl ReportQuery {
    pub const ALL: [ReportQuery; 4] = [
        ReportQuery::OverallSummary,
        ReportQuery::SalesByRegion,
        ReportQuery::ProfitByCategory,
        ReportQuery::TopSubCategories,
    ];

    /// Number of rows kept by the sub-category ranking.
    pub const TOP_N: usize = 5;

    pub fn title(&self) -> &'static str {
        match self {
            ReportQuery::OverallSummary => "💰 Overall Summary",
            ReportQuery::SalesByRegion => "🌍 Sales by Region",
            ReportQuery::ProfitByCategory => "📦 Profit by Category",
            ReportQuery::TopSubCategories => "🏆 Top 5 Sub-Categories by Sales",
        }
    }

    /// SQL text against `table`. Rounding is SQLite's `ROUND`.
    pub fn sql(&self, table: &str) -> String {
        let table = quote_ident(table);
        match self {
            ReportQuery::OverallSummary => format!(
                "SELECT ROUND(SUM(Sales),2) AS Total_Sales,\n       \
                 ROUND(SUM(Profit),2) AS Total_Profit,\n       \
                 ROUND(AVG(Discount),2) AS Avg_Discount\n\
                 FROM {table};"
            ),
            ReportQuery::SalesByRegion => format!(
                "SELECT Region, ROUND(SUM(Sales),2) AS Total_Sales\n\
                 FROM {table}\n\
                 GROUP BY Region\n\
                 ORDER BY Total_Sales DESC;"
            ),
            ReportQuery::ProfitByCategory => format!(
                "SELECT Category, ROUND(SUM(Profit),2) AS Total_Profit\n\
                 FROM {table}\n\
                 GROUP BY Category\n\
                 ORDER BY Total_Profit DESC;"
            ),
            ReportQuery::TopSubCategories => format!(
                "SELECT \"Sub-Category\", ROUND(SUM(Sales),2) AS Total_Sales\n\
                 FROM {table}\n\
                 GROUP BY \"Sub-Category\"\n\
                 ORDER BY Total_Sales DESC\n\
                 LIMIT {};",
                Self::TOP_N
            ),
        }
    }
}

/// One executed query and its result.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub query: ReportQuery,
    pub table: QueryTable,
}

impl fmt::Display for ReportSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.query.title())?;
        write!(f, "{}", format_table(&self.table))
    }
}

/// Runs the report queries against any aggregate source.
pub struct Reporter;

impl Reporter {
    pub fn run<S: AggregateSource + ?Sized>(
        source: &S,
        table: &str,
    ) -> Result<Vec<ReportSection>, StoreError> {
        ReportQuery::ALL
            .iter()
            .map(|query| {
                let result = source.fetch(&query.sql(table))?;
                info!(query = ?query, rows = result.rows.len(), "ran report query");
                Ok(ReportSection {
                    query: *query,
                    table: result,
                })
            })
            .collect()
    }

    /// Render every section, separated by blank lines, as printed to stdout.
    pub fn render(sections: &[ReportSection]) -> String {
        sections
            .iter()
            .map(ReportSection::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CellValue;
    use std::cell::RefCell;

    /// Records the SQL it is asked and answers with a fixed one-cell table.
    struct ScriptedSource {
        seen: RefCell<Vec<String>>,
    }

    impl AggregateSource for ScriptedSource {
        fn fetch(&self, sql: &str) -> Result<QueryTable, StoreError> {
            self.seen.borrow_mut().push(sql.to_string());
            Ok(QueryTable {
                columns: vec!["n".into()],
                rows: vec![vec![CellValue::Integer(self.seen.borrow().len() as i64)]],
            })
        }
    }

    #[test]
    fn runs_queries_in_report_order() {
        let source = ScriptedSource {
            seen: RefCell::new(Vec::new()),
        };
        let sections = Reporter::run(&source, "superstore").unwrap();

        let order: Vec<ReportQuery> = sections.iter().map(|s| s.query).collect();
        assert_eq!(order, ReportQuery::ALL.to_vec());

        let seen = source.seen.borrow();
        assert!(seen[0].contains("AVG(Discount)"));
        assert!(seen[1].contains("GROUP BY Region"));
        assert!(seen[2].contains("GROUP BY Category"));
        assert!(seen[3].contains("LIMIT 5"));
        assert!(seen.iter().all(|sql| sql.contains("FROM \"superstore\"")));
    }

    #[test]
    fn section_display_has_title_then_table() {
        let section = ReportSection {
            query: ReportQuery::ProfitByCategory,
            table: QueryTable {
                columns: vec!["Category".into(), "Total_Profit".into()],
                rows: vec![vec![CellValue::Text("Furniture".into()), CellValue::Real(5.0)]],
            },
        };
        let text = section.to_string();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("📦 Profit by Category:"));
        assert_eq!(lines.next(), Some("    Category  Total_Profit"));
        assert_eq!(lines.next(), Some("0  Furniture           5.0"));
    }
}
