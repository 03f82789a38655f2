//! Stats module - in-memory aggregation for the charts

mod aggregator;

pub use aggregator::{Aggregator, GroupTotal, MonthTotal, ScatterGroup, NULL_LABEL};
