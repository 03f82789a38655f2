//! Superstore Report - CSV to SQLite ETL with a fixed aggregate report
//! and static charts.
//!
//! The binary is a thin wrapper around [`pipeline::Pipeline`] so the stages
//! can be tested without spawning processes.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod store;
