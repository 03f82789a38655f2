//! Data module - CSV loading and cleaning

mod cleaner;
mod loader;

pub use cleaner::{CleanerError, CleaningReport, DataCleaner, DATE_COLUMNS};
pub use loader::{DataLoader, LoaderError, REQUIRED_COLUMNS};
