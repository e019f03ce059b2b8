//! Data module - CSV loading, aggregation and filtering

mod aggregator;
pub mod columns;
mod filter;
mod loader;

pub use aggregator::Aggregator;
pub use filter::{Predicate, Query, Scalar};
pub use loader::DataLoader;
