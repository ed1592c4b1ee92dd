//! Analysis modules.
//!
//! Aggregations computed over the fetched catalog.

pub mod aggregator;

pub use aggregator::*;
