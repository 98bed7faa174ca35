//! Comparison engine — fetch → extract → aggregate.

pub mod aggregator;
pub mod comparator;
