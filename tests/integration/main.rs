//! Integration tests for the comparison pipeline.

mod comparison;
mod mock_source;
