//! corner-odds — total-corners odds comparison across bookmakers
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod extraction;
pub mod engine;
pub mod fetch;
pub mod dashboard;
