//! # Registry Benchmarks
//!
//! Criterion benchmarks for the registry read and write paths.

pub mod registry;
