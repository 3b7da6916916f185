//! Skein benchmarking suite
//!
//! Benchmarks for directory and job fingerprinting, canonical JSON, table
//! rendering and configuration parsing.

pub mod common;

pub use common::*;
