//! Command-line collaborators for packplan.
//!
//! This crate provides:
//! - The line-based input parser
//! - Text and JSON result formatting
//! - Synthetic data generators
//! - Benchmark runner with result recording

mod dataset;
mod output;
mod parser;
mod result;
mod runner;

pub use dataset::{problematic, stress, uniform, DatasetKind};
pub use output::{to_json, to_text, write_text};
pub use parser::{InputParser, PlanInput};
pub use result::{BenchmarkResult, RunResult, StrategySummary};
pub use runner::{BenchmarkConfig, BenchmarkRunner, GuardCheck};
