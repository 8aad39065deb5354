//! Benchmark result recording.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use packplan_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Result of a single planner run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Number of input items.
    pub size: usize,
    /// Strategy name as reported by the planner.
    pub strategy: String,
    /// Sort order code (NAT, STL, LTS).
    pub sort_order: String,
    /// Sorter used, if any.
    pub sort_algorithm: Option<String>,
    /// Resolved worker count.
    pub threads: usize,
    /// Sort phase in milliseconds.
    pub sort_ms: f64,
    /// Pack phase in milliseconds.
    pub pack_ms: f64,
    /// Whole call in milliseconds.
    pub total_ms: f64,
    /// Input units per second.
    pub items_per_second: f64,
    /// Packs created.
    pub packs: usize,
    /// Average pack fill.
    pub utilization_percent: f64,
}

/// Per-strategy aggregate over several runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    /// Strategy name as reported by the planner.
    pub strategy: String,
    /// Runs averaged into this row.
    pub run_count: usize,
    /// Mean whole-call time in milliseconds.
    pub avg_total_ms: f64,
    /// Mean input units per second.
    pub avg_items_per_second: f64,
    /// Mean pack fill percentage.
    pub avg_utilization: f64,
}

/// Collection of benchmark runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Runs in execution order.
    pub runs: Vec<RunResult>,
}

impl BenchmarkResult {
    /// Creates an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a run.
    pub fn add_run(&mut self, run: RunResult) {
        self.runs.push(run);
    }

    /// Averages runs per strategy, ordered by strategy name.
    pub fn summary_by_strategy(&self) -> Vec<StrategySummary> {
        let mut groups: BTreeMap<&str, Vec<&RunResult>> = BTreeMap::new();
        for run in &self.runs {
            groups.entry(run.strategy.as_str()).or_default().push(run);
        }

        groups
            .into_iter()
            .map(|(strategy, runs)| {
                let n = runs.len() as f64;
                StrategySummary {
                    strategy: strategy.to_string(),
                    run_count: runs.len(),
                    avg_total_ms: runs.iter().map(|r| r.total_ms).sum::<f64>() / n,
                    avg_items_per_second: runs.iter().map(|r| r.items_per_second).sum::<f64>() / n,
                    avg_utilization: runs.iter().map(|r| r.utilization_percent).sum::<f64>() / n,
                }
            })
            .collect()
    }

    /// Renders the run table.
    pub fn table(&self) -> String {
        let mut out = format!(
            "{:<8}{:<28}{:<6}{:<12}{:<12}{:<12}{:<14}{:<10}{}\n",
            "Size", "Strategy", "Order", "Sort(ms)", "Pack(ms)", "Total(ms)", "Items/sec", "Packs", "Util%"
        );
        out.push_str(&format!("{:-<110}\n", ""));
        for run in &self.runs {
            out.push_str(&format!(
                "{:<8}{:<28}{:<6}{:<12.3}{:<12.3}{:<12.3}{:<14.0}{:<10}{:.1}%\n",
                run.size,
                run.strategy,
                run.sort_order,
                run.sort_ms,
                run.pack_ms,
                run.total_ms,
                run.items_per_second,
                run.packs,
                run.utilization_percent
            ));
        }
        out
    }

    /// Prints the run table to stdout.
    pub fn print_summary(&self) {
        print!("{}", self.table());
    }

    /// Saves all runs as pretty-printed JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(strategy: &str, total_ms: f64, utilization: f64) -> RunResult {
        RunResult {
            size: 100,
            strategy: strategy.to_string(),
            sort_order: "NAT".to_string(),
            sort_algorithm: None,
            threads: 1,
            sort_ms: 0.0,
            pack_ms: total_ms,
            total_ms,
            items_per_second: 1000.0,
            packs: 3,
            utilization_percent: utilization,
        }
    }

    #[test]
    fn test_summary_by_strategy() {
        let mut result = BenchmarkResult::new();
        result.add_run(run("Blocking", 2.0, 80.0));
        result.add_run(run("Blocking", 4.0, 90.0));
        result.add_run(run("BestFit", 1.0, 95.0));

        let summary = result.summary_by_strategy();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].strategy, "BestFit");
        assert_eq!(summary[1].run_count, 2);
        assert!((summary[1].avg_total_ms - 3.0).abs() < 1e-12);
        assert!((summary[1].avg_utilization - 85.0).abs() < 1e-12);
    }

    #[test]
    fn test_table_has_one_row_per_run() {
        let mut result = BenchmarkResult::new();
        result.add_run(run("Blocking", 2.0, 80.0));
        result.add_run(run("BestFit", 1.0, 95.0));
        let table = result.table();
        assert_eq!(table.lines().count(), 4);
        assert!(table.contains("95.0%"));
    }

    #[test]
    fn test_save_json() {
        let mut result = BenchmarkResult::new();
        result.add_run(run("Blocking", 2.0, 80.0));
        let path = std::env::temp_dir().join(format!("packplan-bench-{}.json", std::process::id()));
        result.save_json(&path).unwrap();

        let loaded: BenchmarkResult =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.runs, result.runs);
        let _ = std::fs::remove_file(&path);
    }
}
