use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::BenchError;
use crate::harness::{BenchRecord, Scenario};

/// Contents of `results.json`: one record per user count and combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchResults {
    pub grpc_write: Vec<BenchRecord>,
    pub rest_write: Vec<BenchRecord>,
    pub grpc_read: Vec<BenchRecord>,
    pub rest_read: Vec<BenchRecord>,
}

impl BenchResults {
    pub fn push_rpc(&mut self, scenario: Scenario, r: BenchRecord) {
        match scenario {
            Scenario::Write => self.grpc_write.push(r),
            Scenario::Read => self.grpc_read.push(r),
        }
    }

    pub fn push_rest(&mut self, scenario: Scenario, r: BenchRecord) {
        match scenario {
            Scenario::Write => self.rest_write.push(r),
            Scenario::Read => self.rest_read.push(r),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BenchError> {
        let body = serde_json::to_string_pretty(self)?;
        fs::write(path, body)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, BenchError> {
        let body = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Titled tables in run order.
    pub fn tables(&self) -> [(&'static str, &[BenchRecord]); 4] {
        [
            ("gRPC Microservice - Write (Add Drug)", self.grpc_write.as_slice()),
            ("REST Monolith - Write (Add Drug)", self.rest_write.as_slice()),
            ("gRPC Microservice - Read (List Drugs)", self.grpc_read.as_slice()),
            ("REST Monolith - Read (List Drugs)", self.rest_read.as_slice()),
        ]
    }

    pub fn render_tables(&self) -> String {
        self.tables()
            .iter()
            .map(|(title, rows)| render_table(title, rows))
            .collect()
    }
}

pub fn render_table(title: &str, rows: &[BenchRecord]) -> String {
    let rule = "=".repeat(60);
    let mut out = format!("\n{rule}\n  {title}\n{rule}\n");
    out.push_str(&format!("  {:<10} {:<20} {:<20}\n", "Users", "Avg Latency (ms)", "Throughput (req/s)"));
    out.push_str(&format!("  {}\n", "-".repeat(50)));
    for r in rows {
        out.push_str(&format!("  {:<10} {:<20} {:<20}\n", r.users, r.avg_latency_ms, r.throughput_rps));
    }
    out
}
