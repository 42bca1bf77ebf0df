//! Load generator and reporting for comparing the RPC and REST services.

pub mod errors;
pub mod harness;
pub mod plot;
pub mod report;

pub use harness::{aggregate, run_all, BenchConfig, BenchRecord, Scenario};
pub use report::BenchResults;
