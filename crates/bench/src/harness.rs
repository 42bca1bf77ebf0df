use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tonic::transport::Channel;
use tracing::{debug, info};

use rpc_server::proto::{AddDrugRequest, ListDrugsRequest};
use rpc_server::PharmacyServiceClient;

use crate::report::BenchResults;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// AddDrug with the fixed payload
    Write,
    /// ListDrugs
    Read,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Write => "write",
            Scenario::Read => "read",
        }
    }
}

/// One row of the results file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchRecord {
    pub users: usize,
    pub success: usize,
    pub avg_latency_ms: f64,
    pub throughput_rps: f64,
}

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub grpc_addr: String,
    pub rest_url: String,
    pub users: Vec<usize>,
    pub pause: Duration,
    pub timeout: Duration,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            grpc_addr: "http://127.0.0.1:50051".into(),
            rest_url: "http://127.0.0.1:8000".into(),
            users: vec![10, 50, 100, 500, 1000],
            pause: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
        }
    }
}

pub const PAYLOAD_NAME: &str = "TestDrug";
pub const PAYLOAD_QUANTITY: i32 = 100;
pub const PAYLOAD_PRICE: f64 = 9.99;
pub const PAYLOAD_EXPIRY: &str = "2027-01-01";
pub const PAYLOAD_CATEGORY: &str = "Test";

fn rpc_payload() -> AddDrugRequest {
    AddDrugRequest {
        name: PAYLOAD_NAME.into(),
        quantity: PAYLOAD_QUANTITY,
        price: PAYLOAD_PRICE,
        expiry_date: PAYLOAD_EXPIRY.into(),
        category: PAYLOAD_CATEGORY.into(),
    }
}

fn rest_payload() -> serde_json::Value {
    serde_json::json!({
        "name": PAYLOAD_NAME,
        "quantity": PAYLOAD_QUANTITY,
        "price": PAYLOAD_PRICE,
        "expiry_date": PAYLOAD_EXPIRY,
        "category": PAYLOAD_CATEGORY,
    })
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Fold per-call outcomes (`Some(latency_ms)` on success) into a record.
///
/// Failed calls are left out of the mean and the success count, but the
/// batch elapsed time always covers them.
pub fn aggregate(users: usize, latencies: &[Option<f64>], elapsed: Duration) -> BenchRecord {
    let ok: Vec<f64> = latencies.iter().flatten().copied().collect();
    let success = ok.len();
    let avg = if success == 0 { 0.0 } else { ok.iter().sum::<f64>() / success as f64 };
    let secs = elapsed.as_secs_f64();
    let throughput = if secs > 0.0 { success as f64 / secs } else { 0.0 };
    BenchRecord { users, success, avg_latency_ms: round2(avg), throughput_rps: round2(throughput) }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

async fn rpc_call(mut client: PharmacyServiceClient<Channel>, scenario: Scenario) -> Option<f64> {
    let start = Instant::now();
    let ok = match scenario {
        Scenario::Write => match client.add_drug(rpc_payload()).await {
            Ok(resp) => resp.into_inner().success,
            Err(status) => {
                debug!(code = ?status.code(), "rpc call failed");
                false
            }
        },
        Scenario::Read => client.list_drugs(ListDrugsRequest {}).await.is_ok(),
    };
    ok.then(|| elapsed_ms(start))
}

async fn rest_call(http: reqwest::Client, base_url: String, scenario: Scenario) -> Option<f64> {
    let url = format!("{}/drugs", base_url.trim_end_matches('/'));
    let start = Instant::now();
    let res = match scenario {
        Scenario::Write => http.post(url).json(&rest_payload()).send().await,
        Scenario::Read => http.get(url).send().await,
    };
    match res {
        Ok(r) if r.status() == StatusCode::OK => Some(elapsed_ms(start)),
        Ok(r) => {
            debug!(status = %r.status(), "rest call rejected");
            None
        }
        Err(e) => {
            debug!(error = %e, "rest call failed");
            None
        }
    }
}

async fn collect(mut set: JoinSet<Option<f64>>, users: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(users);
    while let Some(res) = set.join_next().await {
        out.push(res.ok().flatten());
    }
    out
}

/// Fan out `users` concurrent RPC calls over one shared channel and join them.
pub async fn run_rpc_batch(client: &PharmacyServiceClient<Channel>, scenario: Scenario, users: usize) -> BenchRecord {
    let start = Instant::now();
    let mut set = JoinSet::new();
    for _ in 0..users {
        set.spawn(rpc_call(client.clone(), scenario));
    }
    let latencies = collect(set, users).await;
    aggregate(users, &latencies, start.elapsed())
}

/// Fan out `users` concurrent HTTP calls against `base_url` and join them.
pub async fn run_rest_batch(http: &reqwest::Client, base_url: &str, scenario: Scenario, users: usize) -> BenchRecord {
    let start = Instant::now();
    let mut set = JoinSet::new();
    for _ in 0..users {
        set.spawn(rest_call(http.clone(), base_url.to_string(), scenario));
    }
    let latencies = collect(set, users).await;
    aggregate(users, &latencies, start.elapsed())
}

/// Full run: writes for every user count (RPC then REST), then reads.
pub async fn run_all(cfg: &BenchConfig) -> anyhow::Result<BenchResults> {
    let rpc = rpc_server::client::connect_lazy(&cfg.grpc_addr, cfg.timeout)?;
    let http = reqwest::Client::builder().timeout(cfg.timeout).build()?;
    let mut results = BenchResults::default();

    for scenario in [Scenario::Write, Scenario::Read] {
        for &users in &cfg.users {
            info!(users, scenario = scenario.as_str(), "running batch");

            let r = run_rpc_batch(&rpc, scenario, users).await;
            info!(service = "rpc", users, success = r.success, avg_ms = r.avg_latency_ms, rps = r.throughput_rps, "batch done");
            results.push_rpc(scenario, r);
            tokio::time::sleep(cfg.pause).await;

            let r = run_rest_batch(&http, &cfg.rest_url, scenario, users).await;
            info!(service = "rest", users, success = r.success, avg_ms = r.avg_latency_ms, rps = r.throughput_rps, "batch done");
            results.push_rest(scenario, r);
            tokio::time::sleep(cfg.pause).await;
        }
    }
    Ok(results)
}
