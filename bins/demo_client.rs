use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use rpc_server::proto::{
    AddDrugRequest, DeleteDrugRequest, GetDrugRequest, ListDrugsRequest, LowStockRequest, UpdateStockRequest,
};

/// Walk through every RPC operation against a running service.
#[derive(Parser, Debug)]
#[command(name = "demo-client")]
struct Cli {
    /// gRPC endpoint
    #[arg(long, default_value = "http://127.0.0.1:50051")]
    addr: String,

    /// Connect and per-call timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,
}

const SAMPLES: [(&str, i32, f64, &str, &str); 4] = [
    ("Aspirin", 500, 2.99, "2026-12-31", "Pain Relief"),
    ("Ibuprofen", 30, 4.99, "2026-06-30", "Pain Relief"),
    ("Amoxicillin", 150, 12.99, "2025-12-31", "Antibiotic"),
    ("Vitamin D", 10, 7.99, "2027-01-01", "Supplement"),
];

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_default();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "demo", event = "run_failed", error = %format!("{e:#}"), "demo failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut client = rpc_server::client::connect(&cli.addr, Duration::from_secs(cli.timeout_secs)).await?;
    info!(addr = %cli.addr, "connected");

    let mut added = Vec::new();
    for (name, quantity, price, expiry_date, category) in SAMPLES {
        let resp = client
            .add_drug(AddDrugRequest {
                name: name.into(),
                quantity,
                price,
                expiry_date: expiry_date.into(),
                category: category.into(),
            })
            .await?
            .into_inner();
        match resp.drug {
            Some(d) if resp.success => {
                info!(step = "add", id = d.id, name = %d.name, "added");
                added.push(d.id);
            }
            _ => warn!(step = "add", name, message = %resp.message, "add failed"),
        }
    }
    let (Some(&first), Some(&last)) = (added.first(), added.last()) else {
        anyhow::bail!("no drugs were added");
    };

    let resp = client.get_drug(GetDrugRequest { id: first }).await?.into_inner();
    if let Some(d) = resp.drug.filter(|_| resp.success) {
        info!(step = "get", id = d.id, name = %d.name, quantity = d.quantity, price = d.price, "found");
    } else {
        warn!(step = "get", id = first, message = %resp.message, "get failed");
    }

    let resp = client.update_stock(UpdateStockRequest { id: first, quantity: 999 }).await?.into_inner();
    if let Some(d) = resp.drug.filter(|_| resp.success) {
        info!(step = "update_stock", id = d.id, name = %d.name, quantity = d.quantity, "stock updated");
    } else {
        warn!(step = "update_stock", id = first, message = %resp.message, "update failed");
    }

    let all = client.list_drugs(ListDrugsRequest {}).await?.into_inner().drugs;
    for d in &all {
        info!(step = "list", id = d.id, name = %d.name, quantity = d.quantity, price = d.price, expiry_date = %d.expiry_date, "drug");
    }

    let low = client.get_low_stock(LowStockRequest { threshold: 100 }).await?.into_inner().drugs;
    if low.is_empty() {
        info!(step = "low_stock", "no low stock items");
    }
    for d in &low {
        warn!(step = "low_stock", name = %d.name, quantity = d.quantity, "low stock");
    }

    let resp = client.delete_drug(DeleteDrugRequest { id: last }).await?.into_inner();
    info!(step = "delete", id = last, success = resp.success, message = %resp.message, "delete");

    info!("demo completed");
    Ok(())
}
