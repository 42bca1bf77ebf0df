use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use configs::{DatabaseConfig, StartupConfig};
use tokio::net::TcpListener;
use tonic::transport::Channel;

use rpc_server::proto::{
    AddDrugRequest, DeleteDrugRequest, GetDrugRequest, ListDrugsRequest, LowStockRequest, UpdateStockRequest,
};
use rpc_server::PharmacyServiceClient;

async fn start_server() -> anyhow::Result<SocketAddr> {
    start_server_with_limit(32).await
}

async fn start_server_with_limit(max_concurrent: usize) -> anyhow::Result<SocketAddr> {
    let startup = StartupConfig { init_attempts: 1, init_retry_delay_secs: 0 };
    let db = models::db::init_store(&DatabaseConfig::sqlite_memory(), &startup).await?;

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = rpc_server::startup::serve_with_listener(listener, db, max_concurrent).await {
            eprintln!("rpc server error: {}", e);
        }
    });
    Ok(addr)
}

async fn client(addr: SocketAddr) -> anyhow::Result<PharmacyServiceClient<Channel>> {
    Ok(rpc_server::client::connect(&format!("http://{}", addr), Duration::from_secs(5)).await?)
}

fn add_req(name: &str, quantity: i32) -> AddDrugRequest {
    AddDrugRequest {
        name: name.into(),
        quantity,
        price: 9.99,
        expiry_date: "2027-01-01".into(),
        category: "Test".into(),
    }
}

#[tokio::test]
async fn add_then_get_returns_same_fields() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut c = client(addr).await?;

    let added = c.add_drug(add_req("Aspirin", 500)).await?.into_inner();
    assert!(added.success);
    assert_eq!(added.message, "Drug added");
    let drug = added.drug.ok_or_else(|| anyhow::anyhow!("missing drug"))?;
    assert!(drug.id > 0);

    let found = c.get_drug(GetDrugRequest { id: drug.id }).await?.into_inner();
    assert!(found.success);
    assert_eq!(found.message, "Found");
    assert_eq!(found.drug, Some(drug));
    Ok(())
}

#[tokio::test]
async fn missing_drug_is_reported_in_band() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut c = client(addr).await?;

    let r = c.get_drug(GetDrugRequest { id: 999 }).await?.into_inner();
    assert!(!r.success);
    assert_eq!(r.message, "Drug not found");
    assert!(r.drug.is_none());

    let r = c.update_stock(UpdateStockRequest { id: 999, quantity: 1 }).await?.into_inner();
    assert!(!r.success);
    assert_eq!(r.message, "Drug not found");

    let r = c.delete_drug(DeleteDrugRequest { id: 999 }).await?.into_inner();
    assert!(!r.success);
    assert_eq!(r.message, "Drug not found");
    Ok(())
}

#[tokio::test]
async fn update_stock_then_get() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut c = client(addr).await?;
    let id = c.add_drug(add_req("Ibuprofen", 30)).await?.into_inner().drug.map(|d| d.id).unwrap_or_default();

    let r = c.update_stock(UpdateStockRequest { id, quantity: 999 }).await?.into_inner();
    assert!(r.success);
    assert_eq!(r.message, "Stock updated");
    assert_eq!(r.drug.as_ref().map(|d| d.quantity), Some(999));

    let got = c.get_drug(GetDrugRequest { id }).await?.into_inner();
    assert_eq!(got.drug.map(|d| d.quantity), Some(999));
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_not_found() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut c = client(addr).await?;
    let id = c.add_drug(add_req("Vitamin D", 10)).await?.into_inner().drug.map(|d| d.id).unwrap_or_default();

    let r = c.delete_drug(DeleteDrugRequest { id }).await?.into_inner();
    assert!(r.success);
    assert_eq!(r.message, format!("Drug {} deleted", id));

    let got = c.get_drug(GetDrugRequest { id }).await?.into_inner();
    assert!(!got.success);
    Ok(())
}

#[tokio::test]
async fn list_and_low_stock_ordering() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let mut c = client(addr).await?;
    for (name, q) in [("Aspirin", 500), ("Ibuprofen", 30), ("Amoxicillin", 150), ("Vitamin D", 10)] {
        c.add_drug(add_req(name, q)).await?;
    }

    let all = c.list_drugs(ListDrugsRequest {}).await?.into_inner().drugs;
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));

    let low = c.get_low_stock(LowStockRequest { threshold: 100 }).await?.into_inner().drugs;
    let names: Vec<&str> = low.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Vitamin D", "Ibuprofen"]);

    let none = c.get_low_stock(LowStockRequest { threshold: 5 }).await?.into_inner().drugs;
    assert!(none.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_get_unique_ids() -> anyhow::Result<()> {
    let addr = start_server().await?;
    let c = client(addr).await?;

    let mut handles = vec![];
    for i in 0..25 {
        let mut c = c.clone();
        handles.push(tokio::spawn(async move {
            let r = c.add_drug(add_req(&format!("c{i}"), i)).await?.into_inner();
            anyhow::ensure!(r.success, "add failed: {}", r.message);
            r.drug.map(|d| d.id).ok_or_else(|| anyhow::anyhow!("missing drug"))
        }));
    }

    let mut ids = HashSet::new();
    for h in handles {
        let id = h.await??;
        assert!(ids.insert(id), "duplicate id {id}");
    }
    assert_eq!(ids.len(), 25);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn calls_beyond_global_limit_wait_instead_of_failing() -> anyhow::Result<()> {
    let addr = start_server_with_limit(1).await?;

    // separate channels so the calls arrive on different connections
    let mut handles = vec![];
    for i in 0..6 {
        let mut c = client(addr).await?;
        handles.push(tokio::spawn(async move {
            let r = c.add_drug(add_req(&format!("q{i}"), i)).await?.into_inner();
            anyhow::ensure!(r.success, "add failed: {}", r.message);
            Ok(())
        }));
    }
    for h in handles {
        h.await??;
    }

    let mut c = client(addr).await?;
    assert_eq!(c.list_drugs(ListDrugsRequest {}).await?.into_inner().drugs.len(), 6);
    Ok(())
}
