use std::collections::HashSet;
use std::net::SocketAddr;

use axum::Router;
use configs::{DatabaseConfig, StartupConfig};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use rest_server::routes;
use rest_server::state::AppState;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Each test gets its own in-memory store
    let startup = StartupConfig { init_attempts: 1, init_retry_delay_secs: 0 };
    let db = models::db::init_store(&DatabaseConfig::sqlite_memory(), &startup).await?;

    let app: Router = routes::build_router(AppState::new(db), CorsLayer::very_permissive(), 32);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

fn drug_body(name: &str, quantity: i32) -> Value {
    json!({
        "name": name,
        "quantity": quantity,
        "price": 9.99,
        "expiry_date": "2027-01-01",
        "category": "Test"
    })
}

async fn add(c: &reqwest::Client, app: &TestApp, name: &str, quantity: i32) -> anyhow::Result<Value> {
    let res = c.post(format!("{}/drugs", app.base_url)).json(&drug_body(name, quantity)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_add_then_get_returns_same_fields() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let created = add(&c, &app, "Aspirin", 500).await?;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["name"], "Aspirin");
    assert_eq!(created["quantity"], 500);
    assert_eq!(created["price"], 9.99);
    assert_eq!(created["expiry_date"], "2027-01-01");
    assert_eq!(created["category"], "Test");

    let res = c.get(format!("{}/drugs/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, created);
    Ok(())
}

#[tokio::test]
async fn e2e_get_missing_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/drugs/999999", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"detail": "Drug not found"}));
    Ok(())
}

#[tokio::test]
async fn e2e_update_stock_overwrites() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let created = add(&c, &app, "Ibuprofen", 30).await?;
    let id = created["id"].as_i64().expect("id");

    let res = c
        .put(format!("{}/drugs/{}/stock", app.base_url, id))
        .json(&json!({"quantity": 999}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["quantity"], 999);

    let got = c.get(format!("{}/drugs/{}", app.base_url, id)).send().await?.json::<Value>().await?;
    assert_eq!(got["quantity"], 999);
    assert_eq!(got["name"], "Ibuprofen");

    let res = c
        .put(format!("{}/drugs/424242/stock", app.base_url))
        .json(&json!({"quantity": 1}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_delete_then_get_is_404() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let created = add(&c, &app, "Vitamin D", 10).await?;
    let id = created["id"].as_i64().expect("id");

    let res = c.delete(format!("{}/drugs/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], format!("Drug {} deleted", id));

    let res = c.get(format!("{}/drugs/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(format!("{}/drugs/{}", app.base_url, id)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_list_ordered_by_id() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    for (name, q) in [("a", 3), ("b", 1), ("c", 2)] {
        add(&c, &app, name, q).await?;
    }

    let list = c.get(format!("{}/drugs", app.base_url)).send().await?.json::<Vec<Value>>().await?;
    assert!(list.len() >= 3);
    let ids: Vec<i64> = list.iter().map(|d| d["id"].as_i64().expect("id")).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    Ok(())
}

#[tokio::test]
async fn e2e_low_stock_threshold_and_default() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    for (name, q) in [("Aspirin", 500), ("Ibuprofen", 30), ("Amoxicillin", 150), ("Vitamin D", 10)] {
        add(&c, &app, name, q).await?;
    }

    let low = c
        .get(format!("{}/drugs/alert/low-stock?threshold=30", app.base_url))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    let q: Vec<i64> = low.iter().map(|d| d["quantity"].as_i64().expect("qty")).collect();
    assert_eq!(q, vec![10, 30]);

    // default threshold is 100
    let low = c
        .get(format!("{}/drugs/alert/low-stock", app.base_url))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    assert_eq!(low.len(), 2);
    assert_eq!(low[0]["name"], "Vitamin D");
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_body_rejected() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let res = c
        .post(format!("{}/drugs", app.base_url))
        .json(&json!({"name": "NoQuantity"}))
        .send()
        .await?;
    assert!(res.status().is_client_error());

    let res = c
        .post(format!("{}/drugs", app.base_url))
        .json(&json!({"name": "X", "quantity": "many", "price": 1.0, "expiry_date": "", "category": ""}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    // rejections use the same JSON error shape
    let body = res.json::<Value>().await?;
    assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));

    let res = c
        .post(format!("{}/drugs", app.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert!(res.status().is_client_error());
    assert!(res.json::<Value>().await?["detail"].is_string());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn e2e_concurrent_adds_unique_ids() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let mut handles = vec![];
    for i in 0..25 {
        let c = c.clone();
        let url = format!("{}/drugs", app.base_url);
        handles.push(tokio::spawn(async move {
            let res = c.post(url).json(&drug_body(&format!("c{i}"), i)).send().await?;
            anyhow::ensure!(res.status() == HttpStatusCode::OK, "status {}", res.status());
            let v = res.json::<Value>().await?;
            v["id"].as_i64().ok_or_else(|| anyhow::anyhow!("missing id"))
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

#[tokio::test]
async fn e2e_metrics_and_openapi() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    add(&c, &app, "Metered", 1).await?;

    let res = c.get(format!("{}/metrics", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.text().await?.contains("pharmacy_store_ops_total"));

    let doc = c.get(format!("{}/openapi.json", app.base_url)).send().await?.json::<Value>().await?;
    assert!(doc["paths"]["/drugs/{id}/stock"].is_object());
    Ok(())
}

#[tokio::test]
async fn e2e_numeric_strings_are_coerced() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c
        .post(format!("{}/drugs", app.base_url))
        .json(&json!({"name": "Loose", "quantity": "5", "price": "2.5", "expiry_date": "2027-01-01", "category": "Test"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let created = res.json::<Value>().await?;
    assert_eq!(created["quantity"], 5);
    assert_eq!(created["price"], 2.5);
    let id = created["id"].as_i64().expect("id");

    let res = c
        .post(format!("{}/drugs", app.base_url))
        .json(&json!({"name": "Whole", "quantity": 5.0, "price": 3, "expiry_date": "2027-01-01", "category": "Test"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let whole = res.json::<Value>().await?;
    assert_eq!(whole["quantity"], 5);
    assert_eq!(whole["price"], 3.0);

    let res = c
        .put(format!("{}/drugs/{}/stock", app.base_url, id))
        .json(&json!({"quantity": "42"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let got = c.get(format!("{}/drugs/{}", app.base_url, id)).send().await?.json::<Value>().await?;
    assert_eq!(got["quantity"], 42);
    assert!(got["quantity"].is_i64());
    assert!(got["price"].is_f64());

    let res = c
        .put(format!("{}/drugs/{}/stock", app.base_url, id))
        .json(&json!({"quantity": 1.5}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}
