use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

use vending_api::app::{router_with, AppServices};
use vending_infra::Settings;

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn_with(app: axum::Router) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    async fn spawn() -> Self {
        Self::spawn_with(router_with(
            Arc::new(AppServices::in_memory()),
            Duration::from_secs(5),
        ))
        .await
    }

    async fn spawn_sqlite() -> Self {
        let settings = Settings::from_lookup(|key| match key {
            "VENDING_STORE" => Some("sqlite".to_string()),
            "VENDING_DATABASE_URL" => Some("sqlite::memory:".to_string()),
            _ => None,
        })
        .unwrap();
        let app = vending_api::app::build_app(&settings).await.unwrap();
        Self::spawn_with(app).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> (StatusCode, Value) {
        let res = req.send().await.unwrap();
        let status = res.status();
        let body = res.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(self.client.post(self.url(path)).json(&body)).await
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(self.client.put(self.url(path)).json(&body)).await
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        self.send(self.client.get(self.url(path))).await
    }

    async fn delete(&self, path: &str) -> (StatusCode, Value) {
        self.send(self.client.delete(self.url(path))).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn scenario(srv: &TestServer) {
    let (status, body) = srv
        .post("/vending-machines", json!({ "name": "VM1", "location": "Loc1" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Vending Machine created successfully");
    assert_eq!(body["id"], 1);

    let (status, body) = srv
        .post(
            "/vending-machines/1/items",
            json!({ "name": "Soda", "price": 1.5, "quantity": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Item created successfully");
    let item_id = body["id"].as_i64().unwrap();

    let (status, body) = srv
        .put(
            &format!("/vending-machines/1/items/{item_id}/stock/add"),
            json!({ "quantity": 3 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 8);

    let (status, body) = srv
        .put(
            &format!("/vending-machines/1/items/{item_id}/stock/remove"),
            json!({ "quantity": 20 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(body["message"], "Not enough items in stock");

    let (_, items) = srv.get("/vending-machines/1/items").await;
    assert_eq!(items[0]["quantity"], 8);

    let (status, _) = srv
        .put(
            &format!("/vending-machines/1/items/{item_id}/stock"),
            json!({ "quantity": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, items) = srv.get("/vending-machines/1/items").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        items,
        json!([{ "id": item_id, "name": "Soda", "price": 1.5, "quantity": 0 }])
    );
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn stock_lifecycle_in_memory() {
    scenario(&TestServer::spawn().await).await;
}

#[tokio::test]
async fn stock_lifecycle_sqlite() {
    scenario(&TestServer::spawn_sqlite().await).await;
}

#[tokio::test]
async fn listing_machines_starts_empty_and_reflects_creates() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.get("/vending-machines").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    srv.post("/vending-machines", json!({ "name": "VM1", "location": "Loc1" }))
        .await;
    let (_, body) = srv.get("/vending-machines").await;
    assert_eq!(body, json!([{ "id": 1, "name": "VM1", "location": "Loc1" }]));
}

#[tokio::test]
async fn missing_fields_are_rejected_with_400() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.post("/vending-machines", json!({ "name": "VM1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Name and location are required");

    srv.post("/vending-machines", json!({ "name": "VM1", "location": "Loc1" }))
        .await;
    let (status, body) = srv
        .post("/vending-machines/1/items", json!({ "name": "Soda" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn malformed_bodies_and_ids_are_validation_errors() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv
        .send(
            srv.client
                .post(srv.url("/vending-machines"))
                .header("content-type", "application/json")
                .body("{not json"),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = srv.delete("/vending-machines/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn not_found_cases_return_404() {
    let srv = TestServer::spawn().await;

    let (status, body) = srv.delete("/vending-machines/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Vending machine not found");

    let (status, _) = srv
        .post(
            "/vending-machines/7/items",
            json!({ "name": "Soda", "price": 1.5, "quantity": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = srv.get("/vending-machines/7/items").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    srv.post("/vending-machines", json!({ "name": "VM1", "location": "Loc1" }))
        .await;
    let (status, body) = srv
        .put("/vending-machines/1/items/9/stock/add", json!({ "quantity": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Item not found");

    let (status, _) = srv.get("/no/such/route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_machine_removes_it_and_its_items() {
    let srv = TestServer::spawn().await;
    srv.post("/vending-machines", json!({ "name": "VM1", "location": "Loc1" }))
        .await;
    srv.post(
        "/vending-machines/1/items",
        json!({ "name": "Soda", "price": 1.5, "quantity": 5 }),
    )
    .await;

    let (status, body) = srv.delete("/vending-machines/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vending Machine deleted successfully");

    let (_, machines) = srv.get("/vending-machines").await;
    assert_eq!(machines, json!([]));
    let (status, _) = srv.get("/vending-machines/1/items").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn negative_quantities_are_invalid() {
    let srv = TestServer::spawn().await;
    srv.post("/vending-machines", json!({ "name": "VM1", "location": "Loc1" }))
        .await;
    srv.post(
        "/vending-machines/1/items",
        json!({ "name": "Soda", "price": 1.5, "quantity": 5 }),
    )
    .await;

    let (status, body) = srv
        .put("/vending-machines/1/items/1/stock", json!({ "quantity": -1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_quantity");

    let (_, items) = srv.get("/vending-machines/1/items").await;
    assert_eq!(items[0]["quantity"], 5);
}

#[tokio::test]
async fn legacy_routes_reach_the_same_handlers() {
    let srv = TestServer::spawn().await;
    srv.post("/vending-machines", json!({ "name": "VM1", "location": "Loc1" }))
        .await;

    let (status, _) = srv
        .post(
            "/create_item/1",
            json!({ "name": "Soda", "price": 1.5, "quantity": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = srv.put("/add_item_stock/1/1", json!({ "quantity": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item stock added successfully");

    let (status, body) = srv
        .put("/remove_item_from_stock/1/1", json!({ "quantity": 4 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item removed from stock");

    let (status, body) = srv.put("/edit_item_stock/1/1", json!({ "quantity": 9 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item stock updated successfully");

    let (_, items) = srv.get("/view_items_in_vending_machine/1").await;
    assert_eq!(items[0]["quantity"], 9);

    let (_, machines) = srv.get("/get_vending_machines").await;
    assert_eq!(machines[0]["name"], "VM1");
}
