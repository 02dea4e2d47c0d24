use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use larder::config::Config;
use larder::domain::FixedClock;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    api_key: String,
}

async fn spawn_app() -> TestApp {
    let db_path = std::env::temp_dir().join(format!("larder-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let clock = Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    let state = larder::api::create_app_state_with_clock(config, clock, None)
        .await
        .expect("Failed to create app state");

    let login = state
        .shared
        .auth
        .register("alice", "correct-horse")
        .await
        .expect("Failed to register user");

    TestApp {
        router: larder::api::router(state).await,
        api_key: login.api_key,
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("X-Api-Key", &self.api_key);

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn container_id(&self, kind: &str) -> i64 {
        let (status, body) = self.send("GET", "/api/containers", None).await;
        assert_eq!(status, StatusCode::OK);
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["kind"] == kind)
            .and_then(|c| c["id"].as_i64())
            .unwrap_or_else(|| panic!("no {kind} container"))
    }

    async fn create_food(&self, name: &str, category: &str) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/api/catalog",
                Some(json!({ "name": name, "category": category })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["data"]["contributor"].is_i64());
        body["data"]["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_auth_required() {
    let app = spawn_app().await;

    let (status, _) = app
        .send_request(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send_request(
            Request::builder()
                .uri("/api/system/status")
                .header("X-Api-Key", "wrong-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send_request(
            Request::builder()
                .uri("/api/system/status")
                .header("Authorization", format!("Bearer {}", app.api_key))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn test_login_with_password() {
    let app = spawn_app().await;

    let (status, body) = app
        .send_request(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({ "username": "alice", "password": "correct-horse" }).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");

    let (status, _) = app
        .send_request(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({ "username": "alice", "password": "wrong" }).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_add_item_creates_then_merges() {
    let app = spawn_app().await;
    let fridge = app.container_id("fridge").await;
    let milk = app.create_food("Milk", "dairy").await;
    let uri = format!("/api/containers/{fridge}/items");

    let (status, body) = app
        .send("POST", &uri, Some(json!({ "food_id": milk, "quantity": 3 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["created"], true);
    assert_eq!(body["data"]["entry"]["expiration_date"], "2024-03-15");

    let (status, body) = app
        .send("POST", &uri, Some(json!({ "food_id": milk, "quantity": "3" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["created"], false);
    assert_eq!(body["data"]["entry"]["quantity"], 6);

    let (status, body) = app.send("GET", &format!("/api/containers/{fridge}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["item_count"], 1);
    assert_eq!(body["data"]["items"][0]["food"]["name"], "Milk");
    assert_eq!(body["data"]["items"][0]["freshness"]["status"], "fresh");
}

#[tokio::test]
async fn test_add_item_rejects_bad_input() {
    let app = spawn_app().await;
    let fridge = app.container_id("fridge").await;
    let milk = app.create_food("Milk", "dairy").await;
    let uri = format!("/api/containers/{fridge}/items");

    let (status, _) = app
        .send("POST", &uri, Some(json!({ "food_id": milk, "quantity": 0 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send("POST", &uri, Some(json!({ "food_id": milk, "quantity": "lots" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            &uri,
            Some(json!({ "food_id": milk, "expiration_date": "03/01/2024" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send_request(
            Request::builder()
                .method("POST")
                .uri(&uri)
                .header("X-Api-Key", &app.api_key)
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            "/api/containers/9999/items",
            Some(json!({ "food_id": milk, "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_move_item_between_containers() {
    let app = spawn_app().await;
    let fridge = app.container_id("fridge").await;
    let freezer = app.container_id("freezer").await;
    let beef = app.create_food("Ground Beef", "meat").await;

    let (_, body) = app
        .send(
            "POST",
            &format!("/api/containers/{fridge}/items"),
            Some(json!({ "food_id": beef, "quantity": 5 })),
        )
        .await;
    let item = body["data"]["entry"]["id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            "POST",
            &format!("/api/items/{item}/move"),
            Some(json!({ "target_container_id": freezer, "quantity": 6 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            "POST",
            &format!("/api/items/{item}/move"),
            Some(json!({ "target_container_id": freezer, "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["source_remaining"], 3);
    assert_eq!(body["data"]["target"]["is_frozen"], true);
    assert_eq!(body["data"]["target"]["expiration_date"], "2024-08-30");
}

#[tokio::test]
async fn test_delete_with_requeue_and_clear_checked() {
    let app = spawn_app().await;
    let fridge = app.container_id("fridge").await;
    let eggs = app.create_food("Eggs", "dairy").await;

    let (status, _) = app
        .send(
            "POST",
            "/api/shopping-list/items",
            Some(json!({ "food_ids": [eggs] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send(
            "POST",
            &format!("/api/containers/{fridge}/items"),
            Some(json!({ "food_id": eggs, "quantity": 4 })),
        )
        .await;
    let item = body["data"]["entry"]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            "DELETE",
            &format!("/api/items/{item}"),
            Some(json!({ "requeue": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["requeued"], true);
    assert_eq!(body["data"]["shopping_list_count"], 1);

    let (status, body) = app.send("GET", "/api/shopping-list", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["quantity"], 5);
    let wanted = body["data"]["items"][0]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            "POST",
            &format!("/api/shopping-list/items/{wanted}/toggle"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["checked_off"], true);

    let (status, body) = app
        .send("POST", "/api/shopping-list/clear-checked", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["removed"], 1);
    assert_eq!(body["data"]["shopping_list_count"], 0);

    let (status, _) = app.send("DELETE", &format!("/api/items/{item}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_batch_move_reports_failures() {
    let app = spawn_app().await;
    let pantry = app.container_id("pantry").await;
    let fridge = app.container_id("fridge").await;
    let rice = app.create_food("Rice", "grains").await;

    let (_, body) = app
        .send(
            "POST",
            &format!("/api/containers/{pantry}/items"),
            Some(json!({ "food_id": rice, "quantity": 2 })),
        )
        .await;
    let item = body["data"]["entry"]["id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            "POST",
            "/api/items/batch-move",
            Some(json!({ "item_ids": [item, 9999], "target_container_id": fridge })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["moved"], json!([item]));
    assert_eq!(body["data"]["failed"][0]["item_id"], 9999);

    let (status, _) = app
        .send(
            "POST",
            "/api/items/batch-move",
            Some(json!({ "item_ids": [], "target_container_id": fridge })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_catalog_conflicts() {
    let app = spawn_app().await;
    let fridge = app.container_id("fridge").await;
    let milk = app.create_food("Milk", "dairy").await;

    let (status, _) = app
        .send(
            "POST",
            "/api/catalog",
            Some(json!({ "name": "Milk", "category": "dairy" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.send(
        "POST",
        &format!("/api/containers/{fridge}/items"),
        Some(json!({ "food_id": milk })),
    )
    .await;

    let (status, _) = app.send("DELETE", &format!("/api/catalog/{milk}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app.send("GET", "/api/catalog?search=mil", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.send("GET", "/api/catalog/0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shopping_list_cannot_be_deleted() {
    let app = spawn_app().await;
    let shopping = app.container_id("shopping").await;

    let (status, _) = app
        .send("DELETE", &format!("/api/containers/{shopping}"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            "POST",
            "/api/containers",
            Some(json!({ "name": "Garage Freezer", "type": "freezer" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["kind"], "freezer");
}

#[tokio::test]
async fn test_expiring_window() {
    let app = spawn_app().await;
    let fridge = app.container_id("fridge").await;
    let cod = app.create_food("Cod", "seafood").await;

    app.send(
        "POST",
        &format!("/api/containers/{fridge}/items"),
        Some(json!({ "food_id": cod, "quantity": 1 })),
    )
    .await;

    let (status, body) = app.send("GET", "/api/inventory/expiring?days=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["container_name"], "Fridge");
    assert_eq!(body["data"][0]["freshness"]["days_until_expiration"], 4);

    let (status, body) = app.send("GET", "/api/inventory/expiring", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, _) = app.send("GET", "/api/inventory/expiring?days=400", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
