use ec_server::{build_router, AppState, ServerConfig};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const MUG_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
const DRAFT_ID: &str = "550e8400-e29b-41d4-a716-446655440004";
const ARCHIVED_ID: &str = "550e8400-e29b-41d4-a716-446655440005";

async fn spawn_server(config: ServerConfig) -> String {
    let app = build_router(AppState::new(config).unwrap());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_test_server() -> String {
    let mut config = ServerConfig::default();
    config.features.test_routes = true;
    spawn_server(config).await
}

fn client() -> Client {
    Client::builder().cookie_store(true).build().unwrap()
}

async fn login(base: &str, email: &str) -> Client {
    let client = client();
    let resp = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({"email": email, "password": "demo"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    client
}

async fn body(resp: reqwest::Response) -> Value {
    resp.json().await.unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/health", base)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
    let body = body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let base = spawn_test_server().await;
    let resp = client()
        .get(format!("{}/api/health", base))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn unknown_route_uses_envelope() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/nonexistent", base)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn wrong_method_uses_envelope() {
    let base = spawn_test_server().await;
    let resp = client()
        .patch(format!("{}/api/health", base))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(body["error"]["message"], "Method not allowed: PATCH /api/health");
}

#[tokio::test]
async fn login_sets_session_and_logout_clears_it() {
    let base = spawn_test_server().await;
    let client = client();

    let resp = client
        .get(format!("{}/api/auth/session", base))
        .send()
        .await
        .unwrap();
    assert_eq!(body(resp).await["data"], Value::Null);

    let resp = client
        .post(format!("{}/api/auth/login", base))
        .json(&json!({"email": "buyer@example.com", "password": "demo"}))
        .send()
        .await
        .unwrap();
    let cookie = resp.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("ec_session=sess_"));
    assert!(cookie.contains("HttpOnly"));
    let login = body(resp).await;
    assert_eq!(login["data"]["email"], "buyer@example.com");
    assert_eq!(login["data"]["role"], "buyer");

    let resp = client
        .get(format!("{}/api/auth/session", base))
        .send()
        .await
        .unwrap();
    assert_eq!(body(resp).await["data"]["id"], "user-buyer");

    let resp = client
        .post(format!("{}/api/auth/logout", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/api/cart", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let base = spawn_test_server().await;
    let resp = client()
        .post(format!("{}/api/auth/login", base))
        .json(&json!({"email": "buyer@example.com", "password": "nope"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get("set-cookie").is_none());
    assert_eq!(body(resp).await["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let base = spawn_test_server().await;
    let resp = client()
        .post(format!("{}/api/auth/login", base))
        .header("content-type", "application/json")
        .body("{\"email\":")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn anonymous_catalog_only_lists_published() {
    let base = spawn_test_server().await;

    let resp = reqwest::get(format!("{}/api/catalog/products?status=draft", base))
        .await
        .unwrap();
    let body = body(resp).await;
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 4);
    assert!(products.iter().all(|p| p["status"] == "published"));
    assert_eq!(body["data"]["pagination"]["total"], 4);
    assert_eq!(body["data"]["pagination"]["totalPages"], 1);

    let resp = reqwest::get(format!("{}/api/catalog/products/{}", base, DRAFT_ID))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_pagination_is_newest_first() {
    let base = spawn_test_server().await;
    let resp = reqwest::get(format!("{}/api/catalog/products?page=2&limit=3", base))
        .await
        .unwrap();
    let body = body(resp).await;

    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], MUG_ID);
    assert_eq!(body["data"]["pagination"]["page"], 2);
    assert_eq!(body["data"]["pagination"]["totalPages"], 2);
}

#[tokio::test]
async fn admin_sees_every_status() {
    let base = spawn_test_server().await;
    let admin = login(&base, "admin@example.com").await;

    let resp = admin
        .get(format!("{}/api/catalog/products?status=archived", base))
        .send()
        .await
        .unwrap();
    let body = body(resp).await;
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], ARCHIVED_ID);
}

#[tokio::test]
async fn admin_product_crud() {
    let base = spawn_test_server().await;
    let admin = login(&base, "admin@example.com").await;

    let resp = admin
        .post(format!("{}/api/catalog/products", base))
        .json(&json!({"name": "Widget", "price": 1000}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body(resp).await["data"].clone();
    assert_eq!(created["status"], "draft");
    let id = created["id"].as_str().unwrap().to_string();

    let resp = admin
        .put(format!("{}/api/catalog/products/{}", base, id))
        .json(&json!({"status": "published"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = reqwest::get(format!("{}/api/catalog/products/{}", base, id))
        .await
        .unwrap();
    let product = body(resp).await["data"].clone();
    assert_eq!(product["name"], "Widget");
    assert_eq!(product["price"], 1000);
    assert_eq!(product["status"], "published");
    assert_eq!(product["createdAt"], created["createdAt"]);

    let resp = admin
        .delete(format!("{}/api/catalog/products/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(body(resp).await["data"]["deleted"], true);

    let resp = admin
        .delete(format!("{}/api/catalog/products/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body(resp).await["data"]["deleted"], false);
}

#[tokio::test]
async fn null_image_url_removes_image() {
    let base = spawn_test_server().await;
    let admin = login(&base, "admin@example.com").await;

    let resp = admin
        .post(format!("{}/api/catalog/products", base))
        .json(&json!({"name": "Lamp", "price": 4500, "imageUrl": "/images/lamp.jpg"}))
        .send()
        .await
        .unwrap();
    let id = body(resp).await["data"]["id"].as_str().unwrap().to_string();
    let url = format!("{}/api/catalog/products/{}", base, id);

    admin.put(&url).json(&json!({"price": 4800})).send().await.unwrap();
    let product = body(admin.get(&url).send().await.unwrap()).await["data"].clone();
    assert_eq!(product["imageUrl"], "/images/lamp.jpg");
    assert_eq!(product["price"], 4800);

    let resp = admin.put(&url).json(&json!({"imageUrl": null})).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let product = body(admin.get(&url).send().await.unwrap()).await["data"].clone();
    assert_eq!(product["imageUrl"], Value::Null);
    assert_eq!(product["name"], "Lamp");
}

#[tokio::test]
async fn invalid_product_is_rejected() {
    let base = spawn_test_server().await;
    let admin = login(&base, "admin@example.com").await;

    let resp = admin
        .post(format!("{}/api/catalog/products", base))
        .json(&json!({"name": "", "price": 100}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["error"]["code"], "VALIDATION_ERROR");

    let resp = admin
        .put(format!("{}/api/catalog/products/nonexistent-id", base))
        .json(&json!({"price": 100}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(resp).await["error"]["code"], "PRODUCT_NOT_FOUND");
}

#[tokio::test]
async fn buyer_cannot_manage_products() {
    let base = spawn_test_server().await;
    let buyer = login(&base, "buyer@example.com").await;

    let resp = buyer
        .post(format!("{}/api/catalog/products", base))
        .json(&json!({"name": "Widget", "price": 1000}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body(resp).await["error"]["code"], "FORBIDDEN");

    let resp = client()
        .delete(format!("{}/api/catalog/products/{}", base, MUG_ID))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cart_operations() {
    let base = spawn_test_server().await;
    let buyer = login(&base, "buyer@example.com").await;

    let resp = buyer
        .post(format!("{}/api/cart/items", base))
        .json(&json!({"productId": MUG_ID, "quantity": 2}))
        .send()
        .await
        .unwrap();
    let cart = body(resp).await["data"].clone();
    assert_eq!(cart["itemCount"], 2);
    assert_eq!(cart["subtotal"], 3600);

    let resp = buyer
        .put(format!("{}/api/cart/items/{}", base, MUG_ID))
        .json(&json!({"quantity": 5}))
        .send()
        .await
        .unwrap();
    assert_eq!(body(resp).await["data"]["subtotal"], 9000);

    let resp = buyer
        .put(format!("{}/api/cart/items/{}", base, MUG_ID))
        .json(&json!({"quantity": 100}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["error"]["code"], "QUANTITY_EXCEEDS_LIMIT");

    let resp = buyer
        .delete(format!("{}/api/cart/items/{}", base, MUG_ID))
        .send()
        .await
        .unwrap();
    assert_eq!(body(resp).await["data"]["items"], json!([]));

    let resp = buyer
        .delete(format!("{}/api/cart/items/{}", base, MUG_ID))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body(resp).await["error"]["code"], "CART_ITEM_NOT_FOUND");
}

#[tokio::test]
async fn unpublished_product_cannot_be_added() {
    let base = spawn_test_server().await;
    let buyer = login(&base, "buyer@example.com").await;

    let resp = buyer
        .post(format!("{}/api/cart/items", base))
        .json(&json!({"productId": DRAFT_ID}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body(resp).await["error"]["code"], "PRODUCT_UNAVAILABLE");
}

#[tokio::test]
async fn checkout_and_fulfilment() {
    let base = spawn_test_server().await;
    let buyer = login(&base, "buyer@example.com").await;
    let admin = login(&base, "admin@example.com").await;

    let resp = buyer
        .post(format!("{}/api/orders", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body(resp).await["error"]["code"], "EMPTY_CART");

    buyer
        .post(format!("{}/api/cart/items", base))
        .json(&json!({"productId": MUG_ID, "quantity": 3}))
        .send()
        .await
        .unwrap();

    let resp = buyer
        .post(format!("{}/api/orders", base))
        .json(&json!({"customerName": "Taro"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = body(resp).await["data"].clone();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total"], 5400);
    assert_eq!(order["customerName"], "Taro");
    assert_eq!(order["customerEmail"], "buyer@example.com");
    let order_id = order["id"].as_str().unwrap().to_string();

    let resp = buyer.get(format!("{}/api/cart", base)).send().await.unwrap();
    assert_eq!(body(resp).await["data"]["itemCount"], 0);

    let resp = buyer
        .put(format!("{}/api/orders/{}/status", base, order_id))
        .json(&json!({"status": "confirmed"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    for status in ["confirmed", "shipped", "delivered"] {
        let resp = admin
            .put(format!("{}/api/orders/{}/status", base, order_id))
            .json(&json!({ "status": status }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await["data"]["status"], status);
    }

    let resp = admin
        .put(format!("{}/api/orders/{}/status", base, order_id))
        .json(&json!({"status": "cancelled"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(body(resp).await["error"]["code"], "INVALID_STATUS_TRANSITION");

    let resp = buyer
        .get(format!("{}/api/orders/{}", base, order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(body(resp).await["data"]["status"], "delivered");
}

#[tokio::test]
async fn buyers_only_see_their_own_orders() {
    let base = spawn_test_server().await;
    let buyer = login(&base, "buyer@example.com").await;
    let admin = login(&base, "admin@example.com").await;

    admin
        .post(format!("{}/api/cart/items", base))
        .json(&json!({"productId": MUG_ID}))
        .send()
        .await
        .unwrap();
    let resp = admin
        .post(format!("{}/api/orders", base))
        .send()
        .await
        .unwrap();
    let admin_order = body(resp).await["data"]["id"].as_str().unwrap().to_string();

    let resp = buyer
        .get(format!("{}/api/orders?userId=user-admin", base))
        .send()
        .await
        .unwrap();
    let body_json = body(resp).await;
    assert_eq!(body_json["data"]["orders"], json!([]));
    assert_eq!(body_json["data"]["pagination"]["total"], 0);

    let resp = buyer
        .get(format!("{}/api/orders/{}", base, admin_order))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = admin
        .get(format!("{}/api/orders", base))
        .send()
        .await
        .unwrap();
    assert_eq!(body(resp).await["data"]["pagination"]["total"], 1);
}

#[tokio::test]
async fn reset_restores_seed() {
    let base = spawn_test_server().await;
    let admin = login(&base, "admin@example.com").await;

    admin
        .delete(format!("{}/api/catalog/products/{}", base, MUG_ID))
        .send()
        .await
        .unwrap();
    let resp = reqwest::get(format!("{}/api/catalog/products/{}", base, MUG_ID))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client()
        .post(format!("{}/api/test/reset", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = reqwest::get(format!("{}/api/catalog/products/{}", base, MUG_ID))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Sessions survive a reset.
    let resp = admin
        .get(format!("{}/api/auth/session", base))
        .send()
        .await
        .unwrap();
    assert_eq!(body(resp).await["data"]["role"], "admin");
}

#[tokio::test]
async fn reset_route_absent_by_default() {
    let base = spawn_server(ServerConfig::default()).await;
    let resp = client()
        .post(format!("{}/api/test/reset", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cart_events_stream_requires_session() {
    let base = spawn_test_server().await;
    let resp = client()
        .get(format!("{}/api/cart/events", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn cart_events_stream_reports_updates() {
    let base = spawn_test_server().await;
    let buyer = login(&base, "buyer@example.com").await;

    let mut stream = buyer
        .get(format!("{}/api/cart/events", base))
        .send()
        .await
        .unwrap();
    assert_eq!(stream.status(), StatusCode::OK);
    assert!(stream.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    buyer
        .post(format!("{}/api/cart/items", base))
        .json(&json!({"productId": MUG_ID, "quantity": 2}))
        .send()
        .await
        .unwrap();

    let mut received = String::new();
    while !received.contains("\n\n") {
        let chunk = tokio::time::timeout(std::time::Duration::from_secs(5), stream.chunk())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        received.push_str(&String::from_utf8_lossy(&chunk));
    }

    assert!(received.contains("event: cart-updated"));
    assert!(received.contains("\"itemCount\":2"));
}
