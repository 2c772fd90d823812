mod common;

use axum::http::StatusCode;
use common::{TestApp, body_json, get, json, set_cookie_pair};
use serde_json::json as body;
use server::{config::Config, permissions::Role};

#[tokio::test]
async fn test_catalog_listing_filters() {
    let app = TestApp::new();

    let response = app.send(get("/api/products?category=pecivo", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(response).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["items"][0]["name"], "Rožok");
    assert_eq!(listing["filters"]["category"], "pecivo");
    assert_eq!(listing["href"], "/produkty?category=pecivo");
}

#[tokio::test]
async fn test_category_lookup() {
    let app = TestApp::new();

    let response = app.send(get("/api/categories/chlieb", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["category"]["name"], "Chlieb");
    assert_eq!(page["products"][0]["slug"], "kvaskovy-chlieb");

    let response = app.send(get("/api/categories/torty", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_without_meilisearch_falls_back() {
    let app = TestApp::new();

    let hits = body_json(app.send(get("/api/search?q=kvaskovy", None)).await).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let empty = body_json(app.send(get("/api/search", None)).await).await;
    assert_eq!(empty, body!([]));
}

#[tokio::test]
async fn test_cart_panel_toggled_open_then_closed() {
    let app = TestApp::new();
    let toggle = body!({ "action": "toggle" });

    let response = app
        .send(json("POST", "/api/cart/panel", None, toggle.clone()))
        .await;
    let cart_cookie = set_cookie_pair(&response);
    assert!(cart_cookie.starts_with("cart_id="));
    assert_eq!(body_json(response).await, body!({ "open": true }));

    let response = app
        .send(json("POST", "/api/cart/panel", Some(&cart_cookie), toggle))
        .await;
    assert!(response.headers().get("set-cookie").is_none());
    assert_eq!(body_json(response).await, body!({ "open": false }));

    let cart = body_json(app.send(get("/api/cart", Some(&cart_cookie))).await).await;
    assert_eq!(cart["panel"], body!({ "open": false }));
}

#[tokio::test]
async fn test_reading_carts_stores_nothing() {
    let app = TestApp::new();

    for _ in 0..1000 {
        let response = app.send(get("/api/cart", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("set-cookie").is_none());
    }

    let unknown = format!("cart_id={}", uuid::Uuid::new_v4());
    let cart = body_json(app.send(get("/api/cart", Some(&unknown))).await).await;
    assert_eq!(cart["lines"], body!([]));

    assert!(app.state.carts.read().await.is_empty());
}

#[tokio::test]
async fn test_cart_store_is_capped() {
    let app = TestApp::with_config(Config {
        cart_capacity: 3,
        ..Config::default()
    });

    for _ in 0..10 {
        app.send(json(
            "POST",
            "/api/cart/items",
            None,
            body!({ "productId": 1, "quantity": 1 }),
        ))
        .await;
    }

    assert_eq!(app.state.carts.read().await.len(), 3);
}

#[tokio::test]
async fn test_cart_and_checkout() {
    let app = TestApp::new();
    let session = app.login(Role::User).await;

    let response = app
        .send(json(
            "POST",
            "/api/cart/items",
            None,
            body!({ "productId": 0, "quantity": 2 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cart_cookie = set_cookie_pair(&response);
    let cookies = format!("{session}; {cart_cookie}");

    let response = app
        .send(json(
            "POST",
            "/api/cart/items",
            Some(&cookies),
            body!({ "productId": 1, "quantity": 4 }),
        ))
        .await;
    let cart = body_json(response).await;
    assert_eq!(cart["lines"].as_array().unwrap().len(), 2);

    let response = app
        .send(json("POST", "/api/checkout", Some(&cookies), body!({ "storeId": 0 })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let order = body_json(response).await;
    assert_eq!(order["totalCents"], 1000);
    assert_eq!(order["lines"][1]["lineTotalCents"], 100);

    let cart = body_json(app.send(get("/api/cart", Some(&cookies))).await).await;
    assert_eq!(cart["lines"], body!([]));
    assert_eq!(cart["confirmation"], body!({ "open": true }));

    let response = app
        .send(json("POST", "/api/checkout", Some(&cookies), body!({ "storeId": 0 })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_requires_session() {
    let app = TestApp::new();

    let response = app
        .send(json(
            "POST",
            "/api/cart/items",
            None,
            body!({ "productId": 0, "quantity": 1 }),
        ))
        .await;
    let cart_cookie = set_cookie_pair(&response);

    let response = app
        .send(json("POST", "/api/checkout", Some(&cart_cookie), body!({ "storeId": 0 })))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cart_rejects_unknown_product_and_zero_quantity() {
    let app = TestApp::new();

    let response = app
        .send(json(
            "POST",
            "/api/cart/items",
            None,
            body!({ "productId": 99, "quantity": 1 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(json(
            "POST",
            "/api/cart/items",
            None,
            body!({ "productId": 0, "quantity": 0 }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_filters_shallow_and_deep() {
    let app = TestApp::new();
    let filters = body!({ "search": "rožok", "isActive": true });

    let response = app
        .send(json("POST", "/api/filters/products", None, filters.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        body!({
            "href": "/admin/b2c/products?search=ro%C5%BEok&isActive=true",
            "shallow": true,
            "history": "replace"
        })
    );

    let response = app
        .send(json(
            "POST",
            "/api/filters/products?shallow=false&history=push",
            None,
            filters,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"],
        "/admin/b2c/products?search=ro%C5%BEok&isActive=true"
    );

    let response = app
        .send(json("POST", "/api/filters/orders", None, body!({})))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sidebar_cookie_and_dashboard_default() {
    let app = TestApp::new();

    let response = app
        .send(json("POST", "/api/ui/sidebar", None, body!({ "open": false })))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()["set-cookie"],
        "sidebar_state=false; SameSite=Lax; Path=/; Max-Age=604800"
    );

    let admin = app.login(Role::Admin).await;
    let cookies = format!("{admin}; sidebar_state=false");
    let dashboard = body_json(app.send(get("/admin", Some(&cookies))).await).await;

    assert_eq!(dashboard["sidebarOpen"], false);
    assert_eq!(dashboard["counts"]["products"], 2);
}

#[tokio::test]
async fn test_admin_product_writes() {
    let app = TestApp::new();
    let admin = app.login(Role::Admin).await;
    let new_product = body!({
        "name": "Makový koláč",
        "priceCents": 180,
        "categoryId": 1,
        "storeIds": [0]
    });

    let response = app
        .send(json("POST", "/admin/b2c/products", Some(&admin), new_product.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["slug"], "makovy-kolac");
    assert_eq!(created["id"], 2);
    assert!(created["createdAt"].as_i64().unwrap() > 1_700_000_000);

    let response = app
        .send(json("POST", "/admin/b2c/products", Some(&admin), new_product))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .send(json(
            "PATCH",
            "/admin/b2c/products/2",
            Some(&admin),
            body!({ "isActive": false }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["isActive"], false);

    let listing = body_json(app.send(get("/api/products?search=makovy", None)).await).await;
    assert_eq!(listing["total"], 0);
}

#[tokio::test]
async fn test_session_endpoint() {
    let app = TestApp::new();

    let response = app.send(get("/api/auth/session", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let user = app.login(Role::User).await;
    let session = body_json(app.send(get("/api/auth/session", Some(&user))).await).await;
    assert_eq!(session, body!({ "userId": 1, "role": "user" }));
}
