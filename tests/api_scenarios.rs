//! End-to-end behavior of the catalog API, driven in-process.

mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;

use common::TestApp;

async fn seed_road_and_speedster(app: &TestApp) {
    let (status, _) = app.post("/categories", json!({ "name": "Road" })).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .post(
            "/bikes",
            json!({ "name": "Speedster", "price": 999.5, "stock": 3, "category_id": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn catalog_walkthrough() {
    let app = TestApp::new().await;

    let (status, category) = app.post("/categories", json!({ "name": "Road" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category, json!({ "id": 1, "name": "Road" }));

    let (status, bike) = app
        .post(
            "/bikes",
            json!({ "name": "Speedster", "price": 999.5, "stock": 3, "category_id": 1 }),
        )
        .await;
    let expected = json!({
        "id": 1,
        "name": "Speedster",
        "price": 999.5,
        "stock": 3,
        "category": "Road"
    });
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bike, expected);

    let (status, fetched) = app.get("/bikes/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, expected);

    let (status, body) = app.delete("/categories/1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CATEGORY_IN_USE");
    let (status, _) = app.get("/bikes/1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/bikes/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["resource"], "bike");
}

#[tokio::test]
async fn lists_start_empty_and_keep_insertion_order() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    let (_, body) = app.get("/bikes").await;
    assert_eq!(body, json!([]));

    for name in ["Road", "Gravel", "Mountain"] {
        app.post("/categories", json!({ "name": name })).await;
    }
    let (_, body) = app.get("/categories").await;
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Road", "Gravel", "Mountain"]);
}

#[tokio::test]
async fn bike_category_follows_renames() {
    let app = TestApp::new().await;
    seed_road_and_speedster(&app).await;

    let (status, body) = app.put("/categories/1", json!({ "name": "Racing" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "name": "Racing" }));

    let (_, bikes) = app.get("/bikes").await;
    assert_eq!(bikes[0]["category"], "Racing");
}

#[tokio::test]
async fn partial_bike_update_keeps_other_fields() {
    let app = TestApp::new().await;
    seed_road_and_speedster(&app).await;
    app.post("/categories", json!({ "name": "Gravel" })).await;

    let (status, body) = app
        .put("/bikes/1", json!({ "stock": 7, "category_id": 2 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "id": 1, "name": "Speedster", "price": 999.5, "stock": 7, "category": "Gravel" })
    );

    let (status, body) = app.put("/bikes/1", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stock"], 7);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = TestApp::new().await;

    for (method, uri, body) in [
        (Method::GET, "/categories/42", None),
        (Method::PUT, "/categories/42", Some(json!({ "name": "X" }))),
        (Method::DELETE, "/categories/42", None),
        (Method::GET, "/bikes/42", None),
        (Method::PUT, "/bikes/42", Some(json!({ "stock": 1 }))),
        (Method::DELETE, "/bikes/42", None),
    ] {
        let (status, body) = app.json(method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn bike_with_unknown_category_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/bikes",
            json!({ "name": "Orphan", "price": 10.0, "stock": 1, "category_id": 9 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["resource"], "category");

    seed_road_and_speedster(&app).await;
    let (status, body) = app.put("/bikes/1", json!({ "category_id": 9 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["resource"], "category");

    let (_, bike) = app.get("/bikes/1").await;
    assert_eq!(bike["category"], "Road");
}

#[tokio::test]
async fn invalid_payloads_are_rejected_with_details() {
    let app = TestApp::new().await;

    let (status, body) = app.post("/categories", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"][0]["field"], "name");

    let (status, body) = app
        .post("/bikes", json!({ "name": "  ", "price": -1, "stock": 2 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<_> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"price"));
    assert!(fields.contains(&"category_id"));

    let (status, _) = app
        .post("/categories", json!({ "name": "x".repeat(51) }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app.get("/bikes").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/categories")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(common::read_json(response).await["code"], "INVALID_JSON");

    let (status, body) = app.get("/bikes/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PATH");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/categories")
        .body(Body::from("{\"name\":\"Road\"}"))
        .unwrap();
    let response = app.request(request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn deletes_return_no_content() {
    let app = TestApp::new().await;
    seed_road_and_speedster(&app).await;

    let (status, body) = app.delete("/bikes/1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.delete("/categories/1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get("/categories/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ids_are_never_reused() {
    let app = TestApp::new().await;
    app.post("/categories", json!({ "name": "Road" })).await;
    app.delete("/categories/1").await;

    let (_, body) = app.post("/categories", json!({ "name": "Road" })).await;
    assert_eq!(body["id"], 2);
}

#[tokio::test]
async fn every_handler_call_counts_once() {
    let app = TestApp::new().await;
    assert_eq!(app.sample("bikeshop_requests_total"), 0.0);

    app.post("/categories", json!({ "name": "Road" })).await;
    assert_eq!(app.sample("bikeshop_requests_total"), 1.0);

    // failures count too
    app.get("/bikes/404").await;
    app.post("/bikes", json!({})).await;
    assert_eq!(app.sample("bikeshop_requests_total"), 3.0);
    assert_eq!(app.sample("bikeshop_request_latency_seconds_count"), 3.0);
    assert_eq!(app.sample("bikeshop_response_size_bytes_count"), 3.0);

    // outside the instrumented set
    app.get("/metrics").await;
    app.get("/no/such/route").await;
    assert_eq!(app.sample("bikeshop_requests_total"), 3.0);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/categories")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = app.request(request).await;
    assert_eq!(response.headers()["x-request-id"], "trace-me");

    let response = app
        .request(Request::builder().uri("/bikes").body(Body::empty()).unwrap())
        .await;
    assert!(response.headers().contains_key("x-request-id"));
}
