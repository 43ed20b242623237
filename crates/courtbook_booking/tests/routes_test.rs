use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use courtbook_booking::routes::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use fixtures::{local, mock_calendar, monday};

fn app() -> Router {
    routes(Arc::new(mock_calendar(monday())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_day_endpoint_returns_snapshot() {
    let app = app();
    let (status, body) = send(&app, get("/calendar/day?date=2025-05-05")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2025-05-05");
    assert_eq!(body["courts"].as_array().unwrap().len(), 10);
    assert_eq!(body["selected"], json!(["c1", "c2", "c3"]));
    assert_eq!(body["create_phase"], "idle");
}

#[tokio::test]
async fn test_slots_endpoint_lists_the_grid() {
    let app = app();
    let (status, body) = send(
        &app,
        get("/calendar/slots?date=2025-05-05&court_id=c1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let slots = body.as_array().unwrap();
    assert_eq!(slots.len(), 32);
    assert_eq!(slots[0]["label"], "07:00");
    assert_eq!(slots[31]["label"], "22:30");
    assert_eq!(slots[31]["selectable"], false);
    assert_eq!(slots[31]["rejection"]["reason"], "past_closing");
}

#[tokio::test]
async fn test_create_and_cancel_through_routes() {
    let app = app();
    send(&app, get("/calendar/day?date=2025-05-05")).await;

    let start = local(monday(), 8, 0).to_rfc3339();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/calendar/bookings",
            json!({"courtId": "c1", "startTime": start}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "done");
    assert_eq!(body["value"]["title"], "Reserva");
    let id = body["value"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        json_request("POST", "/calendar/bookings", json!({"courtId": "c1", "startTime": start})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/calendar/bookings/{}/cancel", id);
    let (status, body) = send(&app, json_request("PATCH", &uri, json!({"reason": "rain"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], id.as_str());

    let (status, body) = send(&app, json_request("PATCH", &uri, json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 404);
}

#[tokio::test]
async fn test_cancel_without_body_is_accepted() {
    let app = app();
    send(&app, get("/calendar/day?date=2025-05-05")).await;

    let start = local(monday(), 9, 30).to_rfc3339();
    let (status, body) = send(
        &app,
        json_request("POST", "/calendar/bookings", json!({"courtId": "c2", "startTime": start})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["value"]["id"].as_str().unwrap().to_string();

    let bare_patch = |uri: String| {
        Request::builder()
            .method("PATCH")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    };
    let (status, body) = send(&app, bare_patch(format!("/calendar/bookings/{}/cancel", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], id.as_str());

    let (status, body) = send(&app, bare_patch("/calendar/bookings/nope/cancel".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 404);
}

#[tokio::test]
async fn test_off_grid_create_is_bad_request() {
    let app = app();
    let start = local(monday(), 8, 15).to_rfc3339();
    let (status, body) = send(
        &app,
        json_request("POST", "/calendar/bookings", json!({"courtId": "c1", "startTime": start})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("not an allowed start time"));
}

#[tokio::test]
async fn test_selection_toggle_endpoint() {
    let app = app();
    send(&app, get("/calendar/day?date=2025-05-05")).await;

    let request = Request::builder()
        .method("PUT")
        .uri("/calendar/selection/c2")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selected"], json!(["c1", "c3"]));
}

#[tokio::test]
async fn test_reservations_endpoint() {
    let app = app();
    let (status, body) = send(
        &app,
        get("/admin/reservations?mode=week&anchor=2025-05-07&court_id=c1&status=all"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["from"], "2025-05-05");
    assert_eq!(body["to"], "2025-05-11");
    assert!(body["items"]
        .as_array()
        .unwrap()
        .iter()
        .all(|item| item["courtId"] == "c1"));

    let (status, body) = send(&app, get("/admin/reservations?mode=month&anchor=2025-05-07")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
}
