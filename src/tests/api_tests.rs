use crate::api::{AppService, api_routes};
use crate::core::services::{BudgetService, BudgetSettings};
use crate::infrastructure::notifications::in_memory::InMemoryNotifications;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn create_test_app() -> (Router, Arc<AppService>) {
    let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::new());
    let service = Arc::new(BudgetService::new(
        storage,
        InMemoryNotifications::new(),
        BudgetSettings::default(),
    ));
    (api_routes(service.clone()), service)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_add_expense_endpoint_reconciles() {
    let (app, _) = create_test_app();
    let (status, _) = send(&app, Method::POST, "/todos", Some(json!({ "text": "Sušička" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(json!({ "description": "Sušička", "amount": "450.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["expense"]["description"], "Sušička");
    assert_eq!(body["expense"]["isFixed"], false);
    assert_eq!(body["removedTodos"].as_array().unwrap().len(), 1);
    assert!(body["reconciliationError"].is_null());

    let (status, todos) = send(&app, Method::GET, "/todos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(todos.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_expense_is_bad_request() {
    let (app, _) = create_test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(json!({ "description": "Gauč", "amount": "0" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn test_oversized_amount_is_bad_request() {
    let (app, _) = create_test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/expenses",
        Some(json!({ "description": "Drahé", "amount": "79228162514264337593543950335" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expenseCount"], 0);
}

#[tokio::test]
async fn test_fixed_expense_delete_conflicts() {
    let (app, service) = create_test_app();
    let fixed = service
        .add_expense("Byt - Hypotéka", 150_000.into(), true)
        .await
        .unwrap()
        .expense;

    let uri = format!("/expenses/{}", fixed.id);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::PATCH, &uri, Some(json!({ "amount": "1" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_expense_edit_and_delete() {
    let (app, service) = create_test_app();
    let expense = service
        .add_expense("Rúra", 416.into(), false)
        .await
        .unwrap()
        .expense;
    let uri = format!("/expenses/{}", expense.id);

    let (status, body) = send(&app, Method::PATCH, &uri, Some(json!({ "description": "Mikrovlnka" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Mikrovlnka");
    assert_eq!(body["id"], expense.id.as_str());

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_summary_endpoint() {
    let (app, service) = create_test_app();
    service.add_expense("Byt", 227_973.into(), true).await.unwrap();

    let (status, body) = send(&app, Method::GET, "/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "NEAR_EXHAUSTION");
    assert_eq!(body["expenseCount"], 1);
    assert_eq!(body["formatted"]["remainingBudget"], "2\u{a0}027,00\u{a0}€");
    assert_eq!(body["formatted"]["percentageSpent"], "99.12%");
    assert_eq!(body["statusMessage"], "Varovanie: Rozpočet je takmer vyčerpaný!");
}

#[tokio::test]
async fn test_expense_listing_order() {
    let (app, service) = create_test_app();
    service.add_expense("Hypotéka", 150_000.into(), true).await.unwrap();
    service.add_expense("Kolky", 200.into(), false).await.unwrap();

    let (status, body) = send(&app, Method::GET, "/expenses?order=display", None).await;
    assert_eq!(status, StatusCode::OK);
    let descriptions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["Kolky", "Hypotéka"]);

    let (status, body) = send(&app, Method::GET, "/expenses?order=newest", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, Method::GET, "/expenses?order=random", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blank_todo_and_notifications() {
    let (app, _) = create_test_app();
    let (status, _) = send(&app, Method::POST, "/todos", Some(json!({ "text": "  " }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, item) = send(&app, Method::POST, "/todos", Some(json!({ "text": "Komoda" }))).await;
    let uri = format!("/todos/{}", item["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, notices) = send(&app, Method::GET, "/notifications", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = notices
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Položka pridaná do zoznamu!", "Položka odstránená!"]);

    let (_, notices) = send(&app, Method::GET, "/notifications", None).await;
    assert!(notices.as_array().unwrap().is_empty());
}
