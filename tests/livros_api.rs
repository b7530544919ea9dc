use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use biblioteca::Application;
use biblioteca_db::Database;
use biblioteca_kernel::settings::Settings;

async fn app() -> Router {
    let db = Database::connect_in_memory().await.unwrap();
    Application::with_database(Settings::default(), db)
        .await
        .unwrap()
        .router()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn sample() -> Value {
    json!({ "titulo": "A", "autor": "B", "isbn": "123", "anoPublicacao": 2020 })
}

#[tokio::test]
async fn create_then_list_end_to_end() {
    let app = app().await;

    let (status, created) = send(&app, "POST", "/api/livros", Some(sample())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        created,
        json!({
            "id": 1, "titulo": "A", "autor": "B", "isbn": "123",
            "anoPublicacao": 2020, "disponivel": true
        })
    );

    let (status, listed) = send(&app, "GET", "/api/livros", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn generated_id_is_stable_across_reads() {
    let app = app().await;
    let (_, created) = send(&app, "POST", "/api/livros", Some(sample())).await;
    let id = created["id"].as_i64().unwrap();

    for _ in 0..2 {
        let (status, fetched) = send(&app, "GET", &format!("/api/livros/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"], id);
        assert_eq!(fetched, created);
    }
}

#[tokio::test]
async fn duplicate_isbn_conflicts() {
    let app = app().await;
    send(&app, "POST", "/api/livros", Some(sample())).await;

    let (status, body) = send(&app, "POST", "/api/livros", Some(sample())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");
    assert_eq!(body["error"]["message"], "ISBN já cadastrado.");
}

#[tokio::test]
async fn missing_title_is_rejected_and_nothing_is_stored() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/livros",
        Some(json!({ "autor": "B", "isbn": "123", "anoPublicacao": 2020 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["field"], "titulo");

    let (_, listed) = send(&app, "GET", "/api/livros", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn explicit_availability_is_kept_on_create() {
    let app = app().await;
    let mut payload = sample();
    payload["disponivel"] = json!(false);

    let (status, created) = send(&app, "POST", "/api/livros", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["disponivel"], false);
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/livros",
        Some(json!({ "titulo": 5, "autor": "B", "isbn": "1", "anoPublicacao": 2020 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/livros/99999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Livro não encontrado.");
}

#[tokio::test]
async fn non_numeric_id_is_a_bad_request() {
    let app = app().await;

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({ "disponivel": false }))),
        ("DELETE", None),
    ] {
        let (status, response) = send(&app, method, "/api/livros/abc", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(response["error"]["message"], "O ID deve ser um número válido.");
    }
}

#[tokio::test]
async fn health_is_treated_as_an_invalid_id() {
    let app = app().await;

    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({ "disponivel": false }))),
        ("DELETE", None),
    ] {
        let (status, response) = send(&app, method, "/api/livros/health", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(response["error"]["message"], "O ID deve ser um número válido.");
    }
}

#[tokio::test]
async fn update_without_json_content_type_leaves_the_book_unchanged() {
    let app = app().await;
    let (_, created) = send(&app, "POST", "/api/livros", Some(sample())).await;

    let (status, body) = send(&app, "PUT", "/api/livros/1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn create_without_json_content_type_reports_missing_fields() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/api/livros", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    let (_, listed) = send(&app, "GET", "/api/livros", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn updating_year_changes_only_that_field() {
    let app = app().await;
    let (_, created) = send(&app, "POST", "/api/livros", Some(sample())).await;

    let (status, updated) = send(
        &app,
        "PUT",
        "/api/livros/1",
        Some(json!({ "anoPublicacao": 2021 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let mut expected = created;
    expected["anoPublicacao"] = json!(2021);
    assert_eq!(updated, expected);

    let (_, fetched) = send(&app, "GET", "/api/livros/1", None).await;
    assert_eq!(fetched, expected);
}

#[tokio::test]
async fn update_with_invalid_year_is_rejected() {
    let app = app().await;
    send(&app, "POST", "/api/livros", Some(sample())).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/livros/1",
        Some(json!({ "anoPublicacao": "abc" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "O anoPublicacao deve ser um número válido.");
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let app = app().await;

    let (status, _) = send(
        &app,
        "PUT",
        "/api/livros/42",
        Some(json!({ "disponivel": false })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_into_taken_isbn_conflicts() {
    let app = app().await;
    send(&app, "POST", "/api/livros", Some(sample())).await;
    let mut other = sample();
    other["isbn"] = json!("456");
    send(&app, "POST", "/api/livros", Some(other)).await;

    let (status, _) = send(&app, "PUT", "/api/livros/2", Some(json!({ "isbn": "123" }))).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = app().await;
    send(&app, "POST", "/api/livros", Some(sample())).await;

    let (status, body) = send(&app, "DELETE", "/api/livros/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", "/api/livros/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_unknown_id_is_not_found() {
    let app = app().await;

    let (status, body) = send(&app, "DELETE", "/api/livros/99999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Livro não encontrado para exclusão.");
}

#[tokio::test]
async fn openapi_document_lists_livros_routes() {
    let app = app().await;

    let (status, doc) = send(&app, "GET", "/docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/livros"]["post"].is_object());
    assert!(doc["paths"]["/api/livros/{id}"]["delete"].is_object());
    assert!(doc["paths"]["/api/livros/health"].is_null());
}
