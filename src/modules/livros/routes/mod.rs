//! HTTP handlers for `/api/livros`.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;

use biblioteca_db::StoreError;
use biblioteca_http::error::AppError;

use super::models::{Book, CreateBookRequest, UpdateBookRequest};
use super::repository::BookRepository;

const INVALID_ID_MESSAGE: &str = "O ID deve ser um número válido.";
const DUPLICATE_ISBN_MESSAGE: &str = "ISBN já cadastrado.";

pub fn router(repository: BookRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repository)
}

async fn create_book(
    State(repository): State<BookRepository>,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let request = body_or_default(payload)?;
    let new_book = request.into_new_book()?;

    let book = repository
        .create(new_book)
        .await
        .map_err(|e| store_failure(e, "Erro ao cadastrar o livro."))?;

    tracing::info!(id = book.id, isbn = %book.isbn, "livro cadastrado");
    Ok((StatusCode::CREATED, Json(book)))
}

async fn list_books(
    State(repository): State<BookRepository>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = repository
        .find_all()
        .await
        .map_err(|e| store_failure(e, "Erro ao buscar a lista de livros."))?;
    Ok(Json(books))
}

async fn get_book(
    State(repository): State<BookRepository>,
    Path(raw_id): Path<String>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(&raw_id)?;

    repository
        .find_by_id(id)
        .await
        .map_err(|e| store_failure(e, "Erro ao buscar o livro."))?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Livro não encontrado."))
}

async fn update_book(
    State(repository): State<BookRepository>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateBookRequest>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let id = parse_id(&raw_id)?;
    let request = body_or_default(payload)?;
    let patch = request.into_patch()?;

    let book = repository
        .update(id, patch)
        .await
        .map_err(|e| store_failure(e, "Erro ao atualizar o livro."))?
        .ok_or_else(|| AppError::not_found("Livro não encontrado para atualização."))?;

    tracing::info!(id = book.id, "livro atualizado");
    Ok(Json(book))
}

async fn delete_book(
    State(repository): State<BookRepository>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id)?;

    let deleted = repository
        .delete(id)
        .await
        .map_err(|e| store_failure(e, "Erro ao excluir o livro."))?;

    if !deleted {
        return Err(AppError::not_found("Livro não encontrado para exclusão."));
    }

    tracing::info!(id, "livro excluído");
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(INVALID_ID_MESSAGE))
}

/// A request without a JSON content type is read as an empty object.
fn body_or_default<T: Default>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(malformed_body(rejection)),
    }
}

fn malformed_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(format!(
        "Corpo da requisição inválido: {}",
        rejection.body_text()
    ))
}

/// Constraint violations become 409; everything else is a 500 carrying `message`.
fn store_failure(error: StoreError, message: &'static str) -> AppError {
    match error {
        StoreError::Constraint { message: detail } => AppError::conflict(
            vec![json!({ "field": "isbn", "error": detail })],
            DUPLICATE_ISBN_MESSAGE,
        ),
        other => AppError::internal(message, other),
    }
}
