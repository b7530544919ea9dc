use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use biblioteca_http::error::AppError;

pub const TITULO_MAX_LEN: usize = 255;
pub const AUTOR_MAX_LEN: usize = 150;
pub const ISBN_MAX_LEN: usize = 20;

const MISSING_FIELDS_MESSAGE: &str =
    "Todos os campos obrigatórios (titulo, autor, isbn, anoPublicacao) devem ser fornecidos.";
const INVALID_YEAR_MESSAGE: &str = "O anoPublicacao deve ser um número válido.";

/// A row of the `livros` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub titulo: String,
    pub autor: String,
    pub isbn: String,
    #[sqlx(rename = "anoPublicacao")]
    pub ano_publicacao: i32,
    pub disponivel: bool,
}

/// A validated book ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub titulo: String,
    pub autor: String,
    pub isbn: String,
    pub ano_publicacao: i32,
    pub disponivel: bool,
}

/// Partial update: only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub titulo: Option<String>,
    pub autor: Option<String>,
    pub isbn: Option<String>,
    pub ano_publicacao: Option<i32>,
    pub disponivel: Option<bool>,
}

impl BookPatch {
    pub fn is_empty(&self) -> bool {
        self == &BookPatch::default()
    }
}

/// Body of `POST /api/livros`.
///
/// Every field is optional at the wire level so that absence can be
/// reported as a validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookRequest {
    pub titulo: Option<String>,
    pub autor: Option<String>,
    pub isbn: Option<String>,
    pub ano_publicacao: Option<Value>,
    pub disponivel: Option<bool>,
}

impl CreateBookRequest {
    pub fn into_new_book(self) -> Result<NewBook, AppError> {
        let missing: Vec<Value> = [
            ("titulo", is_blank(&self.titulo)),
            ("autor", is_blank(&self.autor)),
            ("isbn", is_blank(&self.isbn)),
            ("anoPublicacao", year_is_missing(self.ano_publicacao.as_ref())),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(field, _)| json!({ "field": field, "error": "required" }))
        .collect();

        if !missing.is_empty() {
            return Err(AppError::validation(missing, MISSING_FIELDS_MESSAGE));
        }

        let year = self.ano_publicacao.as_ref().and_then(coerce_year);
        let Some(ano_publicacao) = year else {
            return Err(AppError::validation(
                vec![json!({ "field": "anoPublicacao", "error": "invalid_number" })],
                INVALID_YEAR_MESSAGE,
            ));
        };

        let titulo = self.titulo.unwrap_or_default();
        let autor = self.autor.unwrap_or_default();
        let isbn = self.isbn.unwrap_or_default();
        check_lengths(Some(titulo.as_str()), Some(autor.as_str()), Some(isbn.as_str()))?;

        Ok(NewBook {
            titulo,
            autor,
            isbn,
            ano_publicacao,
            disponivel: self.disponivel.unwrap_or(true),
        })
    }
}

/// Body of `PUT /api/livros/{id}`. Unknown keys, including `id`, are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookRequest {
    pub titulo: Option<String>,
    pub autor: Option<String>,
    pub isbn: Option<String>,
    pub ano_publicacao: Option<Value>,
    pub disponivel: Option<bool>,
}

impl UpdateBookRequest {
    pub fn into_patch(self) -> Result<BookPatch, AppError> {
        let ano_publicacao = match self.ano_publicacao.as_ref() {
            None | Some(Value::Null) => None,
            Some(value) => match coerce_year(value) {
                Some(year) => Some(year),
                None => {
                    return Err(AppError::validation(
                        vec![json!({ "field": "anoPublicacao", "error": "invalid_number" })],
                        INVALID_YEAR_MESSAGE,
                    ))
                }
            },
        };

        check_lengths(
            self.titulo.as_deref(),
            self.autor.as_deref(),
            self.isbn.as_deref(),
        )?;

        Ok(BookPatch {
            titulo: self.titulo,
            autor: self.autor,
            isbn: self.isbn,
            ano_publicacao,
            disponivel: self.disponivel,
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// A year is missing when absent, null, zero or an empty string.
fn year_is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Accept integral JSON numbers and strings holding an integer.
fn coerce_year(value: &Value) -> Option<i32> {
    let year = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    i32::try_from(year).ok()
}

fn check_lengths(
    titulo: Option<&str>,
    autor: Option<&str>,
    isbn: Option<&str>,
) -> Result<(), AppError> {
    let too_long: Vec<Value> = [
        ("titulo", titulo, TITULO_MAX_LEN),
        ("autor", autor, AUTOR_MAX_LEN),
        ("isbn", isbn, ISBN_MAX_LEN),
    ]
    .into_iter()
    .filter_map(|(field, value, max)| {
        let value = value?;
        (value.chars().count() > max)
            .then(|| json!({ "field": field, "error": "too_long", "max": max }))
    })
    .collect();

    if too_long.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(
            too_long,
            "Um ou mais campos excedem o tamanho máximo permitido.",
        ))
    }
}
