pub mod models;
pub mod repository;
pub mod routes;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;

use biblioteca_db::Database;
use biblioteca_kernel::{InitCtx, Migration, Module};

use repository::BookRepository;

/// Book catalogue module, mounted at `/api/livros`
pub struct LivrosModule {
    repository: BookRepository,
}

impl LivrosModule {
    pub fn new(repository: BookRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Module for LivrosModule {
    fn name(&self) -> &'static str {
        "livros"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "livros module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let book = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Livro" }
                    }
                }
            })
        };
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Livros"],
                        "responses": {
                            "200": {
                                "description": "Every book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Livro" }
                                        }
                                    }
                                }
                            },
                            "500": error("Internal server error")
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Livros"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/NovoLivro" }
                                }
                            }
                        },
                        "responses": {
                            "201": book("Created book"),
                            "400": error("Missing or invalid fields"),
                            "409": error("ISBN already registered"),
                            "500": error("Internal server error")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book by id",
                        "tags": ["Livros"],
                        "parameters": id_param.clone(),
                        "responses": {
                            "200": book("The book"),
                            "400": error("Non-numeric id"),
                            "404": error("Book not found"),
                            "500": error("Internal server error")
                        }
                    },
                    "put": {
                        "summary": "Update some fields of a book",
                        "tags": ["Livros"],
                        "parameters": id_param.clone(),
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AtualizarLivro" }
                                }
                            }
                        },
                        "responses": {
                            "200": book("Updated book"),
                            "400": error("Non-numeric id or anoPublicacao"),
                            "404": error("Book not found"),
                            "409": error("ISBN already registered"),
                            "500": error("Internal server error")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Livros"],
                        "parameters": id_param,
                        "responses": {
                            "204": { "description": "Deleted" },
                            "400": error("Non-numeric id"),
                            "404": error("Book not found"),
                            "500": error("Internal server error")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Livro": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "titulo": { "type": "string", "maxLength": models::TITULO_MAX_LEN },
                            "autor": { "type": "string", "maxLength": models::AUTOR_MAX_LEN },
                            "isbn": { "type": "string", "maxLength": models::ISBN_MAX_LEN },
                            "anoPublicacao": { "type": "integer" },
                            "disponivel": { "type": "boolean" }
                        },
                        "required": ["id", "titulo", "autor", "isbn", "anoPublicacao", "disponivel"]
                    },
                    "NovoLivro": {
                        "type": "object",
                        "properties": {
                            "titulo": { "type": "string", "maxLength": models::TITULO_MAX_LEN },
                            "autor": { "type": "string", "maxLength": models::AUTOR_MAX_LEN },
                            "isbn": { "type": "string", "maxLength": models::ISBN_MAX_LEN },
                            "anoPublicacao": { "type": "integer" },
                            "disponivel": { "type": "boolean", "default": true }
                        },
                        "required": ["titulo", "autor", "isbn", "anoPublicacao"]
                    },
                    "AtualizarLivro": {
                        "type": "object",
                        "properties": {
                            "titulo": { "type": "string", "maxLength": models::TITULO_MAX_LEN },
                            "autor": { "type": "string", "maxLength": models::AUTOR_MAX_LEN },
                            "isbn": { "type": "string", "maxLength": models::ISBN_MAX_LEN },
                            "anoPublicacao": { "type": "integer" },
                            "disponivel": { "type": "boolean" }
                        }
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![repository::SCHEMA]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "livros module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "livros module stopped");
        Ok(())
    }
}

/// Create the livros module over the shared database handle
pub fn create_module(db: Database) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(LivrosModule::new(BookRepository::new(db)))
}
