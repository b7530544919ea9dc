use biblioteca_db::{Database, Migration, StoreError};

use super::models::{Book, BookPatch, NewBook};

pub const SCHEMA: Migration = Migration {
    id: "001_livros",
    up: r#"
        CREATE TABLE IF NOT EXISTS livros (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            titulo          VARCHAR(255) NOT NULL,
            autor           VARCHAR(150) NOT NULL,
            isbn            VARCHAR(20)  NOT NULL UNIQUE,
            "anoPublicacao" INTEGER      NOT NULL,
            disponivel      BOOLEAN      NOT NULL DEFAULT 1
        );
        "#,
};

const COLUMNS: &str = r#"id, titulo, autor, isbn, "anoPublicacao", disponivel"#;

/// Data access for the `livros` table.
#[derive(Debug, Clone)]
pub struct BookRepository {
    db: Database,
}

impl BookRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new row and return it with its generated id.
    ///
    /// A duplicate isbn yields [`StoreError::Constraint`].
    pub async fn create(&self, book: NewBook) -> Result<Book, StoreError> {
        let sql = format!(
            r#"INSERT INTO livros (titulo, autor, isbn, "anoPublicacao", disponivel)
               VALUES (?, ?, ?, ?, ?)
               RETURNING {COLUMNS}"#
        );

        let created = sqlx::query_as::<_, Book>(&sql)
            .bind(&book.titulo)
            .bind(&book.autor)
            .bind(&book.isbn)
            .bind(book.ano_publicacao)
            .bind(book.disponivel)
            .fetch_one(self.db.pool())
            .await?;

        tracing::debug!(id = created.id, isbn = %created.isbn, "book created");
        Ok(created)
    }

    /// Every row, in insertion order.
    pub async fn find_all(&self) -> Result<Vec<Book>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM livros ORDER BY id");
        let books = sqlx::query_as::<_, Book>(&sql)
            .fetch_all(self.db.pool())
            .await?;
        Ok(books)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Book>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM livros WHERE id = ?");
        let book = sqlx::query_as::<_, Book>(&sql)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(book)
    }

    /// Merge `patch` onto the stored row and return the result.
    ///
    /// Returns `None` when no row has this id. The merge runs as one
    /// `UPDATE` statement and waits on `busy_timeout` while another writer
    /// holds the lock.
    pub async fn update(&self, id: i64, patch: BookPatch) -> Result<Option<Book>, StoreError> {
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }

        let sql = format!(
            r#"UPDATE livros
               SET titulo = COALESCE(?, titulo),
                   autor = COALESCE(?, autor),
                   isbn = COALESCE(?, isbn),
                   "anoPublicacao" = COALESCE(?, "anoPublicacao"),
                   disponivel = COALESCE(?, disponivel)
               WHERE id = ?
               RETURNING {COLUMNS}"#
        );
        let updated = sqlx::query_as::<_, Book>(&sql)
            .bind(patch.titulo)
            .bind(patch.autor)
            .bind(patch.isbn)
            .bind(patch.ano_publicacao)
            .bind(patch.disponivel)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        if let Some(book) = &updated {
            tracing::debug!(id = book.id, "book updated");
        }
        Ok(updated)
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM livros WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
