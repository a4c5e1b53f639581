mod memory;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{Book, BookPayload};

pub use memory::MemoryBookRepository;

/// Persistence for `book_info` rows.
///
/// Absence is an ordinary outcome here: lookups return `None` and deletes
/// report whether a row existed. Mapping those to errors is the service's job.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Insert when `book.id` is `None`, otherwise overwrite or create the row
    /// with that id. Returns the stored row.
    async fn save(&self, book: BookPayload) -> AppResult<Book>;

    /// Every row, ascending by id.
    async fn find_all(&self) -> AppResult<Vec<Book>>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>>;

    /// Returns true if a row was removed.
    async fn delete_by_id(&self, id: i64) -> AppResult<bool>;
}

// ── PostgreSQL ────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgBookRepository {
    pool: PgPool,
}

impl PgBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, book: &BookPayload) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO book_info (isbn, title, published_date, total_copies, issued_copies, author)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, isbn, title, published_date, total_copies, issued_copies, author
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.published_date)
        .bind(book.total_copies)
        .bind(book.issued_copies)
        .bind(&book.author)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    async fn upsert(&self, id: i64, book: &BookPayload) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO book_info (id, isbn, title, published_date, total_copies, issued_copies, author)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET isbn           = EXCLUDED.isbn,
                title          = EXCLUDED.title,
                published_date = EXCLUDED.published_date,
                total_copies   = EXCLUDED.total_copies,
                issued_copies  = EXCLUDED.issued_copies,
                author         = EXCLUDED.author
            RETURNING id, isbn, title, published_date, total_copies, issued_copies, author
            "#,
        )
        .bind(id)
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.published_date)
        .bind(book.total_copies)
        .bind(book.issued_copies)
        .bind(&book.author)
        .fetch_one(&mut *tx)
        .await?;

        // Advance the sequence past the explicit id; never rewind it.
        sqlx::query(
            r#"
            SELECT setval('book_info_id_seq', $1)
            FROM book_info_id_seq
            WHERE $1 > last_value
               OR (NOT is_called AND $1 >= last_value)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(saved)
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn save(&self, book: BookPayload) -> AppResult<Book> {
        match book.id {
            Some(id) => self.upsert(id, &book).await,
            None => self.insert(&book).await,
        }
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, isbn, title, published_date, total_copies, issued_copies, author
             FROM book_info ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, isbn, title, published_date, total_copies, issued_copies, author
             FROM book_info WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_info WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
