use serde::{Deserialize, Serialize};

/// A row of `book_info`. Every column except the generated key is nullable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub isbn: Option<String>,
    pub title: Option<String>,
    /// Free text, not parsed as a date
    pub published_date: Option<String>,
    pub total_copies: Option<i32>,
    pub issued_copies: Option<i32>,
    pub author: Option<String>,
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Client-supplied book. `id` is ignored on add and required on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub id: Option<i64>,
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub published_date: Option<String>,
    pub total_copies: Option<i32>,
    pub issued_copies: Option<i32>,
    pub author: Option<String>,
}

impl BookPayload {
    /// Materialize the payload as a stored row under `id`.
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            isbn: self.isbn,
            title: self.title,
            published_date: self.published_date,
            total_copies: self.total_copies,
            issued_copies: self.issued_copies,
            author: self.author,
        }
    }
}

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteConfirmation {
    pub message: String,
    pub id: i64,
}

impl DeleteConfirmation {
    pub fn new(id: i64) -> Self {
        Self {
            message: format!("Book {} deleted", id),
            id,
        }
    }
}
