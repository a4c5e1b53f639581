use std::sync::Arc;

use tracing::debug;

use crate::db::BookRepository;
use crate::error::{AppError, AppResult};
use crate::models::{Book, BookPayload, DeleteConfirmation};

/// Book operations exposed to the API layer. Cheap to clone.
#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_all_books(&self) -> AppResult<Vec<Book>> {
        self.repository.find_all().await
    }

    /// The stored row as-is, whatever its `isbn`.
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Always creates a new row; a client-supplied id is dropped.
    pub async fn add_book(&self, mut payload: BookPayload) -> AppResult<Book> {
        if let Some(id) = payload.id.take() {
            debug!(ignored_id = id, "Ignoring id supplied on add");
        }
        self.repository.save(payload).await
    }

    /// Full-replace upsert keyed by the payload's id.
    pub async fn update_book(&self, payload: BookPayload) -> AppResult<Book> {
        if payload.id.is_none() {
            return Err(AppError::BadRequest("id is required for update".to_string()));
        }
        self.repository.save(payload).await
    }

    pub async fn delete_book(&self, id: i64) -> AppResult<DeleteConfirmation> {
        if !self.repository.delete_by_id(id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(DeleteConfirmation::new(id))
    }
}
