use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::BookRepository;
use crate::error::{AppError, AppResult};
use crate::models::{Book, BookPayload};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<i64, Book>,
    /// `None` once the id space is used up.
    next_id: Option<i64>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

/// In-process `book_info`, used when no database is configured.
/// Ids are handed out from 1 like a fresh `BIGSERIAL`.
#[derive(Clone, Default)]
pub struct MemoryBookRepository {
    table: Arc<RwLock<Table>>,
}

impl MemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn save(&self, book: BookPayload) -> AppResult<Book> {
        let mut table = self.table.write().await;

        let id = match book.id {
            Some(id) => {
                table.next_id = match (table.next_id, id.checked_add(1)) {
                    (Some(next), Some(after)) => Some(next.max(after)),
                    _ => None,
                };
                id
            }
            None => {
                let id = table
                    .next_id
                    .ok_or_else(|| AppError::Internal(anyhow!("book id space exhausted")))?;
                table.next_id = id.checked_add(1);
                id
            }
        };

        let stored = book.into_book(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> AppResult<Vec<Book>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(title: &str) -> BookPayload {
        BookPayload {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids_from_one() {
        let repo = MemoryBookRepository::new();
        let a = repo.save(payload("A")).await.unwrap();
        let b = repo.save(payload("B")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn save_with_existing_id_replaces_every_field() {
        let repo = MemoryBookRepository::new();
        let original = repo
            .save(BookPayload {
                isbn: Some("111".to_string()),
                title: Some("Old".to_string()),
                total_copies: Some(3),
                ..Default::default()
            })
            .await
            .unwrap();

        let replaced = repo
            .save(BookPayload {
                id: Some(original.id),
                title: Some("New".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.title.as_deref(), Some("New"));
        assert_eq!(replaced.isbn, None, "fields absent from the payload are cleared");
        assert_eq!(replaced.total_copies, None);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_with_unknown_id_creates_that_row_and_bumps_sequence() {
        let repo = MemoryBookRepository::new();
        let upserted = repo
            .save(BookPayload {
                id: Some(10),
                ..payload("Upserted")
            })
            .await
            .unwrap();
        assert_eq!(upserted.id, 10);

        let next = repo.save(payload("Next")).await.unwrap();
        assert_eq!(next.id, 11, "generated ids must not collide with explicit ones");
    }

    #[tokio::test]
    async fn upsert_below_sequence_does_not_rewind_it() {
        let repo = MemoryBookRepository::new();
        for title in ["A", "B", "C"] {
            repo.save(payload(title)).await.unwrap();
        }
        repo.save(BookPayload {
            id: Some(2),
            ..payload("B2")
        })
        .await
        .unwrap();

        let next = repo.save(payload("D")).await.unwrap();
        assert_eq!(next.id, 4);
    }

    #[tokio::test]
    async fn exhausted_id_space_is_an_error_not_an_overwrite() {
        let repo = MemoryBookRepository::new();
        let last = repo
            .save(BookPayload {
                id: Some(i64::MAX),
                ..payload("Last")
            })
            .await
            .unwrap();
        assert_eq!(last.id, i64::MAX);

        let err = repo.save(payload("Overflow")).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(repo.find_by_id(i64::MAX).await.unwrap(), Some(last));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn explicit_ids_still_work_after_exhaustion() {
        let repo = MemoryBookRepository::new();
        repo.save(BookPayload {
            id: Some(i64::MAX),
            ..payload("Last")
        })
        .await
        .unwrap();

        let updated = repo
            .save(BookPayload {
                id: Some(3),
                ..payload("Three")
            })
            .await
            .unwrap();
        assert_eq!(updated.id, 3);
        assert!(repo.save(payload("Generated")).await.is_err());
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_id() {
        let repo = MemoryBookRepository::new();
        repo.save(BookPayload {
            id: Some(5),
            ..payload("Five")
        })
        .await
        .unwrap();
        repo.save(BookPayload {
            id: Some(2),
            ..payload("Two")
        })
        .await
        .unwrap();

        let ids: Vec<i64> = repo.find_all().await.unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[tokio::test]
    async fn find_by_id_returns_none_when_absent() {
        let repo = MemoryBookRepository::new();
        assert_eq!(repo.find_by_id(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let repo = MemoryBookRepository::new();
        let book = repo.save(payload("Gone")).await.unwrap();

        assert!(repo.delete_by_id(book.id).await.unwrap());
        assert!(!repo.delete_by_id(book.id).await.unwrap());
        assert_eq!(repo.find_by_id(book.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_the_same_table() {
        let repo = MemoryBookRepository::new();
        let other = repo.clone();
        let book = repo.save(payload("Shared")).await.unwrap();
        assert_eq!(other.find_by_id(book.id).await.unwrap(), Some(book));
    }
}
