use std::time::Instant;

use axum::extract::State;
use tracing::info;

use super::{AppJson, AppPath};
use crate::{
    error::AppResult,
    models::{Book, BookPayload, DeleteConfirmation},
    AppState,
};

// ── POST /api/add ─────────────────────────────────────────────────────────────

pub async fn add_book(
    State(state): State<AppState>,
    AppJson(payload): AppJson<BookPayload>,
) -> AppResult<AppJson<Book>> {
    let start = Instant::now();
    let book = state.books.add_book(payload).await?;

    info!(
        id = book.id,
        title = ?book.title,
        elapsed_ms = start.elapsed().as_millis(),
        "Added book"
    );

    Ok(AppJson(book))
}

// ── POST /api/update ──────────────────────────────────────────────────────────

pub async fn update_book(
    State(state): State<AppState>,
    AppJson(payload): AppJson<BookPayload>,
) -> AppResult<AppJson<Book>> {
    let start = Instant::now();
    let book = state.books.update_book(payload).await?;

    info!(
        id = book.id,
        elapsed_ms = start.elapsed().as_millis(),
        "Updated book"
    );

    Ok(AppJson(book))
}

// ── GET /api/getAll ───────────────────────────────────────────────────────────

pub async fn get_all_books(State(state): State<AppState>) -> AppResult<AppJson<Vec<Book>>> {
    let start = Instant::now();
    let books = state.books.get_all_books().await?;

    info!(
        count = books.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed books"
    );

    Ok(AppJson(books))
}

// ── GET /api/get/:bookid ──────────────────────────────────────────────────────

pub async fn get_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<AppJson<Book>> {
    let start = Instant::now();
    let book = state.books.get_by_id(id).await?;

    info!(
        id,
        title = ?book.title,
        elapsed_ms = start.elapsed().as_millis(),
        "Fetched book"
    );

    Ok(AppJson(book))
}

// ── POST /api/delete/:bookid ──────────────────────────────────────────────────

pub async fn delete_book(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> AppResult<AppJson<DeleteConfirmation>> {
    let start = Instant::now();
    let confirmation = state.books.delete_book(id).await?;

    info!(id, elapsed_ms = start.elapsed().as_millis(), "Deleted book");

    Ok(AppJson(confirmation))
}
