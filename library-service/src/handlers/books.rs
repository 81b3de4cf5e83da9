use crate::dtos::{
    BookListResponse, CreateBookRequest, DeleteBookResponse, MessageResponse, TakeBooksRejection,
    TakeBooksResponse,
};
use crate::models::{parse_book_id, BookPatch};
use crate::services::{self, split_ids};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;
use validator::Validate;

pub async fn welcome() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "WELCOME TO REST API PROJECT".to_string(),
    })
}

pub async fn list_books(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let books = state.store.find_all().await?;

    Ok(Json(BookListResponse::from(books)))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_book_id(&id)?;

    let book = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No book found with given ID")))?;

    Ok(Json(book))
}

pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;
    let book = request.into_book()?;

    let created = state.store.create(&book).await.map_err(|e| {
        tracing::warn!(book_id = book.id, error = %e, "Book creation rejected");
        e
    })?;

    tracing::info!(book_id = created.id, "Book created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_book_id(&id)?;
    // A request without a JSON body is an empty patch.
    let patch = match payload {
        Ok(Json(patch)) => patch,
        Err(JsonRejection::MissingJsonContentType(_)) => BookPatch::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    patch.validate()?;

    let book = state
        .store
        .find_by_id_and_update(id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Can't find book with ID {}", id)))?;

    tracing::info!(book_id = id, "Book updated");

    Ok(Json(book))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_book_id(&id)?;

    let book = state
        .store
        .find_by_id_and_delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Can't find book with ID {}", id)))?;

    tracing::info!(book_id = id, "Book deleted");

    Ok(Json(DeleteBookResponse {
        message: "Book deleted successfully".to_string(),
        book,
    }))
}

pub async fn take_books(
    State(state): State<AppState>,
    Path(ids): Path<String>,
) -> Result<Response, AppError> {
    let ids = split_ids(&ids);
    let outcome = services::take_books(state.store.as_ref(), &ids).await;

    tracing::info!(
        requested = ids.len(),
        updated = outcome.updated.len(),
        not_found = outcome.not_found.len(),
        out_of_stock = outcome.out_of_stock.len(),
        failed = outcome.failed.len(),
        "Bulk take processed"
    );

    if outcome.only_failures() {
        return Err(AppError::InternalError(anyhow::anyhow!(
            "Store faults on every id in bulk take: {:?}",
            outcome.failed
        )));
    }

    if outcome.nothing_taken() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(TakeBooksRejection::from(outcome)),
        )
            .into_response());
    }

    Ok(Json(TakeBooksResponse::from(outcome)).into_response())
}
