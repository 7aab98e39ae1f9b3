use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::JsonBody;
use crate::{
    auth::AdminUser,
    errors::{ApiError, ApiResult, WithApiError as _},
    models::{parse_id, AboutInput, AboutParagraph},
    state::AppState,
};

fn paragraph_id(raw: &str) -> ApiResult<Uuid> {
    parse_id(raw).ok_or_else(|| ApiError::bad_request("Invalid ID."))
}

fn not_found() -> ApiError {
    ApiError::not_found("Paragraph not found.")
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<AboutParagraph>>> {
    let paragraphs = AboutParagraph::list(&state.db).await.api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to fetch about content.",
    )?;

    Ok(Json(paragraphs))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<AboutInput>,
) -> ApiResult<(StatusCode, Json<AboutParagraph>)> {
    let paragraph = create_paragraph(&state, input).await?;

    Ok((StatusCode::CREATED, Json(paragraph)))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<AboutInput>,
) -> ApiResult<Json<AboutParagraph>> {
    let id = paragraph_id(&id)?;
    let paragraph = update_paragraph(&state, id, input).await?;

    Ok(Json(paragraph))
}

pub async fn destroy(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = paragraph_id(&id)?;
    delete_paragraph(&state, id).await?;

    Ok(Json(json!({ "id": id })))
}

pub(crate) async fn create_paragraph(
    state: &AppState,
    input: AboutInput,
) -> ApiResult<AboutParagraph> {
    let paragraph = input.paragraph()?;

    AboutParagraph::create(&state.db, &paragraph)
        .await
        .api_error(StatusCode::BAD_REQUEST, "Failed to create paragraph.")
}

/// A body without `paragraph` leaves the record as it is
pub(crate) async fn update_paragraph(
    state: &AppState,
    id: Uuid,
    input: AboutInput,
) -> ApiResult<AboutParagraph> {
    if input.paragraph.is_none() {
        return AboutParagraph::find(&state.db, id)
            .await
            .api_error(StatusCode::BAD_REQUEST, "Failed to update paragraph.")?
            .ok_or_else(not_found);
    }

    let paragraph = input.paragraph()?;
    AboutParagraph::update(&state.db, id, &paragraph)
        .await
        .api_error(StatusCode::BAD_REQUEST, "Failed to update paragraph.")?
        .ok_or_else(not_found)
}

pub(crate) async fn delete_paragraph(state: &AppState, id: Uuid) -> ApiResult<()> {
    let deleted = AboutParagraph::delete(&state.db, id)
        .await
        .api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete paragraph.")?;

    if !deleted {
        return Err(not_found());
    }
    Ok(())
}
