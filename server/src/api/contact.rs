use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::JsonBody;
use crate::{
    auth::AdminUser,
    errors::{ApiError, ApiResult, WithApiError as _},
    models::{Contact, ContactInput},
    state::AppState,
};

fn not_found() -> ApiError {
    ApiError::not_found("Contact not found.")
}

pub async fn show(State(state): State<AppState>) -> ApiResult<Json<Contact>> {
    let contact = Contact::find(&state.db)
        .await
        .api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch contact.")?
        .ok_or_else(not_found)?;

    Ok(Json(contact))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ContactInput>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    let contact = create_contact(&state, input).await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ContactInput>,
) -> ApiResult<Json<Contact>> {
    let contact = update_contact(&state, input).await?;

    Ok(Json(contact))
}

pub async fn destroy(_admin: AdminUser, State(state): State<AppState>) -> ApiResult<Json<Value>> {
    delete_contact(&state).await?;

    Ok(Json(json!({ "message": "Contact deleted successfully." })))
}

pub(crate) async fn create_contact(state: &AppState, input: ContactInput) -> ApiResult<Contact> {
    let fields = input.into_fields()?;

    Contact::create(&state.db, &fields)
        .await
        .api_error(StatusCode::BAD_REQUEST, "Failed to create contact.")?
        .ok_or_else(|| ApiError::bad_request("Contact already exists."))
}

pub(crate) async fn update_contact(state: &AppState, input: ContactInput) -> ApiResult<Contact> {
    let existing = Contact::find(&state.db)
        .await
        .api_error(StatusCode::BAD_REQUEST, "Failed to update contact.")?
        .ok_or_else(not_found)?;

    let fields = existing.merge(input)?;

    existing
        .update(&state.db, &fields)
        .await
        .api_error(StatusCode::BAD_REQUEST, "Failed to update contact.")?
        .ok_or_else(not_found)
}

pub(crate) async fn delete_contact(state: &AppState) -> ApiResult<()> {
    let deleted = Contact::delete(&state.db)
        .await
        .api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete contact.")?;

    if !deleted {
        return Err(not_found());
    }
    Ok(())
}
