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
    models::{parse_id, Product, ProductInput},
    state::AppState,
};

fn product_id(raw: &str) -> ApiResult<Uuid> {
    parse_id(raw).ok_or_else(|| ApiError::bad_request("Invalid product ID."))
}

fn not_found() -> ApiError {
    ApiError::not_found("Product not found.")
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = Product::list(&state.db)
        .await
        .api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch products.")?;

    Ok(Json(products))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = product_id(&id)?;

    let product = Product::find(&state.db, id)
        .await
        .api_error(StatusCode::INTERNAL_SERVER_ERROR, "Error fetching product.")?
        .ok_or_else(not_found)?;

    Ok(Json(product))
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<ProductInput>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = create_product(&state, input).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<ProductInput>,
) -> ApiResult<Json<Product>> {
    let id = product_id(&id)?;
    let product = update_product(&state, id, input).await?;

    Ok(Json(product))
}

pub async fn destroy(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = product_id(&id)?;
    delete_product(&state, id).await?;

    Ok(Json(json!({
        "message": "Product deleted successfully.",
        "id": id,
    })))
}

pub(crate) async fn create_product(state: &AppState, input: ProductInput) -> ApiResult<Product> {
    let fields = input.into_fields(&state.placeholder_image_url)?;

    Product::create(&state.db, &fields)
        .await
        .api_error(StatusCode::BAD_REQUEST, "Failed to create product.")
}

/// Merge `input` into product `id`. Once the new row is saved, an image it
/// no longer references is destroyed on the media host.
pub(crate) async fn update_product(
    state: &AppState,
    id: Uuid,
    input: ProductInput,
) -> ApiResult<Product> {
    let existing = Product::find(&state.db, id)
        .await
        .api_error(StatusCode::BAD_REQUEST, "Failed to update product.")?
        .ok_or_else(not_found)?;

    let fields = existing.merge(input)?;

    let product = Product::update(&state.db, id, &fields)
        .await
        .api_error(StatusCode::BAD_REQUEST, "Failed to update product.")?
        .ok_or_else(not_found)?;

    state
        .media
        .discard_replaced(
            existing.image_public_id.as_deref(),
            product.image_public_id.as_deref(),
        )
        .await;

    Ok(product)
}

pub(crate) async fn delete_product(state: &AppState, id: Uuid) -> ApiResult<()> {
    let deleted = Product::delete(&state.db, id)
        .await
        .api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete product.")?;

    if !deleted {
        return Err(not_found());
    }
    Ok(())
}
