//! JSON API consumed by the storefront frontend and admin tooling.
//!
//! Reads are public. Writes take an [`AdminUser`](crate::auth::AdminUser).
//! Every error body is `{"error": "..."}`.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    routing::{get, patch, post},
    Json, Router,
};
use color_eyre::eyre::eyre;
use serde::de::DeserializeOwned;

use crate::{errors::ApiError, models::ValidationError, state::AppState};

pub mod about;
pub mod contact;
pub mod products;
pub mod uploads;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::show)
                .patch(products::update)
                .delete(products::destroy),
        )
        .route("/about", get(about::list).post(about::create))
        .route("/about/:id", patch(about::update).delete(about::destroy))
        .route(
            "/contact",
            get(contact::show)
                .post(contact::create)
                .patch(contact::update)
                .delete(contact::destroy),
        )
        .route("/uploads", post(uploads::create))
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

/// `Json` whose rejections render as API errors instead of plain text
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// Bodies that are not JSON, or whose fields have the wrong type, are bad requests.
/// Content-type and size rejections keep axum's status.
fn json_rejection(rejection: JsonRejection) -> ApiError {
    let source = eyre!(rejection.body_text());
    match rejection {
        JsonRejection::JsonDataError(_) => {
            ApiError::bad_request("Invalid request body.").with_source(source)
        }
        JsonRejection::JsonSyntaxError(_) => {
            ApiError::bad_request("Malformed JSON body.").with_source(source)
        }
        other => ApiError::new(other.status(), other.body_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{header::CONTENT_TYPE, StatusCode}};

    async fn reject(body: &'static str) -> ApiError {
        let request = Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        match JsonBody::<crate::models::ProductInput>::from_request(request, &()).await {
            Ok(_) => panic!("body should be rejected"),
            Err(err) => err,
        }
    }

    #[tokio::test]
    async fn wrong_field_types_are_bad_requests() {
        let err = reject(r#"{"name": 5}"#).await;

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid request body.");
    }

    #[tokio::test]
    async fn syntax_errors_are_bad_requests() {
        let err = reject(r#"{"name": "#).await;

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Malformed JSON body.");
    }
}
