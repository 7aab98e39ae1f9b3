use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    auth::AdminUser,
    errors::{ApiError, ApiResult, WithApiError as _},
    media::UploadedImage,
    state::AppState,
};

/// An image file read out of a multipart body
#[derive(Debug)]
pub(crate) struct ImageFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut multipart =
        multipart.map_err(|rejection| ApiError::new(rejection.status(), rejection.body_text()))?;

    let mut image = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .api_error(StatusCode::BAD_REQUEST, "Malformed upload.")?
    {
        if field.name() == Some("file") {
            image = read_image(field).await?;
        }
    }

    let image = image.ok_or_else(|| ApiError::bad_request("Image file is required."))?;
    let uploaded = upload_image(&state, image).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "imageUrl": uploaded.url,
            "imagePublicId": uploaded.public_id,
        })),
    ))
}

/// Read a file part. Browsers send an empty part when no file was picked,
/// which reads as `None`.
pub(crate) async fn read_image(field: Field<'_>) -> ApiResult<Option<ImageFile>> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = match field.content_type() {
        Some(content_type) => content_type.to_string(),
        None => mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .to_string(),
    };

    let bytes = field
        .bytes()
        .await
        .api_error(StatusCode::BAD_REQUEST, "Malformed upload.")?;
    if bytes.is_empty() {
        return Ok(None);
    }

    if !is_image(&content_type) {
        return Err(ApiError::bad_request("Only image files can be uploaded."));
    }

    Ok(Some(ImageFile {
        bytes: bytes.to_vec(),
        filename: if filename.is_empty() {
            "upload".to_string()
        } else {
            filename
        },
        content_type,
    }))
}

pub(crate) async fn upload_image(state: &AppState, image: ImageFile) -> ApiResult<UploadedImage> {
    state
        .media
        .upload(image.bytes, &image.filename, &image.content_type)
        .await
        .api_error(StatusCode::BAD_GATEWAY, "Image upload failed.")
}

fn is_image(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .is_ok_and(|mime| mime.type_() == mime::IMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_image_types() {
        assert!(is_image("image/png"));
        assert!(is_image("image/svg+xml"));
        assert!(!is_image("application/pdf"));
        assert!(!is_image("text/plain; charset=utf-8"));
        assert!(!is_image("not a mime"));
    }
}
