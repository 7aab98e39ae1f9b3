//! In-memory media host speaking the subset of the Cloudinary upload API the storefront uses.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use sha1::{Digest, Sha1};
use tracing::info;

#[derive(Debug, Default)]
struct Images {
    stored: BTreeSet<String>,
    uploads: Vec<String>,
    destroyed: Vec<String>,
    next_id: u64,
}

/// Shared state of the fake media host. Clones observe the same images.
#[derive(Clone)]
pub struct MediaHostState {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    images: Arc<Mutex<Images>>,
}

impl MediaHostState {
    pub fn new(cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            cloud_name: cloud_name.to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
            images: Arc::default(),
        }
    }

    /// Pretend `public_id` was uploaded earlier
    pub fn with_image(self, public_id: &str) -> Self {
        self.images
            .lock()
            .unwrap()
            .stored
            .insert(public_id.to_string());
        self
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.images.lock().unwrap().stored.contains(public_id)
    }

    /// Public ids uploaded so far, in order
    pub fn uploads(&self) -> Vec<String> {
        self.images.lock().unwrap().uploads.clone()
    }

    /// Public ids destroyed so far, in order
    pub fn destroyed(&self) -> Vec<String> {
        self.images.lock().unwrap().destroyed.clone()
    }

    fn check_signature(&self, params: &[(&str, &str)], api_key: &str, signature: &str) -> bool {
        if api_key != self.api_key {
            return false;
        }

        let mut params = params.to_vec();
        params.sort_by(|a, b| a.0.cmp(b.0));
        let mut payload = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        payload.push_str(&self.api_secret);

        format!("{:x}", Sha1::digest(payload.as_bytes())) == signature
    }
}

pub fn router(state: MediaHostState) -> Router {
    Router::new()
        .route("/v1_1/:cloud/image/upload", post(upload))
        .route("/v1_1/:cloud/image/destroy", post(destroy))
        .with_state(state)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": { "message": message } }))).into_response()
}

async fn upload(
    State(state): State<MediaHostState>,
    Path(cloud): Path<String>,
    mut multipart: Multipart,
) -> Response {
    if cloud != state.cloud_name {
        return error(StatusCode::NOT_FOUND, "Unknown cloud name");
    }

    let mut file_name = None;
    let mut file_size = 0;
    let mut api_key = String::new();
    let mut timestamp = String::new();
    let mut folder = String::new();
    let mut signature = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return error(StatusCode::BAD_REQUEST, "Malformed multipart body"),
        };

        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_name = Some(field.file_name().unwrap_or("upload").to_string());
            match field.bytes().await {
                Ok(bytes) => file_size = bytes.len(),
                Err(_) => return error(StatusCode::BAD_REQUEST, "Malformed file part"),
            }
            continue;
        }

        let Ok(value) = field.text().await else {
            return error(StatusCode::BAD_REQUEST, "Malformed text part");
        };
        match name.as_str() {
            "api_key" => api_key = value,
            "timestamp" => timestamp = value,
            "folder" => folder = value,
            "signature" => signature = value,
            _ => {}
        }
    }

    let Some(file_name) = file_name else {
        return error(StatusCode::BAD_REQUEST, "Missing required parameter - file");
    };
    if file_size == 0 {
        return error(StatusCode::BAD_REQUEST, "Empty file");
    }
    if !state.check_signature(
        &[("folder", folder.as_str()), ("timestamp", timestamp.as_str())],
        &api_key,
        &signature,
    ) {
        return error(StatusCode::UNAUTHORIZED, "Invalid Signature");
    }

    let public_id = {
        let mut images = state.images.lock().unwrap();
        images.next_id += 1;
        let stem = file_name.split('.').next().unwrap_or("upload");
        let public_id = format!("{folder}/{stem}_{}", images.next_id);
        images.stored.insert(public_id.clone());
        images.uploads.push(public_id.clone());
        public_id
    };
    info!("Fixture media host stored {}", public_id);

    Json(json!({
        "public_id": public_id,
        "version": 1712000000,
        "format": "png",
        "bytes": file_size,
        "secure_url": format!(
            "https://res.fixture.test/{}/image/upload/v1712000000/{}.png",
            state.cloud_name, public_id
        ),
    }))
    .into_response()
}

#[derive(Deserialize)]
struct DestroyParams {
    public_id: String,
    api_key: String,
    timestamp: String,
    signature: String,
}

async fn destroy(
    State(state): State<MediaHostState>,
    Path(cloud): Path<String>,
    Form(params): Form<DestroyParams>,
) -> Response {
    if cloud != state.cloud_name {
        return error(StatusCode::NOT_FOUND, "Unknown cloud name");
    }
    if !state.check_signature(
        &[
            ("public_id", params.public_id.as_str()),
            ("timestamp", params.timestamp.as_str()),
        ],
        &params.api_key,
        &params.signature,
    ) {
        return error(StatusCode::UNAUTHORIZED, "Invalid Signature");
    }

    let mut images = state.images.lock().unwrap();
    if images.stored.remove(&params.public_id) {
        images.destroyed.push(params.public_id.clone());
        info!("Fixture media host destroyed {}", params.public_id);
        Json(json!({ "result": "ok" })).into_response()
    } else {
        Json(json!({ "result": "not found" })).into_response()
    }
}
