use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::IntoResponse,
};
use include_dir::{include_dir, Dir};
use maud::Markup;
use mime_guess::from_path;

// Files under server/static, embedded into the binary
static STATIC_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

pub async fn serve_static_file(Path(path): Path<String>) -> impl IntoResponse {
    let Some(file) = STATIC_DIR.get_file(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let mime_type = from_path(&path).first_or_octet_stream().to_string();

    (
        [
            (header::CONTENT_TYPE, mime_type),
            (header::CACHE_CONTROL, "public, max-age=31536000".to_string()),
        ],
        file.contents().to_vec(),
    )
        .into_response()
}

pub fn asset_url(path: &str) -> String {
    format!("/static/{}", path)
}

pub fn logo_img(class: &str) -> Markup {
    maud::html! {
        a href="/" class="inline-block" {
            img src=(asset_url("logo.svg")) alt="Storefront logo" class=(class);
        }
    }
}
