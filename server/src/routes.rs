use axum::{
    extract::{DefaultBodyLimit, State},
    routing::get,
    Json,
};
use serde_json::{json, Value};

use crate::{api, pages, state::AppState};

/// Product images are posted through the server, so allow bodies well past axum's 2MB default
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the application router with all routes
pub fn routes(app_state: AppState) -> axum::Router {
    axum::Router::new()
        .merge(pages::router())
        .nest("/api", api::router())
        .route("/_health", get(health))
        .route(
            "/static/*path",
            get(crate::static_assets::serve_static_file),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(tower_cookies::CookieManagerLayer::new())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": state.version(),
    }))
}
