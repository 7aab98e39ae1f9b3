//! Server-rendered storefront and admin pages.
//!
//! Admin forms post back here and reuse the JSON API's write helpers, so
//! both surfaces share one set of rules. Successful posts redirect with a
//! 303; a rejected submission re-renders its page with a 400.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use maud::html;

use crate::{
    auth::OptionalUser,
    components::{
        layout::{Card, Navbar, Page},
        ui::{button::Button, heading::Heading},
    },
    errors::ApiError,
    state::AppState,
};

pub mod about;
pub mod admin;
pub mod contact;
pub mod storefront;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(storefront::home))
        .route("/products/:id", get(storefront::product))
        .route("/about", get(about::show))
        .route("/contact", get(contact::show))
        .route("/admin", get(admin::dashboard))
        .route("/admin/products", post(admin::create_product))
        .route("/admin/products/new", get(admin::new_product))
        .route("/admin/products/:id", post(admin::update_product))
        .route("/admin/products/:id/edit", get(admin::edit_product))
        .route("/admin/products/:id/delete", post(admin::delete_product))
        .route("/admin/about", post(about::create))
        .route("/admin/about/:id", post(about::update))
        .route("/admin/about/:id/delete", post(about::delete))
        .route("/admin/contact", post(contact::save))
        .route("/admin/contact/delete", post(contact::delete))
}

pub(crate) fn navbar(state: &AppState, viewer: &OptionalUser) -> Navbar {
    Navbar {
        signed_in: viewer.user.is_some(),
        is_admin: viewer.is_admin(),
        sign_in_url: state.auth.sign_in_url.clone(),
        sign_out_url: state.auth.sign_out_url.clone(),
    }
}

pub(crate) fn admin_navbar(state: &AppState) -> Navbar {
    Navbar {
        signed_in: true,
        is_admin: true,
        sign_in_url: state.auth.sign_in_url.clone(),
        sign_out_url: state.auth.sign_out_url.clone(),
    }
}

pub(crate) fn not_found_page(navbar: Navbar) -> Response {
    let content = Card::new(html! {
        (Heading::h1("Not found"))
        p class="text-gray-600 mb-6" { "We couldn't find what you were looking for." }
        (Button::primary("Back to the shop").href("/"))
    });

    (StatusCode::NOT_FOUND, Page::new("Not found", content, navbar)).into_response()
}

/// Message to re-render a rejected form with. Missing records become the
/// 404 page and anything else a server error.
pub(crate) fn form_message(err: ApiError, navbar: Navbar) -> Result<String, Response> {
    match err.status {
        StatusCode::BAD_REQUEST => {
            tracing::info!(message = %err.message, "Form submission rejected");
            Ok(err.message)
        }
        StatusCode::NOT_FOUND => Err(not_found_page(navbar)),
        _ => Err(err.into_server_error().into_response()),
    }
}

/// A page re-rendered after a rejected submission
pub(crate) fn rejected(page: Page) -> Response {
    (StatusCode::BAD_REQUEST, page).into_response()
}
