use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use super::{navbar, not_found_page};
use crate::{
    auth::OptionalUser,
    components::{
        layout::Page,
        product::{ProductCard, ProductDetail},
        ui::heading::Heading,
    },
    errors::ServerResult,
    models::{parse_id, Product},
    state::AppState,
};

pub async fn home(
    viewer: OptionalUser,
    State(state): State<AppState>,
) -> ServerResult<Page, StatusCode> {
    let products = Product::list(&state.db).await?;

    let content = html! {
        (Heading::h1("Shop"))
        @if products.is_empty() {
            p class="text-gray-600" { "No products yet. Check back soon!" }
        } @else {
            div class="grid gap-6 sm:grid-cols-2 lg:grid-cols-3" {
                @for product in &products {
                    (ProductCard::new(product))
                }
            }
        }
    };

    Ok(Page::new("Shop", content, navbar(&state, &viewer)))
}

pub async fn product(
    viewer: OptionalUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Response, StatusCode> {
    let navbar = navbar(&state, &viewer);

    let Some(id) = parse_id(&id) else {
        return Ok(not_found_page(navbar));
    };
    let Some(product) = Product::find(&state.db, id).await? else {
        return Ok(not_found_page(navbar));
    };

    let content = html! {
        a href="/" class="inline-block mb-4 text-sm text-indigo-600 hover:text-indigo-800" { "← Back to the shop" }
        (ProductDetail { product: &product })
    };

    Ok(Page::new(product.name.clone(), content, navbar).into_response())
}
