use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use maud::{html, Markup};

use super::{admin_navbar, form_message, navbar, not_found_page, rejected};
use crate::{
    api::about::{create_paragraph, delete_paragraph, update_paragraph},
    auth::{AdminPage, OptionalUser},
    components::{
        form::{Form as HtmlForm, TextArea},
        layout::{Card, ErrorBanner, Navbar, Page},
        ui::{button::Button, heading::Heading},
    },
    errors::ServerResult,
    models::{parse_id, AboutInput, AboutParagraph},
    state::AppState,
};

pub async fn show(
    viewer: OptionalUser,
    State(state): State<AppState>,
) -> ServerResult<Page, StatusCode> {
    let is_admin = viewer.is_admin();
    about_page(&state, navbar(&state, &viewer), is_admin, None).await
}

async fn about_page(
    state: &AppState,
    navbar: Navbar,
    is_admin: bool,
    error: Option<&str>,
) -> ServerResult<Page, StatusCode> {
    let paragraphs = AboutParagraph::list(&state.db).await?;

    let content = html! {
        (Heading::h1("About us"))
        (ErrorBanner(error))

        @if paragraphs.is_empty() && !is_admin {
            p class="text-gray-600" { "Nothing here yet." }
        }

        div class="space-y-4" {
            @for paragraph in &paragraphs {
                @if is_admin {
                    (editable_paragraph(paragraph))
                } @else {
                    p class="text-gray-700 leading-relaxed whitespace-pre-line" { (paragraph.paragraph) }
                }
            }
        }

        @if is_admin {
            div class="mt-8" {
                (Card::new(html! {
                    (Heading::h3("Add a paragraph"))
                    (HtmlForm::new("/admin/about", "post", html! {
                        (TextArea::new("paragraph").rows(4).required(true))
                        (Button::primary("Add paragraph").submit())
                    }))
                }).with_max_width("max-w-none"))
            }
        }
    };

    Ok(Page::new("About", content, navbar))
}

fn editable_paragraph(paragraph: &AboutParagraph) -> Markup {
    let id = paragraph.id.to_string();

    html! {
        div class="bg-white rounded-lg border border-gray-100 shadow-sm p-4" {
            (HtmlForm::new(&format!("/admin/about/{id}"), "post", html! {
                (TextArea::new("paragraph").value(paragraph.paragraph.clone()).rows(4).required(true))
                (Button::secondary("Save").submit())
            }))
            form action={"/admin/about/" (id) "/delete"} method="post" class="mt-2" {
                (Button::danger("Delete").submit())
            }
        }
    }
}

pub async fn create(
    _admin: AdminPage,
    State(state): State<AppState>,
    Form(input): Form<AboutInput>,
) -> Result<Redirect, Response> {
    let Err(err) = create_paragraph(&state, input).await else {
        return Ok(Redirect::to("/about"));
    };

    let message = form_message(err, admin_navbar(&state))?;
    Err(rerender(&state, &message).await)
}

pub async fn update(
    _admin: AdminPage,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(input): Form<AboutInput>,
) -> Result<Redirect, Response> {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page(admin_navbar(&state)));
    };

    // An empty textarea still submits the field, so it is validated rather than skipped
    let input = AboutInput {
        paragraph: Some(input.paragraph.unwrap_or_default()),
    };
    let Err(err) = update_paragraph(&state, id, input).await else {
        return Ok(Redirect::to("/about"));
    };

    let message = form_message(err, admin_navbar(&state))?;
    Err(rerender(&state, &message).await)
}

pub async fn delete(
    _admin: AdminPage,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, Response> {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page(admin_navbar(&state)));
    };

    match delete_paragraph(&state, id).await {
        Ok(()) => Ok(Redirect::to("/about")),
        Err(err) => {
            let message = form_message(err, admin_navbar(&state))?;
            Err(rerender(&state, &message).await)
        }
    }
}

async fn rerender(state: &AppState, message: &str) -> Response {
    match about_page(state, admin_navbar(state), true, Some(message)).await {
        Ok(page) => rejected(page),
        Err(err) => err.into_response(),
    }
}
