use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use maud::{html, Markup};

use super::{admin_navbar, form_message, navbar, rejected};
use crate::{
    api::contact::{create_contact, delete_contact, update_contact},
    auth::{AdminPage, OptionalUser},
    components::{
        form::{Form as HtmlForm, InputField},
        layout::{Card, ErrorBanner, Navbar, Page},
        ui::{button::Button, heading::Heading},
    },
    errors::{ServerResult, WithApiError as _},
    models::{Contact, ContactInput},
    state::AppState,
};

pub async fn show(
    viewer: OptionalUser,
    State(state): State<AppState>,
) -> ServerResult<Page, StatusCode> {
    let is_admin = viewer.is_admin();
    contact_page(&state, navbar(&state, &viewer), is_admin, None).await
}

async fn contact_page(
    state: &AppState,
    navbar: Navbar,
    is_admin: bool,
    error: Option<&str>,
) -> ServerResult<Page, StatusCode> {
    let contact = Contact::find(&state.db).await?;

    let content = html! {
        (Heading::h1("Contact"))
        (ErrorBanner(error))

        @match &contact {
            Some(contact) => { (contact_card(contact)) }
            None => { p class="text-gray-600 mb-6" { "Contact details haven't been published yet." } }
        }

        @if is_admin {
            div class="mt-8" {
                (Card::new(contact_form(contact.as_ref())).with_max_width("max-w-none"))
            }
        }
    };

    Ok(Page::new("Contact", content, navbar))
}

fn contact_card(contact: &Contact) -> Markup {
    html! {
        details class="bg-white rounded-xl border border-gray-100 shadow-md p-6" {
            summary class="cursor-pointer font-medium text-indigo-700" { "Show contact details" }
            dl class="mt-4 grid grid-cols-[auto,1fr] gap-x-6 gap-y-2 text-gray-700" {
                dt class="font-medium" { "Name" }
                dd { (contact.name) }
                dt class="font-medium" { "Address" }
                dd { (contact.address) }
                dt class="font-medium" { "Email" }
                dd { a href={"mailto:" (contact.email)} class="text-indigo-600 hover:underline" { (contact.email) } }
                @if let Some(facebook) = &contact.facebook {
                    dt class="font-medium" { "Facebook" }
                    dd { a href=(facebook) class="text-indigo-600 hover:underline" { (facebook) } }
                }
                @if let Some(instagram) = &contact.instagram {
                    dt class="font-medium" { "Instagram" }
                    dd { a href=(instagram) class="text-indigo-600 hover:underline" { (instagram) } }
                }
            }
        }
    }
}

fn contact_form(contact: Option<&Contact>) -> Markup {
    let value = |field: Option<&String>| field.cloned().unwrap_or_default();

    html! {
        (Heading::h3(if contact.is_some() { "Edit contact details" } else { "Publish contact details" }))
        (HtmlForm::new("/admin/contact", "post", html! {
            (InputField::new("name").label("Name").value(value(contact.map(|c| &c.name))).required(contact.is_none()))
            (InputField::new("address").label("Address").value(value(contact.map(|c| &c.address))).required(contact.is_none()))
            (InputField::new("email").label("Email").input_type("email").value(value(contact.map(|c| &c.email))).required(contact.is_none()))
            (InputField::new("facebook").label("Facebook").input_type("url").value(value(contact.and_then(|c| c.facebook.as_ref()))))
            (InputField::new("instagram").label("Instagram").input_type("url").value(value(contact.and_then(|c| c.instagram.as_ref()))))
            (Button::primary("Save").submit())
        }))
        @if contact.is_some() {
            form action="/admin/contact/delete" method="post" class="mt-4" {
                (Button::danger("Delete contact").submit())
            }
        }
    }
}

/// Create the contact, or update it when one is already published
pub async fn save(
    _admin: AdminPage,
    State(state): State<AppState>,
    Form(input): Form<ContactInput>,
) -> Result<Redirect, Response> {
    let result = match Contact::find(&state.db)
        .await
        .api_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch contact.")
    {
        Ok(Some(_)) => update_contact(&state, input).await.map(|_| ()),
        Ok(None) => create_contact(&state, input).await.map(|_| ()),
        Err(err) => Err(err),
    };

    let Err(err) = result else {
        return Ok(Redirect::to("/contact"));
    };

    let message = form_message(err, admin_navbar(&state))?;
    Err(rerender(&state, &message).await)
}

pub async fn delete(_admin: AdminPage, State(state): State<AppState>) -> Result<Redirect, Response> {
    let Err(err) = delete_contact(&state).await else {
        return Ok(Redirect::to("/contact"));
    };

    let message = form_message(err, admin_navbar(&state))?;
    Err(rerender(&state, &message).await)
}

async fn rerender(state: &AppState, message: &str) -> Response {
    match contact_page(state, admin_navbar(state), true, Some(message)).await {
        Ok(page) => rejected(page),
        Err(err) => err.into_response(),
    }
}
