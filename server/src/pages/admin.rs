use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::{html, Markup};
use tracing::error;
use uuid::Uuid;

use super::{admin_navbar, form_message, not_found_page, rejected};
use crate::{
    api::{
        products,
        uploads::{read_image, upload_image, ImageFile},
    },
    auth::AdminPage,
    components::{
        form::{Form as HtmlForm, ImageField, InputField, TextArea},
        layout::{Card, ErrorBanner, Page},
        product::format_price,
        ui::{button::Button, heading::Heading},
    },
    errors::{ApiError, ApiResult, ServerResult, WithApiError as _},
    models::{parse_id, NumberInput, Product, ProductInput, ValidationError},
    state::AppState,
};

pub async fn dashboard(
    _admin: AdminPage,
    State(state): State<AppState>,
) -> ServerResult<Page, StatusCode> {
    let products = Product::list(&state.db).await?;

    let content = html! {
        div class="flex items-center justify-between mb-6" {
            (Heading::h1("Products").with_classes("mb-0"))
            (Button::primary("Create product").href("/admin/products/new"))
        }

        @if products.is_empty() {
            p class="text-gray-600" { "No products yet." }
        } @else {
            div class="bg-white rounded-xl shadow-md overflow-x-auto" {
                table class="min-w-full text-sm" {
                    thead class="bg-gray-50 text-left text-gray-600" {
                        tr {
                            th class="px-4 py-3" { "Name" }
                            th class="px-4 py-3" { "Category" }
                            th class="px-4 py-3" { "Price" }
                            th class="px-4 py-3" { "Stock" }
                            th class="px-4 py-3" {}
                        }
                    }
                    tbody class="divide-y divide-gray-100" {
                        @for product in &products {
                            (product_row(product))
                        }
                    }
                }
            }
        }
    };

    Ok(Page::new("Admin", content, admin_navbar(&state)))
}

fn product_row(product: &Product) -> Markup {
    let id = product.id.to_string();

    html! {
        tr {
            td class="px-4 py-3 font-medium text-gray-900" {
                a href={"/products/" (id)} class="hover:underline" { (product.name) }
            }
            td class="px-4 py-3 text-gray-700" { (product.category) }
            td class="px-4 py-3 text-gray-700" { (format_price(product.price)) }
            td class="px-4 py-3 text-gray-700" { (product.stock) }
            td class="px-4 py-3" {
                div class="flex justify-end gap-2" {
                    (Button::secondary("Edit").href(&format!("/admin/products/{id}/edit")))
                    form action={"/admin/products/" (id) "/delete"} method="post" {
                        (Button::danger("Delete").submit())
                    }
                }
            }
        }
    }
}

/// Raw values of the product form, kept as typed so a rejected form can be re-shown
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub stock: String,
    pub image_url: String,
}

impl ProductForm {
    fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            category: product.category.clone(),
            stock: product.stock.to_string(),
            image_url: product.image_url.clone(),
        }
    }

    /// Text fields always arrive, so they are always applied. Blank numbers
    /// count as missing.
    pub(crate) fn input(&self) -> Result<ProductInput, ValidationError> {
        Ok(ProductInput {
            name: Some(self.name.clone()),
            price: NumberInput::Text(self.price.clone())
                .as_f64("Price")?
                .map(NumberInput::from),
            description: Some(self.description.clone()),
            category: Some(self.category.clone()),
            stock: NumberInput::Text(self.stock.clone())
                .as_i64("Stock")?
                .map(NumberInput::from),
            image_url: Some(self.image_url.clone()).filter(|url| !url.trim().is_empty()),
            image_public_id: None,
        })
    }
}

async fn read_product_form(mut multipart: Multipart) -> ApiResult<(ProductForm, Option<ImageFile>)> {
    let mut form = ProductForm::default();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .api_error(StatusCode::BAD_REQUEST, "Malformed form submission.")?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            image = read_image(field).await?;
            continue;
        }

        let value = field
            .text()
            .await
            .api_error(StatusCode::BAD_REQUEST, "Malformed form submission.")?;
        match name.as_str() {
            "name" => form.name = value,
            "price" => form.price = value,
            "description" => form.description = value,
            "category" => form.category = value,
            "stock" => form.stock = value,
            "imageUrl" => form.image_url = value,
            _ => {}
        }
    }

    Ok((form, image))
}

fn product_form_page(
    id: Option<Uuid>,
    form: &ProductForm,
    error: Option<&str>,
    state: &AppState,
) -> Page {
    let (title, action, submit) = match id {
        Some(id) => ("Edit product", format!("/admin/products/{id}"), "Save changes"),
        None => ("New product", "/admin/products".to_string(), "Create product"),
    };
    let image_field = match id {
        Some(_) if !form.image_url.is_empty() => {
            ImageField::new("image", "Replace image").current(&form.image_url)
        }
        Some(_) => ImageField::new("image", "Replace image"),
        None => ImageField::new("image", "Image"),
    };

    let fields = html! {
        (InputField::new("name").label("Name").value(form.name.clone()).required(true))
        div class="grid grid-cols-2 gap-4" {
            (InputField::new("price").label("Price").number("0.01").value(form.price.clone()).required(true))
            (InputField::new("stock").label("Stock").number("1").value(form.stock.clone()))
        }
        (InputField::new("category").label("Category").value(form.category.clone()).required(true))
        (TextArea::new("description").label("Description").value(form.description.clone()).rows(5).required(true))
        (image_field)
        @if id.is_some() {
            input type="hidden" name="imageUrl" value=(form.image_url);
        } @else {
            (InputField::new("imageUrl")
                .label("…or an image URL")
                .input_type("url")
                .placeholder("https://")
                .value(form.image_url.clone()))
        }
        div class="flex gap-3" {
            (Button::primary(submit).submit())
            (Button::secondary("Cancel").href("/admin"))
        }
    };

    let content = Card::new(html! {
        (Heading::h2(title))
        (ErrorBanner(error))
        (HtmlForm::new(&action, "post", fields).multipart())
    })
    .with_max_width("max-w-2xl");

    Page::new(title, content, admin_navbar(state))
}

fn reject_product_form(
    state: &AppState,
    id: Option<Uuid>,
    form: &ProductForm,
    err: ApiError,
) -> Response {
    match form_message(err, admin_navbar(state)) {
        Ok(message) => rejected(product_form_page(id, form, Some(&message), state)),
        Err(response) => response,
    }
}

/// Upload the picked image, if any, then create or update the product.
/// A fresh upload is removed again when the save fails.
async fn save_product(
    state: &AppState,
    id: Option<Uuid>,
    form: &ProductForm,
    image: Option<ImageFile>,
) -> ApiResult<Product> {
    let mut input = form.input()?;

    let uploaded = match image {
        Some(image) => {
            let uploaded = upload_image(state, image).await?;
            input.image_url = Some(uploaded.url.clone());
            input.image_public_id = Some(uploaded.public_id.clone());
            Some(uploaded)
        }
        None => None,
    };

    let result = match id {
        Some(id) => products::update_product(state, id, input).await,
        None => products::create_product(state, input).await,
    };

    if let (Err(_), Some(uploaded)) = (&result, uploaded) {
        if let Err(err) = state.media.destroy(&uploaded.public_id).await {
            error!(error = ?err, "Error removing unused upload {}", uploaded.public_id);
        }
    }

    result
}

pub async fn new_product(_admin: AdminPage, State(state): State<AppState>) -> Page {
    product_form_page(None, &ProductForm::default(), None, &state)
}

pub async fn create_product(
    _admin: AdminPage,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, Response> {
    let (form, image) = read_product_form(multipart)
        .await
        .map_err(|err| reject_product_form(&state, None, &ProductForm::default(), err))?;

    match save_product(&state, None, &form, image).await {
        Ok(_) => Ok(Redirect::to("/admin")),
        Err(err) => Err(reject_product_form(&state, None, &form, err)),
    }
}

pub async fn edit_product(
    _admin: AdminPage,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ServerResult<Response, StatusCode> {
    let Some(id) = parse_id(&id) else {
        return Ok(not_found_page(admin_navbar(&state)));
    };
    let Some(product) = Product::find(&state.db, id).await? else {
        return Ok(not_found_page(admin_navbar(&state)));
    };

    let form = ProductForm::from_product(&product);
    Ok(product_form_page(Some(id), &form, None, &state).into_response())
}

pub async fn update_product(
    _admin: AdminPage,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Redirect, Response> {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page(admin_navbar(&state)));
    };

    let (form, image) = read_product_form(multipart)
        .await
        .map_err(|err| reject_product_form(&state, Some(id), &ProductForm::default(), err))?;

    match save_product(&state, Some(id), &form, image).await {
        Ok(_) => Ok(Redirect::to("/admin")),
        Err(err) => Err(reject_product_form(&state, Some(id), &form, err)),
    }
}

pub async fn delete_product(
    _admin: AdminPage,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, Response> {
    let Some(id) = parse_id(&id) else {
        return Err(not_found_page(admin_navbar(&state)));
    };

    match products::delete_product(&state, id).await {
        Ok(()) => Ok(Redirect::to("/admin")),
        Err(err) if err.status == StatusCode::NOT_FOUND => Err(not_found_page(admin_navbar(&state))),
        Err(err) => Err(err.into_server_error().into_response()),
    }
}
