use maud::{html, Markup, Render};

use super::ui::badge::{Badge, BadgeColor};
use crate::models::Product;

/// `12.5` -> `$12.50`
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

/// Grid tile linking to a product page
pub struct ProductCard<'a> {
    pub product: &'a Product,
}

impl<'a> ProductCard<'a> {
    pub fn new(product: &'a Product) -> Self {
        Self { product }
    }
}

impl Render for ProductCard<'_> {
    fn render(&self) -> Markup {
        let product = self.product;

        html! {
            a href={"/products/" (product.id.to_string())} class="block bg-white rounded-lg sm:rounded-xl border border-gray-100 shadow-sm hover:shadow-md transition-all duration-200 overflow-hidden" {
                img src=(product.image_url) alt=(product.name) class="w-full h-48 object-cover bg-gray-50";
                div class="p-4" {
                    div class="flex items-center justify-between gap-2 mb-2" {
                        h3 class="font-medium text-gray-900 truncate" { (product.name) }
                        span class="font-semibold text-indigo-700" { (format_price(product.price)) }
                    }
                    (Badge::new(&product.category, BadgeColor::Indigo))
                }
            }
        }
    }
}

/// Full product view
pub struct ProductDetail<'a> {
    pub product: &'a Product,
}

impl Render for ProductDetail<'_> {
    fn render(&self) -> Markup {
        let product = self.product;

        html! {
            div class="grid md:grid-cols-2 gap-8 bg-white rounded-xl shadow-md p-6" {
                img src=(product.image_url) alt=(product.name) class="w-full rounded-lg object-cover";
                div {
                    h1 class="text-3xl font-bold text-gray-900 mb-2" { (product.name) }
                    div class="flex items-center gap-2 mb-4" {
                        (Badge::new(&product.category, BadgeColor::Indigo))
                        (Badge::stock(product.stock))
                    }
                    p class="text-2xl font-semibold text-indigo-700 mb-4" { (format_price(product.price)) }
                    p class="text-gray-700 leading-relaxed whitespace-pre-line" { (product.description) }
                }
            }
        }
    }
}
