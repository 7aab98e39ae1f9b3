use maud::{html, Markup, Render, DOCTYPE};

use crate::static_assets::logo_img;

/// Who is looking at the page, as far as the navbar cares
#[derive(Debug, Clone, Default)]
pub struct Navbar {
    pub signed_in: bool,
    pub is_admin: bool,
    pub sign_in_url: String,
    pub sign_out_url: String,
}

impl Render for Navbar {
    fn render(&self) -> Markup {
        let link = "text-gray-700 hover:text-indigo-700 font-medium";

        html! {
            nav class="max-w-5xl mx-auto mb-6 md:mb-8 px-4 flex items-center justify-between" {
                div class="flex items-center gap-6" {
                    (logo_img("h-10 w-10"))
                    a href="/" class=(link) { "Home" }
                    a href="/about" class=(link) { "About" }
                    a href="/contact" class=(link) { "Contact" }
                    @if self.is_admin {
                        a href="/admin" class=(link) { "Admin" }
                    }
                }

                @if self.signed_in {
                    a href=(self.sign_out_url) class="text-sm text-gray-500 hover:text-gray-800" { "Sign out" }
                } @else {
                    a href=(self.sign_in_url) class="text-sm text-indigo-600 hover:text-indigo-800" { "Sign in" }
                }
            }
        }
    }
}

pub struct Page {
    pub title: String,
    pub content: Box<dyn Render>,
    pub navbar: Navbar,
}

impl Page {
    pub fn new(title: impl Into<String>, content: impl Render + 'static, navbar: Navbar) -> Self {
        Self {
            title: title.into(),
            content: Box::new(content),
            navbar,
        }
    }
}

impl Render for Page {
    fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) " - Storefront" }
                    script src="https://unpkg.com/@tailwindcss/browser@4" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                }

                body class="min-h-screen bg-white md:bg-gradient-to-br md:from-amber-50 md:via-orange-50 md:to-rose-50 py-4 md:py-8 px-0 sm:px-4 md:px-6 lg:px-8" {
                    (self.navbar)

                    main class="max-w-5xl mx-auto px-4" {
                        (self.content.render())
                    }

                    footer class="mt-6 md:mt-8 text-center text-sm" {
                        p class="text-gray-500" { "© Storefront" }
                    }
                }
            }
        }
    }
}

impl axum::response::IntoResponse for Page {
    fn into_response(self) -> axum::response::Response {
        self.render().into_response()
    }
}

pub struct Card {
    pub content: Box<dyn Render>,
    pub max_width: Option<String>,
}

impl Card {
    pub fn new(content: impl Render + 'static) -> Self {
        Self {
            content: Box::new(content),
            max_width: None,
        }
    }

    pub fn with_max_width(mut self, max_width: &str) -> Self {
        self.max_width = Some(max_width.to_string());
        self
    }
}

impl Render for Card {
    fn render(&self) -> Markup {
        let width_class = self.max_width.as_deref().unwrap_or("max-w-md");

        html! {
            div class={(width_class) " mx-auto bg-white rounded-lg sm:rounded-xl border border-gray-100 shadow-md sm:shadow-lg overflow-hidden w-full p-6 sm:p-8"} {
                (self.content.render())
            }
        }
    }
}

/// Red banner shown above a form that failed validation
pub struct ErrorBanner<'a>(pub Option<&'a str>);

impl Render for ErrorBanner<'_> {
    fn render(&self) -> Markup {
        html! {
            @if let Some(message) = self.0 {
                div class="mb-4 p-3 rounded-lg bg-red-50 border border-red-200 text-red-700 text-sm" role="alert" {
                    (message)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navbar_shows_admin_link_only_to_admins() {
        let visitor = Navbar {
            sign_in_url: "https://accounts.shop.example/sign-in".to_string(),
            ..Default::default()
        }
        .render()
        .into_string();
        assert!(!visitor.contains(r#"href="/admin""#));
        assert!(visitor.contains("https://accounts.shop.example/sign-in"));

        let admin = Navbar {
            signed_in: true,
            is_admin: true,
            ..Default::default()
        }
        .render()
        .into_string();
        assert!(admin.contains(r#"href="/admin""#));
        assert!(admin.contains("Sign out"));
    }

    #[test]
    fn error_banner_escapes_message() {
        let markup = ErrorBanner(Some("<b>Name</b> is required.")).render().into_string();
        assert!(markup.contains("&lt;b&gt;Name&lt;/b&gt; is required."));

        assert_eq!(ErrorBanner(None).render().into_string(), "");
    }
}
