use maud::{html, Markup, Render};

#[derive(Debug, Clone, PartialEq)]
pub enum BadgeColor {
    Green,
    Red,
    Indigo,
}

pub struct Badge {
    pub text: String,
    pub color: BadgeColor,
}

impl Badge {
    pub fn new(text: &str, color: BadgeColor) -> Self {
        Self {
            text: text.to_string(),
            color,
        }
    }

    /// Stock level badge: green while any are left
    pub fn stock(stock: i32) -> Self {
        if stock > 0 {
            Self::new(&format!("{stock} in stock"), BadgeColor::Green)
        } else {
            Self::new("Out of stock", BadgeColor::Red)
        }
    }

    fn get_color_classes(&self) -> &'static str {
        match self.color {
            BadgeColor::Green => "bg-green-100 text-green-800",
            BadgeColor::Red => "bg-red-100 text-red-800",
            BadgeColor::Indigo => "bg-indigo-100 text-indigo-800",
        }
    }
}

impl Render for Badge {
    fn render(&self) -> Markup {
        html! {
            span class={(self.get_color_classes()) " text-xs font-medium px-2 py-1 rounded-full"} { (self.text) }
        }
    }
}
