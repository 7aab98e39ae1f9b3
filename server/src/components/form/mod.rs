use maud::{html, Markup, Render};

const INPUT_CLASSES: &str = "w-full px-4 py-2 border border-gray-300 rounded-lg focus:ring-2 focus:ring-indigo-500 focus:border-indigo-500 text-gray-900";

pub struct InputField {
    pub name: String,
    pub label: Option<String>,
    pub placeholder: Option<String>,
    pub value: Option<String>,
    pub input_type: String,
    pub required: bool,
    pub step: Option<String>,
    pub min: Option<String>,
}

impl InputField {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            placeholder: None,
            value: None,
            input_type: "text".to_string(),
            required: false,
            step: None,
            min: None,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn input_type(mut self, input_type: &str) -> Self {
        self.input_type = input_type.to_string();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// A non-negative number input with the given step
    pub fn number(mut self, step: &str) -> Self {
        self.input_type = "number".to_string();
        self.step = Some(step.to_string());
        self.min = Some("0".to_string());
        self
    }
}

impl Render for InputField {
    fn render(&self) -> Markup {
        html! {
            div class="mb-4" {
                @if let Some(label) = &self.label {
                    label for=(self.name) class="block text-sm font-medium text-gray-700 mb-1" { (label) }
                }

                input
                    type=(self.input_type)
                    name=(self.name)
                    id=(self.name)
                    value=(self.value.as_deref().unwrap_or(""))
                    placeholder=(self.placeholder.as_deref().unwrap_or(""))
                    step=[self.step.as_deref()]
                    min=[self.min.as_deref()]
                    class=(INPUT_CLASSES)
                    required[self.required];
            }
        }
    }
}

pub struct TextArea {
    pub name: String,
    pub label: Option<String>,
    pub value: String,
    pub rows: u8,
    pub required: bool,
}

impl TextArea {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            value: String::new(),
            rows: 4,
            required: false,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn rows(mut self, rows: u8) -> Self {
        self.rows = rows;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl Render for TextArea {
    fn render(&self) -> Markup {
        html! {
            div class="mb-4" {
                @if let Some(label) = &self.label {
                    label for=(self.name) class="block text-sm font-medium text-gray-700 mb-1" { (label) }
                }
                textarea name=(self.name) id=(self.name) rows=(self.rows) class=(INPUT_CLASSES) required[self.required] {
                    (self.value)
                }
            }
        }
    }
}

/// Image picker for the product forms
pub struct ImageField {
    pub name: String,
    pub label: String,
    pub current_url: Option<String>,
}

impl ImageField {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            current_url: None,
        }
    }

    pub fn current(mut self, url: &str) -> Self {
        self.current_url = Some(url.to_string());
        self
    }
}

impl Render for ImageField {
    fn render(&self) -> Markup {
        html! {
            div class="mb-4" {
                label for=(self.name) class="block text-sm font-medium text-gray-700 mb-1" { (self.label) }
                @if let Some(url) = &self.current_url {
                    img src=(url) alt="Current image" class="h-24 w-24 object-cover rounded-lg mb-2 border border-gray-200";
                }
                input type="file" accept="image/*" name=(self.name) id=(self.name)
                    class="block w-full text-sm text-gray-600 file:mr-4 file:py-2 file:px-4 file:rounded-lg file:border-0 file:bg-indigo-50 file:text-indigo-700 hover:file:bg-indigo-100";
            }
        }
    }
}

pub struct Form {
    pub action: String,
    pub method: String,
    pub content: Box<dyn Render>,
    pub multipart: bool,
    pub extra_classes: Option<String>,
}

impl Form {
    pub fn new(action: &str, method: &str, content: impl Render + 'static) -> Self {
        Self {
            action: action.to_string(),
            method: method.to_string(),
            content: Box::new(content),
            multipart: false,
            extra_classes: None,
        }
    }

    /// Send as `multipart/form-data` so file inputs are included
    pub fn multipart(mut self) -> Self {
        self.multipart = true;
        self
    }

    pub fn extra_classes(mut self, classes: &str) -> Self {
        self.extra_classes = Some(classes.to_string());
        self
    }
}

impl Render for Form {
    fn render(&self) -> Markup {
        let extra_classes = self.extra_classes.as_deref().unwrap_or("");
        let enctype = self.multipart.then_some("multipart/form-data");

        html! {
            form action=(self.action) method=(self.method) enctype=[enctype] class={"space-y-4 " (extra_classes)} {
                (self.content.render())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_inputs_are_non_negative() {
        let markup = InputField::new("price").number("0.01").value("12.5").render().into_string();

        assert!(markup.contains(r#"type="number""#));
        assert!(markup.contains(r#"step="0.01""#));
        assert!(markup.contains(r#"min="0""#));
        assert!(markup.contains(r#"value="12.5""#));
    }

    #[test]
    fn multipart_forms_set_enctype() {
        let plain = Form::new("/admin/about", "post", html! {}).render().into_string();
        assert!(!plain.contains("enctype"));

        let upload = Form::new("/admin/products", "post", html! {})
            .multipart()
            .render()
            .into_string();
        assert!(upload.contains(r#"enctype="multipart/form-data""#));
    }
}
