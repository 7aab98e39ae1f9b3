//! Storefront records and their persistence.
//!
//! Each entity owns one table. Inputs arrive as loosely-typed `*Input`
//! structs (every field optional, mirroring partial JSON bodies) and are
//! validated into `*Fields` before anything is written.

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

pub mod about;
pub mod contact;
pub mod products;

pub use about::{AboutInput, AboutParagraph};
pub use contact::{Contact, ContactFields, ContactInput};
pub use products::{Product, ProductFields, ProductInput};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Required(&'static str),
    #[error("{0} must be a number.")]
    NotANumber(&'static str),
    #[error("{0} cannot be negative.")]
    Negative(&'static str),
    #[error("{0} is too large.")]
    TooLarge(&'static str),
    #[error("Please use a valid email address")]
    InvalidEmail,
}

/// A numeric field as clients send it: a JSON number, or text holding one.
/// Form posts and loosely-typed JSON both arrive here and are checked the same way.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumberInput {
    /// The value as a float. Blank text counts as missing.
    pub fn as_f64(&self, field: &'static str) -> Result<Option<f64>, ValidationError> {
        match self {
            NumberInput::Number(n) => n
                .as_f64()
                .map(Some)
                .ok_or(ValidationError::NotANumber(field)),
            NumberInput::Text(raw) if raw.trim().is_empty() => Ok(None),
            NumberInput::Text(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ValidationError::NotANumber(field)),
        }
    }

    /// The value as a whole number. `3.0` is accepted, `2.5` is not.
    pub fn as_i64(&self, field: &'static str) -> Result<Option<i64>, ValidationError> {
        let value = match self {
            NumberInput::Number(n) if n.is_u64() && n.as_i64().is_none() => {
                return Err(ValidationError::TooLarge(field));
            }
            NumberInput::Number(n) => match n.as_i64() {
                Some(whole) => return Ok(Some(whole)),
                None => n.as_f64(),
            },
            NumberInput::Text(raw) if raw.trim().is_empty() => return Ok(None),
            NumberInput::Text(raw) => match raw.trim().parse::<i64>() {
                Ok(whole) => return Ok(Some(whole)),
                Err(_) => raw.trim().parse::<f64>().ok(),
            },
        };

        match value {
            Some(f) if f.is_finite() && f.fract() == 0.0 => {
                if f.abs() >= i64::MAX as f64 {
                    return Err(ValidationError::TooLarge(field));
                }
                Ok(Some(f as i64))
            }
            _ => Err(ValidationError::NotANumber(field)),
        }
    }
}

impl From<f64> for NumberInput {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(NumberInput::Number)
            .unwrap_or_else(|| NumberInput::Text(value.to_string()))
    }
}

impl From<i64> for NumberInput {
    fn from(value: i64) -> Self {
        NumberInput::Number(value.into())
    }
}

/// Parse a record id from a path segment. Malformed ids are reported by the caller.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// A required string field, trimmed; blank counts as missing
pub(crate) fn required_trimmed(
    value: Option<String>,
    field: &'static str,
) -> Result<String, ValidationError> {
    non_empty(value).ok_or(ValidationError::Required(field))
}

/// Trimmed value, or `None` when missing or blank
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// True when `err` is a Postgres unique-constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_uuids_only() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id("64f1c2a9e4b0a1b2c3d4e5f6"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn required_trimmed_rejects_blank() {
        assert_eq!(
            required_trimmed(Some("   ".to_string()), "Name"),
            Err(ValidationError::Required("Name"))
        );
        assert_eq!(
            required_trimmed(None, "Name"),
            Err(ValidationError::Required("Name"))
        );
        assert_eq!(
            required_trimmed(Some("  Mug ".to_string()), "Name"),
            Ok("Mug".to_string())
        );
    }

    #[test]
    fn numbers_may_arrive_as_text() {
        let price: NumberInput = serde_json::from_str(r#""12.50""#).unwrap();
        assert_eq!(price.as_f64("Price"), Ok(Some(12.5)));

        let price: NumberInput = serde_json::from_str("12").unwrap();
        assert_eq!(price.as_f64("Price"), Ok(Some(12.0)));

        let blank = NumberInput::Text("  ".to_string());
        assert_eq!(blank.as_f64("Price"), Ok(None));
        assert_eq!(blank.as_i64("Stock"), Ok(None));

        assert_eq!(
            NumberInput::Text("twelve".to_string()).as_f64("Price"),
            Err(ValidationError::NotANumber("Price"))
        );
    }

    #[test]
    fn whole_numbers_reject_fractions() {
        let stock: NumberInput = serde_json::from_str("2.5").unwrap();
        assert_eq!(stock.as_i64("Stock"), Err(ValidationError::NotANumber("Stock")));

        let stock: NumberInput = serde_json::from_str("3.0").unwrap();
        assert_eq!(stock.as_i64("Stock"), Ok(Some(3)));

        assert_eq!(
            NumberInput::Text("7".to_string()).as_i64("Stock"),
            Ok(Some(7))
        );
        assert_eq!(
            NumberInput::Text("2.5".to_string()).as_i64("Stock"),
            Err(ValidationError::NotANumber("Stock"))
        );

        let huge: NumberInput = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(huge.as_i64("Stock"), Err(ValidationError::TooLarge("Stock")));
    }

    #[test]
    fn other_json_types_are_not_numbers() {
        assert!(serde_json::from_str::<NumberInput>("true").is_err());
    }

    #[test]
    fn validation_messages_read_naturally() {
        assert_eq!(
            ValidationError::Required("Paragraph").to_string(),
            "Paragraph is required."
        );
        assert_eq!(
            ValidationError::Negative("Stock").to_string(),
            "Stock cannot be negative."
        );
    }
}
