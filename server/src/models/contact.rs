use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{is_unique_violation, non_empty, required_trimmed, ValidationError};

/// The storefront's contact details. At most one row exists.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub email: String,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactFields {
    pub name: String,
    pub address: String,
    pub email: String,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

impl ContactInput {
    pub fn into_fields(self) -> Result<ContactFields, ValidationError> {
        let fields = ContactFields {
            name: required_trimmed(self.name, "Name")?,
            address: required_trimmed(self.address, "Address")?,
            email: required_trimmed(self.email, "Email")?,
            facebook: non_empty(self.facebook),
            instagram: non_empty(self.instagram),
        };
        fields.validate()?;

        Ok(fields)
    }
}

impl ContactFields {
    fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }
}

/// `^\S+@\S+\.\S+$`, the shape check applied to contact emails
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"))
        .is_match(email)
}

impl Contact {
    /// Merge an update: a field changes only when the input carries a non-blank value.
    pub fn merge(&self, input: ContactInput) -> Result<ContactFields, ValidationError> {
        let fields = ContactFields {
            name: non_empty(input.name).unwrap_or_else(|| self.name.clone()),
            address: non_empty(input.address).unwrap_or_else(|| self.address.clone()),
            email: non_empty(input.email).unwrap_or_else(|| self.email.clone()),
            facebook: non_empty(input.facebook).or_else(|| self.facebook.clone()),
            instagram: non_empty(input.instagram).or_else(|| self.instagram.clone()),
        };
        fields.validate()?;

        Ok(fields)
    }

    #[tracing::instrument(skip(pool), err)]
    pub async fn find(pool: &PgPool) -> crate::Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, name, address, email, facebook, instagram, created_at, updated_at
            FROM contacts
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Insert the contact. Returns `None` when one already exists.
    #[tracing::instrument(skip_all, err)]
    pub async fn create(pool: &PgPool, fields: &ContactFields) -> crate::Result<Option<Contact>> {
        let result = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (name, address, email, facebook, instagram)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, address, email, facebook, instagram, created_at, updated_at
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.email)
        .bind(&fields.facebook)
        .bind(&fields.instagram)
        .fetch_one(pool)
        .await;

        match result {
            Ok(contact) => {
                info!("Created contact {}", contact.id);
                Ok(Some(contact))
            }
            Err(err) if is_unique_violation(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    #[tracing::instrument(skip_all, fields(contact_id = %self.id), err)]
    pub async fn update(&self, pool: &PgPool, fields: &ContactFields) -> crate::Result<Option<Contact>> {
        let updated = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET name = $2,
                address = $3,
                email = $4,
                facebook = $5,
                instagram = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, address, email, facebook, instagram, created_at, updated_at
            "#,
        )
        .bind(self.id)
        .bind(&fields.name)
        .bind(&fields.address)
        .bind(&fields.email)
        .bind(&fields.facebook)
        .bind(&fields.instagram)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    /// Delete the contact record, if any. Returns whether a row was deleted.
    #[tracing::instrument(skip(pool), err)]
    pub async fn delete(pool: &PgPool) -> crate::Result<bool> {
        let result = sqlx::query("DELETE FROM contacts").execute(pool).await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted contact");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_contact() -> Contact {
        let now = Utc::now();
        Contact {
            id: Uuid::new_v4(),
            name: "Adrienn".to_string(),
            address: "1234 Main St, Springfield".to_string(),
            email: "hello@example.com".to_string(),
            facebook: Some("https://facebook.com/shop".to_string()),
            instagram: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn email_shape_check() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+shop@mail.example.org"));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn create_requires_name_address_and_email() {
        let input = ContactInput {
            name: Some("Shop".to_string()),
            address: None,
            email: Some("shop@example.com".to_string()),
            ..Default::default()
        };

        assert_eq!(input.into_fields(), Err(ValidationError::Required("Address")));
    }

    #[test]
    fn create_rejects_malformed_email() {
        let input = ContactInput {
            name: Some("Shop".to_string()),
            address: Some("Somewhere".to_string()),
            email: Some("shop-at-example".to_string()),
            ..Default::default()
        };

        assert_eq!(
            input.into_fields().unwrap_err().to_string(),
            "Please use a valid email address"
        );
    }

    #[test]
    fn merge_ignores_blank_values() {
        let contact = stored_contact();
        let fields = contact
            .merge(ContactInput {
                name: Some(String::new()),
                address: Some("  ".to_string()),
                email: Some("new@example.com".to_string()),
                facebook: None,
                instagram: Some("https://instagram.com/shop".to_string()),
            })
            .unwrap();

        assert_eq!(fields.name, contact.name);
        assert_eq!(fields.address, contact.address);
        assert_eq!(fields.email, "new@example.com");
        assert_eq!(fields.facebook, contact.facebook);
        assert_eq!(fields.instagram.as_deref(), Some("https://instagram.com/shop"));
    }

    #[test]
    fn merge_validates_new_email() {
        let contact = stored_contact();

        assert_eq!(
            contact.merge(ContactInput {
                email: Some("broken".to_string()),
                ..Default::default()
            }),
            Err(ValidationError::InvalidEmail)
        );
    }
}
