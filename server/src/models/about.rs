use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{required_trimmed, ValidationError};

/// One paragraph of the "about" page
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AboutParagraph {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub paragraph: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AboutInput {
    pub paragraph: Option<String>,
}

impl AboutInput {
    /// The trimmed paragraph text, required to be non-blank
    pub fn paragraph(self) -> Result<String, ValidationError> {
        required_trimmed(self.paragraph, "Paragraph")
    }
}

impl AboutParagraph {
    /// All paragraphs, newest first
    #[tracing::instrument(skip(pool), err)]
    pub async fn list(pool: &PgPool) -> crate::Result<Vec<AboutParagraph>> {
        let paragraphs = sqlx::query_as::<_, AboutParagraph>(
            "SELECT * FROM about_paragraphs ORDER BY created_at DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(paragraphs)
    }

    #[tracing::instrument(skip(pool), err)]
    pub async fn find(pool: &PgPool, id: Uuid) -> crate::Result<Option<AboutParagraph>> {
        let paragraph =
            sqlx::query_as::<_, AboutParagraph>("SELECT * FROM about_paragraphs WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(paragraph)
    }

    #[tracing::instrument(skip_all, err)]
    pub async fn create(pool: &PgPool, paragraph: &str) -> crate::Result<AboutParagraph> {
        let created = sqlx::query_as::<_, AboutParagraph>(
            r#"
            INSERT INTO about_paragraphs (paragraph)
            VALUES ($1)
            RETURNING *
            "#,
        )
        .bind(paragraph)
        .fetch_one(pool)
        .await?;

        info!("Created about paragraph {}", created.id);
        Ok(created)
    }

    #[tracing::instrument(skip(pool, paragraph), err)]
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        paragraph: &str,
    ) -> crate::Result<Option<AboutParagraph>> {
        let updated = sqlx::query_as::<_, AboutParagraph>(
            r#"
            UPDATE about_paragraphs
            SET paragraph = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(paragraph)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    /// Returns whether a row was deleted
    #[tracing::instrument(skip(pool), err)]
    pub async fn delete(pool: &PgPool, id: Uuid) -> crate::Result<bool> {
        let result = sqlx::query("DELETE FROM about_paragraphs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_is_trimmed() {
        let input = AboutInput {
            paragraph: Some("\n  We make pottery.  ".to_string()),
        };

        assert_eq!(input.paragraph().unwrap(), "We make pottery.");
    }

    #[test]
    fn blank_paragraph_is_rejected() {
        let input = AboutInput {
            paragraph: Some("   ".to_string()),
        };

        assert_eq!(
            input.paragraph().unwrap_err().to_string(),
            "Paragraph is required."
        );
        assert!(AboutInput::default().paragraph().is_err());
    }
}
