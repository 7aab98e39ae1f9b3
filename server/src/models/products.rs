use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{non_empty, required_trimmed, NumberInput, ValidationError};

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub stock: i32,
    pub image_url: String,
    pub image_public_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product body as sent by clients. Every field is optional so the same
/// type serves creates and partial updates.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub price: Option<NumberInput>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: Option<NumberInput>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

/// A validated, complete set of product columns
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub stock: i32,
    pub image_url: String,
    pub image_public_id: Option<String>,
}

impl ProductInput {
    /// Validate a create request. A missing image falls back to `placeholder_image_url`.
    pub fn into_fields(self, placeholder_image_url: &str) -> Result<ProductFields, ValidationError> {
        Ok(ProductFields {
            name: required_trimmed(self.name, "Name")?,
            price: validate_price(parse_price(&self.price)?.ok_or(ValidationError::Required("Price"))?)?,
            description: required_trimmed(self.description, "Description")?,
            category: required_trimmed(self.category, "Category")?,
            stock: validate_stock(parse_stock(&self.stock)?.unwrap_or(0))?,
            image_url: non_empty(self.image_url)
                .unwrap_or_else(|| placeholder_image_url.to_string()),
            image_public_id: non_empty(self.image_public_id),
        })
    }
}

impl Product {
    /// Apply a partial update on top of the stored record. Fields absent from
    /// `input` keep their current value; present ones are validated.
    pub fn merge(&self, input: ProductInput) -> Result<ProductFields, ValidationError> {
        let name = match input.name {
            Some(name) => required_trimmed(Some(name), "Name")?,
            None => self.name.clone(),
        };
        let description = match input.description {
            Some(description) => required_trimmed(Some(description), "Description")?,
            None => self.description.clone(),
        };
        let category = match input.category {
            Some(category) => required_trimmed(Some(category), "Category")?,
            None => self.category.clone(),
        };

        Ok(ProductFields {
            name,
            price: validate_price(parse_price(&input.price)?.unwrap_or(self.price))?,
            description,
            category,
            stock: match parse_stock(&input.stock)? {
                Some(stock) => validate_stock(stock)?,
                None => self.stock,
            },
            image_url: non_empty(input.image_url).unwrap_or_else(|| self.image_url.clone()),
            image_public_id: match input.image_public_id {
                Some(public_id) => non_empty(Some(public_id)),
                None => self.image_public_id.clone(),
            },
        })
    }

    /// All products, newest first
    #[tracing::instrument(skip(pool), err)]
    pub async fn list(pool: &PgPool) -> crate::Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    #[tracing::instrument(skip(pool), err)]
    pub async fn find(pool: &PgPool, id: Uuid) -> crate::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(product)
    }

    #[tracing::instrument(skip_all, err)]
    pub async fn create(pool: &PgPool, fields: &ProductFields) -> crate::Result<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, description, category, stock, image_url, image_public_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.description)
        .bind(&fields.category)
        .bind(fields.stock)
        .bind(&fields.image_url)
        .bind(&fields.image_public_id)
        .fetch_one(pool)
        .await?;

        info!("Created product {}", product.id);
        Ok(product)
    }

    /// Overwrite every column of product `id`. Returns `None` when it no longer exists.
    #[tracing::instrument(skip_all, fields(product_id = %id), err)]
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        fields: &ProductFields,
    ) -> crate::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $2,
                price = $3,
                description = $4,
                category = $5,
                stock = $6,
                image_url = $7,
                image_public_id = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(fields.price)
        .bind(&fields.description)
        .bind(&fields.category)
        .bind(fields.stock)
        .bind(&fields.image_url)
        .bind(&fields.image_public_id)
        .fetch_optional(pool)
        .await?;

        if product.is_some() {
            info!("Updated product {}", id);
        }
        Ok(product)
    }

    /// Returns whether a row was deleted
    #[tracing::instrument(skip(pool), err)]
    pub async fn delete(pool: &PgPool, id: Uuid) -> crate::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted product {}", id);
        }
        Ok(deleted)
    }
}

fn parse_price(price: &Option<NumberInput>) -> Result<Option<f64>, ValidationError> {
    Ok(price.as_ref().map(|n| n.as_f64("Price")).transpose()?.flatten())
}

fn parse_stock(stock: &Option<NumberInput>) -> Result<Option<i64>, ValidationError> {
    Ok(stock.as_ref().map(|n| n.as_i64("Stock")).transpose()?.flatten())
}

fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::NotANumber("Price"));
    }
    if price < 0.0 {
        return Err(ValidationError::Negative("Price"));
    }
    Ok(price)
}

fn validate_stock(stock: i64) -> Result<i32, ValidationError> {
    if stock < 0 {
        return Err(ValidationError::Negative("Stock"));
    }
    i32::try_from(stock).map_err(|_| ValidationError::TooLarge("Stock"))
}
