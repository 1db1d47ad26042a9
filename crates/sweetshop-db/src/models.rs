//! Internal Rust models matching the database schema.
//!
//! `Product` mirrors a row of the `products` table. Writes go through
//! `NewProduct` (creation) and `ProductUpdate` (partial update), so callers
//! can never hand the store an id or an unknown column.

use serde::{Deserialize, Serialize};
use sweetshop_common::{Category, Error, ProductId, Result};

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Category,
    pub is_available: bool,
}

/// Input for creating a product. Availability defaults to true in the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: Category,
}

impl NewProduct {
    pub fn new<S: Into<String>>(
        name: S,
        description: Option<String>,
        price: f64,
        category: Category,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            price,
            category,
        }
    }
}

/// Partial update of a product. Only fields set to `Some` are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl ProductUpdate {
    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.is_available.is_none()
    }

    /// Check the fields that carry invariants (name non-empty, price >= 0).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref name) = self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }

    /// Apply the update to an in-memory product.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(ref name) = self.name {
            product.name = name.clone();
        }
        if let Some(ref description) = self.description {
            product.description = Some(description.clone());
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(is_available) = self.is_available {
            product.is_available = is_available;
        }
    }
}

/// A product name must contain something other than whitespace.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Product name is required"));
    }
    Ok(())
}

/// A price must be a finite, non-negative number.
pub fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::validation(format!(
            "Price must be a non-negative number, got {}",
            price
        )));
    }
    Ok(())
}
