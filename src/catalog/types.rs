//! Inputs and results of catalog operations.

use serde::{Deserialize, Serialize};
use sweetshop_common::{Category, Error, ProductId, Result};
use sweetshop_db::models::{validate_name, validate_price, NewProduct, Product};

/// Admin input for a new product.
///
/// Missing fields are reported by [`ProductForm::into_new_product`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

impl ProductForm {
    /// Check required fields and build the insert model.
    ///
    /// The name is trimmed, a blank description becomes `None` and an
    /// unknown category falls back to [`Category::Other`].
    pub fn into_new_product(self) -> Result<NewProduct> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .ok_or_else(|| Error::validation("Product name is required"))?;
        validate_name(&name)?;

        let price = self
            .price
            .ok_or_else(|| Error::validation("Price is required"))?;
        validate_price(price)?;

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(NewProduct::new(
            name,
            description,
            price,
            Category::from_label(self.category.as_deref()),
        ))
    }
}

/// A product as shown in the catalog.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub product: Product,
    pub photo_url: Option<String>,
}

/// Result of a successful add.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AddOutcome {
    pub product: Product,
    pub photo_url: Option<String>,
}

impl AddOutcome {
    pub fn message(&self) -> String {
        if self.photo_url.is_some() {
            format!("Product '{}' added with photo", self.product.name)
        } else {
            format!("Product '{}' added without photo", self.product.name)
        }
    }
}

/// What happened to the photo during an edit.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PhotoChange {
    /// No photo was uploaded.
    Unchanged,
    /// The upload replaced the previous photo.
    Replaced { url: String },
    /// The upload had a disallowed extension and was ignored.
    Rejected { filename: String, reason: String },
    /// The upload was valid but could not be written.
    Failed { reason: String },
}

/// Result of an edit. Text fields were saved even when the photo was not.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EditOutcome {
    pub product: Product,
    pub photo_url: Option<String>,
    pub photo: PhotoChange,
}

impl EditOutcome {
    pub fn message(&self) -> String {
        match self.photo {
            PhotoChange::Replaced { .. } => {
                format!("Product '{}' updated with new photo", self.product.name)
            }
            _ => format!("Product '{}' updated", self.product.name),
        }
    }

    /// Warning to show next to the message when the photo was not saved.
    pub fn warning(&self) -> Option<String> {
        match &self.photo {
            PhotoChange::Rejected { reason, .. } => Some(reason.clone()),
            PhotoChange::Failed { reason } => {
                Some(format!("Photo could not be saved: {}", reason))
            }
            _ => None,
        }
    }
}

/// Result of a delete.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeleteOutcome {
    pub id: ProductId,
    pub photo_removed: bool,
    pub warning: Option<String>,
}

impl DeleteOutcome {
    pub fn message(&self) -> String {
        format!("Product {} deleted", self.id)
    }
}
