//! Core type definitions for the catalog.
//!
//! Product categories are a fixed set. They are stored and serialized by
//! their shop-facing label so the database, the JSON API and the storefront
//! all agree on the same strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    /// Marshmallow (zefir).
    #[serde(rename = "Зефир")]
    Marshmallow,
    /// Edible bouquets.
    #[serde(rename = "Букеты")]
    Bouquets,
    /// Cakes.
    #[serde(rename = "Торты")]
    Cakes,
    /// Pastry and baked goods.
    #[serde(rename = "Выпечка")]
    Pastry,
    /// Anything that fits none of the above.
    #[default]
    #[serde(rename = "Другое")]
    Other,
}

impl Category {
    /// All categories in display order.
    #[must_use]
    pub fn all() -> &'static [Category] {
        &[
            Category::Marshmallow,
            Category::Bouquets,
            Category::Cakes,
            Category::Pastry,
            Category::Other,
        ]
    }

    /// The label stored in the database and shown in the storefront.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Marshmallow => "Зефир",
            Self::Bouquets => "Букеты",
            Self::Cakes => "Торты",
            Self::Pastry => "Выпечка",
            Self::Other => "Другое",
        }
    }

    /// Resolve a stored or submitted label.
    ///
    /// Missing and unrecognized labels fall back to [`Category::Other`].
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label.map(str::trim) else {
            return Self::Other;
        };
        Self::all()
            .iter()
            .copied()
            .find(|c| c.label() == label)
            .unwrap_or(Self::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
