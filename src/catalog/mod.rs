//! Catalog service: products joined with their photos.
//!
//! [`CatalogService`] is the only place that touches both the
//! [`ProductStore`](sweetshop_db::store::ProductStore) and the
//! [`PhotoRepository`](crate::photos::PhotoRepository). It keeps the two
//! consistent on a best-effort basis: a product added with a rejected photo
//! is removed again, and deleting a product removes its photo file.

mod service;
mod session;
mod types;

pub use service::CatalogService;
pub use session::AdminSession;
pub use types::{AddOutcome, CatalogEntry, DeleteOutcome, EditOutcome, PhotoChange, ProductForm};
