//! Sweetshop-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across sweetshop:
//!
//! - **Typed IDs**: `ProductId`, a newtype over the SQLite row id
//! - **Core Types**: the product `Category` set
//! - **Path Utilities**: photo extension checks and the probe order
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use sweetshop_common::{Category, Error, ProductId, Result};
//! use sweetshop_common::paths::is_photo_filename;
//!
//! let id = ProductId::from(7);
//! assert_eq!(id.to_string(), "7");
//!
//! assert_eq!(Category::from_label(Some("Торты")), Category::Cakes);
//! assert!(is_photo_filename("cake.JPG"));
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("product 7"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
