//! Database query modules.
//!
//! - products: Product CRUD

pub mod products;
