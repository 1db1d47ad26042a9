//! Sweetshop-DB: Database schema, migrations, and query operations
//!
//! This crate provides database functionality for sweetshop using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//! - `store` - `ProductStore`, the pool-owning product CRUD facade
//!
//! # Example
//!
//! ```
//! use sweetshop_common::Category;
//! use sweetshop_db::models::NewProduct;
//! use sweetshop_db::pool::init_memory_pool;
//! use sweetshop_db::store::ProductStore;
//!
//! let store = ProductStore::new(init_memory_pool().unwrap());
//! let id = store
//!     .create(&NewProduct::new("Cake", None, 12.5, Category::Cakes))
//!     .unwrap();
//! assert_eq!(store.get(id).unwrap().name, "Cake");
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;
