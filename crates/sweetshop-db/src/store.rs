//! `ProductStore`: pool-owning facade over the product queries.
//!
//! The query functions in [`crate::queries::products`] report "no such row"
//! as `None`/`false`. The store turns those into [`Error::NotFound`] so the
//! catalog layer can rely on a single error taxonomy. Every method checks out
//! one connection and performs one statement; there are no multi-row
//! transactions.

use sweetshop_common::{Error, ProductId, Result};

use crate::models::{NewProduct, Product, ProductUpdate};
use crate::pool::{get_conn, DbPool};
use crate::queries::products;

/// Relational store of catalog products.
#[derive(Clone)]
pub struct ProductStore {
    pool: DbPool,
}

impl ProductStore {
    /// Create a store over an initialized (migrated) pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a product; it starts out available.
    pub fn create(&self, product: &NewProduct) -> Result<ProductId> {
        let conn = get_conn(&self.pool)?;
        products::create_product(&conn, product)
    }

    /// All products in id order.
    pub fn all(&self) -> Result<Vec<Product>> {
        let conn = get_conn(&self.pool)?;
        products::list_products(&conn)
    }

    /// Fetch one product, failing with `NotFound` when absent.
    pub fn get(&self, id: ProductId) -> Result<Product> {
        let conn = get_conn(&self.pool)?;
        products::get_product(&conn, id)?.ok_or_else(|| not_found(id))
    }

    /// Write the supplied fields of `update`.
    ///
    /// Fails with `InvalidInput` when no field is supplied and with `NotFound`
    /// when no row has this id.
    pub fn update(&self, id: ProductId, update: &ProductUpdate) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        if products::update_product(&conn, id, update)? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Remove a product, failing with `NotFound` when nothing was removed.
    pub fn delete(&self, id: ProductId) -> Result<()> {
        let conn = get_conn(&self.pool)?;
        if products::delete_product(&conn, id)? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Number of stored products.
    pub fn count(&self) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        products::count_products(&conn)
    }
}

fn not_found(id: ProductId) -> Error {
    Error::not_found(format!("product {}", id))
}
