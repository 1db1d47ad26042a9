//! Product database queries.
//!
//! This module provides CRUD operations on the `products` table. Functions
//! report "nothing matched" as `None`/`false` and leave the decision of
//! whether that is an error to the caller.

use rusqlite::{Connection, ToSql};
use sweetshop_common::{Category, Error, ProductId, Result};

use crate::models::{NewProduct, Product, ProductUpdate};

const PRODUCT_COLUMNS: &str = "id, name, description, price, category, is_available";

/// Parse a product from a database row.
///
/// Expects columns in order: id, name, description, price, category, is_available.
fn parse_product_row(row: &rusqlite::Row) -> rusqlite::Result<Product> {
    let category: Option<String> = row.get(4)?;
    Ok(Product {
        id: ProductId::from(row.get::<_, i64>(0)?),
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: Category::from_label(category.as_deref()),
        is_available: row.get(5)?,
    })
}

/// Insert a new product.
///
/// # Returns
///
/// * `Ok(ProductId)` - The id assigned by SQLite
/// * `Err(Error)` - On constraint violation or database failure
pub fn create_product(conn: &Connection, product: &NewProduct) -> Result<ProductId> {
    conn.execute(
        "INSERT INTO products (name, description, price, category)
         VALUES (:name, :description, :price, :category)",
        rusqlite::named_params! {
            ":name": &product.name,
            ":description": &product.description,
            ":price": product.price,
            ":category": product.category.label(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(ProductId::from(conn.last_insert_rowid()))
}

/// List all products in id order.
pub fn list_products(conn: &Connection) -> Result<Vec<Product>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let products = stmt
        .query_map([], parse_product_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(products)
}

/// Get a product by id.
///
/// # Returns
///
/// * `Ok(Some(Product))` - The product if found
/// * `Ok(None)` - If the product does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_product(conn: &Connection, id: ProductId) -> Result<Option<Product>> {
    let result = conn.query_row(
        &format!("SELECT {} FROM products WHERE id = :id", PRODUCT_COLUMNS),
        rusqlite::named_params! { ":id": id.get() },
        parse_product_row,
    );

    match result {
        Ok(product) => Ok(Some(product)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Write the fields present in `update`.
///
/// # Returns
///
/// * `Ok(true)` - If the product was updated
/// * `Ok(false)` - If no product has this id
/// * `Err(Error::InvalidInput)` - If `update` sets no field
/// * `Err(Error::Database)` - On constraint violation or database failure
pub fn update_product(conn: &Connection, id: ProductId, update: &ProductUpdate) -> Result<bool> {
    let category = update.category.map(Category::label);
    let raw_id = id.get();

    let mut assignments: Vec<&str> = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();

    if let Some(ref name) = update.name {
        assignments.push("name = ?");
        values.push(name);
    }
    if let Some(ref description) = update.description {
        assignments.push("description = ?");
        values.push(description);
    }
    if let Some(ref price) = update.price {
        assignments.push("price = ?");
        values.push(price);
    }
    if let Some(ref category) = category {
        assignments.push("category = ?");
        values.push(category);
    }
    if let Some(ref is_available) = update.is_available {
        assignments.push("is_available = ?");
        values.push(is_available);
    }

    if assignments.is_empty() {
        return Err(Error::validation("No fields to update"));
    }

    values.push(&raw_id);
    let sql = format!(
        "UPDATE products SET {} WHERE id = ?",
        assignments.join(", ")
    );

    let rows_affected = conn
        .execute(&sql, values.as_slice())
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Delete a product by id.
///
/// # Returns
///
/// * `Ok(true)` - If the product was deleted
/// * `Ok(false)` - If the product did not exist
/// * `Err(Error)` - If a database error occurs
pub fn delete_product(conn: &Connection, id: ProductId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM products WHERE id = :id",
            rusqlite::named_params! { ":id": id.get() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Count all products.
pub fn count_products(conn: &Connection) -> Result<u64> {
    conn.query_row("SELECT COUNT(*) FROM products", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|count| count as u64)
    .map_err(|e| Error::database(e.to_string()))
}
