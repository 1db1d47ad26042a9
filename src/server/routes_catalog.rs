//! Public storefront routes.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sweetshop_common::Category;

use super::{run_blocking, ApiError, AppContext};
use crate::catalog::CatalogEntry;

pub fn catalog_routes() -> Router<AppContext> {
    Router::new()
        .route("/catalog", get(list_catalog))
        .route("/categories", get(list_categories))
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Category label, e.g. "Торты"
    pub category: Option<String>,
}

/// All products with their photos, optionally limited to one category.
async fn list_catalog(
    State(ctx): State<AppContext>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<CatalogEntry>>, ApiError> {
    let catalog = ctx.catalog.clone();
    let mut entries = run_blocking(move || catalog.list_with_photos()).await?;

    if let Some(label) = query.category.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        entries.retain(|entry| entry.product.category.label() == label);
    }

    Ok(Json(entries))
}

async fn list_categories() -> Json<Vec<&'static str>> {
    Json(Category::all().iter().map(|c| c.label()).collect())
}
