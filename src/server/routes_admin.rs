//! Admin routes for managing catalog products.
//!
//! Add and edit take `multipart/form-data` with the text fields `name`,
//! `description`, `price`, `category`, `is_available` (edit only) and an
//! optional file field `photo`. Every mutation answers with a [`Flash`].

use std::collections::HashMap;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sweetshop_common::{Category, Error, ProductId};
use sweetshop_db::models::{Product, ProductUpdate};

use super::{run_blocking, ApiError, AppContext, Flash};
use crate::catalog::{AdminSession, CatalogEntry, ProductForm};
use crate::photos::{Upload, UploadedPhoto};

/// Create admin routes.
pub fn admin_routes() -> Router<AppContext> {
    Router::new()
        .route("/admin/products", get(list_products).post(add_product))
        .route(
            "/admin/products/:id",
            get(get_product)
                .post(edit_product)
                .put(edit_product)
                .delete(delete_product),
        )
}

// ============================================================================
// Multipart form handling
// ============================================================================

/// Text fields and the optional photo of a submitted product form.
#[derive(Debug, Default)]
struct SubmittedForm {
    fields: HashMap<String, String>,
    photo: Option<UploadedPhoto>,
}

impl SubmittedForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "photo" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                // Browsers send an empty part when no file was chosen.
                if !filename.is_empty() {
                    form.photo = Some(UploadedPhoto::new(filename, data));
                }
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn price(&self) -> Result<Option<f64>, Error> {
        match self.text("price").map(str::trim).filter(|p| !p.is_empty()) {
            Some(raw) => raw
                .parse::<f64>()
                .map(Some)
                .map_err(|_| Error::validation(format!("Price must be a number, got '{}'", raw))),
            None => Ok(None),
        }
    }

    fn is_available(&self) -> Result<Option<bool>, Error> {
        match self.text("is_available").map(|v| v.trim().to_lowercase()) {
            None => Ok(None),
            Some(v) => match v.as_str() {
                "on" | "true" | "1" => Ok(Some(true)),
                "off" | "false" | "0" => Ok(Some(false)),
                _ => Err(Error::validation(format!("Invalid is_available value '{}'", v))),
            },
        }
    }

    fn product_form(&self) -> Result<ProductForm, Error> {
        Ok(ProductForm {
            name: self.text("name").map(str::to_string),
            description: self.text("description").map(str::to_string),
            price: self.price()?,
            category: self.text("category").map(str::to_string),
        })
    }

    /// Only the fields present in the form are updated.
    fn product_update(&self) -> Result<ProductUpdate, Error> {
        Ok(ProductUpdate {
            name: self.text("name").map(|n| n.trim().to_string()),
            description: self.text("description").map(|d| d.trim().to_string()),
            price: self.price()?,
            category: self.text("category").map(|c| Category::from_label(Some(c))),
            is_available: self.is_available()?,
        })
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

// ============================================================================
// Handlers
// ============================================================================

/// Products for the admin panel, without photo lookups.
async fn list_products(
    State(ctx): State<AppContext>,
    _session: AdminSession,
) -> Result<Json<Vec<Product>>, ApiError> {
    let catalog = ctx.catalog.clone();
    let products = run_blocking(move || catalog.products().all()).await?;
    Ok(Json(products))
}

/// One product with its photo, for the edit form.
async fn get_product(
    State(ctx): State<AppContext>,
    _session: AdminSession,
    Path(id): Path<ProductId>,
) -> Result<Json<CatalogEntry>, ApiError> {
    let catalog = ctx.catalog.clone();
    let entry = run_blocking(move || catalog.get_with_photo(id)).await?;
    Ok(Json(entry))
}

async fn add_product(
    State(ctx): State<AppContext>,
    session: AdminSession,
    multipart: Multipart,
) -> Result<(StatusCode, Flash), ApiError> {
    let submitted = SubmittedForm::read(multipart).await?;
    let form = submitted.product_form()?;
    let photo = submitted.photo;

    let catalog = ctx.catalog.clone();
    let outcome = run_blocking(move || {
        catalog.add_product(&session, form, photo.as_ref().map(|p| p as &dyn Upload))
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Flash::success(outcome.message()).with_data(&outcome),
    ))
}

async fn edit_product(
    State(ctx): State<AppContext>,
    session: AdminSession,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Flash, ApiError> {
    let submitted = SubmittedForm::read(multipart).await?;
    let update = submitted.product_update()?;
    let photo = submitted.photo;

    let catalog = ctx.catalog.clone();
    let outcome = run_blocking(move || {
        catalog.edit_product(&session, id, update, photo.as_ref().map(|p| p as &dyn Upload))
    })
    .await?;

    Ok(Flash::with_warning(outcome.message(), outcome.warning()).with_data(&outcome))
}

async fn delete_product(
    State(ctx): State<AppContext>,
    session: AdminSession,
    Path(id): Path<ProductId>,
) -> Result<Flash, ApiError> {
    let catalog = ctx.catalog.clone();
    let outcome = run_blocking(move || catalog.delete_product(&session, id)).await?;

    Ok(Flash::with_warning(outcome.message(), outcome.warning.clone()).with_data(&outcome))
}
