use sweetshop_common::{Error, ProductId, Result};
use sweetshop_db::models::ProductUpdate;
use sweetshop_db::store::ProductStore;
use tracing::{error, info, warn};

use super::session::AdminSession;
use super::types::{AddOutcome, CatalogEntry, DeleteOutcome, EditOutcome, PhotoChange, ProductForm};
use crate::photos::{PhotoRepository, Upload};

/// Product catalog over a relational store and a photo directory.
///
/// All operations are synchronous; async callers run them on a blocking
/// worker.
#[derive(Clone)]
pub struct CatalogService {
    products: ProductStore,
    photos: PhotoRepository,
}

impl CatalogService {
    pub fn new(products: ProductStore, photos: PhotoRepository) -> Self {
        Self { products, photos }
    }

    pub fn products(&self) -> &ProductStore {
        &self.products
    }

    pub fn photos(&self) -> &PhotoRepository {
        &self.photos
    }

    /// Every product with its photo URL, in id order.
    pub fn list_with_photos(&self) -> Result<Vec<CatalogEntry>> {
        let products = self.products.all()?;
        Ok(products
            .into_iter()
            .map(|product| {
                let photo_url = self.photos.find(product.id);
                CatalogEntry { product, photo_url }
            })
            .collect())
    }

    /// One product with its photo URL.
    pub fn get_with_photo(&self, id: ProductId) -> Result<CatalogEntry> {
        let product = self.products.get(id)?;
        let photo_url = self.photos.find(id);
        Ok(CatalogEntry { product, photo_url })
    }

    /// Create a product and optionally attach a photo.
    ///
    /// An upload with an empty filename counts as no upload. When the photo
    /// is rejected or cannot be written, the freshly created row is deleted
    /// again and the photo error is returned.
    pub fn add_product(
        &self,
        session: &AdminSession,
        form: ProductForm,
        upload: Option<&dyn Upload>,
    ) -> Result<AddOutcome> {
        let new_product = form.into_new_product()?;
        let upload = upload.filter(|u| !u.filename().is_empty());

        let id = self.products.create(&new_product)?;

        let photo_url = match upload {
            Some(upload) => match self.attach_new_photo(id, upload) {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(admin = %session, product_id = %id, "Photo rejected, rolling back add: {}", e);
                    self.rollback_add(id);
                    return Err(e);
                }
            },
            None => None,
        };

        let product = self.products.get(id)?;
        info!(
            admin = %session,
            product_id = %id,
            with_photo = photo_url.is_some(),
            "Product added"
        );

        Ok(AddOutcome { product, photo_url })
    }

    /// Update the supplied fields of a product and optionally replace its
    /// photo.
    ///
    /// A bad or unwritable photo does not fail the edit; it is reported
    /// through [`EditOutcome::photo`]. Nothing is written when a text field
    /// is invalid.
    pub fn edit_product(
        &self,
        session: &AdminSession,
        id: ProductId,
        update: ProductUpdate,
        upload: Option<&dyn Upload>,
    ) -> Result<EditOutcome> {
        let mut product = self.products.get(id)?;
        update.validate()?;

        let photo = match upload.filter(|u| !u.filename().is_empty()) {
            Some(upload) => self.replace_photo(id, upload),
            None => PhotoChange::Unchanged,
        };

        if !update.is_empty() {
            self.products.update(id, &update)?;
            update.apply_to(&mut product);
        } else {
            match &photo {
                PhotoChange::Replaced { .. } => {}
                PhotoChange::Unchanged => return Err(Error::validation("Nothing to update")),
                PhotoChange::Rejected { filename, .. } => {
                    return Err(Error::invalid_format(filename.as_str()))
                }
                PhotoChange::Failed { reason } => return Err(Error::io(reason.as_str())),
            }
        }

        match &photo {
            PhotoChange::Rejected { reason, .. } | PhotoChange::Failed { reason } => {
                warn!(admin = %session, product_id = %id, "Product updated without photo: {}", reason);
            }
            _ => {}
        }
        info!(admin = %session, product_id = %id, "Product updated");

        let photo_url = self.photos.find(id);
        Ok(EditOutcome {
            product,
            photo_url,
            photo,
        })
    }

    /// Delete a product and its photo.
    ///
    /// The row is removed first. Failing to remove the photo afterwards is
    /// reported as a warning, the product stays deleted.
    pub fn delete_product(&self, session: &AdminSession, id: ProductId) -> Result<DeleteOutcome> {
        self.products.delete(id)?;

        let (photo_removed, warning) = match self.photos.delete(id) {
            Ok(removed) => (removed, None),
            Err(e) => {
                warn!(admin = %session, product_id = %id, "Failed to remove photo: {}", e);
                (false, Some(format!("Photo could not be removed: {}", e)))
            }
        };

        info!(admin = %session, product_id = %id, photo_removed, "Product deleted");
        Ok(DeleteOutcome {
            id,
            photo_removed,
            warning,
        })
    }

    fn attach_new_photo(&self, id: ProductId, upload: &dyn Upload) -> Result<String> {
        if !self.photos.validate(upload.filename()) {
            return Err(Error::invalid_format(upload.filename()));
        }

        self.photos.store(id, upload).inspect_err(|_| {
            // A failed write may leave a truncated file behind.
            if let Err(e) = self.photos.delete(id) {
                error!(product_id = %id, "Failed to remove partial photo: {}", e);
            }
        })
    }

    fn replace_photo(&self, id: ProductId, upload: &dyn Upload) -> PhotoChange {
        let filename = upload.filename().to_string();
        if !self.photos.validate(&filename) {
            let reason = Error::invalid_format(filename.as_str()).to_string();
            return PhotoChange::Rejected { filename, reason };
        }

        match self.photos.store(id, upload) {
            Ok(url) => PhotoChange::Replaced { url },
            Err(e) => PhotoChange::Failed {
                reason: e.to_string(),
            },
        }
    }

    fn rollback_add(&self, id: ProductId) {
        if let Err(e) = self.products.delete(id) {
            error!(product_id = %id, "Failed to remove product after rejected photo: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::UploadedPhoto;
    use assert_matches::assert_matches;
    use sweetshop_common::Category;
    use sweetshop_db::pool::init_memory_pool;

    fn service() -> (tempfile::TempDir, CatalogService) {
        let dir = tempfile::tempdir().unwrap();
        let photos = PhotoRepository::open(dir.path().join("photos"), "/static/images/products")
            .unwrap();
        let products = ProductStore::new(init_memory_pool().unwrap());
        (dir, CatalogService::new(products, photos))
    }

    fn admin() -> AdminSession {
        AdminSession::new("admin")
    }

    fn cake_form() -> ProductForm {
        ProductForm {
            name: Some("Cake".to_string()),
            description: Some("Choc".to_string()),
            price: Some(12.5),
            category: Some("Торты".to_string()),
        }
    }

    fn photo(name: &str) -> UploadedPhoto {
        UploadedPhoto::new(name, b"image bytes".to_vec())
    }

    #[test]
    fn test_add_without_photo_is_listed() {
        let (_dir, catalog) = service();

        let outcome = catalog.add_product(&admin(), cake_form(), None).unwrap();
        assert_eq!(outcome.photo_url, None);
        assert_eq!(outcome.message(), "Product 'Cake' added without photo");

        let id = outcome.product.id;
        let product = catalog.products().get(id).unwrap();
        assert_eq!(product.category, Category::Cakes);
        assert!(product.is_available);

        let entries = catalog.list_with_photos().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].product.id, id);
        assert_eq!(entries[0].photo_url, None);
    }

    #[test]
    fn test_add_with_empty_filename_counts_as_no_photo() {
        let (_dir, catalog) = service();
        let empty = photo("");

        let outcome = catalog
            .add_product(&admin(), cake_form(), Some(&empty))
            .unwrap();
        assert_eq!(outcome.photo_url, None);
    }

    #[test]
    fn test_add_invalid_input_writes_nothing() {
        let (_dir, catalog) = service();
        let mut form = cake_form();
        form.price = None;

        let result = catalog.add_product(&admin(), form, Some(&photo("a.jpg")));
        assert_matches!(result, Err(Error::InvalidInput(_)));
        assert_eq!(catalog.products().count().unwrap(), 0);
        assert_eq!(std::fs::read_dir(catalog.photos().root()).unwrap().count(), 0);
    }

    #[test]
    fn test_add_with_gif_rolls_back() {
        let (_dir, catalog) = service();
        catalog.add_product(&admin(), cake_form(), None).unwrap();
        let before = catalog.products().all().unwrap().len();

        let result = catalog.add_product(&admin(), cake_form(), Some(&photo("a.gif")));
        assert_matches!(result, Err(Error::InvalidFormat { ref allowed, .. }) if allowed.contains("webp"));
        assert_eq!(catalog.products().all().unwrap().len(), before);
    }

    #[test]
    fn test_add_with_jpg_then_delete() {
        let (_dir, catalog) = service();

        let outcome = catalog
            .add_product(&admin(), cake_form(), Some(&photo("a.jpg")))
            .unwrap();
        let id = outcome.product.id;
        let expected = format!("/static/images/products/{}.jpg", id);
        assert_eq!(outcome.photo_url.as_deref(), Some(expected.as_str()));
        assert_eq!(outcome.message(), "Product 'Cake' added with photo");
        assert_eq!(catalog.photos().find(id), Some(expected));

        let deleted = catalog.delete_product(&admin(), id).unwrap();
        assert!(deleted.photo_removed);
        assert_eq!(deleted.warning, None);
        assert_eq!(catalog.photos().find(id), None);
        assert_matches!(catalog.products().get(id), Err(Error::NotFound(_)));
    }

    #[test]
    fn test_add_rolls_back_when_photo_cannot_be_written() {
        let (_dir, catalog) = service();
        std::fs::remove_dir_all(catalog.photos().root()).unwrap();

        let result = catalog.add_product(&admin(), cake_form(), Some(&photo("a.jpg")));
        assert_matches!(result, Err(Error::Io(_)));
        assert_eq!(catalog.products().count().unwrap(), 0);
    }

    #[test]
    fn test_rolled_back_id_is_not_reused() {
        let (_dir, catalog) = service();
        let _ = catalog.add_product(&admin(), cake_form(), Some(&photo("a.gif")));

        let id = catalog
            .add_product(&admin(), cake_form(), None)
            .unwrap()
            .product
            .id;
        assert_eq!(id.get(), 2);
    }

    #[test]
    fn test_edit_price_keeps_photo() {
        let (_dir, catalog) = service();
        let id = catalog
            .add_product(&admin(), cake_form(), Some(&photo("a.jpg")))
            .unwrap()
            .product
            .id;
        let url_before = catalog.photos().find(id);

        let update = ProductUpdate {
            price: Some(9.99),
            ..Default::default()
        };
        let outcome = catalog.edit_product(&admin(), id, update, None).unwrap();

        assert_eq!(outcome.photo, PhotoChange::Unchanged);
        assert_eq!(outcome.product.price, 9.99);
        assert_eq!(catalog.products().get(id).unwrap().price, 9.99);
        assert_eq!(catalog.photos().find(id), url_before);
        assert_eq!(outcome.photo_url, url_before);
    }

    #[test]
    fn test_edit_is_idempotent() {
        let (_dir, catalog) = service();
        let id = catalog
            .add_product(&admin(), cake_form(), None)
            .unwrap()
            .product
            .id;
        let update = ProductUpdate {
            name: Some("Honey cake".to_string()),
            is_available: Some(false),
            ..Default::default()
        };

        catalog.edit_product(&admin(), id, update.clone(), None).unwrap();
        let first = catalog.products().get(id).unwrap();
        catalog.edit_product(&admin(), id, update, None).unwrap();
        let second = catalog.products().get(id).unwrap();

        assert_eq!(first, second);
        assert!(!second.is_available);
    }

    #[test]
    fn test_edit_replaces_photo() {
        let (_dir, catalog) = service();
        let id = catalog
            .add_product(&admin(), cake_form(), Some(&photo("a.jpg")))
            .unwrap()
            .product
            .id;

        let outcome = catalog
            .edit_product(&admin(), id, ProductUpdate::default(), Some(&photo("b.PNG")))
            .unwrap();

        assert_matches!(outcome.photo, PhotoChange::Replaced { ref url } if url.ends_with(".png"));
        assert!(catalog.photos().find(id).unwrap().ends_with(".png"));
        assert!(!catalog.photos().root().join(format!("{}.jpg", id)).exists());
        assert_eq!(outcome.warning(), None);
    }

    #[test]
    fn test_edit_with_rejected_photo_still_saves_fields() {
        let (_dir, catalog) = service();
        let id = catalog
            .add_product(&admin(), cake_form(), Some(&photo("a.jpg")))
            .unwrap()
            .product
            .id;

        let update = ProductUpdate {
            price: Some(15.0),
            ..Default::default()
        };
        let outcome = catalog
            .edit_product(&admin(), id, update, Some(&photo("b.gif")))
            .unwrap();

        assert_matches!(outcome.photo, PhotoChange::Rejected { ref filename, .. } if filename == "b.gif");
        assert!(outcome.warning().is_some());
        assert_eq!(catalog.products().get(id).unwrap().price, 15.0);
        assert!(catalog.photos().find(id).unwrap().ends_with(".jpg"));
    }

    #[test]
    fn test_edit_reports_failed_photo_write() {
        let (_dir, catalog) = service();
        let id = catalog
            .add_product(&admin(), cake_form(), None)
            .unwrap()
            .product
            .id;
        std::fs::remove_dir_all(catalog.photos().root()).unwrap();

        let update = ProductUpdate {
            category: Some(Category::Pastry),
            ..Default::default()
        };
        let outcome = catalog
            .edit_product(&admin(), id, update, Some(&photo("a.webp")))
            .unwrap();

        assert_matches!(outcome.photo, PhotoChange::Failed { .. });
        assert_eq!(catalog.products().get(id).unwrap().category, Category::Pastry);
    }

    #[test]
    fn test_edit_with_nothing_to_do() {
        let (_dir, catalog) = service();
        let id = catalog
            .add_product(&admin(), cake_form(), None)
            .unwrap()
            .product
            .id;

        assert_matches!(
            catalog.edit_product(&admin(), id, ProductUpdate::default(), None),
            Err(Error::InvalidInput(_))
        );
        assert_matches!(
            catalog.edit_product(&admin(), id, ProductUpdate::default(), Some(&photo("x.bmp"))),
            Err(Error::InvalidFormat { .. })
        );
    }

    #[test]
    fn test_edit_invalid_fields_write_nothing() {
        let (_dir, catalog) = service();
        let id = catalog
            .add_product(&admin(), cake_form(), None)
            .unwrap()
            .product
            .id;

        let update = ProductUpdate {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        let result = catalog.edit_product(&admin(), id, update, Some(&photo("a.jpg")));

        assert_matches!(result, Err(Error::InvalidInput(_)));
        assert_eq!(catalog.products().get(id).unwrap().name, "Cake");
        assert_eq!(catalog.photos().find(id), None);
    }

    #[test]
    fn test_edit_missing_product() {
        let (_dir, catalog) = service();
        let update = ProductUpdate {
            price: Some(1.0),
            ..Default::default()
        };
        assert_matches!(
            catalog.edit_product(&admin(), ProductId::from(42), update, None),
            Err(Error::NotFound(_))
        );
    }

    #[test]
    fn test_delete_missing_product() {
        let (_dir, catalog) = service();
        assert_matches!(
            catalog.delete_product(&admin(), ProductId::from(7)),
            Err(Error::NotFound(_))
        );
    }

    #[test]
    fn test_delete_without_photo() {
        let (_dir, catalog) = service();
        let id = catalog
            .add_product(&admin(), cake_form(), None)
            .unwrap()
            .product
            .id;

        let outcome = catalog.delete_product(&admin(), id).unwrap();
        assert!(!outcome.photo_removed);
        assert_eq!(outcome.message(), format!("Product {} deleted", id));
    }

    #[test]
    fn test_get_with_photo() {
        let (_dir, catalog) = service();
        let id = catalog
            .add_product(&admin(), cake_form(), Some(&photo("a.webp")))
            .unwrap()
            .product
            .id;

        let entry = catalog.get_with_photo(id).unwrap();
        assert_eq!(entry.product.name, "Cake");
        assert!(entry.photo_url.unwrap().ends_with(".webp"));
    }
}
