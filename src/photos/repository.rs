//! Filesystem-backed photo repository.
//!
//! Photos live at `{root}/{product_id}.{ext}` and are published under
//! `{url_prefix}/{product_id}.{ext}`. The extension of an existing photo is
//! not recorded anywhere, so lookups probe each allowed extension in
//! priority order.

use std::path::{Path, PathBuf};

use sweetshop_common::paths::{is_photo_filename, photo_extension, photo_extensions};
use sweetshop_common::{Error, ProductId, Result};

use super::upload::Upload;

/// On-disk association between product ids and their photo files.
#[derive(Debug, Clone)]
pub struct PhotoRepository {
    root: PathBuf,
    url_prefix: String,
}

impl PhotoRepository {
    /// Create a repository rooted at `root`, creating the directory if needed.
    ///
    /// `url_prefix` is the public path the root directory is served under,
    /// e.g. `/static/images/products`.
    pub fn open<P: Into<PathBuf>, S: Into<String>>(root: P, url_prefix: S) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
            tracing::info!("Created photo directory {}", root.display());
        }

        let url_prefix = url_prefix.into().trim_end_matches('/').to_string();
        Ok(Self { root, url_prefix })
    }

    /// Directory holding the photo files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Public URL prefix of the photo directory.
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Whether an uploaded filename has an allowed photo extension.
    pub fn validate(&self, filename: &str) -> bool {
        is_photo_filename(filename)
    }

    /// Public URL of the product's photo, if one exists.
    pub fn find(&self, id: ProductId) -> Option<String> {
        self.locate(id).map(|(_, ext)| self.url_for(id, ext))
    }

    /// Replace the product's photo with `upload`.
    ///
    /// Any existing photo is removed first, so at most one file exists per
    /// product afterwards. The new file takes the upload's lowercased
    /// extension. Returns the public URL of the stored photo.
    pub fn store(&self, id: ProductId, upload: &dyn Upload) -> Result<String> {
        let ext = photo_extension(upload.filename())
            .ok_or_else(|| Error::invalid_format(upload.filename()))?;

        if let Some((existing, _)) = self.locate(id) {
            std::fs::remove_file(&existing)?;
            tracing::debug!(product_id = %id, "Removed previous photo {}", existing.display());
        }

        let path = self.path_for(id, &ext);
        upload.save_to(&path)?;
        tracing::debug!(product_id = %id, "Stored photo {}", path.display());

        Ok(self.url_for(id, &ext))
    }

    /// Remove the product's photo.
    ///
    /// Returns `Ok(false)` when the product has no photo.
    pub fn delete(&self, id: ProductId) -> Result<bool> {
        match self.locate(id) {
            Some((path, _)) => {
                std::fs::remove_file(&path)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// First existing `<id>.<ext>` file in probe order.
    fn locate(&self, id: ProductId) -> Option<(PathBuf, &'static str)> {
        photo_extensions()
            .iter()
            .map(|ext| (self.path_for(id, ext), *ext))
            .find(|(path, _)| path.is_file())
    }

    fn path_for(&self, id: ProductId, ext: &str) -> PathBuf {
        self.root.join(format!("{}.{}", id, ext))
    }

    fn url_for(&self, id: ProductId, ext: &str) -> String {
        format!("{}/{}.{}", self.url_prefix, id, ext)
    }
}
