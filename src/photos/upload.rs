//! Upload handles accepted by the photo repository.

use std::path::Path;

use bytes::Bytes;

/// An uploaded file: the client-supplied name plus a way to persist it.
pub trait Upload {
    /// Filename as sent by the client. Only its extension is ever used.
    fn filename(&self) -> &str;

    /// Write the upload's contents to `path`, replacing any existing file.
    fn save_to(&self, path: &Path) -> std::io::Result<()>;
}

/// An upload fully buffered in memory, e.g. a multipart form field.
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    filename: String,
    data: Bytes,
}

impl UploadedPhoto {
    pub fn new<S: Into<String>, B: Into<Bytes>>(filename: S, data: B) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    /// Size of the upload in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Upload for UploadedPhoto {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn save_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.data)
    }
}
