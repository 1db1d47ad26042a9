//! Product photo storage.
//!
//! Each product has at most one photo on disk, named `<product id>.<ext>`
//! under a single configured directory. The repository keeps no state
//! between calls: every lookup probes the filesystem.

mod repository;
mod upload;

pub use repository::PhotoRepository;
pub use upload::{Upload, UploadedPhoto};
