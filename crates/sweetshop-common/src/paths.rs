//! Path utilities for product photos.
//!
//! Photos are accepted by extension only; the bytes are never sniffed. The
//! extension list doubles as the probe order used when looking for the photo
//! of a product on disk.

/// Allowed photo extensions, in probe priority order.
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "webp", "png", "jpeg"];

/// Get the list of photo extensions in probe priority order.
///
/// # Examples
///
/// ```
/// use sweetshop_common::paths::photo_extensions;
///
/// assert_eq!(photo_extensions()[0], "jpg");
/// assert!(photo_extensions().contains(&"webp"));
/// ```
#[must_use]
pub fn photo_extensions() -> &'static [&'static str] {
    PHOTO_EXTENSIONS
}

/// Extract the lowercased extension of an uploaded filename.
///
/// The extension is whatever follows the last `.`; a name without a `.` has
/// none. Returns `None` when the extension is not an allowed photo format.
///
/// # Examples
///
/// ```
/// use sweetshop_common::paths::photo_extension;
///
/// assert_eq!(photo_extension("Cake.JPG").as_deref(), Some("jpg"));
/// assert_eq!(photo_extension("cake.gif"), None);
/// assert_eq!(photo_extension("jpg"), None);
/// ```
pub fn photo_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_lowercase();
    PHOTO_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Check whether an uploaded filename carries an allowed photo extension.
///
/// # Examples
///
/// ```
/// use sweetshop_common::paths::is_photo_filename;
///
/// assert!(is_photo_filename("poster.webp"));
/// assert!(!is_photo_filename("poster.bmp"));
/// ```
pub fn is_photo_filename(filename: &str) -> bool {
    photo_extension(filename).is_some()
}
