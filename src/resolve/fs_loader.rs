//! Filesystem image loader.
//!
//! Resolves `src` against a base directory and reads only the image header
//! to learn its size; pixels are never decoded. The blocking read runs on
//! tokio's blocking pool so the single-threaded event loop keeps turning.
//!
//! Accepted `src` forms:
//!
//! | Form | Resolved to |
//! |---|---|
//! | `photos/a.jpg` | `<base>/photos/a.jpg` |
//! | `/abs/a.jpg` | `/abs/a.jpg` |
//! | `file:///abs/my%20photo.jpg` | `/abs/my photo.jpg` |
//! | `https://…` | rejected with [`LoadError::UnsupportedScheme`] |

use super::loader::{ImageLoader, LoadError, LoadFuture};
use crate::types::Dimensions;
use futures::FutureExt;
use image::{ImageFormat, ImageReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Image file extensions [`FsLoader`] can identify.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has one of the [supported extensions](supported_input_extensions).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Loads dimensions from image files under a base directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    base: PathBuf,
}

impl FsLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Map a `src` to the file it names.
    pub fn resolve_path(&self, src: &str) -> Result<PathBuf, LoadError> {
        let raw = match src.strip_prefix("file://") {
            Some(rest) => urlencoding::decode(rest)
                .map_err(|e| LoadError::Decode {
                    src: src.to_string(),
                    message: e.to_string(),
                })?
                .into_owned(),
            None if src.contains("://") || src.starts_with("data:") => {
                return Err(LoadError::UnsupportedScheme(src.to_string()));
            }
            None => src.to_string(),
        };
        let path = Path::new(&raw);
        Ok(if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        })
    }
}

impl Default for FsLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Read image dimensions from the file header.
pub fn identify(path: &Path) -> Result<Dimensions, LoadError> {
    let src = path.display().to_string();
    if !path.exists() {
        return Err(LoadError::NotFound(src));
    }
    let (width, height) = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| LoadError::Decode {
            src,
            message: e.to_string(),
        })?;
    Ok(Dimensions { width, height })
}

impl ImageLoader for FsLoader {
    fn load(&self, src: &str) -> LoadFuture {
        let resolved = self.resolve_path(src);
        let src = src.to_string();
        async move {
            let path = resolved?;
            tokio::task::spawn_blocking(move || identify(&path))
                .await
                .map_err(|_| LoadError::Cancelled(src))?
        }
        .boxed_local()
    }
}
