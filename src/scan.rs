//! Building the image list for the CLI.
//!
//! Three inputs are supported, each producing the same `Vec<ImageDescriptor>`
//! that [`Gallery::new`](crate::gallery::Gallery::new) consumes, plus the
//! directory that relative `src` values resolve against:
//!
//! | Input | Image order | Base directory |
//! |---|---|---|
//! | Directory | Path order (walked recursively, dotfiles skipped) | The directory |
//! | JSON manifest | Array order | The manifest's directory |
//! | HTML file | Document order | The HTML file's directory |
//!
//! A manifest is a JSON array of descriptors:
//!
//! ```json
//! [
//!   { "src": "dawn.jpg", "alt": "Dawn" },
//!   { "src": "dusk.jpg", "srcset": ["dusk-800.jpg 800w", "dusk-1600.jpg 1600w"] }
//! ]
//! ```

use crate::extract::{ExtractError, descriptors_from_html};
use crate::resolve::fs_loader::is_supported_image;
use crate::types::ImageDescriptor;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Manifest error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Images found by a scan, with the directory their sources are relative to.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub base: PathBuf,
    pub images: Vec<ImageDescriptor>,
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Alt text from a file stem: `golden-hour_02` → `golden hour 02`.
fn alt_from_stem(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let alt = stem.replace(['-', '_'], " ").trim().to_string();
    (!alt.is_empty()).then_some(alt)
}

/// Walk `dir` for supported images, sorted by path.
pub fn scan_directory(dir: &Path) -> Result<ScanResult, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut images = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_supported_image(entry.path()) {
            continue;
        }
        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let src = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        images.push(ImageDescriptor {
            src,
            srcset: Vec::new(),
            sizes: Vec::new(),
            alt: alt_from_stem(entry.path()),
        });
    }

    Ok(ScanResult {
        base: dir.to_path_buf(),
        images,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Read a JSON manifest of descriptors.
pub fn load_manifest(path: &Path) -> Result<ScanResult, ScanError> {
    let content = fs::read_to_string(path)?;
    let images: Vec<ImageDescriptor> = serde_json::from_str(&content)?;
    Ok(ScanResult {
        base: parent_dir(path),
        images,
    })
}

/// Read the `img` elements of an HTML file.
pub fn load_html(path: &Path) -> Result<ScanResult, ScanError> {
    let content = fs::read_to_string(path)?;
    Ok(ScanResult {
        base: parent_dir(path),
        images: descriptors_from_html(&content)?,
    })
}
