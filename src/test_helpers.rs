//! Shared test utilities for the row-gal test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let loader = ManualLoader::new();
//! let gallery = Gallery::new(descriptors(&["a", "b"]), Element::new("div"),
//!     GalleryOptions::default(), &loader).unwrap();
//!
//! loader.complete("b", 400, 300);
//! run_pending().await;
//! assert!(matches!(gallery.status(), GalleryStatus::Pending { resolved: 1, .. }));
//! ```

use crate::resolve::{ImageLoader, LoadError, LoadFuture};
use crate::types::{Dimensions, ImageDescriptor};
use futures::FutureExt;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::oneshot;

type Reply = oneshot::Sender<Result<Dimensions, LoadError>>;

// =========================================================================
// Loaders
// =========================================================================

/// Loader whose requests stay pending until the test completes them.
///
/// Lets a test choose the exact order in which dimensions arrive.
#[derive(Default)]
pub struct ManualLoader {
    pending: RefCell<HashMap<String, Vec<Reply>>>,
    requests: RefCell<Vec<String>>,
}

impl ManualLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sources requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn reply(&self, src: &str, result: impl Fn() -> Result<Dimensions, LoadError>) {
        let replies = self
            .pending
            .borrow_mut()
            .remove(src)
            .unwrap_or_else(|| panic!("no pending load for '{src}'"));
        for reply in replies {
            let _ = reply.send(result());
        }
    }

    /// Resolve every pending load of `src` with the given size.
    pub fn complete(&self, src: &str, width: u32, height: u32) {
        self.reply(src, || Ok(Dimensions::new(width, height)));
    }

    /// Fail every pending load of `src`.
    pub fn fail(&self, src: &str) {
        self.reply(src, || Err(LoadError::NotFound(src.to_string())));
    }
}

impl ImageLoader for ManualLoader {
    fn load(&self, src: &str) -> LoadFuture {
        let (tx, rx) = oneshot::channel();
        self.pending
            .borrow_mut()
            .entry(src.to_string())
            .or_default()
            .push(tx);
        self.requests.borrow_mut().push(src.to_string());
        let src = src.to_string();
        async move { rx.await.unwrap_or(Err(LoadError::Cancelled(src))) }.boxed_local()
    }
}

/// Give spawned local tasks a chance to run.
pub async fn run_pending() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

// =========================================================================
// Fixtures
// =========================================================================

/// Descriptors with only a `src` each.
pub fn descriptors(srcs: &[&str]) -> Vec<ImageDescriptor> {
    srcs.iter().copied().map(ImageDescriptor::new).collect()
}

/// Write a blank PNG of the given size and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::new(width, height).save(&path).unwrap();
    path
}
