//! The [`ImageLoader`] trait and its error type.
//!
//! A loader requests the resource at `src` through a side channel (never the
//! element that ends up displayed) and reports its natural size. Loads are
//! fire-and-forget: the returned future is spawned on the current
//! [`LocalSet`](tokio::task::LocalSet) and must therefore own everything it
//! needs (`'static`). It does not need to be `Send`.

use crate::types::Dimensions;
use futures::future::LocalBoxFuture;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {src}: {message}")]
    Decode { src: String, message: String },
    #[error("Image not found: {0}")]
    NotFound(String),
    #[error("Unsupported source scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Load of {0} was abandoned before completing")]
    Cancelled(String),
}

/// Future returned by [`ImageLoader::load`].
pub type LoadFuture = LocalBoxFuture<'static, Result<Dimensions, LoadError>>;

/// Asynchronously discovers the natural size of an image.
pub trait ImageLoader {
    fn load(&self, src: &str) -> LoadFuture;
}
