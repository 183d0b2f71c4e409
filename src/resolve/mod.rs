//! Dimension discovery: loading images out-of-band to learn their natural size.
//!
//! | Piece | Role |
//! |---|---|
//! | [`ImageLoader`] | Trait: asynchronously load one `src` and report its dimensions |
//! | [`FsLoader`] | Production loader: reads image headers from disk |
//! | [`DimensionTable`] | `src → Dimensions` map, last write wins |
//! | [`CompletionBarrier`] | Fires exactly once when every distinct `src` has resolved |
//!
//! The loader is a seam: the gallery only ever sees [`ImageLoader`], so tests
//! drive completion order by hand (see `test_helpers::ManualLoader`).

mod barrier;
pub mod fs_loader;
pub mod loader;
mod table;

pub use barrier::CompletionBarrier;
pub use fs_loader::FsLoader;
pub use loader::{ImageLoader, LoadError, LoadFuture};
pub use table::DimensionTable;
