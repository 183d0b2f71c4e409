//! # Row Gal
//!
//! A responsive row-based image gallery. Given an ordered list of images and
//! a container element, it measures every image, then lays them out in rows
//! of a fixed count where each image's share of the row width follows its
//! aspect ratio. Cells keep their aspect ratio with the padding-bottom
//! technique, so the page does not reflow as images arrive.
//!
//! # Lifecycle
//!
//! ```text
//! 1. Construct   images + container  →  styled container with empty rows
//! 2. Resolve     one load per distinct src  →  dimension table
//! 3. Materialize barrier fires once  →  one cell per image, in input order
//! 4. Destroy     container emptied; late loads are discarded
//! ```
//!
//! Nothing is placed in a row until every distinct source has resolved. The
//! final markup depends only on the input order and the measured sizes, never
//! on the order in which loads complete.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`gallery`] | The gallery handle: construction, materialization, click dispatch, destroy |
//! | [`resolve`] | Loader trait, filesystem loader, dimension table, completion barrier |
//! | [`partition`] | Splits the image list into fixed-size rows |
//! | [`layout`] | Flex weights and padding percentages from image dimensions |
//! | [`dom`] | In-memory element tree the gallery renders into |
//! | [`render`] | Serializes an element tree to HTML with Maud |
//! | [`extract`] | Reads image descriptors from an element tree or an HTML document |
//! | [`scan`] | Builds the image list for the CLI from a directory, manifest, or HTML file |
//! | [`config`] | `gallery.toml` loading, merging, and validation; gallery options |
//! | [`types`] | Image descriptors and dimensions |
//! | [`output`] | CLI output formatting for events and the final layout |
//!
//! # Design Decisions
//!
//! ## Single-Threaded Resolution
//!
//! All loads run as local tasks on one thread. The gallery's state is shared
//! through `Rc<RefCell<_>>`, and a completion never interleaves with another
//! completion or with a click handler. Loaders that block (file decoding) hand
//! the work to tokio's blocking pool and post the result back.
//!
//! ## One Load Per Source
//!
//! The dimension table is keyed by `src`, so two images with the same source
//! share a single load and a single table entry. The completion barrier counts
//! distinct sources for the same reason: counting images would never fire for
//! a list with duplicates.
//!
//! ## Degenerate Images Are Omitted
//!
//! An image whose width or height is zero has no usable aspect ratio. It is
//! left out of its row with a warning instead of producing `inf` or `NaN`
//! styles, and the rest of the gallery still lays out.
//!
//! ## Loads Never Outlive the Gallery's State
//!
//! Load tasks hold only a weak reference to the gallery. Once the gallery is
//! destroyed or dropped, a late completion finds nothing to update and is
//! dropped without touching the container.

pub mod config;
pub mod dom;
pub mod extract;
pub mod gallery;
pub mod layout;
pub mod output;
pub mod partition;
pub mod render;
pub mod resolve;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
