//! The gallery controller.
//!
//! A [`Gallery`] owns a container element from construction until
//! [`destroy`](Gallery::destroy). Construction is synchronous and returns
//! before any image size is known:
//!
//! ```text
//! Gallery::new
//!   ├─ validate config and sources        (fail fast, container untouched)
//!   ├─ style container, pre-create rows   (ceil(n / per_row) row divs)
//!   └─ spawn one load per distinct src    (tokio::task::spawn_local)
//!
//! each load completion
//!   └─ write DimensionTable → CompletionBarrier
//!                               └─ fires once → plan_layout → cells into rows
//! ```
//!
//! Construction must happen inside a [`tokio::task::LocalSet`]: loads run as
//! local tasks on the current thread and share state through `Rc<RefCell<_>>`.
//!
//! # Stalls
//!
//! Layout is all-or-nothing. If any load fails, the barrier never fires and
//! nothing is rendered. There is no retry and no timeout. The failure is
//! logged, returned by [`Gallery::failures`], and sent as
//! [`GalleryEvent::LoadFailed`]; [`Gallery::status`] stays `Pending`.
//!
//! # Duplicate sources
//!
//! A `src` listed more than once is loaded once and counted once. The barrier
//! waits for the number of *distinct* sources, so repeats cannot stall it.
//!
//! # Degenerate images
//!
//! An image whose natural width or height is zero has no aspect ratio. It is
//! left out of its row with a warning and a [`GalleryEvent::Omitted`]; the
//! rest of the gallery renders normally.
//!
//! # After destroy
//!
//! In-flight loads are not cancelled. When one completes after `destroy` (or
//! after the `Gallery` is dropped) its result is discarded: no table write, no
//! layout.

use crate::config::{ClickHandler, ConfigError, GalleryConfig, GalleryOptions};
use crate::dom::Element;
use crate::extract::descriptors_from_container;
use crate::layout::{LayoutCell, LayoutPlan, Omission, plan_layout};
use crate::partition::row_count;
use crate::resolve::{CompletionBarrier, DimensionTable, ImageLoader, LoadError, LoadFuture};
use crate::types::{Dimensions, ImageDescriptor};
use indexmap::IndexSet;
use std::cell::RefCell;
use std::num::NonZeroUsize;
use std::rc::{Rc, Weak};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Image #{index} has an empty src")]
    EmptySource { index: usize },
}

/// Progress notifications, sent through [`GalleryOptions::events`].
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    Resolved {
        src: String,
        dimensions: Dimensions,
    },
    LoadFailed {
        src: String,
        error: String,
    },
    Omitted(Omission),
    Materialized {
        rows: usize,
        images: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryStatus {
    /// Waiting for dimensions. `resolved` counts distinct sources.
    Pending { resolved: usize, expected: usize },
    Materialized,
    Destroyed,
}

/// A load that did not produce dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub src: String,
    pub message: String,
}

struct State {
    images: Vec<ImageDescriptor>,
    config: GalleryConfig,
    per_row: NonZeroUsize,
    on_click: Option<ClickHandler>,
    events: Option<Sender<GalleryEvent>>,
    /// `None` once destroyed.
    container: Option<Element>,
    rows: Vec<Element>,
    table: DimensionTable,
    barrier: CompletionBarrier,
    failures: Vec<LoadFailure>,
    plan: Option<LayoutPlan>,
    image_elements: Vec<(usize, Element)>,
    materialized: bool,
}

impl State {
    fn emit(&self, event: GalleryEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver just means nobody is listening.
            let _ = tx.send(event);
        }
    }

    fn record_dimensions(&mut self, src: String, dimensions: Dimensions) {
        tracing::debug!(
            %src,
            width = dimensions.width,
            height = dimensions.height,
            "dimensions resolved"
        );
        if self.table.insert(src.clone(), dimensions).is_some() {
            tracing::debug!(%src, "dimensions replaced for repeated source");
        }
        self.emit(GalleryEvent::Resolved { src, dimensions });

        if self.barrier.observe(self.table.len()) {
            self.materialize();
        }
    }

    fn record_failure(&mut self, src: String, error: LoadError) {
        tracing::warn!(%src, %error, "image failed to load; gallery layout is stalled");
        let message = error.to_string();
        self.emit(GalleryEvent::LoadFailed {
            src: src.clone(),
            error: message.clone(),
        });
        self.failures.push(LoadFailure { src, message });
    }

    fn materialize(&mut self) {
        let plan = plan_layout(&self.images, &self.table, self.per_row);

        for omission in &plan.omitted {
            tracing::warn!(
                index = omission.index,
                src = %omission.src,
                reason = %omission.reason,
                "image omitted from layout"
            );
            self.emit(GalleryEvent::Omitted(omission.clone()));
        }

        for (row, cells) in self.rows.iter().zip(&plan.rows) {
            for planned in cells {
                let image = &self.images[planned.index];
                let (cell, img) =
                    build_cell(image, planned.index, &planned.cell, self.on_click.clone());
                row.append_child(&cell);
                self.image_elements.push((planned.index, img));
            }
        }

        self.plan = Some(plan);
        self.materialized = true;
        let images = self.image_elements.len();
        tracing::info!(rows = self.rows.len(), images, "gallery laid out");
        self.emit(GalleryEvent::Materialized {
            rows: self.rows.len(),
            images,
        });
    }
}

/// Build `div(cell) > div(aspect box) > img` for one image.
///
/// Returns the outer cell and the `img`.
fn build_cell(
    image: &ImageDescriptor,
    index: usize,
    layout: &LayoutCell,
    on_click: Option<ClickHandler>,
) -> (Element, Element) {
    let img = Element::new("img");
    img.set_attribute("src", &image.src);
    if !image.srcset.is_empty() {
        img.set_attribute("srcset", image.srcset.join(","));
    }
    if !image.sizes.is_empty() {
        img.set_attribute("sizes", image.sizes.join(","));
    }
    if let Some(alt) = &image.alt {
        img.set_attribute("alt", alt);
    }
    img.set_style("top", "0");
    img.set_style("left", "0");
    img.set_style("position", "absolute");
    img.set_style("width", "100%");
    img.set_style("height", "100%");

    if let Some(handler) = on_click {
        let descriptor = image.clone();
        let weak = img.downgrade();
        img.set_on_click(Rc::new(move || {
            if let Some(el) = weak.upgrade() {
                handler(&descriptor, &el, index);
            }
        }));
    }

    // Zero height plus percentage padding reserves the box before the image paints.
    let aspect_box = Element::new("div");
    aspect_box.set_style("padding-bottom", layout.padding_css());
    aspect_box.set_style("position", "relative");
    aspect_box.set_style("height", "0");
    aspect_box.set_style("overflow", "hidden");
    aspect_box.append_child(&img);

    let cell = Element::new("div");
    cell.set_style("flex", layout.flex_css());
    cell.set_style("width", "30%");
    cell.set_style("align-self", "flex-start");
    cell.append_child(&aspect_box);

    (cell, img)
}

async fn resolve_one(state: Weak<RefCell<State>>, src: String, load: LoadFuture) {
    let result = load.await;

    let Some(shared) = state.upgrade() else {
        tracing::debug!(%src, "gallery dropped before load finished");
        return;
    };
    let mut state = shared.borrow_mut();
    if state.container.is_none() {
        tracing::debug!(%src, "gallery destroyed before load finished");
        return;
    }
    match result {
        Ok(dimensions) => state.record_dimensions(src, dimensions),
        Err(error) => state.record_failure(src, error),
    }
}

/// Handle to a live gallery.
pub struct Gallery {
    state: Rc<RefCell<State>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Gallery {
    /// Prepare `container` and start resolving every image.
    ///
    /// Returns as soon as the rows exist and the loads are spawned; images
    /// appear once every distinct source has resolved. Must be called within
    /// a [`tokio::task::LocalSet`].
    pub fn new<L>(
        images: Vec<ImageDescriptor>,
        container: Element,
        options: GalleryOptions,
        loader: &L,
    ) -> Result<Self, GalleryError>
    where
        L: ImageLoader + ?Sized,
    {
        let per_row = options.config.per_row()?;
        if let Some(index) = images.iter().position(|i| i.src.trim().is_empty()) {
            return Err(GalleryError::EmptySource { index });
        }

        let gap = options.config.gap_css();
        container.set_style("display", "flex");
        container.set_style("flex-direction", "column");
        container.set_style("gap", gap.as_str());

        let rows: Vec<Element> = (0..row_count(images.len(), per_row))
            .map(|_| {
                let row = Element::new("div");
                row.set_style("flex-flow", "row wrap");
                row.set_style("display", "flex");
                row.set_style("align-items", "center");
                row.set_style("gap", gap.as_str());
                container.append_child(&row);
                row
            })
            .collect();

        let sources: IndexSet<String> = images.iter().map(|i| i.src.clone()).collect();
        tracing::debug!(
            images = images.len(),
            distinct = sources.len(),
            rows = rows.len(),
            "gallery constructed"
        );

        let state = Rc::new(RefCell::new(State {
            images,
            config: options.config,
            per_row,
            on_click: options.on_click,
            events: options.events,
            container: Some(container),
            rows,
            table: DimensionTable::new(),
            barrier: CompletionBarrier::new(sources.len()),
            failures: Vec::new(),
            plan: None,
            image_elements: Vec::new(),
            materialized: false,
        }));

        // Nothing to wait for: an empty gallery is laid out immediately.
        {
            let mut s = state.borrow_mut();
            let resolved = s.table.len();
            if s.barrier.observe(resolved) {
                s.materialize();
            }
        }

        let tasks = sources
            .into_iter()
            .map(|src| {
                let load = loader.load(&src);
                tokio::task::spawn_local(resolve_one(Rc::downgrade(&state), src, load))
            })
            .collect();

        Ok(Self { state, tasks })
    }

    /// Build a gallery from the `img` elements already inside `container`.
    ///
    /// The config is checked first, so an invalid one leaves the markup in
    /// place. Otherwise the images are read in document order, the container
    /// is emptied, and construction continues as in [`Gallery::new`].
    pub fn init_from_container<L>(
        container: Element,
        options: GalleryOptions,
        loader: &L,
    ) -> Result<Self, GalleryError>
    where
        L: ImageLoader + ?Sized,
    {
        options.config.per_row()?;
        let images = descriptors_from_container(&container);
        container.clear_children();
        Self::new(images, container, options, loader)
    }

    /// Remove everything the gallery placed in its container.
    ///
    /// Safe to call any number of times. In-flight loads keep running but
    /// their results are discarded.
    pub fn destroy(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(container) = state.container.take() {
            container.clear_children();
            tracing::debug!("gallery destroyed");
        }
        state.rows.clear();
        state.image_elements.clear();
        state.plan = None;
        state.table = DimensionTable::new();
    }

    /// Wait until every spawned load has finished.
    ///
    /// Never returns if a loader never completes.
    pub async fn settled(&mut self) {
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!("image load task ended abnormally: {e}");
            }
        }
    }

    pub fn status(&self) -> GalleryStatus {
        let state = self.state.borrow();
        if state.container.is_none() {
            GalleryStatus::Destroyed
        } else if state.materialized {
            GalleryStatus::Materialized
        } else {
            GalleryStatus::Pending {
                resolved: state.table.len(),
                expected: state.barrier.expected(),
            }
        }
    }

    pub fn images(&self) -> Vec<ImageDescriptor> {
        self.state.borrow().images.clone()
    }

    pub fn config(&self) -> GalleryConfig {
        self.state.borrow().config.clone()
    }

    /// The container, or `None` after destroy.
    pub fn container(&self) -> Option<Element> {
        self.state.borrow().container.clone()
    }

    pub fn rows(&self) -> Vec<Element> {
        self.state.borrow().rows.clone()
    }

    /// Rendered `img` elements with their index in the full list.
    pub fn image_elements(&self) -> Vec<(usize, Element)> {
        self.state.borrow().image_elements.clone()
    }

    /// The rendered `img` for the image at `index`, once laid out.
    pub fn image_element(&self, index: usize) -> Option<Element> {
        self.state
            .borrow()
            .image_elements
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, el)| el.clone())
    }

    pub fn dimensions(&self, src: &str) -> Option<Dimensions> {
        self.state.borrow().table.get(src)
    }

    pub fn failures(&self) -> Vec<LoadFailure> {
        self.state.borrow().failures.clone()
    }

    pub fn omitted(&self) -> Vec<Omission> {
        self.state
            .borrow()
            .plan
            .as_ref()
            .map(|plan| plan.omitted.clone())
            .unwrap_or_default()
    }

    /// The computed layout, once the barrier has fired.
    pub fn layout_plan(&self) -> Option<LayoutPlan> {
        self.state.borrow().plan.clone()
    }
}
