//! Proportional layout: pure functions from resolved dimensions to row cells.
//!
//! Each image becomes a [`LayoutCell`] with two numbers:
//!
//! - **flex weight** `width / height`: every cell in a row has a zero flex
//!   basis, so wider images claim proportionally more of the row.
//! - **height percent** `height / width × 100`: applied as bottom padding on a
//!   zero-height wrapper, which reserves the image's box before it paints (the
//!   padding-percentage trick; percentages resolve against the cell width).
//!
//! The two are reciprocal: with the weight read as a percentage too,
//! `(flex weight × 100) × height percent == 10000` for any well-formed image
//! (the raw product `flex weight × height percent` is `100`). An image with a
//! zero width or height has no aspect ratio and is rejected with
//! [`LayoutError::DegenerateAspectRatio`]; [`plan_layout`] omits such images
//! rather than letting non-finite values reach the markup.

use crate::partition::partition;
use crate::resolve::DimensionTable;
use crate::types::{Dimensions, ImageDescriptor};
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("degenerate aspect ratio: {width}x{height}")]
    DegenerateAspectRatio { width: u32, height: u32 },
    #[error("no dimensions resolved for {0}")]
    Unresolved(String),
}

/// Sizing of a single image within its row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCell {
    pub flex_weight: f64,
    pub height_percent: f64,
}

impl LayoutCell {
    pub fn from_dimensions(dims: Dimensions) -> Result<Self, LayoutError> {
        if dims.width == 0 || dims.height == 0 {
            return Err(LayoutError::DegenerateAspectRatio {
                width: dims.width,
                height: dims.height,
            });
        }
        let (w, h) = (dims.width as f64, dims.height as f64);
        Ok(Self {
            flex_weight: w / h,
            height_percent: h / w * 100.0,
        })
    }

    /// Value for the CSS `flex` shorthand: grow by the aspect ratio from a zero basis.
    pub fn flex_css(&self) -> String {
        format!("{} 0%", self.flex_weight)
    }

    /// Value for `padding-bottom`.
    pub fn padding_css(&self) -> String {
        format!("{}%", self.height_percent)
    }
}

/// An image placed in a row, with its index in the full list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedCell {
    pub index: usize,
    pub cell: LayoutCell,
}

/// An image left out of the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Omission {
    pub index: usize,
    pub src: String,
    pub reason: LayoutError,
}

/// Row assignment and sizing for a whole gallery.
///
/// Rows are indexed the same way as the row containers created at
/// construction; a row whose images were all omitted is kept, empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    pub rows: Vec<Vec<PlannedCell>>,
    pub omitted: Vec<Omission>,
}

impl LayoutPlan {
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// Compute the layout for `images` from the completed dimension table.
pub fn plan_layout(
    images: &[ImageDescriptor],
    table: &DimensionTable,
    per_row: NonZeroUsize,
) -> LayoutPlan {
    let mut plan = LayoutPlan::default();

    for (row_idx, row) in partition(images, per_row).into_iter().enumerate() {
        let mut cells = Vec::with_capacity(row.len());
        for (offset, image) in row.iter().enumerate() {
            let index = row_idx * per_row.get() + offset;
            let cell = table
                .get(&image.src)
                .ok_or_else(|| LayoutError::Unresolved(image.src.clone()))
                .and_then(LayoutCell::from_dimensions);
            match cell {
                Ok(cell) => cells.push(PlannedCell { index, cell }),
                Err(reason) => plan.omitted.push(Omission {
                    index,
                    src: image.src.clone(),
                    reason,
                }),
            }
        }
        plan.rows.push(cells);
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn landscape_16_9() {
        let cell = LayoutCell::from_dimensions(Dimensions::new(1600, 900)).unwrap();
        assert!((cell.flex_weight - 1.778).abs() < 1e-3);
        assert_eq!(cell.height_percent, 56.25);
        assert_eq!(cell.padding_css(), "56.25%");
    }

    #[test]
    fn square_image() {
        let cell = LayoutCell::from_dimensions(Dimensions::new(500, 500)).unwrap();
        assert_eq!(cell.flex_weight, 1.0);
        assert_eq!(cell.height_percent, 100.0);
        assert_eq!(cell.flex_css(), "1 0%");
    }

    #[test]
    fn portrait_image() {
        let cell = LayoutCell::from_dimensions(Dimensions::new(800, 1000)).unwrap();
        assert_eq!(cell.flex_weight, 0.8);
        assert_eq!(cell.height_percent, 125.0);
    }

    #[test]
    fn weight_and_height_percent_are_reciprocal() {
        let sizes = [
            (1, 1),
            (1600, 900),
            (900, 1600),
            (3, 7),
            (4000, 3),
            (1, 10000),
            (6000, 4000),
            (4096, 2731),
        ];
        for (w, h) in sizes {
            let cell = LayoutCell::from_dimensions(Dimensions::new(w, h)).unwrap();
            let product = cell.flex_weight * 100.0 * cell.height_percent;
            assert!(
                (product - 10000.0).abs() < 1e-6,
                "{w}x{h} gave {product}"
            );
            assert!((cell.flex_weight * cell.height_percent - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_height_is_rejected() {
        let err = LayoutCell::from_dimensions(Dimensions::new(800, 0)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::DegenerateAspectRatio {
                width: 800,
                height: 0
            }
        );
    }

    #[test]
    fn zero_width_is_rejected() {
        assert!(LayoutCell::from_dimensions(Dimensions::new(0, 600)).is_err());
        assert!(LayoutCell::from_dimensions(Dimensions::new(0, 0)).is_err());
    }

    fn table_of(entries: &[(&str, u32, u32)]) -> DimensionTable {
        let mut table = DimensionTable::new();
        for (src, w, h) in entries {
            table.insert(src.to_string(), Dimensions::new(*w, *h));
        }
        table
    }

    #[test]
    fn plan_assigns_rows_and_indices() {
        let images: Vec<ImageDescriptor> = ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(ImageDescriptor::new)
            .collect();
        let table = table_of(&[
            ("a", 100, 100),
            ("b", 200, 100),
            ("c", 100, 200),
            ("d", 300, 200),
            ("e", 160, 90),
        ]);

        let plan = plan_layout(&images, &table, k(2));
        assert_eq!(plan.rows.len(), 3);
        assert_eq!(plan.cell_count(), 5);
        assert!(plan.omitted.is_empty());
        let indices: Vec<Vec<usize>> = plan
            .rows
            .iter()
            .map(|r| r.iter().map(|c| c.index).collect())
            .collect();
        assert_eq!(indices, vec![vec![0, 1], vec![2, 3], vec![4]]);
        assert_eq!(plan.rows[0][1].cell.flex_weight, 2.0);
    }

    #[test]
    fn plan_omits_degenerate_images_but_keeps_row() {
        let images: Vec<ImageDescriptor> =
            ["a", "flat", "c"].into_iter().map(ImageDescriptor::new).collect();
        let table = table_of(&[("a", 100, 100), ("flat", 100, 0), ("c", 100, 50)]);

        let plan = plan_layout(&images, &table, k(4));
        assert_eq!(plan.rows.len(), 1);
        assert_eq!(plan.rows[0].len(), 2);
        assert_eq!(plan.omitted.len(), 1);
        assert_eq!(plan.omitted[0].index, 1);
        assert_eq!(plan.omitted[0].src, "flat");
        assert!(matches!(
            plan.omitted[0].reason,
            LayoutError::DegenerateAspectRatio { .. }
        ));
        for cell in plan.rows.iter().flatten() {
            assert!(cell.cell.flex_weight.is_finite());
            assert!(cell.cell.height_percent.is_finite());
        }
    }

    #[test]
    fn plan_shares_dimensions_between_duplicate_sources() {
        let images: Vec<ImageDescriptor> =
            ["a", "a"].into_iter().map(ImageDescriptor::new).collect();
        let table = table_of(&[("a", 400, 300)]);
        let plan = plan_layout(&images, &table, k(4));
        assert_eq!(plan.rows[0].len(), 2);
        assert_eq!(plan.rows[0][0].cell, plan.rows[0][1].cell);
    }

    #[test]
    fn plan_reports_unresolved_sources() {
        let images = vec![ImageDescriptor::new("missing")];
        let plan = plan_layout(&images, &DimensionTable::new(), k(4));
        assert_eq!(plan.cell_count(), 0);
        assert_eq!(
            plan.omitted[0].reason,
            LayoutError::Unresolved("missing".into())
        );
    }

    #[test]
    fn plan_of_nothing_is_empty() {
        let plan = plan_layout(&[], &DimensionTable::new(), k(4));
        assert!(plan.rows.is_empty());
        assert!(plan.omitted.is_empty());
    }
}
