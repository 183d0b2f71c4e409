//! CLI output formatting.
//!
//! Every `format_*` function is pure and returns lines, so tests can check
//! the text without capturing stdout. The CLI writes them to stderr, keeping
//! stdout free for the rendered page. Entities are shown by position first and source second, the same
//! way in every listing:
//!
//! ```text
//! Row 001 (2 images)
//!     001 dawn.jpg  1600x900  flex 1.778  padding 56.25%
//!     002 dusk.jpg  1000x1600  flex 0.625  padding 160.00%
//! Omitted
//!     003 flat.png  degenerate aspect ratio: 400x0
//!
//! Laid out 2 images in 1 row
//! ```

use crate::gallery::{Gallery, GalleryEvent, GalleryStatus};
use crate::types::ImageDescriptor;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// One line per progress event.
pub fn format_event(event: &GalleryEvent) -> Vec<String> {
    match event {
        GalleryEvent::Resolved { src, dimensions } => vec![format!(
            "{}{}x{}  {}",
            indent(1),
            dimensions.width,
            dimensions.height,
            src
        )],
        GalleryEvent::LoadFailed { src, error } => {
            vec![format!("{}FAILED {}: {}", indent(1), src, error)]
        }
        GalleryEvent::Omitted(omission) => vec![format!(
            "{}OMITTED {} {}: {}",
            indent(1),
            format_index(omission.index + 1),
            omission.src,
            omission.reason
        )],
        GalleryEvent::Materialized { rows, images } => vec![format!(
            "Laid out {} in {}",
            plural(*images, "image", "images"),
            plural(*rows, "row", "rows")
        )],
    }
}

/// One line describing where a gallery stands.
pub fn format_status(status: &GalleryStatus) -> String {
    match status {
        GalleryStatus::Pending { resolved, expected } => {
            format!("Pending: {resolved}/{expected} images resolved")
        }
        GalleryStatus::Materialized => "Laid out".to_string(),
        GalleryStatus::Destroyed => "Destroyed".to_string(),
    }
}

fn image_label(index: usize, image: &ImageDescriptor) -> String {
    match image.alt.as_deref() {
        Some(alt) if !alt.is_empty() => format!("{} {} ({})", format_index(index + 1), alt, image.src),
        _ => format!("{} {}", format_index(index + 1), image.src),
    }
}

/// Row-by-row listing of a laid-out gallery.
///
/// A gallery that has not been laid out yet reports its status instead.
pub fn format_layout(gallery: &Gallery) -> Vec<String> {
    let Some(plan) = gallery.layout_plan() else {
        return vec![format_status(&gallery.status())];
    };
    let images = gallery.images();
    let mut lines = Vec::new();

    for (row_idx, cells) in plan.rows.iter().enumerate() {
        lines.push(format!(
            "Row {} ({})",
            format_index(row_idx + 1),
            plural(cells.len(), "image", "images")
        ));
        for planned in cells {
            let image = &images[planned.index];
            let size = gallery
                .dimensions(&image.src)
                .map(|d| format!("{}x{}", d.width, d.height))
                .unwrap_or_else(|| "?".to_string());
            lines.push(format!(
                "{}{}  {}  flex {:.3}  padding {:.2}%",
                indent(1),
                image_label(planned.index, image),
                size,
                planned.cell.flex_weight,
                planned.cell.height_percent
            ));
        }
    }

    if !plan.omitted.is_empty() {
        lines.push("Omitted".to_string());
        for omission in &plan.omitted {
            lines.push(format!(
                "{}{}  {}",
                indent(1),
                image_label(omission.index, &images[omission.index]),
                omission.reason
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Laid out {} in {}",
        plural(plan.cell_count(), "image", "images"),
        plural(plan.rows.len(), "row", "rows")
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GalleryConfig, GalleryOptions};
    use crate::dom::Element;
    use crate::layout::{LayoutError, Omission};
    use crate::resolve::loader::tests::StaticLoader;
    use crate::test_helpers::{ManualLoader, descriptors};
    use crate::types::Dimensions;
    use tokio::task::LocalSet;

    #[test]
    fn index_is_zero_padded() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn resolved_event_line() {
        let lines = format_event(&GalleryEvent::Resolved {
            src: "a.jpg".into(),
            dimensions: Dimensions::new(1600, 900),
        });
        assert_eq!(lines, vec!["    1600x900  a.jpg"]);
    }

    #[test]
    fn failed_event_line() {
        let lines = format_event(&GalleryEvent::LoadFailed {
            src: "b.jpg".into(),
            error: "Image not found: b.jpg".into(),
        });
        assert_eq!(lines, vec!["    FAILED b.jpg: Image not found: b.jpg"]);
    }

    #[test]
    fn omitted_event_line_is_one_based() {
        let lines = format_event(&GalleryEvent::Omitted(Omission {
            index: 2,
            src: "flat.png".into(),
            reason: LayoutError::DegenerateAspectRatio {
                width: 400,
                height: 0,
            },
        }));
        assert_eq!(
            lines,
            vec!["    OMITTED 003 flat.png: degenerate aspect ratio: 400x0"]
        );
    }

    #[test]
    fn materialized_event_pluralizes() {
        assert_eq!(
            format_event(&GalleryEvent::Materialized { rows: 1, images: 1 }),
            vec!["Laid out 1 image in 1 row"]
        );
        assert_eq!(
            format_event(&GalleryEvent::Materialized { rows: 2, images: 5 }),
            vec!["Laid out 5 images in 2 rows"]
        );
    }

    #[test]
    fn status_lines() {
        assert_eq!(
            format_status(&GalleryStatus::Pending {
                resolved: 2,
                expected: 3
            }),
            "Pending: 2/3 images resolved"
        );
        assert_eq!(format_status(&GalleryStatus::Materialized), "Laid out");
    }

    #[tokio::test]
    async fn layout_listing() {
        LocalSet::new()
            .run_until(async {
                let loader = StaticLoader::with(&[
                    ("dawn.jpg", 1600, 900),
                    ("dusk.jpg", 1000, 1600),
                    ("flat.png", 400, 0),
                ]);
                let mut images = descriptors(&["dawn.jpg", "dusk.jpg", "flat.png"]);
                images[0].alt = Some("Dawn".into());
                let mut gallery = Gallery::new(
                    images,
                    Element::new("div"),
                    GalleryOptions::new(GalleryConfig {
                        per_row_count: 2,
                        ..GalleryConfig::default()
                    }),
                    &loader,
                )
                .unwrap();
                gallery.settled().await;

                let lines = format_layout(&gallery);
                assert_eq!(
                    lines,
                    vec![
                        "Row 001 (2 images)",
                        "    001 Dawn (dawn.jpg)  1600x900  flex 1.778  padding 56.25%",
                        "    002 dusk.jpg  1000x1600  flex 0.625  padding 160.00%",
                        "Row 002 (0 images)",
                        "Omitted",
                        "    003 flat.png  degenerate aspect ratio: 400x0",
                        "",
                        "Laid out 2 images in 2 rows",
                    ]
                );
            })
            .await;
    }

    #[tokio::test]
    async fn layout_listing_before_materialization() {
        LocalSet::new()
            .run_until(async {
                let loader = ManualLoader::new();
                let gallery = Gallery::new(
                    descriptors(&["a", "b"]),
                    Element::new("div"),
                    GalleryOptions::default(),
                    &loader,
                )
                .unwrap();
                assert_eq!(
                    format_layout(&gallery),
                    vec!["Pending: 0/2 images resolved"]
                );
            })
            .await;
    }
}
