//! Shared types used across the resolve, layout, and gallery stages.
//!
//! [`ImageDescriptor`] is also the on-disk manifest format read by the CLI
//! (`row-gal render --manifest images.json`), so it is serde-serializable.

use serde::{Deserialize, Serialize};

/// An image declared by URL only. Its dimensions are discovered later.
///
/// `src` is the identity of the image: two descriptors with the same `src`
/// share one entry in the [`DimensionTable`](crate::resolve::DimensionTable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub src: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub srcset: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ImageDescriptor {
    /// Descriptor with only a `src`.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            srcset: Vec::new(),
            sizes: Vec::new(),
            alt: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_srcset<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.srcset = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sizes<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sizes = entries.into_iter().map(Into::into).collect();
        self
    }
}

/// Natural (intrinsic) size of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_manifest_omits_empty_fields() {
        let json = serde_json::to_string(&ImageDescriptor::new("a.jpg")).unwrap();
        assert_eq!(json, r#"{"src":"a.jpg"}"#);
    }

    #[test]
    fn descriptor_manifest_defaults_missing_fields() {
        let image: ImageDescriptor =
            serde_json::from_str(r#"{"src":"a.jpg","alt":"Dawn"}"#).unwrap();
        assert_eq!(image.src, "a.jpg");
        assert!(image.srcset.is_empty());
        assert!(image.sizes.is_empty());
        assert_eq!(image.alt.as_deref(), Some("Dawn"));
    }

    #[test]
    fn builder_sets_lists() {
        let image = ImageDescriptor::new("a.jpg")
            .with_srcset(["a-800.jpg 800w", "a-1600.jpg 1600w"])
            .with_sizes(["100vw"]);
        assert_eq!(image.srcset.len(), 2);
        assert_eq!(image.sizes, vec!["100vw".to_string()]);
    }
}
