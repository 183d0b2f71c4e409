//! Reading image descriptors out of existing markup.
//!
//! Two sources are supported: an in-memory container ([`Element`]) and an
//! HTML string. Both walk `img` elements in document order and read `src`,
//! `srcset`, `sizes`, and `alt`. The list attributes are split on `,` with
//! each entry trimmed; empty entries are dropped. An `img` without a usable
//! `src` cannot take part in a gallery and is skipped with a warning.

use crate::dom::Element;
use crate::types::ImageDescriptor;
use scraper::{Html, Selector};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Split a comma-separated attribute value into trimmed, non-empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn descriptor_from_attrs<'a>(
    attr: impl Fn(&str) -> Option<&'a str>,
    position: usize,
) -> Option<ImageDescriptor> {
    let src = attr("src").map(str::trim).unwrap_or_default();
    if src.is_empty() {
        tracing::warn!("skipping img #{position} without a src");
        return None;
    }
    Some(ImageDescriptor {
        src: src.to_string(),
        srcset: attr("srcset").map(split_list).unwrap_or_default(),
        sizes: attr("sizes").map(split_list).unwrap_or_default(),
        alt: attr("alt").map(str::to_string),
    })
}

/// Descriptors for every `img` below `container`, in document order.
pub fn descriptors_from_container(container: &Element) -> Vec<ImageDescriptor> {
    container
        .descendants_by_tag("img")
        .iter()
        .enumerate()
        .filter_map(|(position, img)| {
            let attrs = img.attributes();
            descriptor_from_attrs(
                |name| {
                    attrs
                        .iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(name))
                        .map(|(_, v)| v.as_str())
                },
                position,
            )
        })
        .collect()
}

/// Descriptors for every `img` in an HTML document or fragment.
pub fn descriptors_from_html(html: &str) -> Result<Vec<ImageDescriptor>, ExtractError> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("img").map_err(|e| ExtractError::Selector(format!("{e:?}")))?;
    Ok(document
        .select(&selector)
        .enumerate()
        .filter_map(|(position, img)| {
            let element = img.value();
            descriptor_from_attrs(|name| element.attr(name), position)
        })
        .collect())
}
