//! HTML rendering of an element tree.
//!
//! Uses [maud](https://maud.lambda.xyz/) for the page shell and implements
//! [`maud::Render`] for [`Element`], so a gallery container drops straight
//! into a template as `(container)`. All attribute values are escaped.

use crate::dom::Element;
use maud::{DOCTYPE, Escaper, Markup, Render, html};
use std::fmt::Write;

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const PAGE_CSS: &str = "body { margin: 0; padding: 16px; font-family: sans-serif; }
.gallery img { display: block; object-fit: cover; }";

fn write_escaped(buffer: &mut String, value: &str) {
    // Writing into a String cannot fail.
    let _ = Escaper::new(buffer).write_str(value);
}

impl Render for Element {
    fn render_to(&self, buffer: &mut String) {
        let tag = self.tag();
        buffer.push('<');
        buffer.push_str(&tag);
        for (name, value) in self.attributes() {
            buffer.push(' ');
            buffer.push_str(&name);
            buffer.push_str("=\"");
            write_escaped(buffer, &value);
            buffer.push('"');
        }
        if let Some(style) = self.style_attribute() {
            buffer.push_str(" style=\"");
            write_escaped(buffer, &style);
            buffer.push('"');
        }
        buffer.push('>');

        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        for child in self.children() {
            child.render_to(buffer);
        }
        buffer.push_str("</");
        buffer.push_str(&tag);
        buffer.push('>');
    }
}

/// Render a standalone HTML document around a gallery container.
pub fn render_page(title: &str, container: &Element) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PAGE_CSS) }
            }
            body {
                (container)
            }
        }
    }
}
