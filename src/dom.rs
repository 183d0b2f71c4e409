//! In-memory element tree: the container the gallery renders into.
//!
//! The gallery never touches ambient page state. The caller hands it an
//! [`Element`] and the gallery owns that element's subtree until
//! [`Gallery::destroy`](crate::gallery::Gallery::destroy). An element carries
//! a tag, attributes, inline style properties, children, and an optional
//! click listener. [`render`](crate::render) turns a tree into HTML.
//!
//! `Element` is a cheap handle (`Rc`): clones refer to the same node. Parents
//! own their children; nothing points back up, so dropping the container
//! drops the whole tree. Listeners that need their own element hold a
//! [`WeakElement`].

use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

pub type Listener = Rc<dyn Fn()>;

struct Node {
    tag: String,
    attributes: IndexMap<String, String>,
    style: IndexMap<String, String>,
    children: Vec<Element>,
    on_click: Option<Listener>,
}

/// Shared handle to a node in the tree.
#[derive(Clone)]
pub struct Element(Rc<RefCell<Node>>);

/// Non-owning handle, see [`Element::downgrade`].
#[derive(Clone)]
pub struct WeakElement(Weak<RefCell<Node>>);

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.0.upgrade().map(Element)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(Node {
            tag: tag.into().to_ascii_lowercase(),
            attributes: IndexMap::new(),
            style: IndexMap::new(),
            children: Vec::new(),
            on_click: None,
        })))
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn is(&self, tag: &str) -> bool {
        self.0.borrow().tag.eq_ignore_ascii_case(tag)
    }

    // ----- attributes -------------------------------------------------------

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn remove_attribute(&self, name: &str) -> Option<String> {
        self.0.borrow_mut().attributes.shift_remove(name)
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0
            .borrow()
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // ----- inline style -----------------------------------------------------

    /// Set one inline style property, replacing any previous value in place.
    pub fn set_style(&self, property: impl Into<String>, value: impl Into<String>) {
        self.0
            .borrow_mut()
            .style
            .insert(property.into(), value.into());
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().style.get(property).cloned()
    }

    /// Inline style serialized as a `style` attribute value, `None` when unset.
    pub fn style_attribute(&self) -> Option<String> {
        let node = self.0.borrow();
        if node.style.is_empty() {
            return None;
        }
        let decls: Vec<String> = node
            .style
            .iter()
            .map(|(prop, value)| format!("{prop}: {value}"))
            .collect();
        Some(decls.join("; "))
    }

    // ----- children ---------------------------------------------------------

    pub fn append_child(&self, child: &Element) {
        self.0.borrow_mut().children.push(child.clone());
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Remove every child.
    pub fn clear_children(&self) {
        self.0.borrow_mut().children.clear();
    }

    /// Descendants with the given tag, in document order. Excludes `self`.
    pub fn descendants_by_tag(&self, tag: &str) -> Vec<Element> {
        let mut found = Vec::new();
        for child in self.children() {
            if child.is(tag) {
                found.push(child.clone());
            }
            found.extend(child.descendants_by_tag(tag));
        }
        found
    }

    // ----- events -----------------------------------------------------------

    pub fn set_on_click(&self, listener: Listener) {
        self.0.borrow_mut().on_click = Some(listener);
    }

    pub fn has_click_listener(&self) -> bool {
        self.0.borrow().on_click.is_some()
    }

    /// Activate the element. Returns whether a listener ran.
    pub fn click(&self) -> bool {
        let listener = self.0.borrow().on_click.clone();
        match listener {
            Some(listener) => {
                listener();
                true
            }
            None => false,
        }
    }

    // ----- identity ---------------------------------------------------------

    pub fn downgrade(&self) -> WeakElement {
        WeakElement(Rc::downgrade(&self.0))
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("Element")
            .field("tag", &node.tag)
            .field("attributes", &node.attributes)
            .field("style", &node.style)
            .field("children", &node.children)
            .field("on_click", &node.on_click.is_some())
            .finish()
    }
}
