//! Document capability used by the binder, and an in-memory implementation.
//!
//! The binder never walks a concrete DOM. It asks the host for the elements
//! carrying a marker attribute and writes text/attributes back through the
//! handles it got, so any tree (browser DOM, template engine, test fake) can
//! be translated.

use std::collections::{BTreeMap, BTreeSet};

/// Host document operations needed by the translation pass.
pub trait Document {
    /// Opaque element handle.
    type Element: Clone;

    /// All elements carrying `marker`, in document order.
    fn query_all_by_marker(&self, marker: &str) -> Vec<Self::Element>;

    /// Attribute value of an element.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_text(&mut self, element: &Self::Element, text: &str);

    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    /// Document-level title.
    fn set_title(&mut self, title: &str);

    /// Attribute on the document root element (`dir`, `lang`).
    fn set_root_attribute(&mut self, name: &str, value: &str);

    /// Add or remove a presentation flag (class) on the document body.
    fn set_root_flag(&mut self, flag: &str, enabled: bool);
}

/// Handle into a [`MemoryDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryElement {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
}

/// Flat in-memory document: a list of elements plus root state.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: Vec<MemoryElement>,
    title: String,
    root_attributes: BTreeMap<String, String>,
    root_flags: BTreeSet<String>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element with the given attributes and initial text.
    pub fn push(&mut self, tag: &str, attributes: &[(&str, &str)], text: &str) -> ElementId {
        self.elements.push(MemoryElement {
            tag: tag.to_string(),
            attributes: attributes
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            text: text.to_string(),
        });
        ElementId(self.elements.len() - 1)
    }

    pub fn element(&self, id: ElementId) -> Option<&MemoryElement> {
        self.elements.get(id.0)
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.element(id).map(|el| el.text.as_str())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes.get(name).map(String::as_str)
    }

    pub fn has_root_flag(&self, flag: &str) -> bool {
        self.root_flags.contains(flag)
    }
}

impl Document for MemoryDocument {
    type Element = ElementId;

    fn query_all_by_marker(&self, marker: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.attributes.contains_key(marker))
            .map(|(i, _)| ElementId(i))
            .collect()
    }

    fn attribute(&self, element: &ElementId, name: &str) -> Option<String> {
        self.element(*element)?.attributes.get(name).cloned()
    }

    fn set_text(&mut self, element: &ElementId, text: &str) {
        if let Some(el) = self.elements.get_mut(element.0) {
            el.text = text.to_string();
        }
    }

    fn set_attribute(&mut self, element: &ElementId, name: &str, value: &str) {
        if let Some(el) = self.elements.get_mut(element.0) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.root_attributes.insert(name.to_string(), value.to_string());
    }

    fn set_root_flag(&mut self, flag: &str, enabled: bool) {
        if enabled {
            self.root_flags.insert(flag.to_string());
        } else {
            self.root_flags.remove(flag);
        }
    }
}
