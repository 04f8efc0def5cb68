//! Declarative translation pass over a [`Document`].
//!
//! Elements opt in with marker attributes whose value is a dotted key:
//!
//! | Marker | Target |
//! |--------|--------|
//! | `data-i18n` | text content |
//! | `data-i18n-placeholder` | `placeholder` attribute |
//! | `data-i18n-title` | `title` attribute |
//! | `data-i18n-document-title` | document title |

use crate::i18n::{Document, LocaleDescriptor, Translator};
use tracing::{debug, warn};

pub const TEXT_MARKER: &str = "data-i18n";
pub const PLACEHOLDER_MARKER: &str = "data-i18n-placeholder";
pub const TITLE_MARKER: &str = "data-i18n-title";
pub const DOCUMENT_TITLE_MARKER: &str = "data-i18n-document-title";

/// Presentation flag set on the document body for right-to-left locales.
pub const RTL_FLAG: &str = "rtl";

/// What a marker writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Text,
    Placeholder,
    Title,
    DocumentTitle,
}

impl MarkerKind {
    /// Pass order.
    pub const ALL: [MarkerKind; 4] = [
        MarkerKind::Text,
        MarkerKind::Placeholder,
        MarkerKind::Title,
        MarkerKind::DocumentTitle,
    ];

    pub fn attribute(&self) -> &'static str {
        match self {
            MarkerKind::Text => TEXT_MARKER,
            MarkerKind::Placeholder => PLACEHOLDER_MARKER,
            MarkerKind::Title => TITLE_MARKER,
            MarkerKind::DocumentTitle => DOCUMENT_TITLE_MARKER,
        }
    }
}

/// A marker found on an element during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationMarker {
    pub kind: MarkerKind,
    pub key: String,
}

/// Applies translator output to marked document elements.
pub struct DocumentBinder<'a> {
    translator: &'a Translator,
}

impl<'a> DocumentBinder<'a> {
    pub fn new(translator: &'a Translator) -> Self {
        Self { translator }
    }

    /// Collect every non-empty marker, grouped by kind in pass order.
    pub fn scan<D: Document>(doc: &D) -> Vec<(D::Element, TranslationMarker)> {
        let mut markers = Vec::new();

        for kind in MarkerKind::ALL {
            for element in doc.query_all_by_marker(kind.attribute()) {
                match doc.attribute(&element, kind.attribute()) {
                    Some(key) if !key.is_empty() => {
                        markers.push((element, TranslationMarker { kind, key }));
                    }
                    _ => {}
                }
            }
        }

        markers
    }

    /// Translate every marked element in one synchronous pass.
    ///
    /// The document title is only set when exactly one element carries the
    /// document-title marker.
    pub fn translate_page<D: Document>(&self, doc: &mut D) {
        let markers = Self::scan(&*doc);
        // Carriers count even when their key is empty
        let title_markers = doc.query_all_by_marker(DOCUMENT_TITLE_MARKER).len();

        if title_markers > 1 {
            warn!(
                "Found {} document title markers, leaving title unchanged",
                title_markers
            );
        }

        for (element, marker) in &markers {
            let value = self.translator.t(&marker.key);
            match marker.kind {
                MarkerKind::Text => doc.set_text(element, &value),
                MarkerKind::Placeholder => doc.set_attribute(element, "placeholder", &value),
                MarkerKind::Title => doc.set_attribute(element, "title", &value),
                MarkerKind::DocumentTitle if title_markers == 1 => doc.set_title(&value),
                MarkerKind::DocumentTitle => {}
            }
        }

        debug!(
            "Translated {} markers for {}",
            markers.len(),
            self.translator.locale()
        );
    }

    /// Set `dir`/`lang` on the document root and toggle the RTL flag.
    pub fn apply_direction<D: Document>(doc: &mut D, locale: &LocaleDescriptor) {
        doc.set_root_attribute("dir", locale.direction.as_str());
        doc.set_root_attribute("lang", &locale.code);
        doc.set_root_flag(RTL_FLAG, locale.direction.is_rtl());
    }
}
