//! Extraction of the scene graph from package parts.
//!
//! Each submodule covers one resolver: theme, paint (color/fill/outline),
//! text, image, the shape-tree builder, and the slide/presentation
//! assembler. All of them walk part XML with `quick-xml` event readers and
//! absorb recoverable conditions with documented fallbacks.

mod image;
mod paint;
mod presentation;
mod shapes;
mod slide;
mod text;
mod theme;

pub use presentation::PresentationParser;

use quick_xml::events::BytesStart;

/// Read an attribute by local name, ignoring any namespace prefix.
pub(crate) fn local_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}

/// Read an integer attribute by local name.
pub(crate) fn local_attr_i64(e: &BytesStart, name: &[u8]) -> Option<i64> {
    local_attr(e, name).and_then(|v| v.parse().ok())
}

/// Read a thousandths-of-a-percent attribute (val="50000" is 0.5).
pub(crate) fn local_attr_fraction(e: &BytesStart, name: &[u8]) -> Option<f32> {
    local_attr(e, name)
        .and_then(|v| v.parse::<f32>().ok())
        .map(|v| v / 100_000.0)
}

/// Interpret an OOXML boolean attribute value ("1"/"true" are set).
pub(crate) fn is_true(value: &str) -> bool {
    value == "1" || value == "true"
}
