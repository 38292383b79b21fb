//! Presentation and slide model structures.

use super::element::Element;
use super::paint::Fill;
use super::theme::Theme;
use serde::{Deserialize, Serialize};

/// Package metadata extracted from docProps/core.xml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Presentation title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Author/creator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Creation date (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    /// Last modification date (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,

    /// Number of slides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide_count: Option<u32>,
}

/// Render size in target pixel units, derived once from the package's
/// declared native slide size and the global scale factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderSize {
    pub width: f64,
    pub height: f64,
}

/// Slide background paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Background {
    /// An explicit background paint declared on the slide.
    Paint { fill: Fill },
    /// The slide defers to its master's background. Master/layout
    /// inheritance is not resolved at this layer; consumers decide what
    /// to show.
    Inherited,
}

impl Default for Background {
    fn default() -> Self {
        Background::Paint {
            fill: Fill::default_white(),
        }
    }
}

/// One reconstructed slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Stable ID derived from the package part name (e.g., "slide3").
    pub id: String,

    /// 1-based ordinal from the filename-embedded index.
    pub number: usize,

    /// Elements in final render order (ascending draw-order key, stable).
    #[serde(default)]
    pub elements: Vec<Element>,

    /// Background paint or inheritance flag.
    #[serde(default)]
    pub background: Background,

    /// Node kinds encountered but not reconstructed (tables, charts,
    /// connectors, ...). Recorded for diagnostics; never fatal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl Slide {
    /// Create an empty slide with the given identity.
    pub fn new(id: impl Into<String>, number: usize) -> Self {
        Self {
            id: id.into(),
            number,
            ..Default::default()
        }
    }

    /// Number of elements on this slide.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether this slide has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// A fully reconstructed presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    /// Ordered slides.
    #[serde(default)]
    pub slides: Vec<Slide>,

    /// The shared theme.
    #[serde(default)]
    pub theme: Theme,

    /// Render size shared by every slide.
    pub size: RenderSize,

    /// Package metadata.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Presentation {
    /// Create an empty presentation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total element count across all slides (top level only).
    pub fn total_elements(&self) -> usize {
        self.slides.iter().map(|s| s.len()).sum()
    }

    /// Convert to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to compact JSON.
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
