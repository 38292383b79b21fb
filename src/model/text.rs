//! Rich text model: bodies, paragraphs, runs.

use serde::{Deserialize, Serialize};

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
    Distributed,
}

impl Alignment {
    /// Map an `algn` attribute value. Unknown keywords fall back to left.
    pub fn from_keyword(value: &str) -> Self {
        match value {
            "ctr" => Alignment::Center,
            "r" => Alignment::Right,
            "just" => Alignment::Justify,
            "dist" => Alignment::Distributed,
            _ => Alignment::Left,
        }
    }
}

/// Vertical anchoring of a text body within its shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    #[default]
    Top,
    Middle,
    Bottom,
    Justify,
    Distributed,
}

impl VerticalAnchor {
    /// Map an `anchor` attribute value.
    pub fn from_keyword(value: &str) -> Self {
        match value {
            "ctr" => VerticalAnchor::Middle,
            "b" => VerticalAnchor::Bottom,
            "just" => VerticalAnchor::Justify,
            "dist" => VerticalAnchor::Distributed,
            _ => VerticalAnchor::Top,
        }
    }
}

/// Autofit behavior of a text body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Autofit {
    #[default]
    None,
    /// Shrink text to fit the shape.
    Normal,
    /// Grow the shape to fit the text.
    Shape,
}

/// Inset margins of a text body, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Default for Insets {
    /// The producer's default body insets (0.1 in left/right, 0.05 in
    /// top/bottom).
    fn default() -> Self {
        Self {
            left: 7.2,
            top: 3.6,
            right: 7.2,
            bottom: 3.6,
        }
    }
}

/// Run baseline position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Baseline {
    #[default]
    Normal,
    Superscript,
    Subscript,
}

/// Run capitalization transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Caps {
    #[default]
    None,
    Small,
    All,
}

/// Bullet or numbering descriptor for a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Bullet {
    /// Literal-character bullet.
    Char {
        char: String,
        /// Bullet size as a percentage of the run size.
        #[serde(skip_serializing_if = "Option::is_none")]
        size_pct: Option<f32>,
    },
    /// Auto-numbered bullet.
    AutoNumber {
        /// Numbering scheme keyword (e.g., "arabicPeriod").
        scheme: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        start_at: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        size_pct: Option<f32>,
    },
}

/// A run of text with independently defaulted character formatting.
///
/// Run properties never inherit from paragraph or body defaults: anything
/// the run's own fragment leaves unspecified takes the documented default
/// (16pt, black, normal weight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    /// Text content.
    pub text: String,
    /// Font family, when the run names one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Font size in points.
    pub size: f32,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub strikethrough: bool,
    /// Text color as RGB hex.
    pub color: String,
    /// Highlight color as RGB hex, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    /// Baseline position.
    #[serde(default)]
    pub baseline: Baseline,
    /// Letter spacing in points, when the run declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,
    /// Capitalization transform.
    #[serde(default)]
    pub caps: Caps,
}

impl Default for Run {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: None,
            size: 16.0,
            bold: false,
            italic: false,
            underline: false,
            strikethrough: false,
            color: "000000".to_string(),
            highlight: None,
            baseline: Baseline::Normal,
            letter_spacing: None,
            caps: Caps::None,
        }
    }
}

impl Run {
    /// Create a run with the given text and default formatting.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// A block of runs sharing paragraph-level formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Ordered runs.
    pub runs: Vec<Run>,
    /// Horizontal alignment.
    #[serde(default)]
    pub align: Alignment,
    /// Left indentation in points.
    #[serde(default)]
    pub indent_left: f32,
    /// Right indentation in points.
    #[serde(default)]
    pub indent_right: f32,
    /// First-line indentation in points.
    #[serde(default)]
    pub indent_first_line: f32,
    /// Hanging indentation in points.
    #[serde(default)]
    pub indent_hanging: f32,
    /// Line spacing as a percentage of single spacing (100 = single).
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,
    /// Space before the paragraph in points.
    #[serde(default)]
    pub space_before: f32,
    /// Space after the paragraph in points.
    #[serde(default)]
    pub space_after: f32,
    /// Nesting level (0 = top level).
    #[serde(default)]
    pub level: u8,
    /// Bullet or numbering descriptor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet: Option<Bullet>,
}

fn default_line_spacing() -> f32 {
    100.0
}

impl Paragraph {
    /// Create an empty paragraph with default formatting.
    pub fn new() -> Self {
        Self {
            line_spacing: 100.0,
            ..Default::default()
        }
    }

    /// Create a paragraph holding a single plain run.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::plain(text)],
            line_spacing: 100.0,
            ..Default::default()
        }
    }

    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A rich text body with body-level layout hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBody {
    /// Ordered paragraphs.
    pub paragraphs: Vec<Paragraph>,
    /// Autofit mode.
    #[serde(default)]
    pub autofit: Autofit,
    /// Vertical anchor within the shape.
    #[serde(default)]
    pub anchor: VerticalAnchor,
    /// Whether text wraps at the shape boundary.
    #[serde(default = "default_wrap")]
    pub wrap: bool,
    /// Inset margins.
    #[serde(default)]
    pub insets: Insets,
}

fn default_wrap() -> bool {
    true
}

impl TextBody {
    /// Create an empty body with default layout hints.
    pub fn new() -> Self {
        Self {
            wrap: true,
            ..Default::default()
        }
    }

    /// Concatenated text of all paragraphs, newline-separated.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
