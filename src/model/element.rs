//! Slide element model: the tagged union of visual nodes on a slide.

use super::paint::{Fill, Outline};
use super::text::TextBody;
use serde::{Deserialize, Serialize};

/// Geometry and identity shared by every element variant.
///
/// `x`/`y` are slide-absolute pixels; `local_x`/`local_y` are the same
/// position in the owning group's coordinate space. For top-level elements
/// the two pairs are equal. Both are retained so flat renderers can use
/// absolute positions while editors keep group-relative semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Stable identity from the node's structural identifier.
    pub id: String,
    /// Display name, when authored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Slide-absolute X in pixels.
    pub x: f64,
    /// Slide-absolute Y in pixels.
    pub y: f64,
    /// Group-local X in pixels.
    pub local_x: f64,
    /// Group-local Y in pixels.
    pub local_y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Rotation in degrees, clockwise.
    #[serde(default)]
    pub rotation: f64,
    /// Horizontal flip.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flip_h: bool,
    /// Vertical flip.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flip_v: bool,
    /// Draw-order key; ascending stable sort determines render order.
    pub draw_order: u64,
}

impl Frame {
    /// Shift this frame into slide-absolute space by a parent group's
    /// offset, keeping the parsed position as the group-local pair.
    pub fn offset_by(&mut self, dx: f64, dy: f64) {
        self.x = self.local_x + dx;
        self.y = self.local_y + dy;
    }
}

/// A geometric shape, optionally carrying text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeElement {
    pub frame: Frame,
    /// Preset geometry name ("rect", "ellipse", "custom", ...).
    pub geometry: String,
    /// Interior paint.
    pub fill: Fill,
    /// Stroke, when the shape declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    /// Embedded text body, when the shape carries text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBody>,
}

/// A text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    pub frame: Frame,
    pub body: TextBody,
}

/// An embeddable image payload: bytes plus MIME type, suitable for
/// base64/data-URI encoding by a consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Raw bytes.
    #[serde(skip)]
    pub data: Vec<u8>,
    /// MIME type inferred from the media filename.
    pub mime_type: String,
}

/// Crop rectangle insets as fractions of the source image (0.0–1.0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// A placed picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    pub frame: Frame,
    /// Resolved payload, or a synthesized placeholder when the backing
    /// media could not be located.
    pub payload: ImagePayload,
    /// True when `payload` is a synthesized placeholder.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_placeholder: bool,
    /// Crop insets, when the picture declares them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropRect>,
    /// Brightness adjustment, -1.0–1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    /// Contrast adjustment, -1.0–1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f32>,
}

/// A group of child elements.
///
/// Children are owned; their frames carry both slide-absolute and
/// group-local coordinates. Nesting depth is bounded by authored nesting,
/// and the owned tree cannot form a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupElement {
    pub frame: Frame,
    pub children: Vec<Element>,
}

/// A visual node on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(TextElement),
    Shape(ShapeElement),
    Image(ImageElement),
    Group(GroupElement),
}

impl Element {
    /// The shared base record of any variant.
    pub fn frame(&self) -> &Frame {
        match self {
            Element::Text(e) => &e.frame,
            Element::Shape(e) => &e.frame,
            Element::Image(e) => &e.frame,
            Element::Group(e) => &e.frame,
        }
    }

    /// Mutable access to the shared base record.
    pub fn frame_mut(&mut self) -> &mut Frame {
        match self {
            Element::Text(e) => &mut e.frame,
            Element::Shape(e) => &mut e.frame,
            Element::Image(e) => &mut e.frame,
            Element::Group(e) => &mut e.frame,
        }
    }

    /// Draw-order key of this element.
    pub fn draw_order(&self) -> u64 {
        self.frame().draw_order
    }
}
