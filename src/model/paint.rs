//! Color, fill, and outline model.

use super::theme::{SchemeSlot, Theme};
use serde::{Deserialize, Serialize};

/// A color expression as authored in the package.
///
/// Scheme colors are only fully resolvable against a [`Theme`];
/// [`Color::resolve`] accepts an optional theme and falls back to the stock
/// scheme mapping when none is in scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Color {
    /// Explicit RGB hex value ("RRGGBB").
    Rgb { value: String },
    /// Reference into the theme's named color slots, with optional
    /// lightening/darkening modifiers (each 0.0–1.0).
    Scheme {
        slot: SchemeSlot,
        #[serde(skip_serializing_if = "Option::is_none")]
        tint: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        shade: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lum_mod: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        lum_off: Option<f32>,
    },
    /// Operating-system color, with the producer's resolved fallback when
    /// it recorded one.
    System {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        fallback: Option<String>,
    },
    /// Named preset color ("red", "white", ...).
    Preset { name: String },
}

impl Color {
    /// Explicit RGB color.
    pub fn rgb(value: impl Into<String>) -> Self {
        Color::Rgb {
            value: value.into(),
        }
    }

    /// Scheme reference without modifiers.
    pub fn scheme(slot: SchemeSlot) -> Self {
        Color::Scheme {
            slot,
            tint: None,
            shade: None,
            lum_mod: None,
            lum_off: None,
        }
    }

    /// Black, the documented default for unspecified run colors.
    pub fn black() -> Self {
        Color::rgb("000000")
    }

    /// White, the documented default for unspecified fills.
    pub fn white() -> Self {
        Color::rgb("FFFFFF")
    }

    /// Resolve to an RGB hex string ("RRGGBB").
    ///
    /// Resolution is deterministic: explicit values pass through; scheme
    /// slots read the theme (or the stock scheme when `theme` is `None`)
    /// and then apply modifiers; system colors use the recorded fallback,
    /// else a small name map, else black; preset names use a fixed map,
    /// else black.
    pub fn resolve(&self, theme: Option<&Theme>) -> String {
        match self {
            Color::Rgb { value } => value.clone(),
            Color::Scheme {
                slot,
                tint,
                shade,
                lum_mod,
                lum_off,
            } => {
                let stock;
                let scheme = match theme {
                    Some(t) => &t.colors,
                    None => {
                        stock = Default::default();
                        &stock
                    }
                };
                apply_modifiers(scheme.slot(*slot), *tint, *shade, *lum_mod, *lum_off)
            }
            Color::System { name, fallback } => fallback
                .clone()
                .unwrap_or_else(|| system_color_rgb(name).to_string()),
            Color::Preset { name } => preset_color_rgb(name).to_string(),
        }
    }
}

/// Apply scheme-color modifiers to a base hex value.
///
/// tint blends toward white, shade scales toward black, lumMod scales the
/// channels and lumOff adds a flat offset. Channels clamp to 0–255.
fn apply_modifiers(
    hex: &str,
    tint: Option<f32>,
    shade: Option<f32>,
    lum_mod: Option<f32>,
    lum_off: Option<f32>,
) -> String {
    let Some((mut r, mut g, mut b)) = parse_hex(hex) else {
        return hex.to_string();
    };

    let mut apply = |f: &dyn Fn(f32) -> f32| {
        r = f(r).clamp(0.0, 255.0);
        g = f(g).clamp(0.0, 255.0);
        b = f(b).clamp(0.0, 255.0);
    };

    if let Some(m) = lum_mod {
        apply(&|c| c * m);
    }
    if let Some(o) = lum_off {
        apply(&|c| c + 255.0 * o);
    }
    if let Some(t) = tint {
        apply(&|c| c * (1.0 - t) + 255.0 * t);
    }
    if let Some(s) = shade {
        apply(&|c| c * (1.0 - s));
    }

    format!("{:02X}{:02X}{:02X}", r as u8, g as u8, b as u8)
}

fn parse_hex(hex: &str) -> Option<(f32, f32, f32)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r as f32, g as f32, b as f32))
}

/// Fallback values for system color names without a recorded `lastClr`.
fn system_color_rgb(name: &str) -> &'static str {
    match name {
        "window" | "3dLight" | "btnHighlight" => "FFFFFF",
        "btnFace" | "menu" | "scrollBar" => "F0F0F0",
        "grayText" => "6D6D6D",
        "highlight" => "0078D7",
        "highlightText" => "FFFFFF",
        _ => "000000",
    }
}

/// RGB values for the preset color names this engine recognizes.
fn preset_color_rgb(name: &str) -> &'static str {
    match name {
        "white" => "FFFFFF",
        "red" => "FF0000",
        "green" => "008000",
        "lime" => "00FF00",
        "blue" => "0000FF",
        "yellow" => "FFFF00",
        "cyan" | "aqua" => "00FFFF",
        "magenta" | "fuchsia" => "FF00FF",
        "gray" | "grey" => "808080",
        "silver" => "C0C0C0",
        "maroon" => "800000",
        "navy" => "000080",
        "olive" => "808000",
        "purple" => "800080",
        "teal" => "008080",
        "orange" => "FFA500",
        _ => "000000",
    }
}

/// A single gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient, 0–100.
    pub position: f32,
    /// Stop color.
    pub color: Color,
    /// Opacity 0.0–1.0 when the stop declares one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,
}

/// Gradient geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GradientKind {
    /// Linear gradient at an angle in degrees.
    Linear { angle: f64 },
    /// Path gradient ("circle", "rect", "shape").
    Path { shape: String },
}

impl Default for GradientKind {
    fn default() -> Self {
        GradientKind::Linear { angle: 0.0 }
    }
}

/// How an image-backed fill covers its shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFillMode {
    #[default]
    Stretch,
    Tile,
}

/// A paint description for a shape interior or slide background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Fill {
    /// Explicit "no fill" marker.
    None,
    /// Solid color, optionally translucent.
    Solid {
        color: Color,
        #[serde(skip_serializing_if = "Option::is_none")]
        alpha: Option<f32>,
    },
    /// Gradient with ordered stops.
    Gradient {
        stops: Vec<GradientStop>,
        #[serde(rename = "geometry")]
        kind: GradientKind,
    },
    /// Two-color pattern.
    Pattern {
        preset: String,
        foreground: Color,
        background: Color,
    },
    /// Image-backed fill; `reference` is the embed relationship ID.
    Image {
        reference: String,
        mode: ImageFillMode,
    },
}

impl Fill {
    /// The producing application's implicit default: opaque white solid.
    pub fn default_white() -> Self {
        Fill::Solid {
            color: Color::white(),
            alpha: None,
        }
    }

    /// Solid fill helper.
    pub fn solid(color: Color) -> Self {
        Fill::Solid { color, alpha: None }
    }
}

/// Outline dash style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DashStyle {
    #[default]
    Solid,
    Dot,
    Dash,
    DashDot,
    LongDash,
    LongDashDot,
    LongDashDotDot,
    SystemDash,
    SystemDot,
    SystemDashDot,
}

impl DashStyle {
    /// Map a `prstDash` value to a dash style. Unknown values fall back to
    /// solid.
    pub fn from_preset(name: &str) -> Self {
        match name {
            "dot" => DashStyle::Dot,
            "dash" => DashStyle::Dash,
            "dashDot" => DashStyle::DashDot,
            "lgDash" => DashStyle::LongDash,
            "lgDashDot" => DashStyle::LongDashDot,
            "lgDashDotDot" => DashStyle::LongDashDotDot,
            "sysDash" => DashStyle::SystemDash,
            "sysDot" => DashStyle::SystemDot,
            "sysDashDot" => DashStyle::SystemDashDot,
            _ => DashStyle::Solid,
        }
    }
}

/// Line end cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Flat,
    Round,
    Square,
}

/// Line join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    Round,
    Bevel,
    Miter,
}

/// A shape outline. Absence of an outline is modeled as `Option::None` on
/// the element, distinct from a zero-width outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Stroke width in points.
    pub width: f32,
    /// Stroke color.
    pub color: Color,
    /// Dash pattern.
    pub dash: DashStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<LineCap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<LineJoin>,
}

impl Default for Outline {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color::black(),
            dash: DashStyle::Solid,
            cap: None,
            join: None,
        }
    }
}
