//! Color, fill, and outline extraction.
//!
//! Style-bearing fragments are scanned structurally and every recognized
//! marker is collected; the winner is picked by the documented priority
//! order, so extraction is deterministic even on malformed fragments that
//! carry more than one marker.

use crate::model::{
    Color, DashStyle, Fill, GradientKind, GradientStop, ImageFillMode, LineCap, LineJoin, Outline,
    SchemeSlot,
};
use crate::units;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{local_attr, local_attr_fraction, local_attr_i64};

/// A color together with the opacity its fragment declared.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ColorValue {
    pub color: Color,
    pub alpha: Option<f32>,
}

/// Color candidates collected from one fragment, picked in priority order:
/// explicit RGB, then scheme reference, then system color, then preset.
#[derive(Debug, Default)]
struct ColorScan {
    rgb: Option<ColorValue>,
    scheme: Option<ColorValue>,
    system: Option<ColorValue>,
    preset: Option<ColorValue>,
}

impl ColorScan {
    fn offer(&mut self, value: ColorValue) {
        let slot = match value.color {
            Color::Rgb { .. } => &mut self.rgb,
            Color::Scheme { .. } => &mut self.scheme,
            Color::System { .. } => &mut self.system,
            Color::Preset { .. } => &mut self.preset,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn pick(self) -> Option<ColorValue> {
        self.rgb.or(self.scheme).or(self.system).or(self.preset)
    }
}

/// Read one color element (`srgbClr`, `schemeClr`, `sysClr`, `prstClr`).
///
/// Returns `None` when `e` is not a color element. When the element has
/// children (`is_empty == false`) its modifier children are consumed.
fn read_color(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
    is_empty: bool,
) -> Option<ColorValue> {
    let name = e.name();
    let local = name.local_name();
    let kind: &[u8] = match local.as_ref() {
        k @ (b"srgbClr" | b"schemeClr" | b"sysClr" | b"prstClr") => k,
        _ => return None,
    };
    let kind = kind.to_vec();

    let mut alpha = None;
    let mut tint = None;
    let mut shade = None;
    let mut lum_mod = None;
    let mut lum_off = None;

    if !is_empty {
        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref c)) => {
                    read_modifier(c, &mut alpha, &mut tint, &mut shade, &mut lum_mod, &mut lum_off);
                }
                Ok(Event::Start(ref c)) => {
                    read_modifier(c, &mut alpha, &mut tint, &mut shade, &mut lum_mod, &mut lum_off);
                    let _ = reader.read_to_end(c.name());
                }
                Ok(Event::End(ref end))
                    if end.name().local_name().as_ref() == kind.as_slice() =>
                {
                    break
                }
                Ok(Event::Eof) | Err(_) => break,
                _ => {}
            }
        }
    }

    let color = match kind.as_slice() {
        b"srgbClr" => Color::Rgb {
            value: local_attr(e, b"val")?.to_uppercase(),
        },
        b"schemeClr" => {
            let name = local_attr(e, b"val")?;
            // Unknown slot names (e.g. phClr outside a theme) are not
            // resolvable references.
            let slot = SchemeSlot::from_name(&name)?;
            Color::Scheme {
                slot,
                tint,
                shade,
                lum_mod,
                lum_off,
            }
        }
        b"sysClr" => Color::System {
            name: local_attr(e, b"val").unwrap_or_default(),
            fallback: local_attr(e, b"lastClr").map(|v| v.to_uppercase()),
        },
        _ => Color::Preset {
            name: local_attr(e, b"val")?,
        },
    };

    Some(ColorValue { color, alpha })
}

fn read_modifier(
    c: &BytesStart,
    alpha: &mut Option<f32>,
    tint: &mut Option<f32>,
    shade: &mut Option<f32>,
    lum_mod: &mut Option<f32>,
    lum_off: &mut Option<f32>,
) {
    let name = c.name();
    let val = local_attr_fraction(c, b"val");
    match name.local_name().as_ref() {
        b"alpha" => *alpha = val,
        b"tint" => *tint = val,
        b"shade" => *shade = val,
        b"lumMod" => *lum_mod = val,
        b"lumOff" => *lum_off = val,
        _ => {}
    }
}

/// Walk the children of a color-bearing container (`solidFill`, `fgClr`,
/// `gs`, ...) until its end tag and return the priority-picked color.
pub(crate) fn parse_color_container(
    reader: &mut Reader<&[u8]>,
    end_local: &[u8],
) -> Option<ColorValue> {
    let mut scan = ColorScan::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref c)) => {
                if let Some(cv) = read_color(reader, c, false) {
                    scan.offer(cv);
                } else {
                    let _ = reader.read_to_end(c.name());
                }
            }
            Ok(Event::Empty(ref c)) => {
                if let Some(cv) = read_color(reader, c, true) {
                    scan.offer(cv);
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == end_local => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    scan.pick()
}

/// Fill candidates collected while scanning one style fragment.
///
/// Priority: explicit no-fill, solid, gradient, pattern, image-backed.
/// Nothing recognized resolves to the producer's implicit default
/// (opaque white solid) via [`FillScan::into_fill_or_default`].
#[derive(Debug, Default)]
pub(crate) struct FillScan {
    none: bool,
    solid: Option<Fill>,
    gradient: Option<Fill>,
    pattern: Option<Fill>,
    image: Option<Fill>,
}

impl FillScan {
    /// Feed a `Start` child of the fragment. Returns true when the child
    /// was a fill marker (and has been fully consumed).
    pub fn offer_start(&mut self, reader: &mut Reader<&[u8]>, e: &BytesStart) -> bool {
        let name = e.name();
        match name.local_name().as_ref() {
            b"noFill" => {
                let _ = reader.read_to_end(e.name());
                self.none = true;
                true
            }
            b"solidFill" => {
                let cv = parse_color_container(reader, b"solidFill");
                if self.solid.is_none() {
                    self.solid = Some(solid_from(cv));
                }
                true
            }
            b"gradFill" => {
                let fill = parse_gradient(reader);
                if self.gradient.is_none() {
                    self.gradient = Some(fill);
                }
                true
            }
            b"pattFill" => {
                let fill = parse_pattern(reader, e);
                if self.pattern.is_none() {
                    self.pattern = Some(fill);
                }
                true
            }
            b"blipFill" => {
                let fill = parse_blip_fill(reader);
                if self.image.is_none() {
                    self.image = fill;
                }
                true
            }
            _ => false,
        }
    }

    /// Feed an `Empty` (self-closing) child of the fragment.
    pub fn offer_empty(&mut self, e: &BytesStart) -> bool {
        let name = e.name();
        match name.local_name().as_ref() {
            b"noFill" => {
                self.none = true;
                true
            }
            b"solidFill" => {
                if self.solid.is_none() {
                    self.solid = Some(Fill::default_white());
                }
                true
            }
            b"gradFill" => {
                if self.gradient.is_none() {
                    self.gradient = Some(synthesized_gradient());
                }
                true
            }
            b"pattFill" | b"blipFill" => true,
            _ => false,
        }
    }

    /// Priority-pick the collected candidates.
    pub fn into_fill(self) -> Option<Fill> {
        if self.none {
            return Some(Fill::None);
        }
        self.solid.or(self.gradient).or(self.pattern).or(self.image)
    }

    /// Priority-pick, defaulting to opaque white solid.
    pub fn into_fill_or_default(self) -> Fill {
        self.into_fill().unwrap_or_else(Fill::default_white)
    }
}

fn solid_from(cv: Option<ColorValue>) -> Fill {
    match cv {
        Some(cv) => Fill::Solid {
            color: cv.color,
            alpha: cv.alpha,
        },
        None => Fill::default_white(),
    }
}

/// Walk a container whose children are only fill markers (`bgPr`) and
/// return the resolved fill.
pub(crate) fn parse_fill_container(reader: &mut Reader<&[u8]>, end_local: &[u8]) -> Fill {
    let mut scan = FillScan::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if !scan.offer_start(reader, e) {
                    let _ = reader.read_to_end(e.name());
                }
            }
            Ok(Event::Empty(ref e)) => {
                scan.offer_empty(e);
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == end_local => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    scan.into_fill_or_default()
}

/// Two-stop white-to-black fallback used when a gradient yields fewer than
/// two stops, so downstream renderers always see a valid gradient.
fn synthesized_gradient() -> Fill {
    Fill::Gradient {
        stops: vec![
            GradientStop {
                position: 0.0,
                color: Color::white(),
                alpha: None,
            },
            GradientStop {
                position: 100.0,
                color: Color::black(),
                alpha: None,
            },
        ],
        kind: GradientKind::default(),
    }
}

/// Consume a `gradFill` element and build a gradient fill.
fn parse_gradient(reader: &mut Reader<&[u8]>) -> Fill {
    let mut stops: Vec<GradientStop> = Vec::new();
    let mut kind: Option<GradientKind> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    // Descend into the stop list.
                    b"gsLst" => {}
                    b"gs" => {
                        let position = local_attr_i64(e, b"pos")
                            .map(|p| p as f32 / 1000.0)
                            .unwrap_or(0.0);
                        if let Some(cv) = parse_color_container(reader, b"gs") {
                            stops.push(GradientStop {
                                position,
                                color: cv.color,
                                alpha: cv.alpha,
                            });
                        }
                    }
                    b"lin" => {
                        kind = Some(linear_kind(e));
                        let _ = reader.read_to_end(e.name());
                    }
                    b"path" => {
                        kind = Some(path_kind(e));
                        let _ = reader.read_to_end(e.name());
                    }
                    _ => {
                        let _ = reader.read_to_end(e.name());
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"lin" => kind = Some(linear_kind(e)),
                    b"path" => kind = Some(path_kind(e)),
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"gradFill" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    if stops.len() < 2 {
        return synthesized_gradient();
    }

    Fill::Gradient {
        stops,
        kind: kind.unwrap_or_default(),
    }
}

fn linear_kind(e: &BytesStart) -> GradientKind {
    GradientKind::Linear {
        angle: local_attr_i64(e, b"ang")
            .map(units::rot_to_degrees)
            .unwrap_or(0.0),
    }
}

fn path_kind(e: &BytesStart) -> GradientKind {
    GradientKind::Path {
        shape: local_attr(e, b"path").unwrap_or_else(|| "shape".to_string()),
    }
}

/// Consume a `pattFill` element and build a pattern fill.
fn parse_pattern(reader: &mut Reader<&[u8]>, e: &BytesStart) -> Fill {
    let preset = local_attr(e, b"prst").unwrap_or_else(|| "pct5".to_string());
    let mut foreground = Color::black();
    let mut background = Color::white();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref c)) => {
                let name = c.name();
                match name.local_name().as_ref() {
                    b"fgClr" => {
                        if let Some(cv) = parse_color_container(reader, b"fgClr") {
                            foreground = cv.color;
                        }
                    }
                    b"bgClr" => {
                        if let Some(cv) = parse_color_container(reader, b"bgClr") {
                            background = cv.color;
                        }
                    }
                    _ => {
                        let _ = reader.read_to_end(c.name());
                    }
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"pattFill" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    Fill::Pattern {
        preset,
        foreground,
        background,
    }
}

/// Consume a `blipFill` element in a style context (shape interior or
/// slide background) and build an image-backed fill when it references
/// embedded media.
fn parse_blip_fill(reader: &mut Reader<&[u8]>) -> Option<Fill> {
    let mut reference: Option<String> = None;
    let mut mode = ImageFillMode::Stretch;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"blip" => {
                        if let Some(id) = local_attr(e, b"embed") {
                            reference = Some(id);
                        }
                    }
                    b"tile" => mode = ImageFillMode::Tile,
                    b"stretch" => mode = ImageFillMode::Stretch,
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"blipFill" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    reference.map(|reference| Fill::Image { reference, mode })
}

/// Consume a `ln` element and build its outline.
///
/// `None` means an explicit no-line marker was found; the absence of a
/// `ln` element entirely is handled by the caller (also no outline).
pub(crate) fn parse_outline(reader: &mut Reader<&[u8]>, e: &BytesStart) -> Option<Outline> {
    let width = outline_width(e);
    let cap = outline_cap(e);
    let mut color = Color::black();
    let mut dash = DashStyle::Solid;
    let mut join = None;
    let mut no_line = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref c)) => {
                let name = c.name();
                match name.local_name().as_ref() {
                    b"solidFill" => {
                        if let Some(cv) = parse_color_container(reader, b"solidFill") {
                            color = cv.color;
                        }
                    }
                    b"noFill" => {
                        let _ = reader.read_to_end(c.name());
                        no_line = true;
                    }
                    _ => {
                        let _ = reader.read_to_end(c.name());
                    }
                }
            }
            Ok(Event::Empty(ref c)) => {
                let name = c.name();
                match name.local_name().as_ref() {
                    b"noFill" => no_line = true,
                    b"prstDash" => {
                        if let Some(val) = local_attr(c, b"val") {
                            dash = DashStyle::from_preset(&val);
                        }
                    }
                    b"round" => join = Some(LineJoin::Round),
                    b"bevel" => join = Some(LineJoin::Bevel),
                    b"miter" => join = Some(LineJoin::Miter),
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"ln" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    if no_line {
        return None;
    }

    Some(Outline {
        width,
        color,
        dash,
        cap,
        join,
    })
}

/// Build an outline from a self-closing `ln` element (attributes only).
pub(crate) fn parse_outline_empty(e: &BytesStart) -> Outline {
    Outline {
        width: outline_width(e),
        cap: outline_cap(e),
        ..Default::default()
    }
}

fn outline_width(e: &BytesStart) -> f32 {
    local_attr_i64(e, b"w")
        .map(|w| units::emu_to_pt(w) as f32)
        .unwrap_or(1.0)
}

fn outline_cap(e: &BytesStart) -> Option<LineCap> {
    local_attr(e, b"cap").map(|v| match v.as_str() {
        "rnd" => LineCap::Round,
        "sq" => LineCap::Square,
        _ => LineCap::Flat,
    })
}
