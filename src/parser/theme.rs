//! Theme part parsing.
//!
//! The theme is parsed once per package and shared by every slide. Every
//! field has a fallback, so this resolver never fails: an absent part, a
//! parse error, or a partially populated scheme all yield a usable theme.

use crate::model::{FontSet, Theme};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::local_attr;

/// Parse a theme part into a [`Theme`].
///
/// `xml` is the decoded text of `ppt/theme/theme1.xml`; pass `None` when
/// the part is absent and the default theme is returned.
pub fn parse_theme(xml: Option<&str>) -> Theme {
    let Some(xml) = xml else {
        return Theme::default();
    };

    let mut theme = Theme::default();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_color_scheme = false;
    let mut in_major_font = false;
    let mut in_minor_font = false;
    let mut current_slot: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let local = name.local_name();
                match local.as_ref() {
                    b"theme" => {
                        if let Some(name) = local_attr(e, b"name") {
                            if !name.is_empty() {
                                theme.name = name;
                            }
                        }
                    }
                    b"clrScheme" => in_color_scheme = true,
                    b"majorFont" => in_major_font = true,
                    b"minorFont" => in_minor_font = true,
                    b"latin" | b"ea" | b"cs" if in_major_font || in_minor_font => {
                        let typeface = local_attr(e, b"typeface").filter(|t| !t.is_empty());
                        let set: &mut FontSet = if in_major_font {
                            &mut theme.fonts.major
                        } else {
                            &mut theme.fonts.minor
                        };
                        match local.as_ref() {
                            b"latin" => set.latin = typeface,
                            b"ea" => set.east_asian = typeface,
                            _ => set.complex_script = typeface,
                        }
                    }
                    b"dk1" | b"lt1" | b"dk2" | b"lt2" | b"accent1" | b"accent2" | b"accent3"
                    | b"accent4" | b"accent5" | b"accent6" | b"hlink" | b"folHlink"
                        if in_color_scheme =>
                    {
                        current_slot =
                            Some(String::from_utf8_lossy(local.as_ref()).to_string());
                    }
                    b"srgbClr" if in_color_scheme => {
                        if let (Some(slot), Some(val)) =
                            (current_slot.take(), local_attr(e, b"val"))
                        {
                            theme.colors.set_by_name(&slot, val.to_uppercase());
                        }
                    }
                    b"sysClr" if in_color_scheme => {
                        // Prefer the producer's resolved fallback.
                        if let Some(slot) = current_slot.take() {
                            if let Some(last) = local_attr(e, b"lastClr") {
                                theme.colors.set_by_name(&slot, last.to_uppercase());
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"clrScheme" => in_color_scheme = false,
                    b"majorFont" => in_major_font = false,
                    b"minorFont" => in_minor_font = false,
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            // A malformed theme keeps whatever was extracted so far.
            Err(_) => break,
            _ => {}
        }
    }

    theme
}
