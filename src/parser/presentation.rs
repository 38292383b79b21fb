//! Top-level presentation assembly.
//!
//! Opens the package, reads the declared slide size, resolves the slide
//! list and theme through the presentation part's relationships, and
//! orchestrates per-slide extraction under one shared scale factor.

use crate::container::PptxContainer;
use crate::error::Result;
use crate::model::{Presentation, RenderSize, Theme};
use crate::units;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

use super::slide::parse_slide;
use super::theme::parse_theme;
use super::local_attr_i64;

/// Main presentation part path.
const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Relationship type of theme parts.
const THEME_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

/// One slide reference resolved from the presentation part.
#[derive(Debug, Clone)]
struct SlideRef {
    /// Package-internal part path.
    path: String,
    /// Stable ID from the part name (e.g., "slide3").
    id: String,
    /// 1-based ordinal from the filename-embedded index.
    number: usize,
}

/// Parser for PPTX presentations.
///
/// # Example
///
/// ```no_run
/// use slidescene::PresentationParser;
///
/// let presentation = PresentationParser::open("deck.pptx")?.parse()?;
/// println!("{} slides", presentation.slides.len());
/// # Ok::<(), slidescene::Error>(())
/// ```
pub struct PresentationParser {
    container: PptxContainer,
    slides: Vec<SlideRef>,
    native_size_emu: (i64, i64),
    theme: Theme,
}

impl PresentationParser {
    /// Open a PPTX file for parsing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = PptxContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = PptxContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    /// Create a parser from an opened container.
    fn from_container(container: PptxContainer) -> Result<Self> {
        // The presentation part is the one part this engine cannot work
        // without; its absence is terminal for the file.
        let xml = container.read_xml(PRESENTATION_PART)?;
        let (native_size_emu, slide_rel_ids) = parse_presentation_part(&xml);

        let rels = container.relationships_for(PRESENTATION_PART)?;

        let mut slides = Vec::new();
        for (index, rel_id) in slide_rel_ids.iter().enumerate() {
            match rels.target(rel_id) {
                Ok(target) => {
                    let path = PptxContainer::resolve_path(PRESENTATION_PART, target);
                    let id = slide_part_stem(&path);
                    let number = filename_index(&id).unwrap_or(index + 1);
                    slides.push(SlideRef { path, id, number });
                }
                Err(err) => {
                    // Dangling slide reference: skip the slide, keep the
                    // file.
                    log::warn!("slide list entry {}: {}", index + 1, err);
                }
            }
        }

        let theme_xml = rels
            .get_by_type(THEME_REL_TYPE)
            .first()
            .map(|rel| PptxContainer::resolve_path(PRESENTATION_PART, &rel.target))
            .and_then(|path| container.read_xml(&path).ok())
            .or_else(|| container.read_xml("ppt/theme/theme1.xml").ok());
        let theme = parse_theme(theme_xml.as_deref());

        Ok(Self {
            container,
            slides,
            native_size_emu,
            theme,
        })
    }

    /// Number of slides the presentation declares.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// The resolved theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Reconstruct the full presentation.
    pub fn parse(&self) -> Result<Presentation> {
        let (width_emu, height_emu) = self.native_size_emu;
        let scale = units::scale_factor(width_emu)?;
        let size = RenderSize {
            width: units::emu_to_px(width_emu, scale),
            height: units::emu_to_px(height_emu, scale),
        };

        let mut metadata = self.container.parse_core_metadata()?;
        metadata.slide_count = Some(self.slides.len() as u32);

        let slides = self
            .slides
            .iter()
            .map(|slide| {
                parse_slide(
                    &self.container,
                    &slide.path,
                    &self.theme,
                    scale,
                    size,
                    slide.id.clone(),
                    slide.number,
                )
            })
            .collect();

        Ok(Presentation {
            slides,
            theme: self.theme.clone(),
            size,
            metadata,
        })
    }
}

/// Extract the declared slide size and the ordered slide relationship IDs
/// from `ppt/presentation.xml`.
///
/// An absent or malformed `sldSz` falls back to the default 16:9 native
/// size.
fn parse_presentation_part(xml: &str) -> ((i64, i64), Vec<String>) {
    let mut size = (
        units::DEFAULT_SLIDE_WIDTH_EMU,
        units::DEFAULT_SLIDE_HEIGHT_EMU,
    );
    let mut slide_rel_ids = Vec::new();

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"sldSz" => {
                        // cx may legitimately be declared as zero by broken
                        // producers; that surfaces later as InvalidData.
                        if let (Some(cx), Some(cy)) =
                            (local_attr_i64(e, b"cx"), local_attr_i64(e, b"cy"))
                        {
                            size = (cx, cy);
                        }
                    }
                    b"sldId" => {
                        // The slide reference is the r:id attribute; the
                        // bare id attribute is the slide's numeric identity.
                        for attr in e.attributes().flatten() {
                            if attr.key.local_name().as_ref() == b"id"
                                && attr.key.prefix().is_some()
                            {
                                slide_rel_ids
                                    .push(String::from_utf8_lossy(&attr.value).to_string());
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    (size, slide_rel_ids)
}

/// The part stem used as the slide's stable ID ("ppt/slides/slide3.xml"
/// yields "slide3").
fn slide_part_stem(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(".xml").unwrap_or(file).to_string()
}

/// The filename-embedded index ("slide12" yields 12).
fn filename_index(stem: &str) -> Option<usize> {
    let digits: String = stem.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presentation_part() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r">
          <p:sldIdLst>
            <p:sldId id="256" r:id="rId2"/>
            <p:sldId id="257" r:id="rId3"/>
          </p:sldIdLst>
          <p:sldSz cx="9144000" cy="6858000"/>
        </p:presentation>"#;

        let (size, rel_ids) = parse_presentation_part(xml);
        assert_eq!(size, (9_144_000, 6_858_000));
        assert_eq!(rel_ids, vec!["rId2", "rId3"]);
    }

    #[test]
    fn test_missing_size_defaults_to_16_9() {
        let xml = r#"<p:presentation><p:sldIdLst/></p:presentation>"#;
        let (size, rel_ids) = parse_presentation_part(xml);
        assert_eq!(size.0, units::DEFAULT_SLIDE_WIDTH_EMU);
        assert_eq!(size.1, units::DEFAULT_SLIDE_HEIGHT_EMU);
        assert!(rel_ids.is_empty());
    }

    #[test]
    fn test_slide_part_stem_and_index() {
        assert_eq!(slide_part_stem("ppt/slides/slide3.xml"), "slide3");
        assert_eq!(filename_index("slide3"), Some(3));
        assert_eq!(filename_index("slide12"), Some(12));
        assert_eq!(filename_index("slide"), None);
    }
}
