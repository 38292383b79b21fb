//! Per-slide assembly: background extraction, shape-tree walk, draw-order
//! sort, and the empty-slide diagnostic placeholder.

use crate::container::PptxContainer;
use crate::model::{
    Background, Element, Frame, Paragraph, RenderSize, Slide, TextBody, TextElement, Theme,
};
use quick_xml::events::Event;
use quick_xml::Reader;

use super::paint;
use super::shapes::{self, SlideContext};

/// Reconstruct one slide from its part.
///
/// Every recoverable condition is absorbed here: a missing part, a
/// malformed shape tree, or a contentless slide all yield a usable slide
/// (with the diagnostic placeholder in the worst case). Nothing on this
/// path aborts the presentation.
pub(crate) fn parse_slide(
    container: &PptxContainer,
    part_path: &str,
    theme: &Theme,
    scale: f64,
    size: RenderSize,
    id: String,
    number: usize,
) -> Slide {
    let mut slide = Slide::new(id, number);

    let xml = match container.read_xml(part_path) {
        Ok(xml) => xml,
        Err(err) => {
            log::warn!("slide part {}: {}", part_path, err);
            slide.elements.push(diagnostic_placeholder(size));
            return slide;
        }
    };

    let rels = container.relationships_for(part_path).unwrap_or_default();
    let ctx = SlideContext {
        container,
        rels: &rels,
        part_path,
        theme,
        scale,
    };

    let mut reader = Reader::from_str(&xml);
    let mut background: Option<Background> = None;
    let mut elements: Vec<Element> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"bg" => {
                        background = Some(parse_background(&mut reader));
                    }
                    b"spTree" => {
                        let scan = shapes::parse_shape_tree(&mut reader, &ctx, b"spTree");
                        elements = scan.elements;
                        slide.skipped = scan.skipped;
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    shapes::propagate_absolute(&mut elements, 0.0, 0.0);
    // Ascending draw order; the sort is stable, so document order breaks
    // ties.
    elements.sort_by_key(|e| e.draw_order());

    if elements.is_empty() {
        log::warn!(
            "slide {} produced no elements; substituting diagnostic placeholder",
            slide.number
        );
        elements.push(diagnostic_placeholder(size));
    }

    slide.elements = elements;
    slide.background = background.unwrap_or_default();
    slide
}

/// Consume a `bg` element: an explicit paint (`bgPr`) or the inherit
/// marker (`bgRef`).
fn parse_background(reader: &mut Reader<&[u8]>) -> Background {
    let mut background = Background::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"bgPr" => {
                        background = Background::Paint {
                            fill: paint::parse_fill_container(reader, b"bgPr"),
                        };
                    }
                    b"bgRef" => {
                        background = Background::Inherited;
                        let _ = reader.read_to_end(e.name());
                    }
                    _ => {
                        let _ = reader.read_to_end(e.name());
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                if name.local_name().as_ref() == b"bgRef" {
                    background = Background::Inherited;
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"bg" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    background
}

/// The degradation signal for a slide with no recognizable content: one
/// text element spanning the slide, never zero elements.
fn diagnostic_placeholder(size: RenderSize) -> Element {
    Element::Text(TextElement {
        frame: Frame {
            id: "diagnostic".to_string(),
            name: Some("Empty slide".to_string()),
            width: size.width,
            height: size.height,
            ..Default::default()
        },
        body: TextBody {
            paragraphs: vec![Paragraph::with_text(
                "No supported content found on this slide",
            )],
            ..TextBody::new()
        },
    })
}
