//! Picture node extraction and media resolution.
//!
//! Image resolution is a non-fatal, always-successful path: when the
//! backing media cannot be located under any strategy, a synthesized SVG
//! placeholder payload is substituted and the element is flagged, never
//! aborting slide parsing.

use crate::container::PptxContainer;
use crate::error::Error;
use crate::model::{CropRect, Frame, ImageElement, ImagePayload};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::shapes::{parse_transform, SlideContext, Transform};
use super::{local_attr, local_attr_fraction};

/// Consume a `pic` element and build an [`ImageElement`].
pub(crate) fn parse_picture(reader: &mut Reader<&[u8]>, ctx: &SlideContext) -> ImageElement {
    let mut id: Option<String> = None;
    let mut name: Option<String> = None;
    let mut rel_id: Option<String> = None;
    let mut transform = Transform::default();
    let mut crop: Option<CropRect> = None;
    let mut brightness: Option<f32> = None;
    let mut contrast: Option<f32> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let ename = e.name();
                match ename.local_name().as_ref() {
                    b"cNvPr" => {
                        id = local_attr(e, b"id");
                        name = local_attr(e, b"name").filter(|n| !n.is_empty());
                        let _ = reader.read_to_end(e.name());
                    }
                    b"blip" => {
                        if let Some(embed) = local_attr(e, b"embed") {
                            rel_id = Some(embed);
                        }
                    }
                    b"lum" => {
                        brightness = local_attr_fraction(e, b"bright");
                        contrast = local_attr_fraction(e, b"contrast");
                        let _ = reader.read_to_end(e.name());
                    }
                    b"srcRect" => {
                        crop = Some(crop_rect(e));
                        let _ = reader.read_to_end(e.name());
                    }
                    b"xfrm" => {
                        transform = parse_transform(reader, e, ctx.scale);
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(ref e)) => {
                let ename = e.name();
                match ename.local_name().as_ref() {
                    b"cNvPr" => {
                        id = local_attr(e, b"id");
                        name = local_attr(e, b"name").filter(|n| !n.is_empty());
                    }
                    b"blip" => {
                        if let Some(embed) = local_attr(e, b"embed") {
                            rel_id = Some(embed);
                        }
                    }
                    b"lum" => {
                        brightness = local_attr_fraction(e, b"bright");
                        contrast = local_attr_fraction(e, b"contrast");
                    }
                    b"srcRect" => crop = Some(crop_rect(e)),
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"pic" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    let display_name = name.clone().unwrap_or_else(|| "Image".to_string());
    let (payload, is_placeholder) = resolve_payload(ctx, rel_id.as_deref(), &display_name);

    let frame = Frame {
        id: id.clone().unwrap_or_default(),
        name,
        x: transform.x,
        y: transform.y,
        local_x: transform.x,
        local_y: transform.y,
        width: transform.width,
        height: transform.height,
        rotation: transform.rotation,
        flip_h: transform.flip_h,
        flip_v: transform.flip_v,
        draw_order: id.and_then(|v| v.parse().ok()).unwrap_or(0),
    };

    ImageElement {
        frame,
        payload,
        is_placeholder,
        crop,
        brightness,
        contrast,
    }
}

fn crop_rect(e: &BytesStart) -> CropRect {
    CropRect {
        left: local_attr_fraction(e, b"l").unwrap_or(0.0),
        top: local_attr_fraction(e, b"t").unwrap_or(0.0),
        right: local_attr_fraction(e, b"r").unwrap_or(0.0),
        bottom: local_attr_fraction(e, b"b").unwrap_or(0.0),
    }
}

/// Resolve a picture's embed relationship to an embeddable payload,
/// substituting a placeholder when any step fails.
fn resolve_payload(
    ctx: &SlideContext,
    rel_id: Option<&str>,
    display_name: &str,
) -> (ImagePayload, bool) {
    let Some(rel_id) = rel_id else {
        log::warn!("picture {:?} has no embed relationship", display_name);
        return (placeholder_payload(display_name), true);
    };

    let target = match ctx.rels.target(rel_id) {
        Ok(target) => target,
        Err(err) => {
            log::warn!("picture {:?}: {}", display_name, err);
            return (placeholder_payload(display_name), true);
        }
    };

    let resolved = PptxContainer::resolve_path(ctx.part_path, target);
    match ctx.container.find_media(&resolved) {
        Some(data) => (
            ImagePayload {
                data,
                mime_type: mime_from_path(&resolved).to_string(),
            },
            false,
        ),
        None => {
            log::warn!(
                "picture {:?}: {}",
                display_name,
                Error::UnresolvedMedia(resolved)
            );
            (placeholder_payload(display_name), true)
        }
    }
}

/// Infer a MIME type from a media filename extension.
pub(crate) fn mime_from_path(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "wmf" => "image/x-wmf",
        "emf" => "image/x-emf",
        _ => "image/jpeg",
    }
}

/// Synthesize a minimal vector placeholder rendering the element's display
/// name and an "image not found" caption.
fn placeholder_payload(display_name: &str) -> ImagePayload {
    let label = xml_escape(display_name);
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="150" viewBox="0 0 200 150">
<rect width="200" height="150" fill="#F2F2F2" stroke="#BFBFBF"/>
<text x="100" y="70" text-anchor="middle" font-family="sans-serif" font-size="12" fill="#595959">{}</text>
<text x="100" y="92" text-anchor="middle" font-family="sans-serif" font-size="10" fill="#8C8C8C">image not found</text>
</svg>"##,
        label
    );
    ImagePayload {
        data: svg.into_bytes(),
        mime_type: "image/svg+xml".to_string(),
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
