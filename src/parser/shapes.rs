//! Shape-tree extraction.
//!
//! Walks a slide's `spTree` container by recursive descent over the event
//! stream, dispatching each child by kind: plain shapes, pictures, and
//! nested groups (which recurse). Unknown node kinds are skipped and
//! recorded, never fatal.

use crate::container::{PptxContainer, Relationships};
use crate::model::{
    Element, Frame, GroupElement, ShapeElement, TextBody, TextElement, Theme,
};
use crate::units;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::paint::{self, FillScan};
use super::{is_true, local_attr, local_attr_i64, text};

/// Read-only inputs shared by every extraction call on one slide.
pub(crate) struct SlideContext<'a> {
    pub container: &'a PptxContainer,
    pub rels: &'a Relationships,
    pub part_path: &'a str,
    pub theme: &'a Theme,
    pub scale: f64,
}

/// A parsed `xfrm` transform, already converted to pixels.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Transform {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub flip_h: bool,
    pub flip_v: bool,
}

/// Consume an `xfrm` element: `off`/`ext` children plus rotation and flip
/// attributes. The child-space remapping (`chOff`/`chExt`) is not applied;
/// group children are located by offset addition.
pub(crate) fn parse_transform(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
    scale: f64,
) -> Transform {
    let mut transform = Transform {
        rotation: local_attr_i64(e, b"rot")
            .map(units::rot_to_degrees)
            .unwrap_or(0.0),
        flip_h: local_attr(e, b"flipH").map(|v| is_true(&v)).unwrap_or(false),
        flip_v: local_attr(e, b"flipV").map(|v| is_true(&v)).unwrap_or(false),
        ..Default::default()
    };

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref c)) | Ok(Event::Start(ref c)) => {
                let name = c.name();
                match name.local_name().as_ref() {
                    b"off" => {
                        transform.x = local_attr_i64(c, b"x")
                            .map(|v| units::emu_to_px(v, scale))
                            .unwrap_or(0.0);
                        transform.y = local_attr_i64(c, b"y")
                            .map(|v| units::emu_to_px(v, scale))
                            .unwrap_or(0.0);
                    }
                    b"ext" => {
                        transform.width = local_attr_i64(c, b"cx")
                            .map(|v| units::emu_to_px(v, scale))
                            .unwrap_or(0.0);
                        transform.height = local_attr_i64(c, b"cy")
                            .map(|v| units::emu_to_px(v, scale))
                            .unwrap_or(0.0);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"xfrm" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    transform
}

/// Result of walking one shape-tree container.
#[derive(Debug, Default)]
pub(crate) struct TreeScan {
    pub elements: Vec<Element>,
    pub skipped: Vec<String>,
}

/// Walk a shape-tree container (`spTree`) and extract its children in
/// document order. Positions are group-local until
/// [`propagate_absolute`] runs over the finished tree.
pub(crate) fn parse_shape_tree(
    reader: &mut Reader<&[u8]>,
    ctx: &SlideContext,
    end_local: &[u8],
) -> TreeScan {
    let mut scan = TreeScan::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if !dispatch_child(reader, e, ctx, &mut scan) {
                    let _ = reader.read_to_end(e.name());
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == end_local => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    scan
}

/// Dispatch one container child by node kind. Returns false when the child
/// is not a recognized node (the caller skips it silently).
fn dispatch_child(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart,
    ctx: &SlideContext,
    scan: &mut TreeScan,
) -> bool {
    let name = e.name();
    match name.local_name().as_ref() {
        b"sp" => {
            scan.elements.push(parse_sp(reader, ctx));
            true
        }
        b"pic" => {
            scan.elements
                .push(Element::Image(super::image::parse_picture(reader, ctx)));
            true
        }
        b"grpSp" => {
            let (group, mut skipped) = parse_group(reader, ctx);
            scan.skipped.append(&mut skipped);
            scan.elements.push(Element::Group(group));
            true
        }
        kind @ (b"graphicFrame" | b"cxnSp" | b"contentPart" | b"oleObj") => {
            let kind = String::from_utf8_lossy(kind).to_string();
            log::warn!("skipping unsupported node kind {}", kind);
            scan.skipped.push(kind);
            let _ = reader.read_to_end(e.name());
            true
        }
        _ => false,
    }
}

/// Consume a `grpSp` element: own transform first, then children by
/// recursion. Children stay in group-local coordinates here.
fn parse_group(reader: &mut Reader<&[u8]>, ctx: &SlideContext) -> (GroupElement, Vec<String>) {
    let mut id: Option<String> = None;
    let mut name: Option<String> = None;
    let mut transform = Transform::default();
    let mut scan = TreeScan::default();

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
                    b"xfrm" => {
                        transform = parse_transform(reader, e, ctx.scale);
                    }
                    _ => {
                        if !dispatch_child(reader, e, ctx, &mut scan) {
                            // Group props containers (nvGrpSpPr, grpSpPr)
                            // are descended so cNvPr and xfrm are seen.
                            let local = ename.local_name();
                            if !matches!(local.as_ref(), b"nvGrpSpPr" | b"grpSpPr") {
                                let _ = reader.read_to_end(e.name());
                            }
                        }
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let ename = e.name();
                if ename.local_name().as_ref() == b"cNvPr" {
                    id = local_attr(e, b"id");
                    name = local_attr(e, b"name").filter(|n| !n.is_empty());
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"grpSp" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

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

    (
        GroupElement {
            frame,
            children: scan.elements,
        },
        scan.skipped,
    )
}

/// Consume an `sp` element and build a Shape or Text element.
fn parse_sp(reader: &mut Reader<&[u8]>, ctx: &SlideContext) -> Element {
    let mut id: Option<String> = None;
    let mut name: Option<String> = None;
    let mut is_text_box = false;
    let mut placeholder_type: Option<String> = None;
    let mut transform = Transform::default();
    let mut geometry = "rect".to_string();
    let mut fill_scan = FillScan::default();
    // Outer None: no ln element seen. Inner None: explicit no-line marker.
    let mut outline: Option<Option<crate::model::Outline>> = None;
    let mut body: Option<TextBody> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let ename = e.name();
                match ename.local_name().as_ref() {
                    b"nvSpPr" => {
                        read_non_visual(
                            reader,
                            b"nvSpPr",
                            &mut id,
                            &mut name,
                            &mut is_text_box,
                            &mut placeholder_type,
                        );
                    }
                    b"spPr" => {
                        read_shape_properties(
                            reader,
                            ctx,
                            &mut transform,
                            &mut geometry,
                            &mut fill_scan,
                            &mut outline,
                        );
                    }
                    b"txBody" => {
                        body = text::parse_text_body(reader);
                    }
                    _ => {
                        let _ = reader.read_to_end(e.name());
                    }
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"sp" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

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

    // Fixed classification policy: an authored text box, or a text-bearing
    // placeholder, becomes a Text element; everything else is a Shape that
    // may embed text.
    let is_text_placeholder = matches!(
        placeholder_type.as_deref(),
        Some("title" | "ctrTitle" | "subTitle" | "body")
    );
    if (is_text_box || is_text_placeholder) && body.is_some() {
        return Element::Text(TextElement {
            frame,
            body: body.unwrap_or_default(),
        });
    }

    Element::Shape(ShapeElement {
        frame,
        geometry,
        fill: fill_scan.into_fill_or_default(),
        outline: outline.flatten(),
        text: body,
    })
}

/// Scan a non-visual properties container for identity, text-box flag,
/// and placeholder type.
fn read_non_visual(
    reader: &mut Reader<&[u8]>,
    end_local: &[u8],
    id: &mut Option<String>,
    name: &mut Option<String>,
    is_text_box: &mut bool,
    placeholder_type: &mut Option<String>,
) {
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let ename = e.name();
                match ename.local_name().as_ref() {
                    b"cNvPr" => {
                        *id = local_attr(e, b"id");
                        *name = local_attr(e, b"name").filter(|n| !n.is_empty());
                    }
                    b"cNvSpPr" => {
                        if let Some(v) = local_attr(e, b"txBox") {
                            *is_text_box = is_true(&v);
                        }
                    }
                    b"ph" => {
                        *placeholder_type = local_attr(e, b"type");
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == end_local => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
}

/// Scan an `spPr` container: transform, geometry, fill markers, outline.
fn read_shape_properties(
    reader: &mut Reader<&[u8]>,
    ctx: &SlideContext,
    transform: &mut Transform,
    geometry: &mut String,
    fill_scan: &mut FillScan,
    outline: &mut Option<Option<crate::model::Outline>>,
) {
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let ename = e.name();
                match ename.local_name().as_ref() {
                    b"xfrm" => {
                        *transform = parse_transform(reader, e, ctx.scale);
                    }
                    b"prstGeom" => {
                        if let Some(prst) = local_attr(e, b"prst") {
                            *geometry = prst;
                        }
                        let _ = reader.read_to_end(e.name());
                    }
                    b"custGeom" => {
                        *geometry = "custom".to_string();
                        let _ = reader.read_to_end(e.name());
                    }
                    b"ln" => {
                        let e = e.clone();
                        *outline = Some(paint::parse_outline(reader, &e));
                    }
                    _ => {
                        if !fill_scan.offer_start(reader, e) {
                            let _ = reader.read_to_end(e.name());
                        }
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let ename = e.name();
                match ename.local_name().as_ref() {
                    b"prstGeom" => {
                        if let Some(prst) = local_attr(e, b"prst") {
                            *geometry = prst;
                        }
                    }
                    b"ln" => {
                        *outline = Some(Some(paint::parse_outline_empty(e)));
                    }
                    _ => {
                        fill_scan.offer_empty(e);
                    }
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"spPr" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
}

/// Locate every element in slide-absolute space: child absolute position =
/// parent origin + child local position, recursively through groups.
pub(crate) fn propagate_absolute(elements: &mut [Element], origin_x: f64, origin_y: f64) {
    for element in elements {
        let frame = element.frame_mut();
        frame.offset_by(origin_x, origin_y);
        let (gx, gy) = (frame.x, frame.y);
        if let Element::Group(group) = element {
            propagate_absolute(&mut group.children, gx, gy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Fill, TextElement};

    fn assert_px(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {} px, got {} px",
            expected,
            actual
        );
    }

    fn test_ctx<'a>(
        container: &'a PptxContainer,
        rels: &'a Relationships,
        theme: &'a Theme,
    ) -> SlideContext<'a> {
        SlideContext {
            container,
            rels,
            part_path: "ppt/slides/slide1.xml",
            theme,
            scale: 1.0,
        }
    }

    fn empty_container() -> PptxContainer {
        use std::io::{Cursor, Write};
        use zip::write::SimpleFileOptions;
        use zip::ZipWriter;
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            zip.start_file("placeholder.txt", options).unwrap();
            zip.write_all(b"x").unwrap();
            zip.finish().unwrap();
        }
        PptxContainer::from_bytes(buffer).unwrap()
    }

    fn parse_tree(xml: &str, ctx: &SlideContext) -> TreeScan {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if e.name().local_name().as_ref() == b"spTree" => {
                    return parse_shape_tree(&mut reader, ctx, b"spTree");
                }
                Ok(Event::Eof) => panic!("no spTree in fragment"),
                _ => {}
            }
        }
    }

    const RECT_AND_TEXTBOX: &str = r#"<p:spTree>
      <p:nvGrpSpPr><p:cNvPr id="1" name=""/></p:nvGrpSpPr>
      <p:grpSpPr/>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="4" name="Rectangle 3"/><p:cNvSpPr/></p:nvSpPr>
        <p:spPr>
          <a:xfrm><a:off x="0" y="0"/><a:ext cx="914400" cy="914400"/></a:xfrm>
          <a:prstGeom prst="rect"/>
          <a:solidFill><a:srgbClr val="FF0000"/></a:solidFill>
          <a:ln w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln>
        </p:spPr>
      </p:sp>
      <p:sp>
        <p:nvSpPr><p:cNvPr id="5" name="TextBox 4"/><p:cNvSpPr txBox="1"/></p:nvSpPr>
        <p:spPr><a:xfrm><a:off x="914400" y="0"/><a:ext cx="914400" cy="457200"/></a:xfrm></p:spPr>
        <p:txBody><a:bodyPr/><a:p><a:r><a:rPr b="1" sz="2400"/><a:t>Hello</a:t></a:r></a:p></p:txBody>
      </p:sp>
    </p:spTree>"#;

    #[test]
    fn test_rect_and_textbox() {
        let container = empty_container();
        let rels = Relationships::new();
        let theme = Theme::default();
        let ctx = test_ctx(&container, &rels, &theme);

        let scan = parse_tree(RECT_AND_TEXTBOX, &ctx);
        assert_eq!(scan.elements.len(), 2);
        assert!(scan.skipped.is_empty());

        match &scan.elements[0] {
            Element::Shape(shape) => {
                assert_eq!(shape.geometry, "rect");
                assert_eq!(shape.frame.x, 0.0);
                assert_eq!(shape.frame.width, 96.0);
                assert_eq!(shape.frame.draw_order, 4);
                match &shape.fill {
                    Fill::Solid { color, .. } => assert_eq!(color.resolve(None), "FF0000"),
                    other => panic!("expected solid fill, got {:?}", other),
                }
                let outline = shape.outline.as_ref().unwrap();
                assert_eq!(outline.width, 1.0);
                assert_eq!(outline.color.resolve(None), "000000");
            }
            other => panic!("expected shape, got {:?}", other),
        }

        match &scan.elements[1] {
            Element::Text(TextElement { frame, body }) => {
                assert_eq!(frame.x, 96.0);
                let run = &body.paragraphs[0].runs[0];
                assert_eq!(run.text, "Hello");
                assert!(run.bold);
                assert_eq!(run.size, 24.0);
            }
            other => panic!("expected text element, got {:?}", other),
        }
    }

    #[test]
    fn test_group_offsets() {
        let container = empty_container();
        let rels = Relationships::new();
        let theme = Theme::default();
        let ctx = test_ctx(&container, &rels, &theme);

        // Group at (100,100) px-equivalent EMU with children at local
        // (0,0) and (50,50).
        let xml = r#"<p:spTree>
          <p:grpSp>
            <p:nvGrpSpPr><p:cNvPr id="2" name="Group 1"/></p:nvGrpSpPr>
            <p:grpSpPr><a:xfrm><a:off x="952500" y="952500"/><a:ext cx="1905000" cy="1905000"/></a:xfrm></p:grpSpPr>
            <p:sp>
              <p:nvSpPr><p:cNvPr id="3" name="A"/><p:cNvSpPr/></p:nvSpPr>
              <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="476250" cy="476250"/></a:xfrm></p:spPr>
            </p:sp>
            <p:sp>
              <p:nvSpPr><p:cNvPr id="4" name="B"/><p:cNvSpPr/></p:nvSpPr>
              <p:spPr><a:xfrm><a:off x="476250" y="476250"/><a:ext cx="476250" cy="476250"/></a:xfrm></p:spPr>
            </p:sp>
          </p:grpSp>
        </p:spTree>"#;

        let mut scan = parse_tree(xml, &ctx);
        propagate_absolute(&mut scan.elements, 0.0, 0.0);

        assert_eq!(scan.elements.len(), 1);
        match &scan.elements[0] {
            Element::Group(group) => {
                assert_px(group.frame.x, 100.0);
                assert_eq!(group.children.len(), 2);
                let a = group.children[0].frame();
                let b = group.children[1].frame();
                assert_px(a.x, 100.0);
                assert_px(a.y, 100.0);
                assert_px(a.local_x, 0.0);
                assert_px(a.local_y, 0.0);
                assert_px(b.x, 150.0);
                assert_px(b.y, 150.0);
                assert_px(b.local_x, 50.0);
                assert_px(b.local_y, 50.0);
            }
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_group_positions() {
        let container = empty_container();
        let rels = Relationships::new();
        let theme = Theme::default();
        let ctx = test_ctx(&container, &rels, &theme);

        let xml = r#"<p:spTree>
          <p:grpSp>
            <p:nvGrpSpPr><p:cNvPr id="2" name="Outer"/></p:nvGrpSpPr>
            <p:grpSpPr><a:xfrm><a:off x="95250" y="0"/><a:ext cx="952500" cy="952500"/></a:xfrm></p:grpSpPr>
            <p:grpSp>
              <p:nvGrpSpPr><p:cNvPr id="3" name="Inner"/></p:nvGrpSpPr>
              <p:grpSpPr><a:xfrm><a:off x="95250" y="95250"/><a:ext cx="476250" cy="476250"/></a:xfrm></p:grpSpPr>
              <p:sp>
                <p:nvSpPr><p:cNvPr id="4" name="Leaf"/><p:cNvSpPr/></p:nvSpPr>
                <p:spPr><a:xfrm><a:off x="95250" y="0"/><a:ext cx="95250" cy="95250"/></a:xfrm></p:spPr>
              </p:sp>
            </p:grpSp>
          </p:grpSp>
        </p:spTree>"#;

        let mut scan = parse_tree(xml, &ctx);
        propagate_absolute(&mut scan.elements, 0.0, 0.0);

        let Element::Group(outer) = &scan.elements[0] else {
            panic!("expected outer group");
        };
        let Element::Group(inner) = &outer.children[0] else {
            panic!("expected inner group");
        };
        let leaf = inner.children[0].frame();
        // 10 + 10 + 10 px horizontally, 0 + 10 + 0 vertically.
        assert_px(leaf.x, 30.0);
        assert_px(leaf.y, 10.0);
        assert_px(leaf.local_x, 10.0);
        assert_px(leaf.local_y, 0.0);
    }

    #[test]
    fn test_unsupported_kinds_recorded() {
        let container = empty_container();
        let rels = Relationships::new();
        let theme = Theme::default();
        let ctx = test_ctx(&container, &rels, &theme);

        let xml = r#"<p:spTree>
          <p:graphicFrame><a:graphic><a:graphicData><a:tbl/></a:graphicData></a:graphic></p:graphicFrame>
          <p:cxnSp><p:spPr/></p:cxnSp>
          <p:sp><p:nvSpPr><p:cNvPr id="9" name="S"/></p:nvSpPr><p:spPr/></p:sp>
        </p:spTree>"#;

        let scan = parse_tree(xml, &ctx);
        assert_eq!(scan.elements.len(), 1);
        assert_eq!(scan.skipped, vec!["graphicFrame", "cxnSp"]);
    }

    #[test]
    fn test_shape_with_embedded_text_stays_shape() {
        let container = empty_container();
        let rels = Relationships::new();
        let theme = Theme::default();
        let ctx = test_ctx(&container, &rels, &theme);

        let xml = r#"<p:spTree>
          <p:sp>
            <p:nvSpPr><p:cNvPr id="6" name="Ellipse"/><p:cNvSpPr/></p:nvSpPr>
            <p:spPr><a:prstGeom prst="ellipse"/></p:spPr>
            <p:txBody><a:p><a:r><a:t>label</a:t></a:r></a:p></p:txBody>
          </p:sp>
        </p:spTree>"#;

        let scan = parse_tree(xml, &ctx);
        match &scan.elements[0] {
            Element::Shape(shape) => {
                assert_eq!(shape.geometry, "ellipse");
                let text = shape.text.as_ref().unwrap();
                assert_eq!(text.plain_text(), "label");
            }
            other => panic!("expected shape, got {:?}", other),
        }
    }

    #[test]
    fn test_placeholder_title_is_text_element() {
        let container = empty_container();
        let rels = Relationships::new();
        let theme = Theme::default();
        let ctx = test_ctx(&container, &rels, &theme);

        let xml = r#"<p:spTree>
          <p:sp>
            <p:nvSpPr><p:cNvPr id="7" name="Title 1"/><p:cNvSpPr/>
              <p:nvPr><p:ph type="title"/></p:nvPr>
            </p:nvSpPr>
            <p:spPr/>
            <p:txBody><a:p><a:r><a:t>Agenda</a:t></a:r></a:p></p:txBody>
          </p:sp>
        </p:spTree>"#;

        let scan = parse_tree(xml, &ctx);
        assert!(matches!(&scan.elements[0], Element::Text(_)));
    }
}
