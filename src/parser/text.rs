//! Rich-text body extraction.
//!
//! Rebuilds paragraphs and runs from a shape's `txBody` fragment. Run
//! properties are defaulted independently per run (16pt, black, normal
//! weight); nothing inherits from paragraph or body defaults.

use crate::model::{
    Alignment, Autofit, Baseline, Bullet, Caps, Insets, Paragraph, Run, TextBody, VerticalAnchor,
};
use crate::units;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{is_true, local_attr, local_attr_i64};

/// Consume a `txBody` element and rebuild its text.
///
/// A body yielding zero paragraphs is reported as no text (`None`) rather
/// than an empty element.
pub(crate) fn parse_text_body(reader: &mut Reader<&[u8]>) -> Option<TextBody> {
    let mut body = TextBody::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"bodyPr" => {
                        apply_body_properties(e, &mut body);
                        parse_body_pr_children(reader, &mut body);
                    }
                    b"p" => {
                        body.paragraphs.push(parse_paragraph(reader));
                    }
                    // List-style defaults are not inherited by runs.
                    _ => {
                        let _ = reader.read_to_end(e.name());
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"bodyPr" => apply_body_properties(e, &mut body),
                    b"p" => body.paragraphs.push(Paragraph::new()),
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"txBody" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    if body.paragraphs.is_empty() {
        None
    } else {
        Some(body)
    }
}

/// Read `bodyPr` attributes: anchor, wrap, inset margins.
fn apply_body_properties(e: &BytesStart, body: &mut TextBody) {
    if let Some(anchor) = local_attr(e, b"anchor") {
        body.anchor = VerticalAnchor::from_keyword(&anchor);
    }
    if let Some(wrap) = local_attr(e, b"wrap") {
        body.wrap = wrap != "none";
    }

    let mut insets = Insets::default();
    if let Some(v) = local_attr_i64(e, b"lIns") {
        insets.left = units::emu_to_pt(v) as f32;
    }
    if let Some(v) = local_attr_i64(e, b"tIns") {
        insets.top = units::emu_to_pt(v) as f32;
    }
    if let Some(v) = local_attr_i64(e, b"rIns") {
        insets.right = units::emu_to_pt(v) as f32;
    }
    if let Some(v) = local_attr_i64(e, b"bIns") {
        insets.bottom = units::emu_to_pt(v) as f32;
    }
    body.insets = insets;
}

/// Read `bodyPr` children for the autofit mode.
fn parse_body_pr_children(reader: &mut Reader<&[u8]>, body: &mut TextBody) {
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"normAutofit" => body.autofit = Autofit::Normal,
                    b"spAutoFit" => body.autofit = Autofit::Shape,
                    b"noAutofit" => body.autofit = Autofit::None,
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"bodyPr" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
}

/// Consume an `a:p` element and rebuild one paragraph.
fn parse_paragraph(reader: &mut Reader<&[u8]>) -> Paragraph {
    let mut para = Paragraph::new();
    let mut end_props: Option<Run> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"pPr" => {
                        apply_paragraph_properties(e, &mut para);
                        parse_paragraph_pr_children(reader, &mut para);
                    }
                    // Field runs (slide numbers, dates) extract like
                    // literal runs.
                    b"r" | b"fld" => {
                        let local = name.local_name().as_ref().to_vec();
                        para.runs.push(parse_run(reader, &local));
                    }
                    b"br" => {
                        let _ = reader.read_to_end(e.name());
                        para.runs.push(Run::plain("\n"));
                    }
                    b"endParaRPr" => {
                        let mut run = Run::default();
                        apply_run_attributes(e, &mut run);
                        parse_run_pr_children(reader, b"endParaRPr", &mut run);
                        end_props = Some(run);
                    }
                    _ => {
                        let _ = reader.read_to_end(e.name());
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"pPr" => apply_paragraph_properties(e, &mut para),
                    b"br" => para.runs.push(Run::plain("\n")),
                    b"endParaRPr" => {
                        let mut run = Run::default();
                        apply_run_attributes(e, &mut run);
                        end_props = Some(run);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"p" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    // A trailing run-properties marker with no runs keeps its formatting
    // as one empty run.
    if para.runs.is_empty() {
        if let Some(run) = end_props {
            para.runs.push(run);
        }
    }

    para
}

/// Read `pPr` attributes: alignment, indentation, nesting level.
fn apply_paragraph_properties(e: &BytesStart, para: &mut Paragraph) {
    if let Some(algn) = local_attr(e, b"algn") {
        para.align = Alignment::from_keyword(&algn);
    }
    if let Some(v) = local_attr_i64(e, b"marL") {
        para.indent_left = units::emu_to_pt(v) as f32;
    }
    if let Some(v) = local_attr_i64(e, b"marR") {
        para.indent_right = units::emu_to_pt(v) as f32;
    }
    if let Some(v) = local_attr_i64(e, b"indent") {
        let pt = units::emu_to_pt(v) as f32;
        if pt < 0.0 {
            para.indent_hanging = -pt;
        } else {
            para.indent_first_line = pt;
        }
    }
    if let Some(lvl) = local_attr(e, b"lvl").and_then(|v| v.parse().ok()) {
        para.level = lvl;
    }
}

/// Read `pPr` children: spacing and bullet descriptors.
fn parse_paragraph_pr_children(reader: &mut Reader<&[u8]>, para: &mut Paragraph) {
    let mut bullet_size: Option<f32> = None;
    let mut bullet: Option<Bullet> = None;
    let mut bullet_none = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"lnSpc" => {
                        if let Some(pct) = parse_spacing_percent(reader, b"lnSpc") {
                            para.line_spacing = pct;
                        }
                    }
                    b"spcBef" => {
                        if let Some(pt) = parse_spacing_points(reader, b"spcBef") {
                            para.space_before = pt;
                        }
                    }
                    b"spcAft" => {
                        if let Some(pt) = parse_spacing_points(reader, b"spcAft") {
                            para.space_after = pt;
                        }
                    }
                    _ => {
                        let _ = reader.read_to_end(e.name());
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"buChar" => {
                        if let Some(ch) = local_attr(e, b"char") {
                            bullet = Some(Bullet::Char {
                                char: ch,
                                size_pct: None,
                            });
                        }
                    }
                    b"buAutoNum" => {
                        bullet = Some(Bullet::AutoNumber {
                            scheme: local_attr(e, b"type")
                                .unwrap_or_else(|| "arabicPeriod".to_string()),
                            start_at: local_attr(e, b"startAt").and_then(|v| v.parse().ok()),
                            size_pct: None,
                        });
                    }
                    b"buNone" => bullet_none = true,
                    b"buSzPct" => {
                        bullet_size = local_attr_i64(e, b"val").map(|v| v as f32 / 1000.0);
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == b"pPr" => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    para.bullet = if bullet_none {
        None
    } else {
        match (bullet, bullet_size) {
            (Some(Bullet::Char { char, .. }), size_pct) => Some(Bullet::Char { char, size_pct }),
            (
                Some(Bullet::AutoNumber {
                    scheme, start_at, ..
                }),
                size_pct,
            ) => Some(Bullet::AutoNumber {
                scheme,
                start_at,
                size_pct,
            }),
            (None, _) => None,
        }
    };
}

/// Read a spacing container holding `spcPct` (percentage). `spcPts` is
/// ignored for line spacing; the model is percentage-of-single.
fn parse_spacing_percent(reader: &mut Reader<&[u8]>, end_local: &[u8]) -> Option<f32> {
    let mut result = None;
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                let name = e.name();
                if name.local_name().as_ref() == b"spcPct" {
                    result = local_attr_i64(e, b"val").map(|v| v as f32 / 1000.0);
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == end_local => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    result
}

/// Read a spacing container holding `spcPts` (hundredths of a point).
fn parse_spacing_points(reader: &mut Reader<&[u8]>, end_local: &[u8]) -> Option<f32> {
    let mut result = None;
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                let name = e.name();
                if name.local_name().as_ref() == b"spcPts" {
                    result = local_attr_i64(e, b"val").map(|v| v as f32 / 100.0);
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == end_local => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    result
}

/// Consume an `a:r` (or `a:fld`) element and rebuild one run.
fn parse_run(reader: &mut Reader<&[u8]>, end_local: &[u8]) -> Run {
    let mut run = Run::default();
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"rPr" => {
                        apply_run_attributes(e, &mut run);
                        parse_run_pr_children(reader, b"rPr", &mut run);
                    }
                    b"t" => in_text = true,
                    _ => {
                        let _ = reader.read_to_end(e.name());
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                if name.local_name().as_ref() == b"rPr" {
                    apply_run_attributes(e, &mut run);
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_text {
                    text.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(ref end)) => {
                let name = end.name();
                match name.local_name().as_ref() {
                    b"t" => in_text = false,
                    local if local == end_local => break,
                    _ => {}
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    run.text = text;
    run
}

/// Read `rPr` attributes: size, weight, style, decoration, spacing, caps,
/// baseline.
fn apply_run_attributes(e: &BytesStart, run: &mut Run) {
    for attr in e.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).to_string();
        match attr.key.local_name().as_ref() {
            b"sz" => {
                if let Ok(v) = value.parse::<f32>() {
                    run.size = v / 100.0;
                }
            }
            b"b" => run.bold = is_true(&value),
            b"i" => run.italic = is_true(&value),
            b"u" => run.underline = value != "none",
            b"strike" => {
                run.strikethrough = value != "noStrike" && value != "0" && value != "false"
            }
            b"spc" => {
                if let Ok(v) = value.parse::<f32>() {
                    run.letter_spacing = Some(v / 100.0);
                }
            }
            b"cap" => {
                run.caps = match value.as_str() {
                    "small" => Caps::Small,
                    "all" => Caps::All,
                    _ => Caps::None,
                };
            }
            b"baseline" => {
                if let Ok(v) = value.parse::<i64>() {
                    run.baseline = match v {
                        v if v > 0 => Baseline::Superscript,
                        v if v < 0 => Baseline::Subscript,
                        _ => Baseline::Normal,
                    };
                }
            }
            _ => {}
        }
    }
}

/// Read `rPr` children: run color, highlight, font family.
fn parse_run_pr_children(reader: &mut Reader<&[u8]>, end_local: &[u8], run: &mut Run) {
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                match name.local_name().as_ref() {
                    b"solidFill" => {
                        if let Some(cv) = super::paint::parse_color_container(reader, b"solidFill")
                        {
                            run.color = cv.color.resolve(None);
                        }
                    }
                    b"highlight" => {
                        if let Some(cv) = super::paint::parse_color_container(reader, b"highlight")
                        {
                            run.highlight = Some(cv.color.resolve(None));
                        }
                    }
                    _ => {
                        let _ = reader.read_to_end(e.name());
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                if name.local_name().as_ref() == b"latin" {
                    run.font = local_attr(e, b"typeface").filter(|t| !t.is_empty());
                }
            }
            Ok(Event::End(ref end)) if end.name().local_name().as_ref() == end_local => break,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_body(xml: &str) -> Option<TextBody> {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) if e.name().local_name().as_ref() == b"txBody" => {
                    return parse_text_body(&mut reader);
                }
                Ok(Event::Eof) => panic!("no txBody in fragment"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_simple_runs() {
        let body = parse_body(
            r#"<p:txBody><a:bodyPr/><a:p>
                 <a:r><a:t>Hello </a:t></a:r>
                 <a:r><a:rPr b="1" sz="2400"/><a:t>World</a:t></a:r>
               </a:p></p:txBody>"#,
        )
        .unwrap();

        assert_eq!(body.paragraphs.len(), 1);
        let runs = &body.paragraphs[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Hello ");
        assert_eq!(runs[0].size, 16.0);
        assert!(!runs[0].bold);
        assert_eq!(runs[1].text, "World");
        assert!(runs[1].bold);
        assert_eq!(runs[1].size, 24.0);
        // Defaults never inherit across runs.
        assert_eq!(runs[1].color, "000000");
    }

    #[test]
    fn test_empty_body_is_no_text() {
        assert!(parse_body(r#"<p:txBody><a:bodyPr/></p:txBody>"#).is_none());
    }

    #[test]
    fn test_run_color_and_font() {
        let body = parse_body(
            r#"<p:txBody><a:p><a:r>
                 <a:rPr i="1" u="sng" strike="sngStrike">
                   <a:solidFill><a:srgbClr val="FF00FF"/></a:solidFill>
                   <a:latin typeface="Consolas"/>
                 </a:rPr>
                 <a:t>styled</a:t>
               </a:r></a:p></p:txBody>"#,
        )
        .unwrap();

        let run = &body.paragraphs[0].runs[0];
        assert!(run.italic);
        assert!(run.underline);
        assert!(run.strikethrough);
        assert_eq!(run.color, "FF00FF");
        assert_eq!(run.font.as_deref(), Some("Consolas"));
    }

    #[test]
    fn test_paragraph_properties() {
        let body = parse_body(
            r#"<p:txBody><a:p>
                 <a:pPr algn="ctr" marL="457200" indent="-228600" lvl="1">
                   <a:lnSpc><a:spcPct val="150000"/></a:lnSpc>
                   <a:spcBef><a:spcPts val="600"/></a:spcBef>
                   <a:buChar char="•"/>
                 </a:pPr>
                 <a:r><a:t>bulleted</a:t></a:r>
               </a:p></p:txBody>"#,
        )
        .unwrap();

        let para = &body.paragraphs[0];
        assert_eq!(para.align, Alignment::Center);
        assert_eq!(para.indent_left, 36.0);
        assert_eq!(para.indent_hanging, 18.0);
        assert_eq!(para.level, 1);
        assert_eq!(para.line_spacing, 150.0);
        assert_eq!(para.space_before, 6.0);
        assert_eq!(
            para.bullet,
            Some(Bullet::Char {
                char: "•".to_string(),
                size_pct: None
            })
        );
    }

    #[test]
    fn test_auto_number_bullet() {
        let body = parse_body(
            r#"<p:txBody><a:p>
                 <a:pPr><a:buSzPct val="80000"/><a:buAutoNum type="romanUcPeriod" startAt="3"/></a:pPr>
                 <a:r><a:t>third</a:t></a:r>
               </a:p></p:txBody>"#,
        )
        .unwrap();

        assert_eq!(
            body.paragraphs[0].bullet,
            Some(Bullet::AutoNumber {
                scheme: "romanUcPeriod".to_string(),
                start_at: Some(3),
                size_pct: Some(80.0),
            })
        );
    }

    #[test]
    fn test_bu_none_suppresses_bullet() {
        let body = parse_body(
            r#"<p:txBody><a:p>
                 <a:pPr><a:buNone/><a:buChar char="-"/></a:pPr>
                 <a:r><a:t>plain</a:t></a:r>
               </a:p></p:txBody>"#,
        )
        .unwrap();
        assert!(body.paragraphs[0].bullet.is_none());
    }

    #[test]
    fn test_field_run_extracts_like_literal() {
        let body = parse_body(
            r#"<p:txBody><a:p>
                 <a:fld id="{X}" type="slidenum"><a:rPr b="1"/><a:t>4</a:t></a:fld>
               </a:p></p:txBody>"#,
        )
        .unwrap();

        let run = &body.paragraphs[0].runs[0];
        assert_eq!(run.text, "4");
        assert!(run.bold);
    }

    #[test]
    fn test_end_para_rpr_keeps_formatting() {
        let body = parse_body(
            r#"<p:txBody><a:p><a:endParaRPr sz="3200" b="1"/></a:p></p:txBody>"#,
        )
        .unwrap();

        let runs = &body.paragraphs[0].runs;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "");
        assert_eq!(runs[0].size, 32.0);
        assert!(runs[0].bold);
    }

    #[test]
    fn test_end_para_rpr_ignored_when_runs_exist() {
        let body = parse_body(
            r#"<p:txBody><a:p>
                 <a:r><a:t>real</a:t></a:r>
                 <a:endParaRPr sz="4800"/>
               </a:p></p:txBody>"#,
        )
        .unwrap();

        let runs = &body.paragraphs[0].runs;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "real");
        assert_eq!(runs[0].size, 16.0);
    }

    #[test]
    fn test_line_break_run() {
        let body = parse_body(
            r#"<p:txBody><a:p>
                 <a:r><a:t>one</a:t></a:r><a:br/><a:r><a:t>two</a:t></a:r>
               </a:p></p:txBody>"#,
        )
        .unwrap();

        let para = &body.paragraphs[0];
        assert_eq!(para.plain_text(), "one\ntwo");
    }

    #[test]
    fn test_body_layout_hints() {
        let body = parse_body(
            r#"<p:txBody>
                 <a:bodyPr anchor="ctr" wrap="none" lIns="182880" tIns="91440">
                   <a:normAutofit/>
                 </a:bodyPr>
                 <a:p><a:r><a:t>x</a:t></a:r></a:p>
               </p:txBody>"#,
        )
        .unwrap();

        assert_eq!(body.anchor, VerticalAnchor::Middle);
        assert!(!body.wrap);
        assert_eq!(body.autofit, Autofit::Normal);
        assert_eq!(body.insets.left, 14.4);
        assert_eq!(body.insets.top, 7.2);
    }
}
