//! Benchmarks for slidescene parsing performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks synthesize packages of various sizes in memory and
//! measure full scene-graph reconstruction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::{Cursor, Write};

/// Creates a synthetic PPTX package with the given number of slides, each
/// holding a handful of shapes and a text box.
fn create_test_pptx(slide_count: usize) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
</Types>"#,
    )
    .unwrap();

    zip.start_file("_rels/.rels", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
</Relationships>"#,
    )
    .unwrap();

    let mut sld_ids = String::new();
    let mut rels = String::new();
    for i in 0..slide_count {
        sld_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            2 + i
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            2 + i,
            i + 1
        ));
    }

    zip.start_file("ppt/presentation.xml", options).unwrap();
    zip.write_all(
        format!(
            r#"<?xml version="1.0"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"
                xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:sldIdLst>{}</p:sldIdLst>
  <p:sldSz cx="12192000" cy="6858000"/>
</p:presentation>"#,
            sld_ids
        )
        .as_bytes(),
    )
    .unwrap();

    zip.start_file("ppt/_rels/presentation.xml.rels", options)
        .unwrap();
    zip.write_all(
        format!(
            r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        )
        .as_bytes(),
    )
    .unwrap();

    for i in 0..slide_count {
        let mut shapes = String::new();
        for s in 0..8 {
            shapes.push_str(&format!(
                r#"<p:sp>
  <p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
  <p:spPr>
    <a:xfrm><a:off x="{x}" y="457200"/><a:ext cx="914400" cy="914400"/></a:xfrm>
    <a:prstGeom prst="rect"><a:avLst/></a:prstGeom>
    <a:solidFill><a:schemeClr val="accent{accent}"/></a:solidFill>
    <a:ln w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln>
  </p:spPr>
  <p:txBody><a:bodyPr/><a:p><a:r><a:rPr sz="1800"/><a:t>Slide {slide} shape {s}</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
                id = 2 + s,
                x = s * 914_400,
                accent = 1 + (s % 6),
                slide = i + 1,
                s = s,
            ));
        }

        zip.start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
            .unwrap();
        zip.write_all(
            format!(
                r#"<?xml version="1.0"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
    <p:grpSpPr/>
    {}
  </p:spTree></p:cSld>
</p:sld>"#,
                shapes
            )
            .as_bytes(),
        )
        .unwrap();
    }

    zip.finish().unwrap();
    buffer
}

/// Benchmark full package parsing at various slide counts.
fn bench_package_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("package_parsing");

    for slide_count in [1, 10, 50, 100].iter() {
        let data = create_test_pptx(*slide_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(
            BenchmarkId::new("slides", slide_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = slidescene::parse_bytes(black_box(data));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark scene-graph serialization of a parsed presentation.
fn bench_json_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_export");

    for slide_count in [10, 50].iter() {
        let data = create_test_pptx(*slide_count);
        let presentation = slidescene::parse_bytes(&data).unwrap();

        group.bench_with_input(
            BenchmarkId::new("slides", slide_count),
            &presentation,
            |b, pres| {
                b.iter(|| {
                    let _ = black_box(pres).to_json_compact();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_package_parsing, bench_json_export);
criterion_main!(benches);
