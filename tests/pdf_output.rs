mod common;

use maintrack_report::fonts::FontSet;
use maintrack_report::pdf::serialize;
use maintrack_report::{HeaderMeta, Report, ReportRenderer};

fn sample_report(rows: usize) -> Report {
    Report {
        meta: HeaderMeta::titled("Maintenance Records"),
        columns: common::columns(),
        rows: common::rows(rows),
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

#[test]
fn output_is_a_pdf_with_the_rendered_page_count() {
    let _ = env_logger::builder().is_test(true).try_init();
    let branding = common::branding();
    let clock = common::frozen_clock();
    let renderer = ReportRenderer::new(&branding, &clock);
    let report = sample_report(120);

    let (doc, summary) = renderer.build(&report).unwrap();
    let bytes = serialize(&doc).unwrap();

    assert!(bytes.starts_with(b"%PDF-"));
    assert!(contains(&bytes, "%%EOF"));
    assert!(contains(&bytes, &format!("/Count {}", summary.pages)));
    assert!(contains(&bytes, "/Helvetica-Bold"));
    assert!(contains(&bytes, "/FlateDecode"));
    assert!(contains(&bytes, "maintrack-report"));
    assert_eq!(doc.title(), Some("Maintenance Records"));
    assert!(contains(&bytes, "(Maintenance Records)"));
}

#[test]
fn render_is_deterministic_with_a_frozen_clock() {
    let branding = common::branding();
    let clock = common::frozen_clock();
    let renderer = ReportRenderer::new(&branding, &clock).with_fonts(FontSet::builtin());
    let report = sample_report(40);

    assert_eq!(renderer.render(&report).unwrap(), renderer.render(&report).unwrap());
}

#[test]
fn empty_table_still_serializes() {
    let branding = common::branding();
    let clock = common::frozen_clock();
    let report = Report {
        meta: HeaderMeta::titled("Completed Maintenance per Month"),
        columns: vec![maintrack_report::Column::new("Month", 200.0)],
        rows: Vec::new(),
    };
    let bytes = ReportRenderer::new(&branding, &clock).render(&report).unwrap();
    assert!(contains(&bytes, "/Count 1"));
}

#[test]
fn jpeg_logo_is_embedded_as_dct() {
    let path = common::temp_path("logo.jpg");
    image::RgbImage::from_pixel(120, 40, image::Rgb([20, 40, 90]))
        .save(&path)
        .unwrap();
    let mut branding = common::branding();
    branding.logo_path = Some(path);
    let clock = common::frozen_clock();

    let bytes = ReportRenderer::new(&branding, &clock)
        .render(&sample_report(2))
        .unwrap();
    assert!(contains(&bytes, "/DCTDecode"));
    assert!(contains(&bytes, "/Im1"));
}

#[test]
fn unreadable_font_falls_back_to_helvetica() {
    let path = common::temp_path("broken.ttf");
    std::fs::write(&path, b"definitely not a font").unwrap();
    let mut branding = common::branding();
    branding.regular_font = Some(path);
    let clock = common::frozen_clock();

    let (doc, _) = ReportRenderer::new(&branding, &clock)
        .build(&sample_report(2))
        .unwrap();
    assert!(doc.fonts().regular.is_builtin());
    let bytes = serialize(&doc).unwrap();
    assert!(contains(&bytes, "/Helvetica"));
}

#[test]
fn truetype_fonts_are_embedded_and_measured() {
    let Some(font) = common::system_ttf() else {
        eprintln!("no system TrueType font found, skipping");
        return;
    };
    let mut branding = common::branding();
    branding.regular_font = Some(font.clone());
    branding.bold_font = Some(font);
    let clock = common::frozen_clock();

    let (doc, summary) = ReportRenderer::new(&branding, &clock)
        .build(&sample_report(60))
        .unwrap();
    assert!(!doc.fonts().regular.is_builtin());
    assert!(!doc.fonts().bold.is_builtin());

    // Right-aligned footers end flush with the printable right edge using
    // the embedded face's own advance widths.
    let setup = *doc.setup();
    let builtin = FontSet::builtin();
    for (i, page) in doc.pages().iter().enumerate() {
        let label = format!("Page {} of {}", i + 1, summary.pages);
        let footer = page.texts().find(|t| t.text == label).unwrap();
        let face = doc.fonts().get(footer.font);
        let width = face.text_width(&footer.text, footer.size);
        assert!(width > 0.0);
        assert_ne!(width, builtin.get(footer.font).text_width(&footer.text, footer.size));
        let right = footer.placed_x(face) + width;
        assert!((right - setup.printable_right()).abs() < 1e-3, "page {i}: {right}");
    }

    let bytes = serialize(&doc).unwrap();
    for needle in ["/Type0", "/Identity-H", "/ToUnicode", "/FontFile2", "/CIDFontType2"] {
        assert!(contains(&bytes, needle), "missing {needle}");
    }
    assert!(!contains(&bytes, "/WinAnsiEncoding"));
}

#[test]
fn layout_errors_surface_from_render() {
    let branding = common::branding();
    let clock = common::frozen_clock();
    let mut report = sample_report(3);
    report.rows[1].push("extra".into());

    let err = ReportRenderer::new(&branding, &clock)
        .render(&report)
        .unwrap_err();
    assert!(matches!(
        err,
        maintrack_report::Error::Layout(maintrack_report::LayoutError::RowArity { row: 1, .. })
    ));
}
