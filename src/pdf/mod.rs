use std::collections::{BTreeMap, HashSet};

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::canvas::{Document, DrawOp, Page, TextOp};
use crate::error::Error;
use crate::fonts::{EmbeddedFont, FontRole, register_font};
use crate::images::write_xobject;
use crate::model::Rgb;

/// Bezier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

fn set_fill(content: &mut Content, [r, g, b]: Rgb) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

fn set_stroke(content: &mut Content, [r, g, b]: Rgb) {
    content.set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

fn rounded_rect_path(content: &mut Content, x0: f32, y0: f32, w: f32, h: f32, radius: f32) {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let k = r * KAPPA;
    let (x1, y1) = (x0 + w, y0 + h);
    content.move_to(x0 + r, y0);
    content.line_to(x1 - r, y0);
    content.cubic_to(x1 - r + k, y0, x1, y0 + r - k, x1, y0 + r);
    content.line_to(x1, y1 - r);
    content.cubic_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1);
    content.line_to(x0 + r, y1);
    content.cubic_to(x0 + r - k, y1, x0, y1 - r + k, x0, y1 - r);
    content.line_to(x0, y0 + r);
    content.cubic_to(x0, y0 + r - k, x0 + r - k, y0, x0 + r, y0);
    content.close_path();
}

fn render_text(
    content: &mut Content,
    op: &TextOp,
    doc: &Document,
    fonts: &BTreeMap<FontRole, EmbeddedFont>,
    page_height: f32,
) {
    if op.text.is_empty() {
        return;
    }
    let Some(embedded) = fonts.get(&op.font) else {
        return;
    };
    let face = doc.fonts().get(op.font);

    let x = op.placed_x(face);
    let baseline = page_height - (op.y + op.size * face.ascender_ratio());

    content.begin_text();
    set_fill(content, op.color);
    content.set_font(Name(embedded.pdf_name.as_bytes()), op.size);
    content.next_line(x, baseline);
    content.show(Str(&embedded.encode(&op.text)));
    content.end_text();
}

fn render_page(
    page: &Page,
    doc: &Document,
    fonts: &BTreeMap<FontRole, EmbeddedFont>,
    image_names: &[String],
) -> Content {
    let page_height = doc.setup().height;
    let mut content = Content::new();

    for op in page.ops() {
        match op {
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
                radius,
            } => {
                let bottom = page_height - y - height;
                content.save_state();
                set_fill(&mut content, *color);
                if *radius > 0.0 {
                    rounded_rect_path(&mut content, *x, bottom, *width, *height, *radius);
                } else {
                    content.rect(*x, bottom, *width, *height);
                }
                content.fill_nonzero();
                content.restore_state();
            }
            DrawOp::Line {
                x1,
                y1,
                x2,
                y2,
                color,
                width,
            } => {
                content.save_state();
                content.set_line_width(*width);
                set_stroke(&mut content, *color);
                content.move_to(*x1, page_height - y1);
                content.line_to(*x2, page_height - y2);
                content.stroke();
                content.restore_state();
            }
            DrawOp::Text(t) => render_text(&mut content, t, doc, fonts, page_height),
            DrawOp::Image {
                image,
                x,
                y,
                width,
                height,
            } => {
                let Some(name) = image_names.get(image.0) else {
                    continue;
                };
                content.save_state();
                content.transform([*width, 0.0, 0.0, *height, *x, page_height - y - height]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
            }
        }
    }
    content
}

/// Write the buffered document as a PDF file.
pub fn serialize(doc: &Document) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    // Phase 1: characters used per font, then fonts
    let mut used_chars: BTreeMap<FontRole, HashSet<char>> = BTreeMap::new();
    for page in doc.pages() {
        for t in page.texts() {
            used_chars.entry(t.font).or_default().extend(t.text.chars());
        }
    }
    for chars in used_chars.values_mut() {
        chars.insert(' ');
    }

    let mut fonts: BTreeMap<FontRole, EmbeddedFont> = BTreeMap::new();
    for (i, (role, chars)) in used_chars.iter().enumerate() {
        let face = doc.fonts().get(*role);
        let entry = register_font(&mut pdf, face, *role, format!("F{}", i + 1), &mut alloc, chars);
        fonts.insert(*role, entry);
    }
    let t_fonts = t0.elapsed();

    // Phase 2: images
    let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
    for asset in doc.images() {
        let xobj_ref = alloc();
        write_xobject(&mut pdf, xobj_ref, asset, &mut alloc);
        image_xobjects.push((format!("Im{}", image_xobjects.len() + 1), xobj_ref));
    }
    let image_names: Vec<String> = image_xobjects.iter().map(|(n, _)| n.clone()).collect();

    // Phase 3: content streams and page tree
    let n = doc.page_count();
    let count = i32::try_from(n).map_err(|_| Error::Pdf(format!("too many pages: {n}")))?;
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in doc.pages().iter().enumerate() {
        let raw = render_page(page, doc, &fonts, &image_names).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(count);

    let setup = doc.setup();
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, setup.width, setup.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for entry in fonts.values() {
                font_dict.pair(Name(entry.pdf_name.as_bytes()), entry.font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    {
        let mut info = pdf.document_info(info_id);
        if let Some(title) = doc.title() {
            info.title(TextStr(title));
        }
        info.creator(TextStr("maintrack-report"));
    }

    log::info!(
        "Serialize: fonts={:.1}ms, pages={:.1}ms, {} pages",
        t_fonts.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_fonts).as_secs_f64() * 1000.0,
        n,
    );

    Ok(pdf.finish())
}
