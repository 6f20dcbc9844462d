//! Page canvas and layout primitives.
//!
//! A [`Document`] buffers every page as a list of [`DrawOp`]s so later passes
//! (footers) can revisit pages after the page count is known. Coordinates are
//! points with a top-left origin on the sheet; the PDF writer flips them.

use std::path::Path;

use crate::fonts::{FontFace, FontRole, FontSet};
use crate::images::ImageAsset;
use crate::model::{Alignment, PageSetup, Rgb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font: FontRole,
    pub size: f32,
    pub color: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextOptions {
    pub width: Option<f32>,
    pub align: Alignment,
    pub style: TextStyle,
    pub allow_wrap: bool,
}

impl TextOptions {
    /// Flowing text: wraps to `width` and moves the cursor below itself.
    pub fn flowing(style: TextStyle, width: f32) -> Self {
        Self {
            width: Some(width),
            align: Alignment::Left,
            style,
            allow_wrap: true,
        }
    }

    /// A single positioned line that leaves the cursor alone.
    pub fn line(style: TextStyle, width: f32, align: Alignment) -> Self {
        Self {
            width: Some(width),
            align,
            style,
            allow_wrap: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextOp {
    pub text: String,
    pub x: f32,
    pub y: f32, // top of the line box
    pub width: Option<f32>,
    pub align: Alignment,
    pub font: FontRole,
    pub size: f32,
    pub color: Rgb,
}

impl TextOp {
    /// Left edge of the rendered line once `align` is applied within `width`,
    /// measured with `face`.
    pub fn placed_x(&self, face: &FontFace) -> f32 {
        let text_w = face.text_width(&self.text, self.size);
        match (self.align, self.width) {
            (Alignment::Center, Some(w)) => self.x + (w - text_w) / 2.0,
            (Alignment::Right, Some(w)) => self.x + w - text_w,
            _ => self.x,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
        radius: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        width: f32,
    },
    Text(TextOp),
    Image {
        image: ImageId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// One physical sheet: append-only draw operations plus its own cursor.
#[derive(Clone, Debug)]
pub struct Page {
    ops: Vec<DrawOp>,
    cursor_y: f32,
}

impl Page {
    fn new(cursor_y: f32) -> Self {
        Self {
            ops: Vec::new(),
            cursor_y,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.text == needle)
    }
}

pub struct Document {
    setup: PageSetup,
    fonts: FontSet,
    pages: Vec<Page>,
    current: usize,
    images: Vec<ImageAsset>,
    title: Option<String>,
}

impl Document {
    /// A document with one empty page whose cursor sits at the printable top.
    pub fn new(setup: PageSetup, fonts: FontSet) -> Self {
        Self {
            setup,
            fonts,
            pages: vec![Page::new(setup.printable_top())],
            current: 0,
            images: Vec::new(),
            title: None,
        }
    }

    /// Title written into the PDF document info.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn setup(&self) -> &PageSetup {
        &self.setup
    }

    pub fn fonts(&self) -> &FontSet {
        &self.fonts
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current]
    }

    /// Append a page, make it current and return its index.
    pub fn add_page(&mut self) -> usize {
        self.pages.push(Page::new(self.setup.printable_top()));
        self.current = self.pages.len() - 1;
        self.current
    }

    /// Make an existing page the draw target. Returns false if out of range.
    pub fn switch_to_page(&mut self, index: usize) -> bool {
        if index < self.pages.len() {
            self.current = index;
            true
        } else {
            false
        }
    }

    pub fn cursor_y(&self) -> f32 {
        self.pages[self.current].cursor_y
    }

    pub fn set_cursor_y(&mut self, y: f32) {
        self.pages[self.current].cursor_y = y;
    }

    fn push(&mut self, op: DrawOp) {
        self.pages[self.current].ops.push(op);
    }

    pub fn draw_filled_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        self.draw_rounded_rect(x, y, width, height, 0.0, color);
    }

    pub fn draw_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        color: Rgb,
    ) {
        self.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
            radius,
        });
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb, width: f32) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        });
    }

    /// Draw text whose first line box starts at (`x`, `y`). Returns the height
    /// used. Wrapping text moves the cursor below its last line; single-line
    /// text never touches the cursor.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, opts: &TextOptions) -> f32 {
        let style = opts.style;
        let face = self.fonts.get(style.font);
        let line_h = face.line_height(style.size);

        if !opts.allow_wrap {
            let single: String = text
                .chars()
                .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                .collect();
            self.push(DrawOp::Text(TextOp {
                text: single,
                x,
                y,
                width: opts.width,
                align: opts.align,
                font: style.font,
                size: style.size,
                color: style.color,
            }));
            return line_h;
        }

        let max_w = opts
            .width
            .unwrap_or_else(|| self.setup.printable_right() - x);
        let lines = face.wrap(text, style.size, max_w);
        for (i, line) in lines.iter().enumerate() {
            self.push(DrawOp::Text(TextOp {
                text: line.clone(),
                x,
                y: y + i as f32 * line_h,
                width: opts.width,
                align: opts.align,
                font: style.font,
                size: style.size,
                color: style.color,
            }));
        }
        let used = lines.len() as f32 * line_h;
        self.set_cursor_y(y + used);
        used
    }

    /// Register an image for this document. Missing or undecodable files are
    /// logged and yield `None`.
    pub fn load_image(&mut self, path: &Path) -> Option<ImageId> {
        match ImageAsset::load(path) {
            Ok(asset) => Some(self.add_image(asset)),
            Err(e) => {
                log::warn!("Image {} not usable: {e}", path.display());
                None
            }
        }
    }

    pub fn add_image(&mut self, asset: ImageAsset) -> ImageId {
        self.images.push(asset);
        ImageId(self.images.len() - 1)
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageAsset> {
        self.images.get(id.0)
    }

    pub(crate) fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    /// Draw an image scaled to fit the box, anchored at its top-left corner.
    pub fn draw_image(&mut self, id: ImageId, x: f32, y: f32, box_w: f32, box_h: f32) {
        let Some((width, height)) = self.image(id).map(|img| img.fit(box_w, box_h)) else {
            return;
        };
        self.push(DrawOp::Image {
            image: id,
            x,
            y,
            width,
            height,
        });
    }
}
