use chrono::NaiveDateTime;

use crate::canvas::{Document, ImageId, TextOptions, TextStyle};
use crate::config::Branding;
use crate::fonts::FontRole;
use crate::model::{Alignment, HeaderMeta};

use super::{BORDER, INK, INK_MUTED, LIGHT_PANEL, NAVY, SUBTLE_ON_NAVY, WHITE};

pub const BAND_HEIGHT: f32 = 68.0;
const LOGO_Y: f32 = 16.0;
const LOGO_W: f32 = 100.0;
const LOGO_H: f32 = 36.0;
const FALLBACK_NAME_Y: f32 = 24.0;
const FALLBACK_NAME_W: f32 = 220.0;
const COMPANY_BLOCK_OFFSET: f32 = 240.0;
const TITLE_GAP: f32 = 24.0;

const META_BOX_HEIGHT: f32 = 62.0;
const META_BOX_RADIUS: f32 = 10.0;
const META_PAD_X: f32 = 14.0;
const META_PAD_Y: f32 = 12.0;
const META_ROW_PITCH: f32 = 24.0;
pub const META_LABEL_WIDTH: f32 = 92.0;
const DIVIDER_GAP: f32 = 16.0;
const BLOCK_END_GAP: f32 = 28.0;

pub const PREPARED_BY_PLACEHOLDER: &str = "-";
pub const PERIOD_PLACEHOLDER: &str = "All time";

/// The four label/value pairs of the metadata grid, placeholders applied.
#[derive(Clone, Debug, PartialEq)]
pub struct MetadataGrid {
    pub report_no: String,
    pub prepared_by: String,
    pub generated_at: String,
    pub period: String,
}

impl MetadataGrid {
    pub fn resolve(meta: &HeaderMeta, generated: NaiveDateTime) -> Self {
        let present = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            report_no: present(&meta.report_id)
                .unwrap_or_else(|| format!("REP-{}", generated.format("%Y%m%d"))),
            prepared_by: present(&meta.prepared_by)
                .unwrap_or_else(|| PREPARED_BY_PLACEHOLDER.to_string()),
            generated_at: generated.format("%Y-%m-%d %H:%M").to_string(),
            period: present(&meta.date_range_label)
                .unwrap_or_else(|| PERIOD_PLACEHOLDER.to_string()),
        }
    }

    /// Row-major: `[(Report No, Prepared By), (Generated At, Period)]`.
    pub fn rows(&self) -> [[(&'static str, &str); 2]; 2] {
        [
            [
                ("Report No", self.report_no.as_str()),
                ("Prepared By", self.prepared_by.as_str()),
            ],
            [
                ("Generated At", self.generated_at.as_str()),
                ("Period", self.period.as_str()),
            ],
        ]
    }
}

/// Draw the once-per-report header block on the current page and leave the
/// cursor at a fixed gap below its divider.
pub fn draw_header_block(
    doc: &mut Document,
    meta: &HeaderMeta,
    branding: &Branding,
    logo: Option<ImageId>,
    generated: NaiveDateTime,
) -> MetadataGrid {
    let setup = *doc.setup();
    let left = setup.printable_left();
    let right = setup.printable_right();
    let full_w = right - left;

    doc.draw_filled_rect(0.0, 0.0, setup.width, BAND_HEIGHT, NAVY);

    match logo {
        Some(id) => doc.draw_image(id, left, LOGO_Y, LOGO_W, LOGO_H),
        None => {
            let style = TextStyle {
                font: FontRole::Bold,
                size: 12.0,
                color: WHITE,
            };
            doc.draw_text(
                &branding.company_name,
                left,
                FALLBACK_NAME_Y,
                &TextOptions::line(style, FALLBACK_NAME_W, Alignment::Left),
            );
        }
    }

    let block_x = left + COMPANY_BLOCK_OFFSET;
    let block_w = right - block_x;
    let company_lines = [
        (branding.company_name.as_str(), 18.0, FontRole::Bold, 11.0, WHITE),
        (branding.address.as_str(), 34.0, FontRole::Regular, 8.5, SUBTLE_ON_NAVY),
        (branding.contact.as_str(), 46.0, FontRole::Regular, 8.5, SUBTLE_ON_NAVY),
    ];
    for (text, y, font, size, color) in company_lines {
        let style = TextStyle { font, size, color };
        doc.draw_text(text, block_x, y, &TextOptions::line(style, block_w, Alignment::Right));
    }

    let title_style = TextStyle {
        font: FontRole::Bold,
        size: 20.0,
        color: NAVY,
    };
    doc.draw_text(
        &meta.title,
        left,
        BAND_HEIGHT + TITLE_GAP,
        &TextOptions::flowing(title_style, full_w),
    );
    let mut last_size = title_style.size;

    if let Some(subtitle) = meta.subtitle.as_deref().filter(|s| !s.trim().is_empty()) {
        let style = TextStyle {
            font: FontRole::Regular,
            size: 11.0,
            color: INK_MUTED,
        };
        let y = doc.cursor_y();
        doc.draw_text(subtitle, left, y, &TextOptions::flowing(style, full_w));
        last_size = style.size;
    }

    let gap = 0.8 * doc.fonts().regular.line_height(last_size);
    let box_y = doc.cursor_y() + gap;

    let grid = MetadataGrid::resolve(meta, generated);

    doc.draw_rounded_rect(left, box_y, full_w, META_BOX_HEIGHT, META_BOX_RADIUS, LIGHT_PANEL);

    let col_w = (full_w - META_PAD_X * 2.0) / 2.0;
    let value_w = col_w - META_LABEL_WIDTH;
    let label_style = TextStyle {
        font: FontRole::Bold,
        size: 9.0,
        color: INK,
    };
    let value_style = TextStyle {
        font: FontRole::Regular,
        size: 9.0,
        color: INK_MUTED,
    };

    for (ri, row) in grid.rows().iter().enumerate() {
        let y = box_y + META_PAD_Y + ri as f32 * META_ROW_PITCH;
        for (ci, (label, value)) in row.iter().enumerate() {
            let x = left + META_PAD_X + ci as f32 * col_w;
            doc.draw_text(
                label,
                x,
                y,
                &TextOptions::line(label_style, META_LABEL_WIDTH, Alignment::Left),
            );
            doc.draw_text(
                value,
                x + META_LABEL_WIDTH,
                y,
                &TextOptions::line(value_style, value_w, Alignment::Left),
            );
        }
    }

    let divider_y = box_y + META_BOX_HEIGHT + DIVIDER_GAP;
    doc.draw_line(left, divider_y, right, divider_y, BORDER, 1.0);
    doc.set_cursor_y(box_y + META_BOX_HEIGHT + BLOCK_END_GAP);

    grid
}
