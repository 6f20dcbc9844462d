use crate::canvas::{Document, TextOptions, TextStyle};
use crate::fonts::FontRole;
use crate::model::Alignment;

use super::{BORDER, FOOTER_INK};

/// Footer text baseline box sits this far below the printable bottom.
pub const FOOTER_OFFSET: f32 = 18.0;
const FOOTER_RULE_GAP: f32 = 10.0;

pub fn footer_label(page_number: usize, total: usize) -> String {
    format!("Page {page_number} of {total}")
}

/// Stamp `Page i of N` on every buffered page, in creation order. Runs after
/// all content exists so `N` is final. Page cursors are left untouched and
/// the previously current page is restored. Returns `N`.
pub fn stamp_footers(doc: &mut Document) -> usize {
    let total = doc.page_count();
    let previous = doc.current_page_index();
    let setup = *doc.setup();
    let left = setup.printable_left();
    let right = setup.printable_right();
    let footer_y = setup.printable_bottom() + FOOTER_OFFSET;
    let style = TextStyle {
        font: FontRole::Regular,
        size: 9.0,
        color: FOOTER_INK,
    };

    for index in 0..total {
        doc.switch_to_page(index);
        doc.draw_line(
            left,
            footer_y - FOOTER_RULE_GAP,
            right,
            footer_y - FOOTER_RULE_GAP,
            BORDER,
            0.5,
        );
        doc.draw_text(
            &footer_label(index + 1, total),
            left,
            footer_y,
            &TextOptions::line(style, right - left, Alignment::Right),
        );
    }

    doc.switch_to_page(previous);
    log::debug!("Footers stamped on {total} pages");
    total
}
