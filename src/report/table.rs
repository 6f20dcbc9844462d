use crate::canvas::{Document, TextOptions, TextStyle};
use crate::error::LayoutError;
use crate::fonts::FontRole;
use crate::model::{Alignment, Column, Row};

use super::{BORDER, INK, NAVY, WHITE, ZEBRA};

pub const HEADER_ROW_HEIGHT: f32 = 22.0;
pub const DATA_ROW_HEIGHT: f32 = 20.0;
/// Extra room a row needs below itself before a page break is forced.
pub const ROW_BREAK_SLACK: f32 = 6.0;
pub const TRAILING_GAP: f32 = 8.0;
const CELL_PAD_X: f32 = 6.0;
const CELL_PAD_Y: f32 = 6.0;
const CELL_TEXT_INSET: f32 = 10.0;
const SEPARATOR_WIDTH: f32 = 0.5;
const HEADER_FONT_SIZE: f32 = 10.0;
const CELL_FONT_SIZE: f32 = 9.0;

const ELLIPSIS: char = '…';

/// Character budget for a column: narrow columns truncate harder.
pub fn cell_char_budget(column_width: f32) -> usize {
    if column_width <= 90.0 {
        14
    } else if column_width <= 140.0 {
        24
    } else {
        40
    }
}

/// Trim `value` and cut it to `max_chars` characters, the last being an
/// ellipsis when anything was dropped. Applying it twice changes nothing.
pub fn truncate_cell(value: &str, max_chars: usize) -> String {
    let v = value.trim();
    if v.chars().count() <= max_chars {
        return v.to_string();
    }
    let mut out: String = v.chars().take(max_chars.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}

/// Check column widths and row arity before anything is drawn.
pub fn validate_table(columns: &[Column], rows: &[Row]) -> Result<(), LayoutError> {
    for (ci, col) in columns.iter().enumerate() {
        if !(col.width.is_finite() && col.width > 0.0) {
            return Err(LayoutError::NonPositiveColumnWidth {
                column: ci,
                width: col.width,
            });
        }
    }
    for (ri, row) in rows.iter().enumerate() {
        if row.len() != columns.len() {
            return Err(LayoutError::RowArity {
                row: ri,
                expected: columns.len(),
                found: row.len(),
            });
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableState {
    AwaitingHeader { page: usize },
    DrawingRows { page: usize, row_index: usize },
    Done,
}

/// Where a row landed, and whether placing it started a new page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowPlacement {
    pub row_index: usize,
    pub page_index: usize,
    pub page_broke: bool,
    pub shaded: bool,
    pub top: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSummary {
    pub rows: usize,
    pub first_page: usize,
    pub last_page: usize,
    pub page_breaks: usize,
}

/// Streams rows onto the document, breaking pages and repeating the
/// column-header band as needed.
pub struct TableRenderer<'a> {
    columns: &'a [Column],
    state: TableState,
    first_page: usize,
    rows_drawn: usize,
    page_breaks: usize,
}

impl<'a> TableRenderer<'a> {
    /// Validate the columns and draw the first column-header band at the cursor.
    /// When the band and one row no longer fit below the cursor, the table
    /// starts on a fresh page instead.
    pub fn begin(doc: &mut Document, columns: &'a [Column]) -> Result<Self, LayoutError> {
        validate_table(columns, &[])?;
        let setup = *doc.setup();
        let needed = HEADER_ROW_HEIGHT + DATA_ROW_HEIGHT + ROW_BREAK_SLACK;
        if doc.cursor_y() > setup.printable_top()
            && doc.cursor_y() + needed > setup.printable_bottom()
        {
            log::debug!(
                "TABLE no room below y={:.1}, starting on a new page",
                doc.cursor_y()
            );
            doc.add_page();
        }
        let page = doc.current_page_index();
        let mut table = Self {
            columns,
            state: TableState::AwaitingHeader { page },
            first_page: page,
            rows_drawn: 0,
            page_breaks: 0,
        };
        table.render_column_header_band(doc);
        Ok(table)
    }

    pub fn state(&self) -> TableState {
        self.state
    }

    /// Number of rows that fit on a continuation page.
    pub fn rows_per_page(doc: &Document) -> usize {
        let setup = doc.setup();
        let first_row_top = setup.printable_top() + HEADER_ROW_HEIGHT;
        let room = setup.printable_bottom() - first_row_top - (DATA_ROW_HEIGHT + ROW_BREAK_SLACK);
        if room < 0.0 {
            // Still one row per page: rows are always placed after a break.
            1
        } else {
            (room / DATA_ROW_HEIGHT).floor() as usize + 1
        }
    }

    fn render_column_header_band(&mut self, doc: &mut Document) {
        let TableState::AwaitingHeader { page } = self.state else {
            return;
        };
        let setup = *doc.setup();
        let left = setup.printable_left();
        let y = doc.cursor_y();

        doc.draw_filled_rect(left, y, setup.printable_width(), HEADER_ROW_HEIGHT, NAVY);

        let style = TextStyle {
            font: FontRole::Bold,
            size: HEADER_FONT_SIZE,
            color: WHITE,
        };
        let mut x = left;
        for col in self.columns {
            doc.draw_text(
                &col.header,
                x + CELL_PAD_X,
                y + CELL_PAD_Y,
                &TextOptions::line(style, col.width - CELL_TEXT_INSET, Alignment::Left),
            );
            x += col.width;
        }

        doc.set_cursor_y(y + HEADER_ROW_HEIGHT);
        self.state = TableState::DrawingRows {
            page,
            row_index: self.rows_drawn,
        };
    }

    /// Start a new page when the next row would cross the printable bottom.
    fn ensure_space(&mut self, doc: &mut Document, needed: f32) -> bool {
        let bottom = doc.setup().printable_bottom();
        if doc.cursor_y() + needed <= bottom {
            return false;
        }
        let page = doc.add_page();
        self.page_breaks += 1;
        log::debug!(
            "TABLE page break before row={} → page={} (needed={:.1})",
            self.rows_drawn,
            page + 1,
            needed
        );
        self.state = TableState::AwaitingHeader { page };
        self.render_column_header_band(doc);
        true
    }

    pub fn append_row(&mut self, doc: &mut Document, row: &[String]) -> Result<RowPlacement, LayoutError> {
        if self.state == TableState::Done {
            return Err(LayoutError::TableClosed);
        }
        if row.len() != self.columns.len() {
            return Err(LayoutError::RowArity {
                row: self.rows_drawn,
                expected: self.columns.len(),
                found: row.len(),
            });
        }

        let page_broke = self.ensure_space(doc, DATA_ROW_HEIGHT + ROW_BREAK_SLACK);

        let setup = *doc.setup();
        let left = setup.printable_left();
        let right = setup.printable_right();
        let y = doc.cursor_y();
        let row_index = self.rows_drawn;
        let shaded = row_index % 2 == 1;

        if shaded {
            doc.draw_filled_rect(left, y, right - left, DATA_ROW_HEIGHT, ZEBRA);
        }
        doc.draw_line(
            left,
            y + DATA_ROW_HEIGHT,
            right,
            y + DATA_ROW_HEIGHT,
            BORDER,
            SEPARATOR_WIDTH,
        );

        let style = TextStyle {
            font: FontRole::Regular,
            size: CELL_FONT_SIZE,
            color: INK,
        };
        let mut x = left;
        for (col, cell) in self.columns.iter().zip(row) {
            let shown = truncate_cell(cell, cell_char_budget(col.width));
            doc.draw_text(
                &shown,
                x + CELL_PAD_X,
                y + CELL_PAD_Y,
                &TextOptions::line(style, col.width - CELL_TEXT_INSET, col.align),
            );
            x += col.width;
        }

        doc.set_cursor_y(y + DATA_ROW_HEIGHT);
        let page_index = doc.current_page_index();
        self.rows_drawn += 1;
        self.state = TableState::DrawingRows {
            page: page_index,
            row_index: self.rows_drawn,
        };

        Ok(RowPlacement {
            row_index,
            page_index,
            page_broke,
            shaded,
            top: y,
        })
    }

    /// Close the table and leave the trailing gap below the last row.
    pub fn finish(&mut self, doc: &mut Document) -> TableSummary {
        if self.state != TableState::Done {
            let y = doc.cursor_y();
            doc.set_cursor_y(y + TRAILING_GAP);
            self.state = TableState::Done;
        }
        TableSummary {
            rows: self.rows_drawn,
            first_page: self.first_page,
            last_page: self.first_page + self.page_breaks,
            page_breaks: self.page_breaks,
        }
    }
}

/// Render a whole table. Nothing is drawn if the input breaks the column contract.
pub fn render_table(
    doc: &mut Document,
    columns: &[Column],
    rows: &[Row],
) -> Result<TableSummary, LayoutError> {
    validate_table(columns, rows)?;
    let mut table = TableRenderer::begin(doc, columns)?;
    for row in rows {
        table.append_row(doc, row)?;
    }
    Ok(table.finish(doc))
}
