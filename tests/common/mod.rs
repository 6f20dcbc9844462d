#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;

use maintrack_report::canvas::{Document, DrawOp, Page};
use maintrack_report::fonts::FontSet;
use maintrack_report::model::Margins;
use maintrack_report::report::table::{DATA_ROW_HEIGHT, HEADER_ROW_HEIGHT, ROW_BREAK_SLACK};
use maintrack_report::{Branding, Column, FixedClock, PageSetup, Row};

pub const MARGIN: f32 = 40.0;

pub fn frozen_clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap(),
    )
}

/// A page whose printable area holds exactly `k` data rows below one
/// column-header band.
pub fn setup_for_rows(k: usize) -> PageSetup {
    PageSetup {
        width: 595.0,
        height: 2.0 * MARGIN + HEADER_ROW_HEIGHT + k as f32 * DATA_ROW_HEIGHT + ROW_BREAK_SLACK,
        margins: Margins {
            top: MARGIN,
            bottom: MARGIN,
            left: MARGIN,
            right: MARGIN,
        },
    }
}

pub fn table_document(setup: PageSetup) -> Document {
    Document::new(setup, FontSet::builtin())
}

pub fn columns() -> Vec<Column> {
    vec![
        Column::new("Asset ID", 80.0),
        Column::new("Name", 120.0),
        Column::new("Assigned To", 160.0),
    ]
}

pub fn rows(n: usize) -> Vec<Row> {
    (0..n)
        .map(|i| {
            vec![
                format!("AST-{i:04}"),
                format!("Generator {i}"),
                format!("tech{i}@company.com"),
            ]
        })
        .collect()
}

pub fn branding() -> Branding {
    Branding::plain("Acme Facilities")
}

/// Tops of the column-header bands drawn on a page.
pub fn header_band_tops(page: &Page) -> Vec<f32> {
    page.ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillRect { y, height, .. } if *height == HEADER_ROW_HEIGHT => Some(*y),
            _ => None,
        })
        .collect()
}

/// Tops of the shaded (zebra) rows on a page.
pub fn zebra_tops(page: &Page) -> Vec<f32> {
    page.ops()
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillRect { y, height, .. } if *height == DATA_ROW_HEIGHT => Some(*y),
            _ => None,
        })
        .collect()
}

/// Horizontal row separators inside the printable area.
pub fn separator_count(page: &Page, setup: &PageSetup) -> usize {
    page.ops()
        .iter()
        .filter(|op| match op {
            DrawOp::Line { y1, y2, width, .. } => {
                *width == 0.5 && y1 == y2 && *y1 <= setup.printable_bottom()
            }
            _ => false,
        })
        .count()
}

pub fn texts(page: &Page) -> Vec<String> {
    page.texts().map(|t| t.text.clone()).collect()
}

/// A TrueType font from the usual system locations, if this machine has one.
pub fn system_ttf() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .find(|p| p.is_file())
}

pub fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("maintrack-report-tests");
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir.join(format!("{}-{}", std::process::id(), name))
}
