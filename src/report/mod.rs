pub mod footer;
pub mod header;
pub mod table;

use std::time::Instant;

use crate::canvas::Document;
use crate::clock::Clock;
use crate::config::Branding;
use crate::error::Error;
use crate::fonts::FontSet;
use crate::model::{PageSetup, Report, Rgb};
use crate::pdf;

use footer::stamp_footers;
use header::{MetadataGrid, draw_header_block};
use table::{TableSummary, render_table, validate_table};

pub(crate) const NAVY: Rgb = [0x0f, 0x17, 0x2a];
pub(crate) const INK: Rgb = NAVY;
pub(crate) const INK_MUTED: Rgb = [0x33, 0x41, 0x55];
pub(crate) const WHITE: Rgb = [0xff, 0xff, 0xff];
pub(crate) const SUBTLE_ON_NAVY: Rgb = [0xcb, 0xd5, 0xe1];
pub(crate) const LIGHT_PANEL: Rgb = [0xf1, 0xf5, 0xf9];
pub(crate) const ZEBRA: Rgb = [0xf8, 0xfa, 0xfc];
pub(crate) const BORDER: Rgb = [0xe2, 0xe8, 0xf0];
pub(crate) const FOOTER_INK: Rgb = [0x64, 0x74, 0x8b];

#[derive(Clone, Debug, PartialEq)]
pub struct RenderSummary {
    pub pages: usize,
    pub table: TableSummary,
    pub metadata: MetadataGrid,
}

/// Builds one report document: header block, paginated table, footers.
pub struct ReportRenderer<'a> {
    branding: &'a Branding,
    clock: &'a dyn Clock,
    setup: PageSetup,
    fonts: Option<FontSet>,
}

impl<'a> ReportRenderer<'a> {
    pub fn new(branding: &'a Branding, clock: &'a dyn Clock) -> Self {
        Self {
            branding,
            clock,
            setup: PageSetup::a4(),
            fonts: None,
        }
    }

    pub fn with_setup(mut self, setup: PageSetup) -> Self {
        self.setup = setup;
        self
    }

    /// Use an already loaded font set instead of the branding's font paths.
    pub fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// Lay the report out into a buffered document without serializing it.
    pub fn build(&self, report: &Report) -> Result<(Document, RenderSummary), Error> {
        validate_table(&report.columns, &report.rows)?;

        let fonts = self
            .fonts
            .clone()
            .unwrap_or_else(|| FontSet::load(self.branding));
        let mut doc = Document::new(self.setup, fonts);
        doc.set_title(report.meta.title.as_str());

        let logo = self
            .branding
            .logo_path
            .as_deref()
            .and_then(|path| doc.load_image(path));
        let metadata = draw_header_block(
            &mut doc,
            &report.meta,
            self.branding,
            logo,
            self.clock.now(),
        );

        let table = render_table(&mut doc, &report.columns, &report.rows)?;
        let pages = stamp_footers(&mut doc);

        Ok((
            doc,
            RenderSummary {
                pages,
                table,
                metadata,
            },
        ))
    }

    pub fn render(&self, report: &Report) -> Result<Vec<u8>, Error> {
        let t0 = Instant::now();
        let (doc, summary) = self.build(report)?;
        let t_layout = t0.elapsed();

        let bytes = pdf::serialize(&doc)?;
        let t_total = t0.elapsed();

        log::info!(
            "Report '{}': {} rows on {} pages, layout={:.1}ms, serialize={:.1}ms (output {} bytes)",
            report.meta.title,
            summary.table.rows,
            summary.pages,
            t_layout.as_secs_f64() * 1000.0,
            (t_total - t_layout).as_secs_f64() * 1000.0,
            bytes.len(),
        );

        Ok(bytes)
    }
}
