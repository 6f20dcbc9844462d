pub mod canvas;
pub mod clock;
pub mod config;
mod error;
pub mod fonts;
pub mod images;
pub mod model;
pub mod pdf;
pub mod report;
pub mod reports;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Branding;
pub use error::{Error, LayoutError};
pub use model::{Alignment, Column, HeaderMeta, PageSetup, Report, Row};
pub use report::{RenderSummary, ReportRenderer};

use std::path::Path;
use std::time::Instant;

/// Render a report to PDF bytes with branding from the environment and the
/// current wall-clock time.
pub fn render_report(report: &Report) -> Result<Vec<u8>, Error> {
    let branding = Branding::from_env();
    ReportRenderer::new(&branding, &SystemClock).render(report)
}

pub fn render_report_to_file(report: &Report, branding: &Branding, output: &Path) -> Result<(), Error> {
    let t0 = Instant::now();

    let bytes = ReportRenderer::new(branding, &SystemClock).render(report)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_render.as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}
