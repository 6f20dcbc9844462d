use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use maintrack_report::reports::{
    self, DateRange, MaintenanceRecord, ReportKind, StatusRecord, parse_date,
};
use maintrack_report::{Branding, Error, Report, render_report_to_file};

#[derive(Parser)]
#[command(version, about = "Render maintenance tracker reports to PDF")]
struct Cli {
    /// status, records or completed_monthly
    report: String,

    /// JSON array of records exported by the tracker
    #[arg(short, long)]
    input: PathBuf,

    /// Output PDF path (defaults to the report's standard file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// First day of the period, YYYY-MM-DD
    #[arg(long)]
    from: Option<String>,

    /// Last day of the period, YYYY-MM-DD
    #[arg(long)]
    to: Option<String>,

    #[arg(long)]
    prepared_by: Option<String>,

    #[arg(long)]
    report_id: Option<String>,
}

fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, Error> {
    let data = std::fs::read(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, path.display()),
        ))
    })?;
    serde_json::from_slice(&data)
        .map_err(|e| Error::Input(format!("{}: {e}", path.display())))
}

fn build_report(cli: &Cli, kind: ReportKind) -> Result<Report, Error> {
    let range = DateRange {
        from: cli.from.as_deref().map(parse_date).transpose()?,
        to: cli.to.as_deref().map(parse_date).transpose()?,
    };

    let mut report = match kind {
        ReportKind::Status => {
            let records: Vec<StatusRecord> = read_records(&cli.input)?;
            reports::status_report(&records)
        }
        ReportKind::Records => {
            let records: Vec<MaintenanceRecord> = read_records(&cli.input)?;
            reports::records_report(&records, range)
        }
        ReportKind::CompletedMonthly => {
            let records: Vec<MaintenanceRecord> = read_records(&cli.input)?;
            reports::completed_monthly_report(&records, range)
        }
    };
    report.meta.prepared_by = cli.prepared_by.clone();
    report.meta.report_id = cli.report_id.clone();
    Ok(report)
}

fn run(cli: Cli) -> Result<PathBuf, Error> {
    let kind: ReportKind = cli.report.parse()?;
    let report = build_report(&cli, kind)?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(kind.default_file_name()));
    render_report_to_file(&report, &Branding::from_env(), &output)?;
    Ok(output)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            println!("Wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
