//! Report generators: turn already-computed asset and maintenance records into
//! a [`Report`] for the rendering engine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Alignment, Column, HeaderMeta, Report, Row};

/// Upper bound on records pulled into one records report.
pub const RECORDS_LIMIT: usize = 5000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Status,
    Records,
    CompletedMonthly,
}

impl ReportKind {
    pub fn default_file_name(self) -> &'static str {
        match self {
            ReportKind::Status => "status-report.pdf",
            ReportKind::Records => "maintenance-records.pdf",
            ReportKind::CompletedMonthly => "completed-per-month.pdf",
        }
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(ReportKind::Status),
            "records" => Ok(ReportKind::Records),
            "completed_monthly" => Ok(ReportKind::CompletedMonthly),
            other => Err(Error::Input(format!("unknown report: {other}"))),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportKind::Status => "status",
            ReportKind::Records => "records",
            ReportKind::CompletedMonthly => "completed_monthly",
        })
    }
}

/// Asset status as computed by the scheduling side of the tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Overdue,
    DueSoon,
    Ok,
}

impl AssetStatus {
    pub fn label(self) -> &'static str {
        match self {
            AssetStatus::Overdue => "OVERDUE",
            AssetStatus::DueSoon => "DUE_SOON",
            AssetStatus::Ok => "OK",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub asset_id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub location: Option<String>,
    pub next_due: NaiveDate,
    pub status: AssetStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceAction {
    Completed,
    Rescheduled,
    Created,
    Updated,
}

impl MaintenanceAction {
    pub fn label(self) -> &'static str {
        match self {
            MaintenanceAction::Completed => "COMPLETED",
            MaintenanceAction::Rescheduled => "RESCHEDULED",
            MaintenanceAction::Created => "CREATED",
            MaintenanceAction::Updated => "UPDATED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub performed_at: NaiveDate,
    pub action: MaintenanceAction,
    pub asset_id: String,
    pub asset_name: String,
    #[serde(default)]
    pub scheduled_for: Option<NaiveDate>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

/// Inclusive date filter; an open end matches everything on that side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|f| date >= f) && self.to.is_none_or(|t| date <= t)
    }

    /// Period label for the header; `None` when unbounded.
    pub fn label(&self) -> Option<String> {
        match (self.from, self.to) {
            (Some(f), Some(t)) => Some(format!("{f} – {t}")),
            (Some(f), None) => Some(format!("From {f}")),
            (None, Some(t)) => Some(format!("Until {t}")),
            (None, None) => None,
        }
    }
}

/// Parse a `YYYY-MM-DD` date, as accepted on the report query string.
pub fn parse_date(s: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| Error::Input(format!("bad date {s:?}: {e}")))
}

fn iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// The tracker exports missing text as `""`; treat blank like absent.
fn or_dash(value: &Option<String>) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("-")
        .to_string()
}

/// Overdue and due-soon assets; assets that are OK are left out.
pub fn status_report(records: &[StatusRecord]) -> Report {
    let mut flagged: Vec<&StatusRecord> = records
        .iter()
        .filter(|r| r.status != AssetStatus::Ok)
        .collect();
    flagged.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then(a.next_due.cmp(&b.next_due))
            .then_with(|| a.asset_id.cmp(&b.asset_id))
    });

    let columns = vec![
        Column::new("Asset ID", 60.0),
        Column::new("Name", 100.0),
        Column::new("Category", 70.0),
        Column::new("Location", 70.0),
        Column::new("Next Due", 62.0),
        Column::new("Status", 60.0),
        Column::new("Assigned To", 85.0),
    ];
    let rows: Vec<Row> = flagged
        .iter()
        .map(|r| {
            vec![
                r.asset_id.clone(),
                r.name.clone(),
                r.category.clone(),
                r.location.clone().unwrap_or_default(),
                iso(r.next_due),
                r.status.label().to_string(),
                or_dash(&r.assigned_to),
            ]
        })
        .collect();

    Report {
        meta: HeaderMeta {
            title: "Overdue / Due Soon Snapshot".into(),
            subtitle: Some(format!("{} of {} assets need attention", rows.len(), records.len())),
            ..HeaderMeta::default()
        },
        columns,
        rows,
    }
}

/// Maintenance log within `range`, newest first, at most [`RECORDS_LIMIT`] rows.
pub fn records_report(records: &[MaintenanceRecord], range: DateRange) -> Report {
    let mut selected: Vec<&MaintenanceRecord> = records
        .iter()
        .filter(|r| range.contains(r.performed_at))
        .collect();
    selected.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
    selected.truncate(RECORDS_LIMIT);

    let columns = vec![
        Column::new("Date", 62.0),
        Column::new("Action", 70.0),
        Column::new("Asset ID", 60.0),
        Column::new("Asset Name", 100.0),
        Column::new("Scheduled For", 70.0),
        Column::new("Remark", 75.0),
        Column::new("Updated By", 70.0),
    ];
    let rows: Vec<Row> = selected
        .iter()
        .map(|r| {
            vec![
                iso(r.performed_at),
                r.action.label().to_string(),
                r.asset_id.clone(),
                r.asset_name.clone(),
                r.scheduled_for.map(iso).unwrap_or_default(),
                r.remark.clone().unwrap_or_default(),
                or_dash(&r.updated_by),
            ]
        })
        .collect();

    Report {
        meta: HeaderMeta {
            title: "Maintenance Records".into(),
            date_range_label: range.label(),
            ..HeaderMeta::default()
        },
        columns,
        rows,
    }
}

/// Completed maintenance counted per calendar month (`YYYY-MM`), oldest first.
pub fn completed_per_month(records: &[MaintenanceRecord], range: DateRange) -> Vec<(String, usize)> {
    let mut months: BTreeMap<String, usize> = BTreeMap::new();
    for r in records
        .iter()
        .filter(|r| r.action == MaintenanceAction::Completed && range.contains(r.performed_at))
    {
        *months
            .entry(r.performed_at.format("%Y-%m").to_string())
            .or_default() += 1;
    }
    months.into_iter().collect()
}

pub fn completed_monthly_report(records: &[MaintenanceRecord], range: DateRange) -> Report {
    let rows: Vec<Row> = completed_per_month(records, range)
        .into_iter()
        .map(|(month, count)| vec![month, count.to_string()])
        .collect();

    Report {
        meta: HeaderMeta {
            title: "Completed Maintenance per Month".into(),
            date_range_label: range.label(),
            ..HeaderMeta::default()
        },
        columns: vec![
            Column::new("Month", 200.0),
            Column::new("Completed Count", 120.0).aligned(Alignment::Right),
        ],
        rows,
    }
}
