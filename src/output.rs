//! Output formatting and persistence for grade views.
//!
//! Supports a rounded text table, a summary report as text or JSON, and an
//! unrounded CSV export. Rounding happens here and nowhere else.

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{GradeSummary, StudentRef};
use crate::error::GradebookError;
use crate::record::Record;
use crate::view::Criteria;

/// Header row of exported CSV files.
pub const EXPORT_HEADER: [&str; 9] = [
    "classId",
    "number",
    "name",
    "finalExam",
    "performance1",
    "performance2",
    "performance3",
    "total",
    "grade",
];

/// A summary together with the criteria that produced its view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub criteria: Criteria,
    pub summary: GradeSummary,
}

impl DashboardReport {
    pub fn new(criteria: Criteria, summary: GradeSummary) -> Self {
        DashboardReport {
            generated_at: Utc::now(),
            criteria,
            summary,
        }
    }
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &DashboardReport) {
    debug!("{:#?}", report);
}

/// Serializes a report as pretty-printed JSON.
pub fn report_json(report: &DashboardReport) -> Result<String, GradebookError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Writes `records` as CSV with [`EXPORT_HEADER`].
///
/// Scores keep full precision; a missing class or roster number is an empty
/// field and a not-a-number score is written as `NaN`.
pub fn write_csv<'a, W, I>(writer: W, records: I) -> Result<(), GradebookError>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(EXPORT_HEADER)?;

    let mut rows = 0usize;
    for record in records {
        let scores = record.scores();
        writer.write_record([
            id_field(record.class_id()),
            id_field(record.number()),
            record.name().to_string(),
            scores.final_exam.to_string(),
            scores.performance[0].to_string(),
            scores.performance[1].to_string(),
            scores.performance[2].to_string(),
            scores.total.to_string(),
            record.grade().to_string(),
        ])?;
        rows += 1;
    }

    writer.flush()?;
    debug!(rows, "CSV export written");

    Ok(())
}

/// Exports `records` to a file, gzip-compressed when `gzip` is set.
pub fn export_to_path<'a, I>(path: &Path, records: I, gzip: bool) -> Result<(), GradebookError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let file = File::create(path)?;

    if gzip {
        let mut encoder = GzEncoder::new(file, Compression::default());
        write_csv(&mut encoder, records)?;
        encoder.finish()?;
    } else {
        write_csv(file, records)?;
    }

    info!(path = %path.display(), gzip, "Export saved");
    Ok(())
}

/// Default export file name, e.g. `grades_2024-06-30.csv`.
pub fn default_export_name(prefix: &str, date: NaiveDate, gzip: bool) -> String {
    let ext = if gzip { "csv.gz" } else { "csv" };
    format!("{}_{}.{}", prefix, date.format("%Y-%m-%d"), ext)
}

fn id_field(id: Option<u32>) -> String {
    id.map(|v| v.to_string()).unwrap_or_default()
}

/// Renders a score for display with a fixed number of decimals.
pub fn format_score(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

fn format_id(id: Option<u32>) -> String {
    id.map(|v| v.to_string()).unwrap_or_else(|| "NaN".to_string())
}

/// Renders records as an aligned text table, scores rounded for display.
pub fn render_table<'a, I>(records: I, decimals: usize) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let rows: Vec<[String; 9]> = records
        .into_iter()
        .map(|r| {
            let s = r.scores();
            [
                format_id(r.class_id()),
                format_id(r.number()),
                r.name().to_string(),
                format_score(s.final_exam, decimals),
                format_score(s.performance[0], decimals),
                format_score(s.performance[1], decimals),
                format_score(s.performance[2], decimals),
                format_score(s.total, decimals),
                r.grade().to_string(),
            ]
        })
        .collect();

    let mut widths = EXPORT_HEADER.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &EXPORT_HEADER.map(String::from), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    let noun = if rows.len() == 1 { "student" } else { "students" };
    let _ = writeln!(out, "{} {}", rows.len(), noun);
    out
}

fn push_row(out: &mut String, cells: &[String; 9], widths: &[usize; 9]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &w))| {
            // name is left-aligned, everything else is numeric or a letter
            if i == 2 {
                format!("{:<w$}", cell)
            } else {
                format!("{:>w$}", cell)
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Renders a summary as human-readable text.
pub fn render_summary(summary: &GradeSummary, decimals: usize) -> String {
    let mut out = String::new();
    let fmt = |v: f64| format_score(v, decimals);

    let _ = writeln!(out, "Students:  {}", summary.count);
    let _ = writeln!(out, "Average:   {}", fmt(summary.average));
    let _ = writeln!(
        out,
        "Highest:   {} ({})",
        fmt(summary.max),
        student_label(summary.max_student.as_ref())
    );
    let _ = writeln!(
        out,
        "Lowest:    {} ({})",
        fmt(summary.min),
        student_label(summary.min_student.as_ref())
    );
    let _ = writeln!(out, "Std dev:   {}", fmt(summary.std_dev));

    let _ = writeln!(out, "\nGrades");
    for g in &summary.grade_counts {
        let _ = writeln!(out, "  {}  {:>4}  ({:.1}%)", g.grade, g.count, g.percentage);
    }

    let _ = writeln!(out, "\nClass averages");
    for c in &summary.class_averages {
        let _ = writeln!(out, "  class {}  {:>6}", c.class_id, fmt(c.average));
    }

    let _ = writeln!(out, "\nScore bands");
    for b in &summary.score_bands {
        let _ = writeln!(out, "  {:<6}  {:>4}", b.band.label(), b.count);
    }

    out
}

fn student_label(student: Option<&StudentRef>) -> String {
    match student {
        Some(s) => format!("{}, class {}", s.name, format_id(s.class_id)),
        None => "-".to_string(),
    }
}
