// ============================================================
// Layer 6 — Cleaning Run Report
// ============================================================
// Appends one CSV row per cleaning run so operators can follow
// how many listings each rule removes over time.
//
// Output file: <report_dir>/clean_runs.csv
//
//   timestamp,input,lines,malformed,seen,kept,rooms_repaired,missing_required,duplicate,...
//   2026-10-19T08:12:03+02:00,data/houses.jsonl,1204,3,1201,1012,17,40,9,...
//
// The per-reason columns follow DropReason::ALL, so every row
// has the same shape even when a rule removed nothing.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::data::validator::{DropReason, ValidationStats};

pub const REPORT_FILE: &str = "clean_runs.csv";

/// Everything one cleaning run has to report.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub input:     String,
    pub lines:     usize,
    pub malformed: usize,
    pub stats:     ValidationStats,
}

impl RunReport {
    fn csv_header() -> String {
        let mut cols = vec![
            "timestamp", "input", "lines", "malformed", "seen", "kept", "rooms_repaired",
        ];
        cols.extend(DropReason::ALL.iter().map(|r| r.as_str()));
        cols.join(",")
    }

    fn csv_row(&self, timestamp: &str) -> String {
        let mut cols = vec![
            timestamp.to_string(),
            csv_escape(&self.input),
            self.lines.to_string(),
            self.malformed.to_string(),
            self.stats.total_seen.to_string(),
            self.stats.kept.to_string(),
            self.stats.rooms_repaired.to_string(),
        ];
        cols.extend(DropReason::ALL.iter().map(|r| self.stats.removed_for(*r).to_string()));
        cols.join(",")
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Appends run reports to a CSV file.
pub struct ReportLogger {
    csv_path: PathBuf,
}

impl ReportLogger {
    /// Writes the CSV header if the file does not exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create report directory '{}'", dir.display()))?;

        let csv_path = dir.join(REPORT_FILE);
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{}", RunReport::csv_header())?;
            tracing::debug!("Created report CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, report: &RunReport) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let timestamp = chrono::Local::now().to_rfc3339();
        writeln!(f, "{}", report.csv_row(&timestamp))?;

        tracing::debug!("Appended run report to '{}'", self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        let mut stats = ValidationStats { total_seen: 10, kept: 7, rooms_repaired: 2, ..Default::default() };
        stats.removed.insert(DropReason::Duplicate, 2);
        stats.removed.insert(DropReason::YearOutOfRange, 1);
        RunReport { input: "data/houses.jsonl".into(), lines: 11, malformed: 1, stats }
    }

    #[test]
    fn test_header_and_row_have_same_width() {
        let header = RunReport::csv_header();
        let row = report().csv_row("t");
        assert_eq!(header.split(',').count(), row.split(',').count());
        assert!(row.starts_with("t,data/houses.jsonl,11,1,10,7,2,0,2,"));
    }

    #[test]
    fn test_appends_rows() {
        let dir = tempfile::tempdir().unwrap();
        let logger = ReportLogger::new(dir.path()).unwrap();
        logger.log(&report()).unwrap();
        logger.log(&report()).unwrap();

        // Re-opening keeps the existing header and rows
        let logger = ReportLogger::new(dir.path()).unwrap();
        logger.log(&report()).unwrap();

        let text = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("timestamp,input,"));
    }

    #[test]
    fn test_escapes_commas_in_paths() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("plain"), "plain");
    }
}
