// ============================================================
// Layer 2 — CleanUseCase
// ============================================================
// One streaming pass over a raw listings file:
//
//   Step 1: Open input and output       (Layer 4 - data)
//   Step 2: For each line
//             malformed → count, skip
//             record    → normalize → coerce → validate
//             kept      → write
//   Step 3: Log the counters            (tracing)
//   Step 4: Append a CSV run report     (Layer 6 - infra, optional)

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::data::{
    loader::JsonlLoader,
    pipeline::CleaningPipeline,
    validator::{DropReason, ValidatorConfig, Verdict},
    writer::JsonlWriter,
};
use crate::domain::listing::RawLine;
use crate::infra::report::{ReportLogger, RunReport};

// ─── Cleaning Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub input:        String,
    pub output:       String,
    /// Newest acceptable build year; None means "this year"
    pub current_year: Option<i32>,
    pub sold_only:    bool,
    /// Directory for the CSV run report; None disables it
    pub report_dir:   Option<String>,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            input:        "data/houses.jsonl".to_string(),
            output:       "data/houses_cleaned.jsonl".to_string(),
            current_year: None,
            sold_only:    false,
            report_dir:   None,
        }
    }
}

impl CleanConfig {
    pub fn validator_config(&self) -> ValidatorConfig {
        let defaults = ValidatorConfig::default();
        ValidatorConfig {
            current_year: self.current_year.unwrap_or(defaults.current_year),
            sold_only:    self.sold_only,
        }
    }
}

// ─── CleanUseCase ─────────────────────────────────────────────────────────────
pub struct CleanUseCase {
    config: CleanConfig,
}

impl CleanUseCase {
    pub fn new(config: CleanConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<RunReport> {
        let cfg = &self.config;
        let input = Path::new(&cfg.input);
        let output = Path::new(&cfg.output);

        if same_file(input, output) {
            bail!("Input and output are the same file: '{}'", cfg.input);
        }

        // ── Step 1: open both ends ────────────────────────────────────────────
        let loader = JsonlLoader::new(input);
        let lines = loader.stream()?;
        let mut writer = JsonlWriter::create(output)?;
        let validator_config = cfg.validator_config();
        tracing::info!(
            input = %cfg.input,
            output = %cfg.output,
            current_year = validator_config.current_year,
            sold_only = validator_config.sold_only,
            "Cleaning listings"
        );

        // ── Step 2: one pass, record by record ───────────────────────────────
        let mut pipeline = CleaningPipeline::new(validator_config);
        let mut line_count = 0usize;
        let mut malformed = 0usize;

        for line in lines {
            let line = line.with_context(|| format!("Failed reading '{}'", cfg.input))?;
            line_count += 1;
            match line {
                RawLine::Malformed { line_no, .. } => {
                    malformed += 1;
                    tracing::debug!("Skipping malformed line {line_no}");
                }
                RawLine::Record(record) => {
                    if let Verdict::Keep(clean) = pipeline.process(record) {
                        writer.write_record(&clean)?;
                    }
                }
            }
        }
        writer
            .finish()
            .with_context(|| format!("Failed writing '{}'", cfg.output))?;

        // ── Step 3: counters ──────────────────────────────────────────────────
        let report = RunReport {
            input: cfg.input.clone(),
            lines: line_count,
            malformed,
            stats: pipeline.into_stats(),
        };
        log_report(&report);

        // ── Step 4: optional CSV report ───────────────────────────────────────
        if let Some(dir) = &cfg.report_dir {
            ReportLogger::new(dir)?.log(&report)?;
        }

        Ok(report)
    }
}

fn log_report(report: &RunReport) {
    let s = &report.stats;
    tracing::info!(
        lines = report.lines,
        malformed = report.malformed,
        seen = s.total_seen,
        kept = s.kept,
        removed = s.total_removed(),
        rooms_repaired = s.rooms_repaired,
        "Cleaning complete"
    );
    for reason in DropReason::ALL {
        let n = s.removed_for(reason);
        if n > 0 {
            tracing::info!(reason = %reason, count = n, "Removed");
        }
    }
}

/// True when both paths resolve to the same existing file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::JsonlLoader;
    use crate::domain::traits::RecordSource;
    use std::fs;

    const RAW: &str = r#"{"Price": "3500000", "size": 80, "year": 1990, "sold": "yes", "sold_in_moth": "may", "rooms": ""}
{"price": 3500000, "size": "80", "year": "1990", "sold": "yes", "sold_in_month": "may", "rooms": " "}
not json at all
{"price": null, "size": 50, "year": 2000}
{"price": 100, "size": 50, "year": 2000, "sold": "no", "sold_in_month": "june"}

{"price": 100, "size": 50, "year": 1799}
{"price": 200, "size": 60, "year": 2001, "sold": "No", "remodeled": "unknown", "agent_id": " 36e5c7e1c1a5478287fc3c4ad91bc72c "}
"#;

    fn run(raw: &str, sold_only: bool) -> (RunReport, Vec<crate::domain::listing::ListingRecord>) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("houses.jsonl");
        let output = dir.path().join("out/houses_cleaned.jsonl");
        fs::write(&input, raw).unwrap();

        let report = CleanUseCase::new(CleanConfig {
            input:        input.display().to_string(),
            output:       output.display().to_string(),
            current_year: Some(2025),
            sold_only,
            report_dir:   Some(dir.path().join("reports").display().to_string()),
        })
        .execute()
        .unwrap();

        assert!(dir.path().join("reports/clean_runs.csv").exists());

        let records = JsonlLoader::new(&output)
            .read_lines()
            .unwrap()
            .into_iter()
            .map(|l| match l {
                RawLine::Record(r) => r,
                other => panic!("cleaned output must be valid JSON: {other:?}"),
            })
            .collect();
        (report, records)
    }

    #[test]
    fn test_end_to_end_counts() {
        let (report, records) = run(RAW, false);

        assert_eq!(report.lines, 7);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.stats.total_seen, 6);
        assert_eq!(report.stats.kept, 2);
        assert_eq!(report.stats.removed_for(DropReason::Duplicate), 1);
        assert_eq!(report.stats.removed_for(DropReason::MissingRequired), 1);
        assert_eq!(report.stats.removed_for(DropReason::UnsoldWithMonth), 1);
        assert_eq!(report.stats.removed_for(DropReason::YearOutOfRange), 1);
        assert_eq!(report.stats.rooms_repaired, 1);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_cleaned_records_are_normalized() {
        let (_, records) = run(RAW, false);
        let first = &records[0];
        assert_eq!(first.get_text("sold_in_month"), Some("may"));
        assert_eq!(first.get_text("rooms"), Some("0 rooms"));
        assert_eq!(first.get_f64("price"), Some(3_500_000.0));

        let second = &records[1];
        assert!(second.get("remodeled").is_missing());
        assert_eq!(second.get_text("agent_id"), Some("36e5c7e1c1a5478287fc3c4ad91bc72c"));
    }

    #[test]
    fn test_sold_only_drops_unsold() {
        let (report, records) = run(RAW, true);
        assert_eq!(report.stats.removed_for(DropReason::Unsold), 1);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_refuses_to_overwrite_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("houses.jsonl");
        fs::write(&path, RAW).unwrap();
        let p = path.display().to_string();

        let result = CleanUseCase::new(CleanConfig {
            input:  p.clone(),
            output: p,
            ..CleanConfig::default()
        })
        .execute();
        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), RAW);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CleanUseCase::new(CleanConfig {
            input:  dir.path().join("nope.jsonl").display().to_string(),
            output: dir.path().join("out.jsonl").display().to_string(),
            ..CleanConfig::default()
        })
        .execute();
        assert!(result.is_err());
    }
}
