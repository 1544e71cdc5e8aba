// ============================================================
// Layer 2 — OutlierUseCase
// ============================================================
// Removes listings whose `days_on_marked` equals a sentinel
// value (100 by default) and rewrites the file in place.
//
//   Step 1: Stream the source file             (Layer 4 - data)
//   Step 2: Copy every line except outliers
//           into a temp file beside the source
//   Step 3: Swap the temp file in, only if
//           something was actually removed
//
// Lines that are not JSON objects are copied through untouched.
// If anything fails before Step 3 the source file is unchanged.

use anyhow::{Context, Result};
use std::io::BufWriter;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::data::{lenient::parse_strict, loader::JsonlLoader, writer::JsonlWriter};
use crate::domain::listing::{fields, ListingRecord, RawLine};

pub const DEFAULT_OUTLIER_DAYS: f64 = 100.0;

// ─── Outlier Configuration ───────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct OutlierConfig {
    pub input: String,
    pub days:  f64,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            input: "data/houses_cleaned.jsonl".to_string(),
            days:  DEFAULT_OUTLIER_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlierSummary {
    pub total:     usize,
    pub removed:   usize,
    pub rewritten: bool,
}

// ─── OutlierUseCase ───────────────────────────────────────────────────────────
pub struct OutlierUseCase {
    config: OutlierConfig,
}

impl OutlierUseCase {
    pub fn new(config: OutlierConfig) -> Self {
        Self { config }
    }

    fn is_outlier(&self, record: &ListingRecord) -> bool {
        parse_strict(record.get(fields::DAYS_ON_MARKED)) == Some(self.config.days)
    }

    pub fn execute(&self) -> Result<OutlierSummary> {
        let input = Path::new(&self.config.input);
        let dir = match input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        // ── Step 1 + 2: filter into a sibling temp file ──────────────────────
        let lines = JsonlLoader::new(input).stream()?;
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Cannot create temp file in '{}'", dir.display()))?;

        let mut total = 0usize;
        let mut removed = 0usize;
        {
            let mut writer = JsonlWriter::new(BufWriter::new(tmp.as_file_mut()));
            for line in lines {
                let line =
                    line.with_context(|| format!("Failed reading '{}'", self.config.input))?;
                total += 1;
                match line {
                    RawLine::Record(record) if self.is_outlier(&record) => removed += 1,
                    RawLine::Record(record) => writer.write_record(&record)?,
                    RawLine::Malformed { raw, .. } => writer.write_raw(&raw)?,
                }
            }
            writer.finish()?;
        }

        // ── Step 3: atomic replace ───────────────────────────────────────────
        let rewritten = removed > 0;
        if rewritten {
            tmp.persist(input)
                .with_context(|| format!("Cannot replace '{}'", input.display()))?;
        }

        tracing::info!(
            file = %self.config.input,
            days = self.config.days,
            total,
            removed,
            rewritten,
            "Outlier filter complete"
        );
        Ok(OutlierSummary { total, removed, rewritten })
    }
}
