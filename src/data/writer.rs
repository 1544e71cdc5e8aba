// ============================================================
// Layer 4 — JSON-Lines Writer
// ============================================================
// Writes one JSON object per line. Numbers go out as numbers,
// Missing as null. Raw lines (malformed input being passed
// through) are written back verbatim.

use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use crate::domain::listing::ListingRecord;

pub struct JsonlWriter<W: Write> {
    out:     W,
    written: usize,
}

impl JsonlWriter<BufWriter<File>> {
    /// Create (or truncate) `path`, creating parent directories.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn write_record(&mut self, record: &ListingRecord) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    pub fn write_raw(&mut self, line: &[u8]) -> Result<()> {
        self.out.write_all(line)?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Lines written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::FieldValue;

    #[test]
    fn test_writes_one_object_per_line() {
        let mut r = ListingRecord::new();
        r.insert("year", FieldValue::Integer(1990));
        r.insert("remodeled", FieldValue::Missing);

        let mut w = JsonlWriter::new(Vec::new());
        w.write_record(&r).unwrap();
        w.write_raw(b"{broken").unwrap();
        assert_eq!(w.written(), 2);

        let bytes = w.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\"remodeled\":null,\"year\":1990}\n{broken\n");
    }

    #[test]
    fn test_raw_lines_are_written_byte_for_byte() {
        let mut w = JsonlWriter::new(Vec::new());
        w.write_raw(&[b'x', 0xff, b'y']).unwrap();
        assert_eq!(w.finish().unwrap(), vec![b'x', 0xff, b'y', b'\n']);
    }

    #[test]
    fn test_create_makes_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.jsonl");
        let w = JsonlWriter::create(&path).unwrap();
        w.finish().unwrap();
        assert!(path.exists());
    }
}
