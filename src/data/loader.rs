// ============================================================
// Layer 4 — JSON-Lines Loader
// ============================================================
// Reads newline-delimited JSON, one listing object per line.
//
// Line-level corruption never aborts a file:
//   - blank lines are skipped
//   - a line that is not a JSON object (bad JSON, an array,
//     a bare number, invalid UTF-8) becomes RawLine::Malformed
//     and the caller decides whether to count or copy it
//
// Lines are read as bytes so a single invalid UTF-8 sequence
// only spoils its own line.

use anyhow::{Context, Result};
use serde_json::Value;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::listing::{ListingRecord, RawLine};
use crate::domain::traits::RecordSource;

/// Loads listing lines from an NDJSON file.
pub struct JsonlLoader {
    path: PathBuf,
}

impl JsonlLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream the file line by line.
    pub fn stream(&self) -> Result<RawLines<BufReader<File>>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open '{}'", self.path.display()))?;
        Ok(RawLines::new(BufReader::new(file)))
    }
}

impl RecordSource for JsonlLoader {
    fn read_lines(&self) -> Result<Vec<RawLine>> {
        let lines = self
            .stream()?
            .collect::<io::Result<Vec<_>>>()
            .with_context(|| format!("Failed reading '{}'", self.path.display()))?;

        let malformed = lines
            .iter()
            .filter(|l| matches!(l, RawLine::Malformed { .. }))
            .count();
        tracing::debug!(
            "Read {} lines from '{}' ({} malformed)",
            lines.len(),
            self.path.display(),
            malformed
        );
        Ok(lines)
    }
}

/// Iterator over the non-blank lines of any buffered reader.
pub struct RawLines<R: BufRead> {
    inner:   io::Split<R>,
    line_no: usize,
}

impl<R: BufRead> RawLines<R> {
    pub fn new(reader: R) -> Self {
        Self { inner: reader.split(b'\n'), line_no: 0 }
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = io::Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let bytes = match self.inner.next()? {
                Ok(bytes) => bytes,
                Err(e) => return Some(Err(e)),
            };
            self.line_no += 1;
            if let Some(line) = parse_line(self.line_no, &bytes) {
                return Some(Ok(line));
            }
        }
    }
}

/// Parse one physical line. Returns None for blank lines.
pub fn parse_line(line_no: usize, bytes: &[u8]) -> Option<RawLine> {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s.trim(),
        Err(_) => {
            tracing::debug!("Line {line_no}: invalid UTF-8");
            return Some(RawLine::Malformed { line_no, raw: bytes.to_vec() });
        }
    };

    if text.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(RawLine::Record(ListingRecord::from(map))),
        Ok(_) => {
            tracing::debug!("Line {line_no}: JSON value is not an object");
            Some(RawLine::Malformed { line_no, raw: bytes.to_vec() })
        }
        Err(e) => {
            tracing::debug!("Line {line_no}: {e}");
            Some(RawLine::Malformed { line_no, raw: bytes.to_vec() })
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn read_all(input: &[u8]) -> Vec<RawLine> {
        RawLines::new(Cursor::new(input.to_vec()))
            .collect::<io::Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_skips_blank_lines() {
        let lines = read_all(b"{\"price\": 1}\n\n   \n{\"price\": 2}\n");
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| matches!(l, RawLine::Record(_))));
    }

    #[test]
    fn test_bad_json_is_malformed_not_fatal() {
        let lines = read_all(b"{\"price\": 1}\n{not json\n[1,2]\n{\"price\": 3}");
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[1],
            RawLine::Malformed { line_no: 2, raw: b"{not json".to_vec() }
        );
        assert!(matches!(lines[2], RawLine::Malformed { line_no: 3, .. }));
        assert!(matches!(lines[3], RawLine::Record(_)));
    }

    #[test]
    fn test_invalid_utf8_spoils_only_its_line() {
        let mut input = b"{\"price\": 1}\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(b"{\"price\": 2}\n");
        let lines = read_all(&input);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], RawLine::Malformed { line_no: 2, raw: vec![0xff, 0xfe] });
    }

    #[test]
    fn test_malformed_line_keeps_exact_bytes() {
        let lines = read_all(b"  x\xffy \r\n");
        assert_eq!(lines, vec![RawLine::Malformed { line_no: 1, raw: b"  x\xffy \r".to_vec() }]);
    }

    #[test]
    fn test_loader_reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "{{\"price\": 10, \"size\": 50}}").unwrap();
        writeln!(f, "garbage").unwrap();

        let lines = JsonlLoader::new(f.path()).read_lines().unwrap();
        assert_eq!(lines.len(), 2);
        match &lines[0] {
            RawLine::Record(r) => assert_eq!(r.get_f64("size"), Some(50.0)),
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = JsonlLoader::new("definitely/not/here.jsonl");
        assert!(loader.read_lines().is_err());
    }
}
