//! Result reporting: a fixed-width table for the terminal and a JSON file
//! for tooling.

use std::fs;
use std::io;
use std::path::Path;

use super::runner::{format_line, BenchResult};

const HEADER: &str = "codec   corpus                         original -> compressed  (ratio)  compress      decompress    throughput";

/// Render `results` as a table, one line per (codec, corpus) pair.
pub fn format_report(results: &[BenchResult]) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + results.len() * 120);
    out.push_str(HEADER);
    out.push('\n');
    for r in results {
        out.push_str(&format_line(r));
        out.push('\n');
    }
    out
}

/// Write `results` to `path` as a pretty-printed JSON array.
pub fn write_json(path: &Path, results: &[BenchResult]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(results)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
        .map_err(|e| io::Error::new(e.kind(), format!("cannot write {}: {}", path.display(), e)))
}

/// Read results previously stored by [`write_json`].
pub fn read_json(path: &Path) -> io::Result<Vec<BenchResult>> {
    let text = fs::read_to_string(path)
        .map_err(|e| io::Error::new(e.kind(), format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
