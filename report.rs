//! Console report lines and result files.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{DetectorError, Result};
use crate::patterns::{Pattern, PatternTable, RankedPattern};

const RESULT_EXTENSION: &str = "txt";
const DATE_STEM_FORMAT: &str = "%B%d%Y"; // e.g. July052024

// "<pattern text>: <count>", pattern text may itself contain ": "
static RESULT_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*): (\d+)$").expect("result line pattern is valid"));

pub fn format_line(pattern: &Pattern, count: usize) -> String {
    format!("{pattern}: {count}")
}

/// Ranked lines under a "Top N Patterns:" heading.
pub fn top_lines(ranked: &[RankedPattern], limit: usize) -> Vec<String> {
    let mut lines = Vec::with_capacity(ranked.len() + 1);
    lines.push(format!("Top {limit} Patterns:"));
    lines.extend(ranked.iter().map(|r| format_line(&r.pattern, r.count)));
    lines
}

/// Write every entry of `table` in insertion order, replacing `path`.
pub fn save(table: &PatternTable, path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| DetectorError::io(path, e))?;
    let mut out = BufWriter::new(file);
    for (pattern, count) in table.iter() {
        writeln!(out, "{}", format_line(pattern, count)).map_err(|e| DetectorError::io(path, e))?;
    }
    out.flush().map_err(|e| DetectorError::io(path, e))?;
    info!(path = %path.display(), patterns = table.len(), "results saved");
    Ok(())
}

/// Read a file written by [`save`] back into (pattern text, count) pairs.
pub fn load(path: &Path) -> Result<Vec<(String, usize)>> {
    let file = File::open(path).map_err(|e| DetectorError::io(path, e))?;
    let mut entries = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| DetectorError::io(path, e))?;
        if line.is_empty() {
            continue;
        }
        let malformed = || DetectorError::MalformedLine {
            path: path.to_path_buf(),
            line: idx + 1,
            content: line.clone(),
        };
        let caps = RESULT_LINE_REGEX.captures(&line).ok_or_else(malformed)?;
        let count = caps[2].parse::<usize>().map_err(|_| malformed())?;
        entries.push((caps[1].to_string(), count));
    }
    Ok(entries)
}

/// File stem for results saved on `date`.
pub fn dated_stem(date: NaiveDate) -> String {
    date.format(DATE_STEM_FORMAT).to_string()
}

/// First unused name among `<stem>.txt`, `<stem>_part1.txt`, `<stem>_part2.txt`, ...
pub fn next_available_path(dir: &Path, stem: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{stem}.{RESULT_EXTENSION}"));
    let mut part = 0;
    while candidate.exists() {
        part += 1;
        candidate = dir.join(format!("{stem}_part{part}.{RESULT_EXTENSION}"));
    }
    debug!(path = %candidate.display(), collisions = part, "resolved output filename");
    candidate
}
