//! Reference population loading.
//!
//! Accepts either a CSV file with a header row or a JSON array of
//! `{"math": .., "reading": ..}` objects. CSV columns are matched by name,
//! case-insensitively: `math` or `math score`, `reading` or `reading score`.
//! Other columns are ignored. Quoted fields containing commas are not
//! supported.

use std::path::Path;
use learnpath_core::{ReferencePopulation, ScorePair};
use tokio::fs;
use tracing::info;

use super::{Result, StorageError};

const MATH_COLUMNS: &[&str] = &["math", "math score"];
const READING_COLUMNS: &[&str] = &["reading", "reading score"];

/// Load a reference population from disk. `.json` files are parsed as
/// JSON, everything else as CSV.
pub async fn load_reference_population(path: impl AsRef<Path>) -> Result<ReferencePopulation> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).await?;

    let is_json = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let population = if is_json { parse_json(&text)? } else { parse_csv(&text)? };

    info!(path = %path.display(), rows = population.len(), "loaded reference population");
    Ok(population)
}

/// Parse a JSON array of score pairs.
pub fn parse_json(text: &str) -> Result<ReferencePopulation> {
    let pairs: Vec<ScorePair> = serde_json::from_str(text)?;
    Ok(ReferencePopulation::new(pairs))
}

/// Parse CSV text with a header row.
pub fn parse_csv(text: &str) -> Result<ReferencePopulation> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| StorageError::Parse("empty dataset".to_string()))?;
    let columns: Vec<String> = split_fields(header).map(|f| f.to_lowercase()).collect();

    let math_idx = find_column(&columns, MATH_COLUMNS)?;
    let reading_idx = find_column(&columns, READING_COLUMNS)?;

    let mut pairs = Vec::new();
    for (line_no, line) in lines {
        let fields: Vec<&str> = split_fields(line).collect();
        let math = parse_field(&fields, math_idx, line_no + 1)?;
        let reading = parse_field(&fields, reading_idx, line_no + 1)?;
        pairs.push(ScorePair::new(math, reading));
    }

    Ok(ReferencePopulation::new(pairs))
}

fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(|f| f.trim().trim_matches('"').trim())
}

fn find_column(columns: &[String], names: &[&str]) -> Result<usize> {
    columns
        .iter()
        .position(|c| names.contains(&c.as_str()))
        .ok_or_else(|| StorageError::Parse(format!("missing column: {}", names.join(" | "))))
}

fn parse_field(fields: &[&str], idx: usize, line_no: usize) -> Result<f64> {
    let raw = fields
        .get(idx)
        .ok_or_else(|| StorageError::Parse(format!("line {}: missing field {}", line_no, idx + 1)))?;
    raw.parse::<f64>()
        .map_err(|_| StorageError::Parse(format!("line {}: invalid score '{}'", line_no, raw)))
}
