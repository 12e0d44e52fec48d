use super::error::DedupeError;
use super::types::{KeywordRecord, NUM_HASH_COLUMNS, RecordMap};

use std::io::Read;
use std::path::Path;

pub const RAW_INPUT_FILE: &str = "curated_keywords_hash.csv";

pub fn load_records(path: &Path) -> Result<RecordMap, DedupeError> {
    let file = std::fs::File::open(path)?;
    let records = read_records(file)?;
    tracing::info!("Loaded {} keyword records from {}", records.len(), path.display());
    Ok(records)
}

/// Parses CSV with an `id`, `keyword` and `col_1..col_25` header.
///
/// Columns are looked up by header position, so short rows and absent
/// columns read as empty. A repeated id replaces the earlier row.
pub fn read_records<R: Read>(reader: R) -> Result<RecordMap, DedupeError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let id_idx = position("id");
    let keyword_idx = position("keyword");
    let column_idx: Vec<Option<usize>> = (1..=NUM_HASH_COLUMNS)
        .map(|n| position(&format!("col_{}", n)))
        .collect();

    let mut records = RecordMap::new();
    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("").trim();

        let raw_id = cell(id_idx);
        let id: i64 = raw_id.parse().map_err(|_| DedupeError::InvalidRecord {
            line,
            reason: format!("id '{}' is not an integer", raw_id),
        })?;

        let record = KeywordRecord {
            id,
            keyword: keyword_idx.and_then(|i| row.get(i)).unwrap_or("").to_string(),
            columns: column_idx.iter().map(|&idx| cell(idx).to_string()).collect(),
        };

        if records.insert(id, record).is_some() {
            tracing::warn!("Duplicate keyword id {} on line {}, keeping the later row", id, line);
        }
    }

    Ok(records)
}

