use super::types::{Cluster, RecordMap};

use std::cmp::Reverse;
use std::io::Write;

pub const MAPPINGS_FILE: &str = "keyword_dedupe_mappings.tsv";

/// One `longest \t second longest \t score` line per cluster. Returns the lines written.
pub fn write_mappings<W: Write>(
    mut out: W,
    records: &RecordMap,
    clusters: &[Cluster],
) -> std::io::Result<usize> {
    let mut written = 0;
    for cluster in clusters {
        let mut keywords: Vec<&str> = cluster
            .ids
            .iter()
            .filter_map(|id| records.get(id))
            .map(|r| r.keyword.as_str())
            .collect();
        if keywords.len() < 2 {
            continue;
        }
        keywords.sort_by_key(|k| Reverse(k.chars().count()));

        let score = cluster.scores.first().copied().unwrap_or(0.0);
        writeln!(out, "{}\t{}\t{:.3}", keywords[0], keywords[1], score)?;
        written += 1;
    }
    out.flush()?;
    Ok(written)
}
