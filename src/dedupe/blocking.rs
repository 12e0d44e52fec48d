use super::types::{KeywordRecord, PairId, RecordMap, pair_id};

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Blocks with more members than this are too common to be informative.
pub const MAX_BLOCK_SIZE: usize = 200;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("token pattern compiles"));

/// Keys a record is filed under: each non-empty hash column and each keyword token.
pub fn block_keys(record: &KeywordRecord) -> Vec<String> {
    let mut keys: Vec<String> = record
        .columns
        .iter()
        .enumerate()
        .filter(|(_, value)| !value.is_empty())
        .map(|(idx, value)| format!("col_{}:{}", idx + 1, value))
        .collect();

    let keyword = record.keyword.to_lowercase();
    keys.extend(
        TOKEN_RE
            .find_iter(&keyword)
            .map(|m| format!("tok:{}", m.as_str())),
    );
    keys
}

/// Every unordered pair sharing at least one block, ascending.
pub fn candidate_pairs(records: &RecordMap) -> Vec<PairId> {
    let mut blocks: BTreeMap<String, BTreeSet<i64>> = BTreeMap::new();
    for record in records.values() {
        for key in block_keys(record) {
            blocks.entry(key).or_default().insert(record.id);
        }
    }

    let mut pairs = BTreeSet::new();
    let mut skipped = 0;
    for members in blocks.values() {
        if members.len() > MAX_BLOCK_SIZE {
            skipped += 1;
            continue;
        }
        let ids: Vec<i64> = members.iter().copied().collect();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                pairs.insert(pair_id(a, b));
            }
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} oversized blocks", skipped);
    }
    pairs.into_iter().collect()
}
