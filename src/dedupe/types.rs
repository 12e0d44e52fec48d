use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of `col_N` hash columns per keyword record.
pub const NUM_HASH_COLUMNS: usize = 25;

/// One row of the curated keyword file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub id: i64,
    pub keyword: String,
    /// `col_1..col_25`, empty when the cell was blank.
    pub columns: Vec<String>,
}

impl KeywordRecord {
    /// Value of a named field: `keyword` or `col_N`.
    pub fn field(&self, name: &str) -> &str {
        if name == "keyword" {
            return &self.keyword;
        }
        name.strip_prefix("col_")
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| self.columns.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Records keyed by id. Ordered so every pass over the data is deterministic.
pub type RecordMap = BTreeMap<i64, KeywordRecord>;

/// Pair of record ids with `left < right`.
pub type PairId = (i64, i64);

/// A candidate pair and the model's match probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub left: i64,
    pub right: i64,
    pub score: f64,
}

/// Records judged to be the same keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Member ids, ascending.
    pub ids: Vec<i64>,
    /// Per-member confidence, aligned with `ids`.
    pub scores: Vec<f64>,
}

/// Answer given for one pair during console labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Match,
    Distinct,
    Unsure,
    Finished,
}

impl Label {
    pub fn parse(answer: &str) -> Option<Self> {
        match answer.trim().to_lowercase().as_str() {
            "y" => Some(Label::Match),
            "n" => Some(Label::Distinct),
            "u" => Some(Label::Unsure),
            "f" => Some(Label::Finished),
            _ => None,
        }
    }
}

/// Normalises a pair so the smaller id comes first.
pub fn pair_id(a: i64, b: i64) -> PairId {
    if a <= b { (a, b) } else { (b, a) }
}
