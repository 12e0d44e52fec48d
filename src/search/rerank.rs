use super::types::{Doc, doc_id};

use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashSet;

pub const JACCARD_SCORE_FIELD: &str = "jaccard_score";

/// `|a ∩ b| / |a ∪ b|`, or 0 when both sets are empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// String values of a multi-valued field. A scalar counts as a one-element list.
pub fn field_values(doc: &Doc, field: &str) -> Vec<String> {
    match doc.get(field) {
        Some(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
        Some(other) => value_to_string(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Re-ranks Solr candidates by Jaccard overlap of `field` with `source`.
///
/// Solr's own ordering is skewed by IDF, so the overlap gives a cleaner
/// "shares the most X" ranking. The document `exclude_id` is dropped, every
/// kept document gains a `jaccard_score` field, and at most `limit` are returned.
pub fn rerank_by_jaccard(
    source: &HashSet<String>,
    docs: Vec<Doc>,
    field: &str,
    exclude_id: &str,
    limit: usize,
) -> Vec<Doc> {
    let mut scored: Vec<(f64, Doc)> = docs
        .into_iter()
        .filter(|doc| doc_id(doc).as_deref() != Some(exclude_id))
        .map(|mut doc| {
            let target: HashSet<String> = field_values(&doc, field).into_iter().collect();
            let score = jaccard(source, &target);
            doc.insert(JACCARD_SCORE_FIELD.to_string(), Value::from(score));
            (score, doc)
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored.into_iter().take(limit).map(|(_, doc)| doc).collect()
}
