use super::types::{Facets, SolrResponse};

use serde_json::Value;

pub const FACET_FIELDS: [&str; 3] = ["keywords", "authors", "orgs"];

/// Turns Solr's flat `[term, count, term, count, ...]` list for `key` into pairs.
///
/// Missing blocks and missing keys give an empty list. A trailing term
/// without a count is dropped.
pub fn compose_facet_data(resp: &SolrResponse, key: &str) -> Vec<(String, u64)> {
    let Some(counts) = resp
        .facet_counts
        .as_ref()
        .and_then(|fc| fc.facet_fields.get(key))
    else {
        return Vec::new();
    };

    counts
        .chunks_exact(2)
        .filter_map(|pair| {
            let term = match &pair[0] {
                Value::String(s) => s.clone(),
                Value::Null => return None,
                other => other.to_string(),
            };
            let count = pair[1].as_u64()?;
            Some((term, count))
        })
        .collect()
}

/// Decodes every field in `FACET_FIELDS`, in that order.
pub fn compose_facets(resp: &SolrResponse) -> Facets {
    let [keywords, authors, orgs] = FACET_FIELDS.map(|field| compose_facet_data(resp, field));
    Facets {
        keywords,
        authors,
        orgs,
    }
}
