use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A Solr document as returned by `/select`. Field sets differ per core, so it stays untyped.
pub type Doc = Map<String, Value>;

/// Paging metadata handed back alongside a page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMeta {
    /// The query as typed by the user.
    pub q: String,
    /// The Solr query string built from `q`.
    pub qs: String,
    /// Route that produced the page, used by the front-end for pager links.
    pub cmd: String,
    pub page: i64,
    #[serde(rename = "numFound")]
    pub num_found: u64,
    /// One-based index of the first document on the page.
    pub start: u64,
    /// One-based index of the last document on the page.
    pub end: u64,
}

/// `SearchMeta` plus the facet filters applied to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetedMeta {
    #[serde(flatten)]
    pub base: SearchMeta,
    pub keyword_fq: Option<String>,
    pub author_fq: Option<String>,
    pub org_fq: Option<String>,
}

/// Optional `fq` filters for the faceted cores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetFilters {
    pub keyword: Option<String>,
    pub author: Option<String>,
    pub org: Option<String>,
}

impl FacetFilters {
    /// `(solr_field, value)` for every non-empty filter, in keyword, author, org order.
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        [
            ("keywords", &self.keyword),
            ("authors", &self.author),
            ("orgs", &self.org),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (field, v))
        })
        .collect()
    }
}

/// Term counts for the three facet fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facets {
    pub keywords: Vec<(String, u64)>,
    pub authors: Vec<(String, u64)>,
    pub orgs: Vec<(String, u64)>,
}

/// A related document reduced to what the detail page links to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedDoc {
    pub id: String,
    pub title: String,
}

// --- Solr wire format ---

#[derive(Debug, Clone, Deserialize)]
pub struct SolrResponse {
    pub response: SolrResult,
    #[serde(default)]
    pub facet_counts: Option<FacetCounts>,
    #[serde(default, rename = "moreLikeThis")]
    pub more_like_this: Option<HashMap<String, SolrResult>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolrResult {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<Doc>,
}

/// `facet_counts` block. Each facet field is a flat `[term, count, term, count, ...]` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacetCounts {
    #[serde(default)]
    pub facet_fields: HashMap<String, Vec<Value>>,
}

// --- HTTP responses ---

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub meta: Option<SearchMeta>,
    pub docs: Option<Vec<Doc>>,
}

#[derive(Debug, Serialize)]
pub struct FacetedPage {
    pub meta: Option<FacetedMeta>,
    pub facets: Option<Facets>,
    pub docs: Option<Vec<Doc>>,
}

#[derive(Debug, Serialize)]
pub struct ContentPage {
    pub doc: Doc,
}

/// Everything shown next to a document on the detail page.
#[derive(Debug, Serialize)]
pub struct RelatedContent {
    pub mlt_text: Vec<Doc>,
    pub sim_keywords: Vec<Doc>,
    pub sim_authors: Vec<Doc>,
    pub sim_orgs: Vec<Doc>,
    pub mlt_kao: Vec<Doc>,
    pub vec_topic: Vec<RelatedDoc>,
    pub vec_w2v: Vec<RelatedDoc>,
    pub vec_d2v: Vec<RelatedDoc>,
}

#[derive(Debug, Serialize)]
pub struct DetailPage {
    pub doc: Doc,
    pub meta: RelatedContent,
}

/// Renders a document id the same way whether Solr stored it as a string or a number.
pub fn doc_id(doc: &Doc) -> Option<String> {
    match doc.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
