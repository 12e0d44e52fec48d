//! Solr Client
//!
//! Issues `/select` requests against one Solr core and reshapes the JSON into
//! the page, facet and related-document structures the web layer returns.
//!
//! Transport failures are retried with exponential backoff and jitter. HTTP
//! error statuses are not retried: Solr answers those deterministically.

use super::error::SearchError;
use super::facets::{FACET_FIELDS, compose_facets};
use super::query::{
    QueryMode, any_of_clause, encode_params, escape_phrase, escape_term, start_offset,
};
use super::rerank::{field_values, rerank_by_jaccard};
use super::resources::SearchResources;
use super::types::{
    Doc, FacetFilters, FacetedMeta, Facets, RelatedDoc, SearchMeta, SolrResponse, doc_id,
};
use crate::vectors::SimilarityKind;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Number of related documents shown per panel.
pub const RELATED_LIMIT: usize = 5;

type Params = Vec<(&'static str, String)>;

pub struct SolrClient {
    http: reqwest::Client,
    base_url: String,
    rows: usize,
    timeout: Duration,
    attempts: usize,
    resources: Arc<SearchResources>,
}

impl SolrClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        rows: usize,
        resources: Arc<SearchResources>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            rows,
            timeout: Duration::from_secs(5),
            attempts: 3,
            resources,
        }
    }

    pub fn with_retry(mut self, timeout: Duration, attempts: usize) -> Self {
        self.timeout = timeout;
        self.attempts = attempts.max(1);
        self
    }

    /// Runs `/select` with `params` and decodes the JSON body.
    async fn select(&self, params: &[(&str, String)]) -> Result<SolrResponse, SearchError> {
        let url = format!("{}/select?{}", self.base_url, encode_params(params));
        tracing::debug!("Solr request: {}", url);

        let resp = self.get_with_retry(&url).await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response, SearchError> {
        let mut delay_ms = 150u64;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.http.get(url).timeout(self.timeout).send().await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt >= self.attempts => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("Solr request attempt {} failed: {}", attempt, e);
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }
    }

    fn meta(
        &self,
        query: &str,
        query_str: String,
        cmd: &str,
        page: i64,
        start: u64,
        resp: &SolrResponse,
    ) -> SearchMeta {
        SearchMeta {
            q: query.to_string(),
            qs: query_str,
            cmd: cmd.to_string(),
            page,
            num_found: resp.response.num_found,
            start: resp.response.start + 1,
            end: start + resp.response.docs.len() as u64,
        }
    }

    /// One page of plain full-text results.
    pub async fn search(
        &self,
        query: &str,
        page: i64,
        cmd: &str,
        mode: QueryMode,
    ) -> Result<(SearchMeta, Vec<Doc>), SearchError> {
        let query_str = self.resources.queries.build(query, mode);
        let start = start_offset(page, self.rows);
        let params: Params = vec![
            ("q", query_str.clone()),
            ("fl", "*,score".to_string()),
            ("start", start.to_string()),
            ("rows", self.rows.to_string()),
        ];

        let resp = self.select(&params).await?;
        let meta = self.meta(query, query_str, cmd, page, start, &resp);
        tracing::info!("{} '{}' page {}: {} hits", cmd, query, page, meta.num_found);
        Ok((meta, resp.response.docs))
    }

    /// One page of results with keyword/author/org facet counts and optional facet filters.
    pub async fn faceted_search(
        &self,
        query: &str,
        filters: &FacetFilters,
        page: i64,
        cmd: &str,
        mode: QueryMode,
    ) -> Result<(FacetedMeta, Facets, Vec<Doc>), SearchError> {
        let query_str = self.resources.queries.build(query, mode);
        let start = start_offset(page, self.rows);
        let mut params: Params = vec![
            ("q", query_str.clone()),
            ("fl", "*,score".to_string()),
            ("start", start.to_string()),
            ("rows", self.rows.to_string()),
            ("facet", "on".to_string()),
        ];
        for field in FACET_FIELDS {
            params.push(("facet.field", field.to_string()));
        }
        for (field, value) in filters.active() {
            params.push(("fq", format!("{}:\"{}\"", field, escape_phrase(value))));
        }

        let resp = self.select(&params).await?;
        let meta = FacetedMeta {
            base: self.meta(query, query_str, cmd, page, start, &resp),
            keyword_fq: filters.keyword.clone(),
            author_fq: filters.author.clone(),
            org_fq: filters.org.clone(),
        };
        let facets = compose_facets(&resp);
        tracing::info!(
            "{} '{}' page {} ({} filters): {} hits",
            cmd,
            query,
            page,
            filters.active().len(),
            meta.base.num_found
        );
        Ok((meta, facets, resp.response.docs))
    }

    /// Fetches a single document with all stored fields.
    pub async fn get(&self, id: &str) -> Result<Doc, SearchError> {
        let params: Params = vec![
            ("q", id_query(id)?),
            ("fl", "*".to_string()),
            ("start", "0".to_string()),
            ("rows", "1".to_string()),
        ];

        let resp = self.select(&params).await?;
        resp.response
            .docs
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::NotFound(id.to_string()))
    }

    /// Solr more-like-this over `fields`, as `{id, title}` documents.
    pub async fn more_like_this(
        &self,
        id: &str,
        fields: &[&str],
    ) -> Result<Vec<Doc>, SearchError> {
        let params: Params = vec![
            ("q", id_query(id)?),
            ("fl", "id,title".to_string()),
            ("mlt", "true".to_string()),
            ("mlt.fl", fields.join(",")),
        ];

        let resp = self.select(&params).await?;
        Ok(resp
            .more_like_this
            .and_then(|mut mlt| mlt.remove(id))
            .map(|result| result.docs)
            .unwrap_or_default())
    }

    /// Documents sharing the most values of `field` with document `id`.
    pub async fn similar_by_field(
        &self,
        id: &str,
        field: &str,
    ) -> Result<Vec<Doc>, SearchError> {
        let main_doc = self.get(id).await?;
        self.similar_to_doc(&main_doc, id, field).await
    }

    /// Same as `similar_by_field` for a document that is already fetched.
    pub async fn similar_to_doc(
        &self,
        main_doc: &Doc,
        id: &str,
        field: &str,
    ) -> Result<Vec<Doc>, SearchError> {
        let values = field_values(main_doc, field);
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let params: Params = vec![
            ("q", any_of_clause(field, &values)),
            ("fl", format!("id,title,{}", field)),
        ];
        let resp = self.select(&params).await?;

        let source: HashSet<String> = values.into_iter().collect();
        Ok(rerank_by_jaccard(
            &source,
            resp.response.docs,
            field,
            id,
            RELATED_LIMIT,
        ))
    }

    /// Nearest documents according to a precomputed similarity matrix.
    pub async fn vector_similar(
        &self,
        id: &str,
        kind: SimilarityKind,
    ) -> Result<Vec<RelatedDoc>, SearchError> {
        let source = parse_doc_id(id)?;
        let Some(matrix) = self.resources.vectors.matrix(kind) else {
            tracing::debug!("No {} similarity matrix loaded", kind);
            return Ok(Vec::new());
        };

        let targets = matrix.top_matches(source, RELATED_LIMIT + 1);
        self.titles_for(source, targets).await
    }

    /// Nearest documents according to the document embedding model.
    pub async fn doc2vec_similar(&self, id: &str) -> Result<Vec<RelatedDoc>, SearchError> {
        let source = parse_doc_id(id)?;
        let Some(embeddings) = self.resources.vectors.doc2vec.as_ref() else {
            tracing::debug!("No doc2vec model loaded");
            return Ok(Vec::new());
        };

        let targets = embeddings
            .most_similar(source, RELATED_LIMIT)
            .into_iter()
            .map(|(target, _)| target)
            .collect();
        self.titles_for(source, targets).await
    }

    /// Looks up titles for `targets`, keeping their order and dropping `source`.
    async fn titles_for(
        &self,
        source: i64,
        targets: Vec<i64>,
    ) -> Result<Vec<RelatedDoc>, SearchError> {
        let targets: Vec<i64> = targets.into_iter().filter(|t| *t != source).collect();
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
        let params: Params = vec![
            ("q", any_of_clause("id", &ids)),
            ("fl", "id,title".to_string()),
            ("rows", ids.len().to_string()),
        ];
        let resp = self.select(&params).await?;

        let titles: HashMap<String, String> = resp
            .response
            .docs
            .iter()
            .filter_map(|doc| {
                let title = field_values(doc, "title").into_iter().next()?;
                Some((doc_id(doc)?, title))
            })
            .collect();

        Ok(ids
            .into_iter()
            .filter_map(|id| {
                let title = titles.get(&id)?.clone();
                Some(RelatedDoc { id, title })
            })
            .take(RELATED_LIMIT)
            .collect())
    }
}

fn id_query(id: &str) -> Result<String, SearchError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(SearchError::InvalidId(id.to_string()));
    }
    Ok(format!("id:{}", escape_term(id)))
}

fn parse_doc_id(id: &str) -> Result<i64, SearchError> {
    id.trim()
        .parse()
        .map_err(|_| SearchError::InvalidId(id.to_string()))
}
