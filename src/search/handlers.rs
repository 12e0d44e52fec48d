use super::error::SearchError;
use super::query::QueryMode;
use super::state::AppState;
use super::types::{
    ContentPage, DetailPage, FacetFilters, FacetedPage, RelatedContent, RelatedDoc, SearchPage,
};
use crate::config::SolrIndex;
use crate::vectors::SimilarityKind;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use serde::Deserialize;
use std::future::Future;

pub type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
    /// keyword facet filter
    pub fk: Option<String>,
    /// author facet filter
    pub fa: Option<String>,
    /// organisation facet filter
    pub fo: Option<String>,
}

impl SearchParams {
    /// The query, or `None` when it is missing or blank.
    fn query(&self) -> Option<&str> {
        self.q.as_deref().filter(|q| !q.trim().is_empty())
    }

    fn page(&self) -> Result<i64, (StatusCode, String)> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Ok(1),
            Some(page) => page
                .parse()
                .map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid page: {}", page))),
        }
    }

    fn filters(&self) -> FacetFilters {
        FacetFilters {
            keyword: self.fk.clone(),
            author: self.fa.clone(),
            org: self.fo.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContentParams {
    pub id: Option<String>,
}

impl ContentParams {
    fn id(&self) -> Result<&str, (StatusCode, String)> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or((StatusCode::BAD_REQUEST, "Missing id".to_string()))
    }
}

fn upstream(err: SearchError) -> (StatusCode, String) {
    tracing::error!("Search request failed: {}", err);
    (err.status_code(), err.to_string())
}

pub async fn handle_index() -> Html<&'static str> {
    Html(include_str!("index.html"))
}

pub async fn handle_search0(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchPage> {
    plain_search(&state, &params, "search0", QueryMode::Phrase).await
}

pub async fn handle_search1(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchPage> {
    plain_search(&state, &params, "search1", QueryMode::Terms).await
}

pub async fn handle_search2(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<SearchPage> {
    plain_search(&state, &params, "search2", QueryMode::TermsWithoutStopwords).await
}

pub async fn handle_search3(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<FacetedPage> {
    faceted_search(&state, &params, SolrIndex::Index1, "search3", QueryMode::Terms).await
}

pub async fn handle_search4(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<FacetedPage> {
    faceted_search(
        &state,
        &params,
        SolrIndex::Index2,
        "search4",
        QueryMode::KeywordPhrases,
    )
    .await
}

async fn plain_search(
    state: &AppState,
    params: &SearchParams,
    cmd: &str,
    mode: QueryMode,
) -> ApiResult<SearchPage> {
    let Some(query) = params.query() else {
        return Ok(Json(SearchPage {
            meta: None,
            docs: None,
        }));
    };
    let page = params.page()?;

    let (meta, docs) = state
        .client(SolrIndex::Index0)
        .search(query, page, cmd, mode)
        .await
        .map_err(upstream)?;

    Ok(Json(SearchPage {
        meta: Some(meta),
        docs: Some(docs),
    }))
}

async fn faceted_search(
    state: &AppState,
    params: &SearchParams,
    index: SolrIndex,
    cmd: &str,
    mode: QueryMode,
) -> ApiResult<FacetedPage> {
    let Some(query) = params.query() else {
        return Ok(Json(FacetedPage {
            meta: None,
            facets: None,
            docs: None,
        }));
    };
    let page = params.page()?;

    let (meta, facets, docs) = state
        .client(index)
        .faceted_search(query, &params.filters(), page, cmd, mode)
        .await
        .map_err(upstream)?;

    Ok(Json(FacetedPage {
        meta: Some(meta),
        facets: Some(facets),
        docs: Some(docs),
    }))
}

pub async fn handle_content0(
    State(state): State<AppState>,
    Query(params): Query<ContentParams>,
) -> ApiResult<ContentPage> {
    let id = params.id()?;
    let doc = state
        .client(SolrIndex::Index0)
        .get(id)
        .await
        .map_err(upstream)?;

    Ok(Json(ContentPage { doc }))
}

/// Document detail with every "related documents" panel.
pub async fn handle_content1(
    State(state): State<AppState>,
    Query(params): Query<ContentParams>,
) -> ApiResult<DetailPage> {
    let id = params.id()?;
    let client = state.client(SolrIndex::Index2);
    let doc = client.get(id).await.map_err(upstream)?;

    let (mlt_text, sim_keywords, sim_authors, sim_orgs, mlt_kao, vec_topic, vec_w2v, vec_d2v) =
        tokio::try_join!(
            client.more_like_this(id, &["title", "abstract", "text"]),
            client.similar_to_doc(&doc, id, "keywords"),
            client.similar_to_doc(&doc, id, "authors"),
            client.similar_to_doc(&doc, id, "orgs"),
            client.more_like_this(id, &["kaoterms"]),
            vector_panel(client.vector_similar(id, SimilarityKind::Topic)),
            vector_panel(client.vector_similar(id, SimilarityKind::W2v)),
            vector_panel(client.doc2vec_similar(id)),
        )
        .map_err(upstream)?;

    Ok(Json(DetailPage {
        doc,
        meta: RelatedContent {
            mlt_text,
            sim_keywords,
            sim_authors,
            sim_orgs,
            mlt_kao,
            vec_topic,
            vec_w2v,
            vec_d2v,
        },
    }))
}

/// Vector models are keyed by integer ids; documents outside them just get an empty panel.
async fn vector_panel<F>(panel: F) -> Result<Vec<RelatedDoc>, SearchError>
where
    F: Future<Output = Result<Vec<RelatedDoc>, SearchError>>,
{
    match panel.await {
        Err(SearchError::InvalidId(id)) => {
            tracing::debug!("Document {} has no vector id, skipping panel", id);
            Ok(Vec::new())
        }
        other => other,
    }
}
