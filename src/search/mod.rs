//! Search Service Module
//!
//! The web-facing part of the tool. Every query is executed by an external Solr
//! server; this module decides what to ask and reshapes what comes back.
//!
//! ## Responsibilities
//! - **Query building**: Four query modes, from a single phrase up to keyword-phrase
//!   boosting driven by the curated vocabulary.
//! - **Retrieval**: Paged and faceted `/select` calls, single-document lookups and
//!   more-like-this.
//! - **Re-ranking**: Jaccard overlap on keywords, authors and organisations, plus
//!   precomputed topic, word-vector and doc2vec neighbours.
//! - **API**: JSON endpoints served by axum.
//!
//! ## Submodules
//! - **`client`**: `SolrClient`, one Solr core plus the loaded resources.
//! - **`query`**: Query-string construction, escaping and URL encoding.
//! - **`facets`**: Flattened facet-count decoding.
//! - **`rerank`**: Jaccard scoring of candidate documents.
//! - **`handlers`** / **`routes`**: HTTP layer.
//! - **`types`**: Solr wire types and response DTOs.

pub mod client;
pub mod error;
pub mod facets;
pub mod handlers;
pub mod query;
pub mod rerank;
pub mod resources;
pub mod routes;
pub mod state;
pub mod types;

pub use client::SolrClient;
pub use error::SearchError;
pub use resources::SearchResources;
pub use routes::build_router;
pub use state::AppState;
