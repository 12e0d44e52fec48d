//! Document Search Library
//!
//! Core of the document search web tool and its offline keyword tooling.
//! Both binaries (`webtool` in `main.rs` and `keyword-dedupe` in
//! `scripts/`) are thin drivers over these modules.
//!
//! ## Modules
//!
//! - **`config`**: Web service settings from defaults, a TOML file and the environment.
//! - **`keywords`**: Stopwords and the curated keyword phrase matcher.
//! - **`vectors`**: Precomputed document similarity matrices and embeddings.
//! - **`search`**: Query construction, the Solr client, facets, Jaccard reranking
//!   and the axum routes of the web tool.
//! - **`dedupe`**: Active-learning record linkage that merges duplicate keywords.

pub mod config;
pub mod dedupe;
pub mod keywords;
pub mod search;
pub mod vectors;
