//! Keyword Resources Module
//!
//! Static word lists used while building Solr queries.
//!
//! ## Contents
//! - **`stopwords`**: The stopword set consulted by the per-term query mode.
//! - **`matcher`**: A multi-pattern automaton over the curated keyword vocabulary
//!   (raw list plus near-duplicate and dedupe mappings). It spots known keyword
//!   phrases inside free-text queries so they can be boosted as phrases.
//!
//! Every file here is optional. A missing file disables the feature that
//! depends on it instead of failing startup.

pub mod matcher;
pub mod stopwords;

pub use matcher::KeywordMatcher;
pub use stopwords::load_stopwords;
