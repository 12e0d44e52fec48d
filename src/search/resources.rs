use super::query::QueryBuilder;
use crate::config::WebtoolConfig;
use crate::keywords::{KeywordMatcher, load_stopwords, stopwords::STOPWORDS_FILE};
use crate::vectors::VectorResources;

use anyhow::Result;

/// Static data the search layer consults on every request, loaded once at startup.
#[derive(Default)]
pub struct SearchResources {
    pub queries: QueryBuilder,
    pub vectors: VectorResources,
}

impl SearchResources {
    pub fn load(config: &WebtoolConfig) -> Result<Self> {
        let stopwords = load_stopwords(&config.data_dir.join(STOPWORDS_FILE))?;
        let matcher = KeywordMatcher::load(&config.data_dir)?;
        let vectors = VectorResources::load(&config.data_dir, &config.models_dir)?;

        tracing::info!(
            "Search resources ready: {} stopwords, keyword matcher {}, topic={} w2v={} doc2vec={}",
            stopwords.len(),
            if matcher.is_some() { "on" } else { "off" },
            vectors.topic.is_some(),
            vectors.w2v.is_some(),
            vectors.doc2vec.is_some()
        );

        Ok(Self {
            queries: QueryBuilder::new(stopwords, matcher),
            vectors,
        })
    }
}
