use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "webtool.toml";

/// The three Solr cores the webtool talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolrIndex {
    Index0,
    Index1,
    Index2,
}

/// Runtime settings for the webtool server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebtoolConfig {
    /// Address the HTTP server binds to.
    pub bind: SocketAddr,
    /// Plain full-text core used by `/search0..2` and `/content0`.
    pub solr_index_0: String,
    /// Faceted core used by `/search3`.
    pub solr_index_1: String,
    /// Faceted core with keyword, author and org fields used by `/search4` and `/content1`.
    pub solr_index_2: String,
    pub num_recs_per_page: usize,
    /// Directory holding stopwords, keyword lists and similarity matrices.
    pub data_dir: PathBuf,
    /// Directory holding the document embedding model.
    pub models_dir: PathBuf,
    pub request_timeout_ms: u64,
    pub retry_attempts: usize,
}

impl Default for WebtoolConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
            solr_index_0: "http://localhost:8983/solr/nips0".to_string(),
            solr_index_1: "http://localhost:8983/solr/nips1".to_string(),
            solr_index_2: "http://localhost:8983/solr/nips2".to_string(),
            num_recs_per_page: 10,
            data_dir: PathBuf::from("../data"),
            models_dir: PathBuf::from("../models"),
            request_timeout_ms: 5000,
            retry_attempts: 3,
        }
    }
}

impl WebtoolConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid webtool configuration")
    }

    /// Reads `path` when it exists, then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_toml_str(&text)?
        } else {
            tracing::warn!(
                "Config file {} not found, using defaults",
                path.display()
            );
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env_overrides_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("WEBTOOL_BIND") {
            self.bind = bind
                .parse()
                .with_context(|| format!("WEBTOOL_BIND is not a socket address: {}", bind))?;
        }
        if let Some(url) = lookup("SOLR_INDEX_0") {
            self.solr_index_0 = url;
        }
        if let Some(url) = lookup("SOLR_INDEX_1") {
            self.solr_index_1 = url;
        }
        if let Some(url) = lookup("SOLR_INDEX_2") {
            self.solr_index_2 = url;
        }
        if let Some(rows) = lookup("NUM_RECS_PER_PAGE") {
            self.num_recs_per_page = rows
                .parse()
                .with_context(|| format!("NUM_RECS_PER_PAGE is not a number: {}", rows))?;
        }
        if let Some(dir) = lookup("WEBTOOL_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("WEBTOOL_MODELS_DIR") {
            self.models_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Base URL of the given core, without trailing slash.
    pub fn solr_url(&self, index: SolrIndex) -> &str {
        let url = match index {
            SolrIndex::Index0 => &self.solr_index_0,
            SolrIndex::Index1 => &self.solr_index_1,
            SolrIndex::Index2 => &self.solr_index_2,
        };
        url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
