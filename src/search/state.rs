use super::client::SolrClient;
use super::resources::SearchResources;
use crate::config::{SolrIndex, WebtoolConfig};

use std::sync::Arc;

/// Shared state handed to every handler.
///
/// The HTTP client and the loaded resources are reused across requests. A
/// `SolrClient` is a cheap view over them, pointed at one core.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<WebtoolConfig>,
    pub http: reqwest::Client,
    pub resources: Arc<SearchResources>,
}

impl AppState {
    pub fn new(config: WebtoolConfig, resources: SearchResources) -> Self {
        Self {
            config: Arc::new(config),
            http: reqwest::Client::new(),
            resources: Arc::new(resources),
        }
    }

    pub fn client(&self, index: SolrIndex) -> SolrClient {
        SolrClient::new(
            self.http.clone(),
            self.config.solr_url(index),
            self.config.num_recs_per_page,
            self.resources.clone(),
        )
        .with_retry(self.config.request_timeout(), self.config.retry_attempts)
    }
}
