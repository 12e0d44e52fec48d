//! Webtool Configuration
//!
//! Loads the runtime settings of the web service: where to listen, which Solr
//! cores to query and where the static keyword and vector files live.
//!
//! ## Sources
//! Settings are resolved in three layers, later layers winning:
//! 1. **Defaults**: `WebtoolConfig::default()`.
//! 2. **File**: an optional TOML file (`webtool.toml` unless overridden).
//! 3. **Environment**: `WEBTOOL_BIND`, `SOLR_INDEX_0..2`, `NUM_RECS_PER_PAGE`,
//!    `WEBTOOL_DATA_DIR` and `WEBTOOL_MODELS_DIR`.

pub mod settings;

pub use settings::{SolrIndex, WebtoolConfig};
