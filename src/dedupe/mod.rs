//! Keyword Deduplication Module
//!
//! Offline record linkage over the curated keyword list. Each record is a
//! keyword plus 25 precomputed hash columns. The pipeline finds records that
//! name the same concept and emits one mapping per cluster, which the web
//! service later folds into its keyword vocabulary.
//!
//! ## Workflow
//! 1. **Load**: Read `curated_keywords_hash.csv` into `KeywordRecord`s.
//! 2. **Learn**: Sample record pairs, label the most uncertain ones on the
//!    console and fit a logistic model over per-field comparators. A saved
//!    settings file skips this step.
//! 3. **Block**: Only compare records sharing a hash value or keyword token.
//! 4. **Threshold**: Pick the score cut-off that maximises a recall-weighted F-score.
//! 5. **Cluster**: Link pairs above the cut-off into connected components.
//! 6. **Write**: `longest \t second longest \t score` per cluster.
//!
//! ## Submodules
//! - **`records`**: CSV loading.
//! - **`model`**: Field comparators and the logistic pair classifier.
//! - **`training`**: Labeled pairs, persisted as JSON.
//! - **`blocking`**: Candidate pair generation.
//! - **`labeling`**: Pair sampling and the interactive console loop.
//! - **`threshold`**: Recall-weighted threshold selection.
//! - **`cluster`**: Pair scoring and union-find clustering.
//! - **`output`**: The mappings TSV.

pub mod blocking;
pub mod cluster;
pub mod error;
pub mod labeling;
pub mod model;
pub mod output;
pub mod records;
pub mod threshold;
pub mod training;
pub mod types;

pub use error::DedupeError;
pub use model::DedupeModel;
pub use training::TrainingPairs;
pub use types::{Cluster, KeywordRecord, RecordMap};

#[cfg(test)]
mod tests;
