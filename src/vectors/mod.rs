//! Precomputed Similarity Module
//!
//! Read-only access to document-similarity artifacts produced offline.
//!
//! ## Artifacts
//! - **`SimilarityMatrix`**: A dense document-by-document score matrix (topic
//!   model or averaged word vectors), keyed by corpus position, with the
//!   position-to-document-id table stored alongside.
//! - **`DocEmbeddings`**: One dense vector per document (doc2vec style), ranked
//!   by cosine similarity at query time.
//!
//! Both are stored as bincode files so they load without any parsing step.

pub mod similarity;
pub mod types;

pub use similarity::VectorResources;
pub use types::{DocEmbeddings, SimilarityKind, SimilarityMatrix};

#[cfg(test)]
mod tests;
