use super::types::{DocEmbeddings, SimilarityKind, SimilarityMatrix};

use anyhow::Result;
use std::path::Path;

pub const TOPIC_SIMS_FILE: &str = "topic_sims.bin";
pub const W2V_SIMS_FILE: &str = "w2v_sims.bin";
pub const DOC2VEC_FILE: &str = "doc2vec_vectors.bin";

/// All similarity artifacts found at startup. Each one is optional.
#[derive(Debug, Default)]
pub struct VectorResources {
    pub topic: Option<SimilarityMatrix>,
    pub w2v: Option<SimilarityMatrix>,
    pub doc2vec: Option<DocEmbeddings>,
}

impl VectorResources {
    pub fn load(data_dir: &Path, models_dir: &Path) -> Result<Self> {
        let topic = load_optional(&data_dir.join(TOPIC_SIMS_FILE), SimilarityMatrix::from_file)?;
        let w2v = load_optional(&data_dir.join(W2V_SIMS_FILE), SimilarityMatrix::from_file)?;
        let doc2vec = load_optional(&models_dir.join(DOC2VEC_FILE), DocEmbeddings::from_file)?;

        Ok(Self {
            topic,
            w2v,
            doc2vec,
        })
    }

    pub fn matrix(&self, kind: SimilarityKind) -> Option<&SimilarityMatrix> {
        match kind {
            SimilarityKind::Topic => self.topic.as_ref(),
            SimilarityKind::W2v => self.w2v.as_ref(),
        }
    }
}

fn load_optional<T, F>(path: &Path, load: F) -> Result<Option<T>>
where
    F: Fn(&Path) -> Result<T>,
{
    if !path.exists() {
        tracing::warn!("{} not found, related feature disabled", path.display());
        return Ok(None);
    }
    let value = load(path)?;
    tracing::info!("Loaded {}", path.display());
    Ok(Some(value))
}
