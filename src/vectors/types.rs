use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which precomputed similarity matrix to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityKind {
    Topic,
    W2v,
}

impl SimilarityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityKind::Topic => "topic",
            SimilarityKind::W2v => "w2v",
        }
    }
}

impl fmt::Display for SimilarityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimilarityKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "topic" => Ok(SimilarityKind::Topic),
            "w2v" => Ok(SimilarityKind::W2v),
            other => Err(anyhow!("Unknown similarity kind: {}", other)),
        }
    }
}

/// Square document-by-document score matrix.
///
/// `scores[i * n + j]` is the similarity between the documents at corpus
/// positions `i` and `j`, and `doc_ids[i]` is the document id at position `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    doc_ids: Vec<i64>,
    scores: Vec<f32>,
    #[serde(skip)]
    positions: HashMap<i64, usize>,
}

impl SimilarityMatrix {
    pub fn new(doc_ids: Vec<i64>, scores: Vec<f32>) -> Result<Self> {
        let mut matrix = Self {
            doc_ids,
            scores,
            positions: HashMap::new(),
        };
        matrix.index()?;
        Ok(matrix)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let mut matrix: Self = read_bincode(path)?;
        matrix
            .index()
            .with_context(|| format!("Corrupt similarity matrix {}", path.display()))?;
        Ok(matrix)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_bincode(path, self)
    }

    fn index(&mut self) -> Result<()> {
        let n = self.doc_ids.len();
        if self.scores.len() != n * n {
            return Err(anyhow!(
                "Expected {}x{} scores, found {}",
                n,
                n,
                self.scores.len()
            ));
        }
        self.positions = positions_of(&self.doc_ids);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    /// The `k` best-scoring documents for `doc_id`, best first.
    ///
    /// The document's own column takes part in the ranking, so callers drop it
    /// themselves. Equal scores keep corpus order.
    pub fn top_matches(&self, doc_id: i64, k: usize) -> Vec<i64> {
        let Some(&row) = self.positions.get(&doc_id) else {
            return Vec::new();
        };
        let n = self.doc_ids.len();
        let scores = &self.scores[row * n..(row + 1) * n];

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| descending(scores[a], scores[b]));

        order
            .into_iter()
            .take(k)
            .map(|col| self.doc_ids[col])
            .collect()
    }
}

/// Dense per-document vectors, ranked by cosine similarity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocEmbeddings {
    doc_ids: Vec<i64>,
    dim: usize,
    vectors: Vec<f32>,
    #[serde(skip)]
    positions: HashMap<i64, usize>,
}

impl DocEmbeddings {
    pub fn new(doc_ids: Vec<i64>, dim: usize, vectors: Vec<f32>) -> Result<Self> {
        let mut embeddings = Self {
            doc_ids,
            dim,
            vectors,
            positions: HashMap::new(),
        };
        embeddings.index()?;
        Ok(embeddings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let mut embeddings: Self = read_bincode(path)?;
        embeddings
            .index()
            .with_context(|| format!("Corrupt embeddings file {}", path.display()))?;
        Ok(embeddings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_bincode(path, self)
    }

    fn index(&mut self) -> Result<()> {
        if self.vectors.len() != self.doc_ids.len() * self.dim {
            return Err(anyhow!(
                "Expected {} vectors of dimension {}, found {} values",
                self.doc_ids.len(),
                self.dim,
                self.vectors.len()
            ));
        }
        self.positions = positions_of(&self.doc_ids);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    fn vector(&self, position: usize) -> &[f32] {
        &self.vectors[position * self.dim..(position + 1) * self.dim]
    }

    /// The `topn` documents closest to `doc_id` by cosine similarity, excluding itself.
    pub fn most_similar(&self, doc_id: i64, topn: usize) -> Vec<(i64, f32)> {
        let Some(&source) = self.positions.get(&doc_id) else {
            return Vec::new();
        };
        let query = self.vector(source);

        let mut scored: Vec<(i64, f32)> = (0..self.doc_ids.len())
            .filter(|&pos| pos != source)
            .map(|pos| (self.doc_ids[pos], cosine(query, self.vector(pos))))
            .collect();
        scored.sort_by(|a, b| descending(a.1, b.1));
        scored.truncate(topn);
        scored
    }
}

pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn descending(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn positions_of(doc_ids: &[i64]) -> HashMap<i64, usize> {
    doc_ids
        .iter()
        .enumerate()
        .map(|(pos, id)| (*id, pos))
        .collect()
}

fn read_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    bincode::deserialize(&bytes).with_context(|| format!("Failed to decode {}", path.display()))
}

fn write_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = bincode::serialize(value)?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}
