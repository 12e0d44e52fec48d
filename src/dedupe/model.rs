use super::error::DedupeError;
use super::training::TrainingPairs;
use super::types::{KeywordRecord, NUM_HASH_COLUMNS};

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SETTINGS_FILE: &str = "dedupe_keywords_learned_settings";

const EPOCHS: usize = 500;
const LEARNING_RATE: f64 = 0.5;
const L2_PENALTY: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    /// 1 when both values are present and equal.
    Exact,
    /// Normalised Levenshtein similarity of the lowercased values.
    String,
}

impl Comparator {
    pub fn compare(self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        match self {
            Comparator::Exact => {
                if a == b {
                    1.0
                } else {
                    0.0
                }
            }
            Comparator::String => strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub field: String,
    pub comparator: Comparator,
}

/// Logistic classifier over per-field comparator scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupeModel {
    pub fields: Vec<FieldDef>,
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// `col_1..col_25` compared exactly, `keyword` compared as a string.
pub fn keyword_fields() -> Vec<FieldDef> {
    let mut fields: Vec<FieldDef> = (1..=NUM_HASH_COLUMNS)
        .map(|n| FieldDef {
            field: format!("col_{}", n),
            comparator: Comparator::Exact,
        })
        .collect();
    fields.push(FieldDef {
        field: "keyword".to_string(),
        comparator: Comparator::String,
    });
    fields
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl DedupeModel {
    /// Untrained model. Only the string fields carry weight, so an identical
    /// keyword scores high and a half-similar one sits at 0.5.
    pub fn new(fields: Vec<FieldDef>) -> Self {
        let weights = fields
            .iter()
            .map(|f| match f.comparator {
                Comparator::Exact => 0.0,
                Comparator::String => 4.0,
            })
            .collect();
        Self {
            fields,
            weights,
            bias: -2.0,
        }
    }

    pub fn for_keywords() -> Self {
        Self::new(keyword_fields())
    }

    pub fn features(&self, a: &KeywordRecord, b: &KeywordRecord) -> Vec<f64> {
        self.fields
            .iter()
            .map(|f| f.comparator.compare(a.field(&f.field), b.field(&f.field)))
            .collect()
    }

    fn predict(&self, x: &[f64]) -> f64 {
        let z: f64 = self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + self.bias;
        sigmoid(z)
    }

    /// Probability that the two records are the same keyword.
    pub fn score(&self, a: &KeywordRecord, b: &KeywordRecord) -> f64 {
        self.predict(&self.features(a, b))
    }

    /// Refits weights and bias from scratch on the labeled pairs.
    pub fn train(&mut self, training: &TrainingPairs) -> Result<(), DedupeError> {
        if training.matches.is_empty() || training.distinct.is_empty() {
            return Err(DedupeError::NotEnoughTraining {
                matches: training.matches.len(),
                distinct: training.distinct.len(),
            });
        }

        let examples: Vec<(Vec<f64>, f64)> = training
            .matches
            .iter()
            .map(|(a, b)| (self.features(a, b), 1.0))
            .chain(
                training
                    .distinct
                    .iter()
                    .map(|(a, b)| (self.features(a, b), 0.0)),
            )
            .collect();

        let n = examples.len() as f64;
        let mut weights = vec![0.0; self.fields.len()];
        let mut bias = 0.0;

        for _ in 0..EPOCHS {
            let mut grad_w = vec![0.0; weights.len()];
            let mut grad_b = 0.0;
            for (x, y) in &examples {
                let z: f64 = weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + bias;
                let err = sigmoid(z) - y;
                for (g, v) in grad_w.iter_mut().zip(x) {
                    *g += err * v;
                }
                grad_b += err;
            }
            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= LEARNING_RATE * (g / n + L2_PENALTY * *w);
            }
            bias -= LEARNING_RATE * grad_b / n;
        }

        tracing::debug!(
            "Trained on {} matches and {} distinct pairs",
            training.matches.len(),
            training.distinct.len()
        );
        self.weights = weights;
        self.bias = bias;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), DedupeError> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, DedupeError> {
        let bytes = std::fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }
}
