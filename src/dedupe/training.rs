use super::error::DedupeError;
use super::model::DedupeModel;
use super::types::KeywordRecord;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const TRAINING_FILE: &str = "dedupe_keywords_training.json";

pub type RecordPair = (KeywordRecord, KeywordRecord);

/// Labeled examples collected on the console.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingPairs {
    #[serde(rename = "match", default)]
    pub matches: Vec<RecordPair>,
    #[serde(default)]
    pub distinct: Vec<RecordPair>,
}

impl TrainingPairs {
    pub fn len(&self) -> usize {
        self.matches.len() + self.distinct.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_both_classes(&self) -> bool {
        !self.matches.is_empty() && !self.distinct.is_empty()
    }

    /// Whether the pair of ids was already labeled either way.
    pub fn contains(&self, left: i64, right: i64) -> bool {
        let same = |(a, b): &RecordPair| {
            (a.id == left && b.id == right) || (a.id == right && b.id == left)
        };
        self.matches.iter().any(same) || self.distinct.iter().any(same)
    }

    /// Appends the pairs stored at `path`.
    pub fn read_training(&mut self, path: &Path) -> Result<(), DedupeError> {
        let file = std::fs::File::open(path)?;
        let stored: TrainingPairs = serde_json::from_reader(std::io::BufReader::new(file))?;
        tracing::info!(
            "Read {} matches and {} distinct pairs from {}",
            stored.matches.len(),
            stored.distinct.len(),
            path.display()
        );
        self.matches.extend(stored.matches);
        self.distinct.extend(stored.distinct);
        Ok(())
    }

    pub fn write_training(&self, path: &Path) -> Result<(), DedupeError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}

/// Persists a labeling session: writes the pairs first, then fits `model`
/// and saves its settings. The pairs stay on disk when training fails.
pub fn save_and_train(
    model: &mut DedupeModel,
    training: &TrainingPairs,
    training_file: &Path,
    settings_file: &Path,
) -> Result<(), DedupeError> {
    for path in [training_file, settings_file] {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
    }

    training.write_training(training_file)?;
    tracing::info!("Saved {} labeled pairs to {}", training.len(), training_file.display());

    model.train(training)?;
    model.save(settings_file)?;
    tracing::info!("Saved learned settings to {}", settings_file.display());
    Ok(())
}
