use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

pub const STOPWORDS_FILE: &str = "stopwords.txt";

/// Reads one stopword per line. A missing file yields an empty set.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        tracing::warn!("Stopword list {} not found", path.display());
        return Ok(HashSet::new());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read stopwords from {}", path.display()))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect())
}
