use aho_corasick::AhoCorasick;
use anyhow::{Context, Result, anyhow};
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

pub const RAW_KEYWORDS_FILE: &str = "raw_keywords.txt";
pub const NEARDUP_MAPPINGS_FILE: &str = "keyword_neardup_mappings.tsv";
pub const DEDUPE_MAPPINGS_FILE: &str = "keyword_dedupe_mappings.tsv";

/// Finds curated keyword phrases inside a query string.
///
/// The vocabulary is stored lowercased. Matching is ASCII case-insensitive
/// and only accepts hits that sit on word boundaries, so `"art"` does not
/// fire inside `"heart"`.
pub struct KeywordMatcher {
    automaton: AhoCorasick,
    keywords: Vec<String>,
}

impl KeywordMatcher {
    pub fn new<I, S>(keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // BTreeSet keeps pattern ids stable between runs
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&keywords)
            .context("Failed to build keyword automaton")?;

        Ok(Self {
            automaton,
            keywords,
        })
    }

    /// Builds the matcher from the three keyword files in `data_dir`.
    ///
    /// Returns `Ok(None)` unless all three files are present.
    pub fn load(data_dir: &Path) -> Result<Option<Self>> {
        let raw = data_dir.join(RAW_KEYWORDS_FILE);
        let neardup = data_dir.join(NEARDUP_MAPPINGS_FILE);
        let dedupe = data_dir.join(DEDUPE_MAPPINGS_FILE);

        if !(raw.exists() && neardup.exists() && dedupe.exists()) {
            tracing::warn!(
                "Keyword files missing under {}, phrase matching disabled",
                data_dir.display()
            );
            return Ok(None);
        }

        let mut keywords: HashSet<String> = HashSet::new();

        let text = read(&raw)?;
        keywords.extend(text.lines().map(|line| line.trim().to_lowercase()));

        // near-dup mappings: left \t right
        let text = read(&neardup)?;
        keywords.extend(mapping_keywords(&text, 2, &neardup)?);

        // dedupe mappings: left \t right \t score
        let text = read(&dedupe)?;
        keywords.extend(mapping_keywords(&text, 3, &dedupe)?);

        let matcher = Self::new(keywords)?;
        tracing::info!("Keyword automaton built with {} phrases", matcher.len());
        Ok(Some(matcher))
    }

    /// Keyword phrases found in `query`, in order of first occurrence, each reported once.
    pub fn phrases(&self, query: &str) -> Vec<String> {
        let lowered = query.to_lowercase();

        let mut hits: Vec<(usize, usize, usize)> = self
            .automaton
            .find_overlapping_iter(&lowered)
            .filter(|hit| on_word_boundary(&lowered, hit.start(), hit.end()))
            .map(|hit| (hit.start(), hit.end(), hit.pattern().as_usize()))
            .collect();
        // leftmost first, longer phrase first at the same start
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut seen = HashSet::new();
        hits.into_iter()
            .filter(|(_, _, pattern)| seen.insert(*pattern))
            .map(|(_, _, pattern)| self.keywords[pattern].clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn mapping_keywords(text: &str, columns: usize, path: &Path) -> Result<Vec<String>> {
    let mut keywords = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < columns {
            return Err(anyhow!(
                "{}:{}: expected {} tab-separated columns, found {}",
                path.display(),
                line_no + 1,
                columns,
                parts.len()
            ));
        }
        keywords.push(parts[0].trim().to_lowercase());
        keywords.push(parts[1].trim().to_lowercase());
    }
    Ok(keywords)
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text.get(..start).and_then(|s| s.chars().next_back());
    let after = text.get(end..).and_then(|s| s.chars().next());
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
