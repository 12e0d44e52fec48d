//! Solr query-string construction.

use crate::keywords::KeywordMatcher;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Fields searched by every mode, with the boost used for whole-query and per-term clauses.
const FIELD_BOOSTS: [(&str, Option<u32>); 3] =
    [("title", Some(5)), ("abstract", Some(2)), ("text", None)];

/// Field groups for keyword-phrase queries: `(field, group boost)`.
const PHRASE_GROUPS: [(&str, u32); 3] = [("title", 10), ("abstract", 5), ("text", 1)];
const WHOLE_QUERY_BOOST: u32 = 5;
const PHRASE_BOOST: u32 = 2;

/// How the user's query is turned into a Solr query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryMode {
    /// The whole query as one phrase against each field.
    Phrase,
    /// Every whitespace-separated term as its own phrase.
    Terms,
    /// Like `Terms`, minus stopwords.
    TermsWithoutStopwords,
    /// Whole query plus every known keyword phrase inside it, grouped per field.
    KeywordPhrases,
}

impl TryFrom<u8> for QueryMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(QueryMode::Phrase),
            1 => Ok(QueryMode::Terms),
            2 => Ok(QueryMode::TermsWithoutStopwords),
            3 => Ok(QueryMode::KeywordPhrases),
            other => Err(format!("Unknown query mode: {}", other)),
        }
    }
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            QueryMode::Phrase => 0,
            QueryMode::Terms => 1,
            QueryMode::TermsWithoutStopwords => 2,
            QueryMode::KeywordPhrases => 3,
        };
        write!(f, "{}", code)
    }
}

/// Builds query strings for every `QueryMode`.
#[derive(Default)]
pub struct QueryBuilder {
    stopwords: HashSet<String>,
    matcher: Option<KeywordMatcher>,
}

impl QueryBuilder {
    pub fn new(stopwords: HashSet<String>, matcher: Option<KeywordMatcher>) -> Self {
        Self { stopwords, matcher }
    }

    pub fn build(&self, query: &str, mode: QueryMode) -> String {
        match mode {
            QueryMode::Phrase => field_triple(query),
            QueryMode::Terms => query
                .split_whitespace()
                .map(field_triple)
                .collect::<Vec<_>>()
                .join(" "),
            QueryMode::TermsWithoutStopwords => query
                .split_whitespace()
                .filter(|term| !self.stopwords.contains(*term))
                .map(field_triple)
                .collect::<Vec<_>>()
                .join(" "),
            QueryMode::KeywordPhrases => self.keyword_phrase_query(query),
        }
    }

    fn keyword_phrase_query(&self, query: &str) -> String {
        let phrases = self
            .matcher
            .as_ref()
            .map(|m| m.phrases(query))
            .unwrap_or_default();

        PHRASE_GROUPS
            .iter()
            .map(|(field, boost)| {
                let mut clauses = vec![field_clause(field, query, Some(WHOLE_QUERY_BOOST))];
                clauses.extend(
                    phrases
                        .iter()
                        .map(|phrase| field_clause(field, phrase, Some(PHRASE_BOOST))),
                );
                format!("({})^{}", clauses.join(" "), boost)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `title:"v"^5 abstract:"v"^2 text:"v"`
fn field_triple(value: &str) -> String {
    FIELD_BOOSTS
        .iter()
        .map(|(field, boost)| field_clause(field, value, *boost))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `field:"value"^boost`, with the value escaped for use inside a quoted phrase.
pub fn field_clause(field: &str, value: &str, boost: Option<u32>) -> String {
    match boost {
        Some(boost) => format!("{}:\"{}\"^{}", field, escape_phrase(value), boost),
        None => format!("{}:\"{}\"", field, escape_phrase(value)),
    }
}

/// `field:("a" "b" ...)`
pub fn any_of_clause<S: AsRef<str>>(field: &str, values: &[S]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", escape_phrase(v.as_ref())))
        .collect();
    format!("{}:({})", field, quoted.join(" "))
}

pub fn escape_phrase(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escapes Solr query syntax so `value` is matched as a single literal term.
pub fn escape_term(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_whitespace() || "+-&|!(){}[]^\"~*?:\\/".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Percent-encodes `(key, value)` pairs into a query string. Keys may repeat.
pub fn encode_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Zero-based Solr `start` for a one-based page. Pages below 1 clamp to the first page.
pub fn start_offset(page: i64, rows: usize) -> u64 {
    let start = page.saturating_sub(1).saturating_mul(rows as i64);
    start.max(0) as u64
}
