//! Annotation corpus
//!
//! Loaded once from a TOML file:
//!
//! ```toml
//! iteration = 1
//!
//! [[buckets]]
//! label = "First set"
//! has_prediction = false
//! truncate = 50
//! words = ["fox", "foxes"]
//!
//! [segmentations]
//! foxes = ["fox", "es"]
//!
//! [[contexts]]
//! word = "foxes"
//! id = "c1"
//! left = ["the", "two"]
//! right = ["ran", "away"]
//! ```

use morphseg_common::segmentation::{boundary_slots, char_len, morphs_to_boundaries};
use morphseg_common::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// One annotation phase
#[derive(Debug, Clone, Deserialize)]
pub struct BucketSpec {
    pub label: String,
    #[serde(default)]
    pub has_prediction: bool,
    /// Number of words each worker annotates in this phase
    #[serde(default)]
    pub truncate: Option<usize>,
    pub words: Vec<String>,
}

/// One usage example, tokenized
#[derive(Debug, Clone, Deserialize)]
pub struct ContextSpec {
    pub word: String,
    pub id: String,
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
    #[serde(default = "default_iteration")]
    pub iteration: u32,
    #[serde(default)]
    pub buckets: Vec<BucketSpec>,
    /// Suggested segmentations, word -> morphs
    #[serde(default)]
    pub segmentations: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub contexts: Vec<ContextSpec>,
}

fn default_iteration() -> u32 {
    1
}

impl Corpus {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let corpus: Corpus =
            toml::from_str(content).map_err(|e| Error::Config(format!("Invalid corpus: {}", e)))?;
        corpus.check_segmentations();
        Ok(corpus)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let corpus = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            buckets = corpus.buckets.len(),
            segmentations = corpus.segmentations.len(),
            contexts = corpus.contexts.len(),
            "Corpus loaded"
        );
        Ok(corpus)
    }

    fn check_segmentations(&self) {
        for (word, morphs) in &self.segmentations {
            if morphs.concat() != *word {
                warn!(word = %word, morphs = ?morphs, "Suggested segmentation does not spell the word");
            }
        }
    }

    /// Suggested morphs of a word, if they spell it
    pub fn suggestion(&self, word: &str) -> Option<&[String]> {
        self.segmentations
            .get(word)
            .filter(|morphs| morphs.concat() == word)
            .map(Vec::as_slice)
    }

    /// Boundary vector of the suggestion, unsegmented when there is none
    pub fn suggested_boundaries(&self, word: &str) -> Vec<bool> {
        match self.suggestion(word) {
            Some(morphs) => morphs_to_boundaries(morphs),
            None => vec![false; boundary_slots(word).unwrap_or(0)],
        }
    }

    pub fn contexts_of<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'a ContextSpec> + 'a {
        self.contexts.iter().filter(move |c| c.word == word)
    }
}

/// Join tokens right-to-left until `width` characters would be exceeded
///
/// The token next to the word is always kept; a cut is marked with `...`.
pub fn truncate_left(tokens: &[String], width: usize) -> String {
    let mut rest: Vec<&str> = tokens.iter().map(String::as_str).collect();
    let mut text = rest.pop().unwrap_or_default().to_string();
    while let Some(&next) = rest.last() {
        if char_len(&text) + char_len(next) > width {
            text = format!("...{}", text);
            break;
        }
        text = format!("{} {}", next, text);
        rest.pop();
    }
    text
}

/// Join tokens left-to-right until `width` characters would be exceeded
pub fn truncate_right(tokens: &[String], width: usize) -> String {
    let mut rest = tokens.iter().map(String::as_str);
    let mut text = rest.next().unwrap_or_default().to_string();
    for next in rest {
        if char_len(&text) + char_len(next) > width {
            text.push_str("...");
            break;
        }
        text.push(' ');
        text.push_str(next);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    const CORPUS: &str = r#"
        iteration = 2

        [[buckets]]
        label = "First set"
        words = ["fox", "foxes"]

        [[buckets]]
        label = "Training words"
        has_prediction = true
        truncate = 1
        words = ["unfox", "ox"]

        [segmentations]
        foxes = ["fox", "es"]
        unfox = ["un", "fax"]

        [[contexts]]
        word = "foxes"
        id = "c1"
        left = ["the", "two"]
        right = ["ran"]
    "#;

    #[test]
    fn test_parse_corpus() {
        let corpus = Corpus::from_toml_str(CORPUS).unwrap();
        assert_eq!(corpus.iteration, 2);
        assert_eq!(corpus.buckets.len(), 2);
        assert!(!corpus.buckets[0].has_prediction);
        assert_eq!(corpus.buckets[1].truncate, Some(1));
        assert_eq!(corpus.contexts_of("foxes").count(), 1);
        assert_eq!(corpus.contexts_of("fox").count(), 0);
    }

    #[test]
    fn test_invalid_corpus() {
        assert!(matches!(Corpus::from_toml_str("buckets = 3"), Err(Error::Config(_))));
    }

    #[test]
    fn test_suggested_boundaries() {
        let corpus = Corpus::from_toml_str(CORPUS).unwrap();
        assert_eq!(corpus.suggested_boundaries("foxes"), vec![false, false, true, false]);
        assert_eq!(corpus.suggested_boundaries("ox"), vec![false]);
        // Suggestion that does not spell the word is ignored
        assert_eq!(corpus.suggested_boundaries("unfox"), vec![false; 4]);
    }

    #[test]
    fn test_truncate_left() {
        let left = tokens("one two three four");
        assert_eq!(truncate_left(&left, 100), "one two three four");
        assert_eq!(truncate_left(&left, 10), "...three four");
        // The nearest token is kept even if it is too long
        assert_eq!(truncate_left(&tokens("a extraordinarily"), 3), "...extraordinarily");
        assert_eq!(truncate_left(&[], 10), "");
    }

    #[test]
    fn test_truncate_right() {
        let right = tokens("one two three four");
        assert_eq!(truncate_right(&right, 100), "one two three four");
        assert_eq!(truncate_right(&right, 8), "one two...");
        assert_eq!(truncate_right(&[], 10), "");
    }
}
