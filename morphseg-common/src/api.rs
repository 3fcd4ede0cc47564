//! Wire types of the annotation backend HTTP API
//!
//! Shared by the HTTP client in `morphseg-annotator` and the handlers in
//! `morphseg-devserver`. Field names are the stable contract; tuples are
//! encoded as JSON arrays.

use serde::{Deserialize, Serialize};

/// Query string of `GET /user/{email}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginQuery {
    /// Client display width in pixels
    pub width: u32,
}

/// Response of `GET /user/{email}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Opaque worker identifier
    pub uid: String,
    /// Words already annotated by this worker
    pub annotated: u64,
    /// Iteration number (1-based)
    pub iteration: u32,
}

/// One bucket of the word queue: `[phase label, has prediction, forms]`
pub type BucketTriple = (String, bool, Vec<String>);

/// Response of `GET /words/{uid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordsResponse {
    pub words: Vec<BucketTriple>,
}

/// Query string of `GET /word/{word}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UidQuery {
    pub uid: String,
}

/// One usage context: `[left text, right text, context id]`
pub type ContextTriple = (String, String, String);

/// Response of `GET /word/{word}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordResponse {
    /// Grapheme form of the word
    pub word: String,
    /// Suggested boundary vector, `len(word) - 1` entries
    pub boundaries: Vec<bool>,
    pub contexts: Vec<ContextTriple>,
}

/// Form body carrying only the worker id (`/sense`, `/nonword`, `/skip`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UidForm {
    pub uid: String,
}

/// Form body of `POST /log/{handle}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogForm {
    pub uid: String,
    pub message: String,
}

/// Form body of `POST /b2seg/{word}`
///
/// `boundaries` and `contexts` are JSON documents embedded in form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationForm {
    pub uid: String,
    pub boundaries: String,
    pub contexts: String,
}

/// Response of `POST /b2seg/{word}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedResponse {
    pub word: String,
    pub segmented: Vec<String>,
}

/// Form body of `POST /word/{word}`
///
/// `boundaries`, `tags` and `contexts` are JSON documents embedded in form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationForm {
    pub uid: String,
    pub boundaries: String,
    pub tags: String,
    pub contexts: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_response_shape() {
        let json = r#"{"words": [["First set", false, ["fox", "foxes"]], ["Training", true, []]]}"#;
        let parsed: WordsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.words.len(), 2);
        assert_eq!(parsed.words[0].0, "First set");
        assert!(!parsed.words[0].1);
        assert_eq!(parsed.words[0].2, vec!["fox", "foxes"]);
        assert!(parsed.words[1].2.is_empty());
    }

    #[test]
    fn test_word_response_contexts_are_arrays() {
        let json = r#"{"word": "foxes", "boundaries": [false, false, true, false],
                       "contexts": [["the quick", "jumped", "c1"]]}"#;
        let parsed: WordResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.contexts[0], ("the quick".to_string(), "jumped".to_string(), "c1".to_string()));
    }
}
