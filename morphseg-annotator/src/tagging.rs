//! Tag legality checking and tagging work-in-progress
//!
//! Legality rules:
//! - Every morph must carry a tag before the sequence can be submitted.
//! - A prefix may never be immediately followed by a suffix.
//! - The first morph can not be a suffix and the last morph can not be a
//!   prefix. These choices are never offered (`allowed_tags`), so
//!   `validate` does not check them.
//! - A single-morph word is a stem; no tagging step is shown for it.

use morphseg_common::TagKind;
use thiserror::Error;

/// Outcome of checking a tag sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagCheck {
    /// Fewer tags than morphs
    Incomplete,
    /// `tags[position - 1]` is a prefix and `tags[position]` a suffix
    Illegal { position: usize },
    /// Sequence may be submitted
    Valid(Vec<TagKind>),
}

impl TagCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, TagCheck::Valid(_))
    }
}

/// Check a tag sequence against the number of morphs it must cover
pub fn validate(tags: &[TagKind], morph_count: usize) -> TagCheck {
    if tags.len() < morph_count {
        return TagCheck::Incomplete;
    }

    let illegal = tags
        .windows(2)
        .position(|pair| pair[0] == TagKind::Prefix && pair[1] == TagKind::Suffix);
    if let Some(i) = illegal {
        return TagCheck::Illegal { position: i + 1 };
    }

    TagCheck::Valid(tags.to_vec())
}

/// Tags that may be offered for the morph at `index`
pub fn allowed_tags(index: usize, morph_count: usize) -> &'static [TagKind] {
    const ALL: &[TagKind] = &[TagKind::Prefix, TagKind::Stem, TagKind::Suffix];
    const NOT_FIRST: &[TagKind] = &[TagKind::Prefix, TagKind::Stem];
    const NOT_LAST: &[TagKind] = &[TagKind::Stem, TagKind::Suffix];
    const ONLY_STEM: &[TagKind] = &[TagKind::Stem];

    let first = index == 0;
    let last = index + 1 >= morph_count;
    match (first, last) {
        (true, true) => ONLY_STEM,
        (true, false) => NOT_FIRST,
        (false, true) => NOT_LAST,
        (false, false) => ALL,
    }
}

/// Rejected tag selection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagChoiceError {
    #[error("Morph index {index} out of range ({count} morphs)")]
    OutOfRange { index: usize, count: usize },

    #[error("Tag {tag} can not be chosen for morph {index}")]
    NotSelectable { index: usize, tag: TagKind },
}

/// Tag assignment for a proposed morph segmentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSheet {
    morphs: Vec<String>,
    tags: Vec<Option<TagKind>>,
}

impl TagSheet {
    /// New sheet; with `preselect_stem` every morph starts out as a stem
    pub fn new(morphs: Vec<String>, preselect_stem: bool) -> Self {
        let initial = preselect_stem.then_some(TagKind::Stem);
        let tags = vec![initial; morphs.len()];
        Self { morphs, tags }
    }

    /// Sheet for a single-morph word, tagged as a stem
    pub fn single_stem(morph: String) -> Self {
        Self {
            morphs: vec![morph],
            tags: vec![Some(TagKind::Stem)],
        }
    }

    pub fn morphs(&self) -> &[String] {
        &self.morphs
    }

    pub fn tags(&self) -> &[Option<TagKind>] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.morphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.morphs.is_empty()
    }

    /// Assign `tag` to morph `index` and re-check the sequence
    pub fn select(&mut self, index: usize, tag: TagKind) -> Result<TagCheck, TagChoiceError> {
        let count = self.morphs.len();
        if index >= count {
            return Err(TagChoiceError::OutOfRange { index, count });
        }
        if !allowed_tags(index, count).contains(&tag) {
            return Err(TagChoiceError::NotSelectable { index, tag });
        }
        self.tags[index] = Some(tag);
        Ok(self.check())
    }

    /// Check the tags assigned so far
    pub fn check(&self) -> TagCheck {
        let assigned: Vec<TagKind> = self.tags.iter().flatten().copied().collect();
        if assigned.len() < self.tags.len() {
            return TagCheck::Incomplete;
        }
        validate(&assigned, self.morphs.len())
    }
}
