//! Boundary vector / morph sequence conversion
//!
//! A boundary vector for a word of `n` characters has `n - 1` slots; slot `i`
//! is `true` when a morph break sits between character `i` and `i + 1`.
//! Lengths are counted in Unicode scalar values.

use crate::{Error, Result};

/// Number of characters in a word form
pub fn char_len(word: &str) -> usize {
    word.chars().count()
}

/// Expected boundary vector length for `word`, `None` for the empty word
pub fn boundary_slots(word: &str) -> Option<usize> {
    char_len(word).checked_sub(1)
}

/// Apply a boundary vector to a word, producing its morphs
///
/// Fails with `InvalidInput` if the vector does not have `len(word) - 1` slots.
pub fn boundaries_to_morphs(word: &str, boundaries: &[bool]) -> Result<Vec<String>> {
    if boundary_slots(word) != Some(boundaries.len()) {
        return Err(Error::InvalidInput(format!(
            "boundary vector of length {} does not fit word '{}' ({} characters)",
            boundaries.len(),
            word,
            char_len(word)
        )));
    }

    let mut morphs = Vec::with_capacity(boundaries.iter().filter(|b| **b).count() + 1);
    let mut current = String::new();
    for (i, letter) in word.chars().enumerate() {
        current.push(letter);
        // The final character always closes a morph
        if boundaries.get(i).copied().unwrap_or(true) {
            morphs.push(std::mem::take(&mut current));
        }
    }
    Ok(morphs)
}

/// Derive the boundary vector of the word formed by concatenating `morphs`
pub fn morphs_to_boundaries<S: AsRef<str>>(morphs: &[S]) -> Vec<bool> {
    let mut boundaries = Vec::new();
    for morph in morphs {
        let len = char_len(morph.as_ref());
        if len == 0 {
            continue;
        }
        boundaries.extend(std::iter::repeat(false).take(len - 1));
        boundaries.push(true);
    }
    // Drop the superfluous break after the last morph
    boundaries.pop();
    boundaries
}
