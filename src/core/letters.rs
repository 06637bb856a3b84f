//! Conversion between 0-based answer indexes and answer letters.

/// Letter returned for an index outside `A..=Z`.
pub const INVALID_LETTER: char = '*';

/// Marker written in place of a letter for a blank answer.
pub const UNANSWERED_MARKER: char = '*';

const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// `0 -> 'A'`, `1 -> 'B'`, ...; anything out of range gives [`INVALID_LETTER`].
pub fn index_to_letter(index: i64) -> char {
    if index < 0 || index >= LETTERS.len() as i64 {
        return INVALID_LETTER;
    }
    LETTERS[index as usize] as char
}

/// `'A'`/`'a' -> 0`, `'B'`/`'b' -> 1`, ...; other characters give `None`.
pub fn letter_to_index(letter: char) -> Option<usize> {
    match letter {
        'A'..='Z' => Some(letter as usize - 'A' as usize),
        'a'..='z' => Some(letter as usize - 'a' as usize),
        _ => None,
    }
}
