use std::borrow::Cow;
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

/// Canonical composed form. Borrows when the text is already NFC.
pub fn nfc(text: &str) -> Cow<'_, str> {
    match is_nfc_quick(text.chars()) {
        IsNormalized::Yes => Cow::Borrowed(text),
        _ => Cow::Owned(text.nfc().collect()),
    }
}

/// Collapse whitespace runs to single spaces and drop control characters.
pub fn clean_document(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}

/// Clean and NFC-normalize a raw document. Returns `None` when nothing
/// remains after cleaning. Characters must be counted on the output of
/// this function, never on the raw line.
pub fn normalize_document(raw: &str) -> Option<String> {
    let cleaned = clean_document(raw);
    if cleaned.is_empty() {
        return None;
    }
    Some(nfc(&cleaned).into_owned())
}

pub fn char_count(text: &str) -> u64 {
    text.chars().count() as u64
}
