//! Capitalization restoration.

/// Whether `word` has at least one cased character and none in lowercase.
pub fn is_all_upper(word: &str) -> bool {
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}

/// Reapply the capitalization pattern of `original` to `corrected`.
///
/// All caps stays all caps; a leading capital capitalizes the first
/// character and lowercases the rest; anything else returns `corrected`
/// unchanged.
pub fn restore_case(original: &str, corrected: &str) -> String {
    if is_all_upper(original) {
        return corrected.to_uppercase();
    }
    match original.chars().next() {
        Some(first) if first.is_uppercase() => capitalize(corrected),
        _ => corrected.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
