//! Whole-word transliteration.

use crate::table::{TranslitTable, MAX_SEQUENCE_LEN};

/// Greedy left-to-right longest-match converter over a [`TranslitTable`].
pub struct Transliterator<'a> {
    table: &'a TranslitTable,
}

impl<'a> Transliterator<'a> {
    pub fn new(table: &'a TranslitTable) -> Self {
        Self { table }
    }

    /// Convert a lowercase word. Characters with no rule are copied through.
    pub fn transliterate(&self, word: &str) -> String {
        let chars: Vec<char> = word.chars().collect();
        let mut out = String::with_capacity(word.len());
        let mut i = 0;

        'scan: while i < chars.len() {
            for len in (1..=MAX_SEQUENCE_LEN).rev() {
                if i + len > chars.len() {
                    continue;
                }
                let sequence: String = chars[i..i + len].iter().collect();
                if let Some(target) = self.table.get(&sequence) {
                    out.push(target);
                    i += len;
                    continue 'scan;
                }
            }
            out.push(chars[i]);
            i += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::WordBuffer;
    use crate::digraph::DigraphMatcher;

    fn transliterate(word: &str) -> String {
        let table = TranslitTable::estonian_russian();
        Transliterator::new(&table).transliterate(word)
    }

    #[test]
    fn test_digraph_preferred_over_first_letter() {
        assert_eq!(transliterate("sha"), "ша");
    }

    #[test]
    fn test_plain_word() {
        assert_eq!(transliterate("privet"), "привэт");
        assert_eq!(transliterate("privjet"), "привет");
        assert_eq!(transliterate("shapka"), "шапка");
        assert_eq!(transliterate("jozh"), "ёж");
    }

    #[test]
    fn test_unmapped_chars_copied() {
        assert_eq!(transliterate("xw1"), "xw1");
        assert_eq!(transliterate("cat"), "cат");
        assert_eq!(transliterate(""), "");
    }

    #[test]
    fn test_trailing_single_char() {
        assert_eq!(transliterate("s"), "с");
        assert_eq!(transliterate("ssh"), "сш");
    }

    #[test]
    fn test_live_matching_agrees_with_word_scan() {
        let table = TranslitTable::estonian_russian();
        let transliterator = Transliterator::new(&table);
        let matcher = DigraphMatcher::new(&table);

        // Every word over a key alphabet that mixes digraph halves, single
        // rules and unmapped keys, up to length 4.
        let alphabet = ['s', 'h', 'c', 'j', 'a', 'z', 'e', 'o', 'u', 'x'];
        let mut words = vec![String::new()];
        for _ in 0..4 {
            let mut next = Vec::new();
            for word in &words {
                for &c in &alphabet {
                    let mut w = word.clone();
                    w.push(c);
                    next.push(w);
                }
            }
            for word in &next {
                let mut buffer = WordBuffer::new();
                for c in word.chars() {
                    matcher.feed(&mut buffer, c);
                }
                assert_eq!(
                    buffer.shown(),
                    transliterator.transliterate(word),
                    "word {}",
                    word
                );
            }
            words = next;
        }
    }

    #[test]
    fn test_live_matching_agrees_with_overridden_table() {
        let mut extra = std::collections::BTreeMap::new();
        for (source, target) in [("hs", "щ"), ("ah", "ә"), ("aa", "ӓ")] {
            extra.insert(source.to_string(), target.to_string());
        }
        let table = TranslitTable::estonian_russian()
            .with_overrides(&extra)
            .unwrap();
        let transliterator = Transliterator::new(&table);
        let matcher = DigraphMatcher::new(&table);

        let alphabet = ['s', 'h', 'a', 'j', 'c', 'x'];
        let mut words = vec![String::new()];
        for _ in 0..6 {
            let mut next = Vec::with_capacity(words.len() * alphabet.len());
            for word in &words {
                for &c in &alphabet {
                    let mut w = word.clone();
                    w.push(c);
                    let mut buffer = WordBuffer::new();
                    for typed in w.chars() {
                        matcher.feed(&mut buffer, typed);
                    }
                    assert_eq!(buffer.shown(), transliterator.transliterate(&w), "word {}", w);
                    next.push(w);
                }
            }
            words = next;
        }
    }
}
