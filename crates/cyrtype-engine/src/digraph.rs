//! Live, per-keystroke substitution.
//!
//! Every typed character is tried against the table as the second half of
//! a digraph (together with the previous single-key segment) and then on
//! its own. On a match the triggering key is swallowed and the mapped
//! character injected instead; for a digraph the previously shown
//! character is erased first. A typed key can only revise the segment
//! directly before it, and a digraph segment is never revised again, which
//! keeps live output identical to a left-to-right greedy scan of the word.

use crate::buffer::WordBuffer;
use crate::rewriter::RewritePlan;
use crate::table::TranslitTable;

/// Applies the case of the first typed key to a mapped character.
pub(crate) fn cased(target: char, typed: char) -> char {
    let mapped: String = if typed.is_uppercase() {
        target.to_uppercase().collect()
    } else {
        target.to_lowercase().collect()
    };
    let mut chars = mapped.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => target,
    }
}

pub struct DigraphMatcher<'a> {
    table: &'a TranslitTable,
}

impl<'a> DigraphMatcher<'a> {
    pub fn new(table: &'a TranslitTable) -> Self {
        Self { table }
    }

    /// Record `typed` in the buffer.
    ///
    /// Returns the edit to inject when the key was substituted, or `None`
    /// when the raw key should reach the application as typed.
    pub fn feed(&self, buffer: &mut WordBuffer, typed: char) -> Option<RewritePlan> {
        if let Some(first) = buffer
            .last()
            .filter(|s| s.is_revisable())
            .and_then(|s| s.first_raw())
        {
            let sequence: String = first.to_lowercase().chain(typed.to_lowercase()).collect();
            if let Some(target) = self.table.get(&sequence) {
                let shown = cased(target, first);
                buffer.merge_last(typed, shown);
                return Some(RewritePlan::new(1, shown));
            }
        }

        let sequence: String = typed.to_lowercase().collect();
        match self.table.get(&sequence) {
            Some(target) => {
                let shown = cased(target, typed);
                buffer.push(typed, shown);
                Some(RewritePlan::new(0, shown))
            }
            None => {
                buffer.push(typed, typed);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(table: &TranslitTable, word: &str) -> (WordBuffer, Vec<Option<RewritePlan>>) {
        let matcher = DigraphMatcher::new(table);
        let mut buffer = WordBuffer::new();
        let plans = word.chars().map(|c| matcher.feed(&mut buffer, c)).collect();
        (buffer, plans)
    }

    #[test]
    fn test_single_key_match() {
        let table = TranslitTable::estonian_russian();
        let (buffer, plans) = feed_all(&table, "a");
        assert_eq!(plans, vec![Some(RewritePlan::new(0, "а"))]);
        assert_eq!(buffer.raw(), "a");
        assert_eq!(buffer.shown(), "а");
    }

    #[test]
    fn test_digraph_revises_previous_single() {
        let table = TranslitTable::estonian_russian();
        let (buffer, plans) = feed_all(&table, "sh");
        assert_eq!(
            plans,
            vec![Some(RewritePlan::new(0, "с")), Some(RewritePlan::new(1, "ш"))]
        );
        assert_eq!(buffer.shown(), "ш");
        assert_eq!(buffer.raw(), "sh");
    }

    #[test]
    fn test_digraph_revises_passthrough_key() {
        // "c" has no rule of its own and reaches the application as typed.
        let table = TranslitTable::estonian_russian();
        let (buffer, plans) = feed_all(&table, "ch");
        assert_eq!(plans, vec![None, Some(RewritePlan::new(1, "ц"))]);
        assert_eq!(buffer.shown(), "ц");
    }

    #[test]
    fn test_no_match_passes_through() {
        let table = TranslitTable::estonian_russian();
        let (buffer, plans) = feed_all(&table, "x");
        assert_eq!(plans, vec![None]);
        assert_eq!(buffer.shown(), "x");
    }

    #[test]
    fn test_digraph_segment_not_revised_again() {
        let table = TranslitTable::estonian_russian();
        let (buffer, plans) = feed_all(&table, "shh");
        assert_eq!(plans[2], Some(RewritePlan::new(0, "х")));
        assert_eq!(buffer.shown(), "шх");
    }

    #[test]
    fn test_uppercase_follows_first_key() {
        let table = TranslitTable::estonian_russian();
        let (upper, _) = feed_all(&table, "Sh");
        assert_eq!(upper.shown(), "Ш");

        let (lower, _) = feed_all(&table, "sH");
        assert_eq!(lower.shown(), "ш");

        let (single, _) = feed_all(&table, "P");
        assert_eq!(single.shown(), "П");
    }

    #[test]
    fn test_uppercase_o_tilde() {
        let table = TranslitTable::estonian_russian();
        let (buffer, _) = feed_all(&table, "Õ");
        assert_eq!(buffer.shown(), "Ы");
    }

    #[test]
    fn test_cased_helper() {
        assert_eq!(cased('ш', 'S'), 'Ш');
        assert_eq!(cased('Ш', 's'), 'ш');
        assert_eq!(cased('ш', '1'), 'ш');
        // Uppercases to "SS"; a multi-character case mapping keeps the target.
        assert_eq!(cased('ß', 'S'), 'ß');
        assert_eq!(cased('ё', 'J'), 'Ё');
    }
}
