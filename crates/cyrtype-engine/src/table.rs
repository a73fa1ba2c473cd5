//! Phonetic Latin to Cyrillic substitution rules.
//!
//! A table maps Latin sequences of one or two characters to a single
//! target character. Lookups always try the two-character sequence before
//! the one-character one so that a digraph such as `sh` is never shadowed
//! by the rule for its first letter.

use std::collections::{BTreeMap, HashMap};

use cyrtype_core::error::{CyrtypeError, Result};

/// Longest source sequence a rule may have.
pub const MAX_SEQUENCE_LEN: usize = 2;

/// Estonian keyboard phonetic layout for Russian.
const ESTONIAN_RUSSIAN: &[(&str, char)] = &[
    ("sh", 'ш'),
    ("ch", 'ц'),
    ("ja", 'я'),
    ("ju", 'ю'),
    ("jo", 'ё'),
    ("zh", 'ж'),
    ("je", 'е'),
    ("a", 'а'),
    ("b", 'б'),
    ("v", 'в'),
    ("g", 'г'),
    ("d", 'д'),
    ("z", 'з'),
    ("i", 'и'),
    ("k", 'к'),
    ("l", 'л'),
    ("m", 'м'),
    ("n", 'н'),
    ("o", 'о'),
    ("p", 'п'),
    ("r", 'р'),
    ("s", 'с'),
    ("t", 'т'),
    ("u", 'у'),
    ("f", 'ф'),
    ("h", 'х'),
    ("õ", 'ы'),
    ("e", 'э'),
];

/// Immutable, ordered transliteration rule set.
#[derive(Debug, Clone)]
pub struct TranslitTable {
    /// Rules ordered longest sequence first, insertion order within a length.
    rules: Vec<(String, char)>,
    lookup: HashMap<String, char>,
}

impl TranslitTable {
    /// Build a table from `(sequence, target)` pairs.
    ///
    /// Sequences are lowercased. A later rule for the same sequence replaces
    /// an earlier one. Fails on empty or over-long sequences.
    pub fn from_rules<I, S>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, char)>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<(String, char)> = Vec::new();
        for (source, target) in rules {
            let source = source.as_ref().to_lowercase();
            let len = source.chars().count();
            if len == 0 || len > MAX_SEQUENCE_LEN {
                return Err(CyrtypeError::Table(format!(
                    "sequence '{}' must be 1 to {} characters long",
                    source, MAX_SEQUENCE_LEN
                )));
            }
            match ordered.iter_mut().find(|(s, _)| *s == source) {
                Some(rule) => rule.1 = target,
                None => ordered.push((source, target)),
            }
        }
        // Stable: keeps the caller's order within each length.
        ordered.sort_by_key(|(s, _)| std::cmp::Reverse(s.chars().count()));

        let lookup = ordered.iter().cloned().collect();
        Ok(Self {
            rules: ordered,
            lookup,
        })
    }

    /// The built-in Estonian-keyboard to Russian table.
    pub fn estonian_russian() -> Self {
        let lookup = ESTONIAN_RUSSIAN
            .iter()
            .map(|(s, t)| (s.to_string(), *t))
            .collect();
        Self {
            rules: ESTONIAN_RUSSIAN
                .iter()
                .map(|(s, t)| (s.to_string(), *t))
                .collect(),
            lookup,
        }
    }

    /// Return a copy of this table extended by `extra` (sequence to target).
    /// Extra rules win over existing ones with the same sequence.
    pub fn with_overrides(&self, extra: &BTreeMap<String, String>) -> Result<Self> {
        let mut rules = self.rules.clone();
        for (source, target) in extra {
            let mut chars = target.chars();
            let target = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(CyrtypeError::Table(format!(
                        "rule '{}' must map to exactly one character, got '{}'",
                        source, target
                    )))
                }
            };
            rules.push((source.clone(), target));
        }
        Self::from_rules(rules)
    }

    /// Look up an already-lowercased sequence.
    pub fn get(&self, sequence: &str) -> Option<char> {
        self.lookup.get(sequence).copied()
    }

    pub fn contains(&self, sequence: &str) -> bool {
        self.lookup.contains_key(sequence)
    }

    /// Rules in lookup priority order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, char)> {
        self.rules.iter().map(|(s, t)| (s.as_str(), *t))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for TranslitTable {
    fn default() -> Self {
        Self::estonian_russian()
    }
}
