//! Dictionary-based correction of transliterated words.
//!
//! A word already in the dictionary is kept. Otherwise the single closest
//! dictionary word by [`similarity::ratio`](crate::similarity::ratio) is
//! taken if it scores at least the cutoff. Finding that word costs one
//! ratio per candidate, so the lookup sits behind [`NearestWord`] and can
//! be swapped for an index without touching the correction rules.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use cyrtype_core::config::MatcherKind;

use crate::dictionary::Dictionary;
use crate::similarity::{quick_ratio, ratio, real_quick_ratio};

/// Default minimum similarity for a correction.
pub const DEFAULT_CUTOFF: f64 = 0.8;

/// Finds the dictionary word most similar to a candidate.
pub trait NearestWord: Send + Sync {
    /// The best word scoring at least `cutoff`. Ties go to the
    /// lexicographically greatest word.
    fn nearest(&self, word: &str, cutoff: f64) -> Option<Arc<str>>;
}

/// Running best candidate, shared by both strategies so they agree on ties.
#[derive(Default)]
struct Best {
    score: f64,
    word: Option<Arc<str>>,
}

impl Best {
    fn offer(&mut self, candidate: &Arc<str>, word: &str, word_len: usize, cutoff: f64) {
        let candidate_len = candidate.chars().count();
        if real_quick_ratio(candidate_len, word_len) < cutoff
            || quick_ratio(candidate, word) < cutoff
        {
            return;
        }
        let score = ratio(candidate, word);
        if score < cutoff {
            return;
        }
        let better = match &self.word {
            None => true,
            Some(current) => match score.partial_cmp(&self.score) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => candidate > current,
                _ => false,
            },
        };
        if better {
            self.score = score;
            self.word = Some(Arc::clone(candidate));
        }
    }
}

/// Scores every dictionary word.
#[derive(Debug, Clone)]
pub struct LinearScan {
    words: Vec<Arc<str>>,
}

impl LinearScan {
    pub fn new(dictionary: &Dictionary) -> Self {
        Self {
            words: dictionary.iter().cloned().collect(),
        }
    }
}

impl NearestWord for LinearScan {
    fn nearest(&self, word: &str, cutoff: f64) -> Option<Arc<str>> {
        let word_len = word.chars().count();
        let mut best = Best::default();
        for candidate in &self.words {
            best.offer(candidate, word, word_len, cutoff);
        }
        best.word
    }
}

/// Dictionary words bucketed by length.
///
/// `2 * min(la, lb) / (la + lb)` bounds the ratio from above, so whole
/// buckets whose length cannot reach the cutoff are skipped.
#[derive(Debug, Clone)]
pub struct LengthIndex {
    buckets: BTreeMap<usize, Vec<Arc<str>>>,
}

impl LengthIndex {
    pub fn new(dictionary: &Dictionary) -> Self {
        let mut buckets: BTreeMap<usize, Vec<Arc<str>>> = BTreeMap::new();
        for word in dictionary.iter() {
            buckets
                .entry(word.chars().count())
                .or_default()
                .push(Arc::clone(word));
        }
        Self { buckets }
    }
}

impl NearestWord for LengthIndex {
    fn nearest(&self, word: &str, cutoff: f64) -> Option<Arc<str>> {
        let word_len = word.chars().count();
        let mut best = Best::default();
        for (&len, words) in &self.buckets {
            if real_quick_ratio(len, word_len) < cutoff {
                continue;
            }
            for candidate in words {
                best.offer(candidate, word, word_len, cutoff);
            }
        }
        best.word
    }
}

/// Outcome of correcting one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// The word is already in the dictionary.
    Known(String),
    /// The word was replaced by a close dictionary word.
    Corrected { from: String, to: String },
    /// Nothing in the dictionary was close enough.
    NoMatch(String),
    /// Correction is switched off.
    Disabled(String),
}

impl Correction {
    /// The word to emit.
    pub fn word(&self) -> &str {
        match self {
            Correction::Known(w) | Correction::NoMatch(w) | Correction::Disabled(w) => w,
            Correction::Corrected { to, .. } => to,
        }
    }

    pub fn is_corrected(&self) -> bool {
        matches!(self, Correction::Corrected { .. })
    }

    pub fn into_word(self) -> String {
        match self {
            Correction::Known(w) | Correction::NoMatch(w) | Correction::Disabled(w) => w,
            Correction::Corrected { to, .. } => to,
        }
    }
}

/// Maps transliterated words onto the dictionary.
pub struct Autocorrector {
    dictionary: Dictionary,
    nearest: Box<dyn NearestWord>,
    cutoff: f64,
    enabled: bool,
}

impl std::fmt::Debug for Autocorrector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Autocorrector")
            .field("dictionary_words", &self.dictionary.len())
            .field("cutoff", &self.cutoff)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Autocorrector {
    /// Linear-scan corrector with the given cutoff.
    pub fn new(dictionary: Dictionary, cutoff: f64) -> Self {
        Self::with_matcher(dictionary, cutoff, MatcherKind::Linear)
    }

    /// Corrector using the configured lookup strategy.
    pub fn with_matcher(dictionary: Dictionary, cutoff: f64, kind: MatcherKind) -> Self {
        let nearest: Box<dyn NearestWord> = match kind {
            MatcherKind::Linear => Box::new(LinearScan::new(&dictionary)),
            MatcherKind::LengthIndex => Box::new(LengthIndex::new(&dictionary)),
        };
        Self::with_nearest(dictionary, cutoff, nearest)
    }

    /// Corrector with a caller-supplied lookup.
    pub fn with_nearest(dictionary: Dictionary, cutoff: f64, nearest: Box<dyn NearestWord>) -> Self {
        Self {
            dictionary,
            nearest,
            cutoff,
            enabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Correct a lowercase transliterated word.
    pub fn correct(&self, word: &str) -> Correction {
        if !self.enabled {
            return Correction::Disabled(word.to_string());
        }
        if self.dictionary.contains(word) {
            return Correction::Known(word.to_string());
        }
        match self.nearest.nearest(word, self.cutoff) {
            Some(best) => {
                tracing::debug!(from = %word, to = %best, "Autocorrected word");
                Correction::Corrected {
                    from: word.to_string(),
                    to: best.to_string(),
                }
            }
            None => Correction::NoMatch(word.to_string()),
        }
    }
}
