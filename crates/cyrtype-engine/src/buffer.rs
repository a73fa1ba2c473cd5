//! The per-session record of the word currently being typed.
//!
//! Each typed key becomes a [`Segment`]: the raw Latin text it came from
//! and the single character that is visible in the focused application for
//! it. A digraph folds two raw characters into one segment. Keeping both
//! sides lets whole-word correction work from the raw text while knowing
//! exactly how many visible characters it must erase.

use std::collections::VecDeque;

/// Default limit on raw characters remembered for one word.
pub const DEFAULT_MAX_LEN: usize = 20;

/// One visible character and the raw keys that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    raw: String,
    shown: char,
}

impl Segment {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn shown(&self) -> char {
        self.shown
    }

    /// First raw character typed for this segment.
    pub fn first_raw(&self) -> Option<char> {
        self.raw.chars().next()
    }

    /// Whether a following key may still fold into this segment as a digraph.
    pub fn is_revisable(&self) -> bool {
        self.raw.chars().count() == 1
    }
}

/// Bounded buffer of the segments typed since the last word boundary.
#[derive(Debug, Clone)]
pub struct WordBuffer {
    segments: VecDeque<Segment>,
    raw_len: usize,
    max_len: usize,
}

impl Default for WordBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl WordBuffer {
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LEN)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            segments: VecDeque::new(),
            raw_len: 0,
            max_len: max_len.max(1),
        }
    }

    /// Append a one-key segment.
    pub fn push(&mut self, raw: char, shown: char) {
        self.segments.push_back(Segment {
            raw: raw.to_string(),
            shown,
        });
        self.raw_len += 1;
        self.trim();
    }

    /// Fold `raw` into the last segment and replace its visible character.
    ///
    /// Returns `false` (and changes nothing) if there is no revisable
    /// segment to fold into.
    pub fn merge_last(&mut self, raw: char, shown: char) -> bool {
        match self.segments.back_mut() {
            Some(last) if last.is_revisable() => {
                last.raw.push(raw);
                last.shown = shown;
                self.raw_len += 1;
                self.trim();
                true
            }
            _ => false,
        }
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.back()
    }

    /// Remove the most recent segment (one visible character).
    pub fn pop(&mut self) -> Option<Segment> {
        let segment = self.segments.pop_back()?;
        self.raw_len -= segment.raw.chars().count();
        Some(segment)
    }

    pub fn clear(&mut self) {
        self.segments.clear();
        self.raw_len = 0;
    }

    /// Raw Latin text of the buffered word.
    pub fn raw(&self) -> String {
        self.segments.iter().map(|s| s.raw.as_str()).collect()
    }

    /// Text currently visible in the application for the buffered word.
    pub fn shown(&self) -> String {
        self.segments.iter().map(|s| s.shown).collect()
    }

    /// Number of raw characters held.
    pub fn len(&self) -> usize {
        self.raw_len
    }

    /// Number of visible characters held.
    pub fn shown_len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    // Oldest segments go first; their echo stays on screen untouched.
    fn trim(&mut self) {
        while self.raw_len > self.max_len {
            match self.segments.pop_front() {
                Some(dropped) => {
                    self.raw_len -= dropped.raw.chars().count();
                    tracing::trace!(raw = %dropped.raw, "Word buffer full, dropped oldest segment");
                }
                None => break,
            }
        }
    }
}
