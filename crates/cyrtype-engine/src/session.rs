//! Typing session state and the per-key operations on it.
//!
//! A `Session` owns everything that lives for the duration of one hook:
//! the transliteration table, the autocorrector (and through it the
//! dictionary) and the word buffer. It is mutated only by the event
//! handling path, one key at a time.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cyrtype_core::config::CyrtypeConfig;
use cyrtype_core::error::Result;
use cyrtype_core::types::Disposition;

use crate::autocorrect::{Autocorrector, Correction};
use crate::buffer::{WordBuffer, DEFAULT_MAX_LEN};
use crate::case::restore_case;
use crate::dictionary::Dictionary;
use crate::digraph::DigraphMatcher;
use crate::rewriter::OutputRewriter;
use crate::sink::TextSink;
use crate::table::TranslitTable;
use crate::transliterate::Transliterator;

/// Counters reported when a session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Non-empty words closed by a boundary key.
    pub words_finalized: u64,
    /// Words whose visible text was replaced at the boundary.
    pub words_rewritten: u64,
    /// Words replaced by a different dictionary word.
    pub words_corrected: u64,
    /// Keys substituted while typing.
    pub live_replacements: u64,
}

/// Final form of a word at a boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedWord {
    /// Text to show, capitalization restored.
    pub text: String,
    pub correction: Correction,
}

/// State for one typing session.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    table: TranslitTable,
    autocorrector: Autocorrector,
    buffer: WordBuffer,
    stats: SessionStats,
}

impl Session {
    /// Create a session with the default buffer size.
    pub fn new(table: TranslitTable, autocorrector: Autocorrector) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            table,
            autocorrector,
            buffer: WordBuffer::with_max_len(DEFAULT_MAX_LEN),
            stats: SessionStats::default(),
        }
    }

    /// Replace the word buffer with an empty one holding `max_len` raw characters.
    pub fn with_buffer_len(mut self, max_len: usize) -> Self {
        self.buffer = WordBuffer::with_max_len(max_len);
        self
    }

    /// Build a session from configuration and a loaded dictionary.
    pub fn from_config(config: &CyrtypeConfig, dictionary: Dictionary) -> Result<Self> {
        config.validate()?;
        let table = TranslitTable::estonian_russian().with_overrides(&config.table.extra_rules)?;
        let mut autocorrector = Autocorrector::with_matcher(
            dictionary,
            config.correction.cutoff,
            config.correction.matcher,
        );
        autocorrector.set_enabled(config.correction.enabled);

        let session = Self::new(table, autocorrector).with_buffer_len(config.buffer.max_len);
        tracing::info!(
            session_id = %session.id,
            rules = session.table.len(),
            dictionary_words = session.autocorrector.dictionary().len(),
            matcher = ?config.correction.matcher,
            "Session created"
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Seconds since the session was created.
    pub fn elapsed_secs(&self) -> f32 {
        let elapsed = Utc::now() - self.started_at;
        elapsed.num_milliseconds() as f32 / 1000.0
    }

    pub fn buffer(&self) -> &WordBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn table(&self) -> &TranslitTable {
        &self.table
    }

    pub fn autocorrector(&self) -> &Autocorrector {
        &self.autocorrector
    }

    /// Transliterate, autocorrect and recapitalize a raw Latin word.
    pub fn process_word(&self, raw: &str) -> ProcessedWord {
        let lower = raw.to_lowercase();
        let transliterated = Transliterator::new(&self.table).transliterate(&lower);
        let correction = self.autocorrector.correct(&transliterated);
        let text = restore_case(raw, correction.word());
        ProcessedWord { text, correction }
    }

    /// A character key: buffer it and substitute it live if the table says so.
    pub fn type_char(&mut self, typed: char, sink: &mut dyn TextSink) -> Result<Disposition> {
        let plan = DigraphMatcher::new(&self.table).feed(&mut self.buffer, typed);
        match plan {
            Some(plan) => {
                OutputRewriter::apply(sink, &plan)?;
                self.stats.live_replacements += 1;
                Ok(Disposition::Suppress)
            }
            None => Ok(Disposition::Pass),
        }
    }

    /// Backspace: forget the last visible character and forward one backspace.
    pub fn backspace(&mut self, sink: &mut dyn TextSink) -> Result<Disposition> {
        self.buffer.pop();
        sink.backspace(1)?;
        Ok(Disposition::Suppress)
    }

    /// A boundary key: rewrite the finished word if needed, then emit the
    /// boundary character itself.
    pub fn finish_word(&mut self, boundary: char, sink: &mut dyn TextSink) -> Result<Disposition> {
        if !self.buffer.is_empty() {
            let raw = self.buffer.raw();
            let visible = self.buffer.shown();
            let processed = self.process_word(&raw);
            self.buffer.clear();

            self.stats.words_finalized += 1;
            if processed.correction.is_corrected() {
                self.stats.words_corrected += 1;
            }
            if let Some(plan) = OutputRewriter::plan(&visible, &processed.text) {
                tracing::debug!(
                    raw = %raw,
                    visible = %visible,
                    word = %processed.text,
                    "Rewriting finished word"
                );
                OutputRewriter::apply(sink, &plan)?;
                self.stats.words_rewritten += 1;
            }
        }
        sink.write(boundary.encode_utf8(&mut [0u8; 4]))?;
        Ok(Disposition::Suppress)
    }

    /// Drop the current word without touching the screen.
    pub fn reset_word(&mut self) {
        self.buffer.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
