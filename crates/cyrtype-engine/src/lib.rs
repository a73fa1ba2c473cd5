//! Cyrtype engine crate - live Latin to Cyrillic transliteration of keystrokes.
//!
//! Keys arrive from an [`EventSource`], are classified by the
//! [`KeyEventRouter`] and applied to a [`Session`]: characters are buffered
//! and substituted live, boundary keys trigger whole-word transliteration,
//! autocorrection and case restoration, and the visible word is rewritten
//! through a [`TextSink`] by erasing it and typing the result.
//! The [`actor`] module serializes all of this onto one tokio task.

pub mod actor;
pub mod autocorrect;
pub mod buffer;
pub mod case;
pub mod dictionary;
pub mod digraph;
pub mod rewriter;
pub mod router;
pub mod session;
pub mod similarity;
pub mod sink;
pub mod source;
pub mod table;
pub mod transliterate;

pub use actor::SessionHandle;
pub use autocorrect::{Autocorrector, Correction, LengthIndex, LinearScan, NearestWord};
pub use buffer::WordBuffer;
pub use dictionary::Dictionary;
pub use rewriter::{OutputRewriter, RewritePlan};
pub use router::KeyEventRouter;
pub use session::{Session, SessionStats};
pub use sink::{InjectionGuard, MemorySink, TextInjector, TextSink};
pub use source::{EventSource, KeyHook, ScriptedSource};
pub use table::TranslitTable;
pub use transliterate::Transliterator;
