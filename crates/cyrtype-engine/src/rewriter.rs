//! Erase-then-inject edits on already displayed text.

use cyrtype_core::error::Result;

use crate::sink::TextSink;

/// Erase `erase` visible characters, then type `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePlan {
    pub erase: usize,
    pub insert: String,
}

impl RewritePlan {
    pub fn new(erase: usize, insert: impl Into<String>) -> Self {
        Self {
            erase,
            insert: insert.into(),
        }
    }
}

pub struct OutputRewriter;

impl OutputRewriter {
    /// Plan the edit that turns `visible` into `replacement`.
    ///
    /// Returns `None` when they are already equal, so an unchanged word
    /// never flickers.
    pub fn plan(visible: &str, replacement: &str) -> Option<RewritePlan> {
        if visible == replacement {
            return None;
        }
        Some(RewritePlan::new(visible.chars().count(), replacement))
    }

    /// Apply a plan to the sink.
    pub fn apply(sink: &mut dyn TextSink, plan: &RewritePlan) -> Result<()> {
        if plan.erase > 0 {
            sink.backspace(plan.erase)?;
        }
        if !plan.insert.is_empty() {
            sink.write(&plan.insert)?;
        }
        Ok(())
    }
}
