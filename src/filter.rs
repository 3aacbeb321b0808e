//! Block-level confidence policy. The retain/drop decision is a pure
//! function of a block's character scores; diagnostics go through
//! [`DropSink`] so the decision stays testable on its own.

/// Characters scoring above this count as reliable reads.
pub const CHAR_SCORE_THRESHOLD: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPolicy {
    /// Keep a block only if at least one character scores above
    /// [`CHAR_SCORE_THRESHOLD`]. Low-confidence characters inside a kept
    /// block are still emitted; the granularity is the whole block.
    #[default]
    StrongChar,
    /// Emit every non-blank block.
    KeepAll,
}

/// Number of characters scoring above the reliability threshold.
pub fn valid_char_count(char_scores: &[f32]) -> usize {
    char_scores
        .iter()
        .filter(|score| **score > CHAR_SCORE_THRESHOLD)
        .count()
}

/// Retain/drop decision for one block.
pub fn retains(policy: FilterPolicy, char_scores: &[f32]) -> bool {
    match policy {
        FilterPolicy::StrongChar => valid_char_count(char_scores) > 0,
        FilterPolicy::KeepAll => true,
    }
}

/// Observer notified whenever the filter discards a block.
pub trait DropSink {
    fn on_dropped(&self, text: &str);
}

/// Default sink, forwards drops to the tracing subscriber.
#[derive(Debug, Default)]
pub struct LogDropSink;

impl DropSink for LogDropSink {
    fn on_dropped(&self, text: &str) {
        tracing::debug!("discarding low-confidence block: {text:?}");
    }
}
