//! Closed choice types for every workflow decision point.
//!
//! Each prompt in the merge session answers with one of these enums, and the
//! session matches on them exhaustively; there is no stringly-typed dispatch.

use super::Page;

/// First decision for a custom LED slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedAction {
    /// Use the base page verbatim.
    KeepBase,
    /// Replace the slot wholesale from another file.
    Replace,
    /// Start combining frames from multiple sources.
    Combine,
    /// Navigate back to the previous slot (or base-file selection at slot 1).
    Back,
}

/// Follow-up decision while combining sources into a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    /// Append frames from another source.
    AddAnother,
    /// Commit the combined slot.
    Finish,
    /// Discard additions and return to the slot's initial decision.
    Back,
}

/// Outcome of the summary/confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserChoice {
    Proceed,
    Restart,
    BackToMapping,
    Cancelled,
}

/// How to persist the merged document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMethod {
    NewFile,
    Overwrite,
    Back,
}

/// Recovery options when the source directory has no usable files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoFilesAction {
    Retry,
    ReloadSettings,
    Exit,
}

/// A slot's resolved mapping, produced once per slot and consumed by the
/// final merge step. Navigation signals never persist into one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotMapping {
    /// The base page already holds the right data; nothing to write.
    Keep,
    /// A newly built page plus the ordered source descriptions that went
    /// into it and its final frame count.
    Combined {
        page: Page,
        sources: Vec<String>,
        frame_count: usize,
    },
}

impl SlotMapping {
    pub fn is_keep(&self) -> bool {
        matches!(self, SlotMapping::Keep)
    }
}
