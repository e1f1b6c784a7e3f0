/*!
Presentation collaborator (orchestration layer).

The workflow core talks to the terminal only through the [`Ui`] trait defined
here; the concrete crossterm implementation lives in its own file:

- `terminal.rs` -> `TerminalUi` (numbered stdin menus, 40x5 color previews)

Every prompt answers with one of the closed choice enums from
`crate::model::choices`, so the session can match exhaustively and tests can
drive the workflow with a scripted implementation instead of a terminal.

Implementations are responsible for:
- Re-prompting on invalid input with an explicit loop (never recursion)
- Refusing to select entries flagged ineligible
- Treating end-of-input as the most conservative answer (back/cancel/no)
*/

use crate::model::{LedAction, NextAction, NoFilesAction, SaveMethod, UserChoice};

pub mod terminal;

pub use terminal::TerminalUi;

/// A titled, animatable frame sequence offered for preview.
#[derive(Debug, Clone)]
pub struct Preview {
    pub title: String,
    /// One entry per frame; each frame is its 200 color values.
    pub frames: Vec<Vec<String>>,
    /// Ineligible previews are rendered with a warning accent.
    pub eligible: bool,
}

/// A selectable source LED slot, with its budget eligibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChoice {
    pub label: String,
    pub frame_count: usize,
    pub eligible: bool,
}

/// One row of the final confirmation summary.
#[derive(Debug, Clone)]
pub struct SlotSummary {
    pub slot: usize,
    /// Empty for kept slots; the ordered source descriptions otherwise.
    pub sources: Vec<String>,
    pub frame_count: usize,
}

/// Everything the merge session needs from a presentation layer.
pub trait Ui {
    // Messages
    fn step(&mut self, title: &str);
    fn info(&mut self, message: &str);
    fn success(&mut self, message: &str);
    fn warning(&mut self, message: &str);
    fn error(&mut self, message: &str);

    /// Display the given frame sequences, blocking until playback finishes.
    fn preview(&mut self, previews: &[Preview]);

    // Selections
    fn select_base_file(&mut self, files: &[String]) -> Option<String>;
    fn no_files_action(&mut self) -> NoFilesAction;
    fn select_led_action(&mut self, slot: usize) -> LedAction;
    fn select_next_action(&mut self) -> NextAction;
    fn select_source_file(&mut self, files: &[String]) -> Option<String>;

    /// Pick one of `choices`; implementations must only return the index of
    /// an eligible entry, or `None` to cancel.
    fn select_source_slot(&mut self, choices: &[SourceChoice]) -> Option<usize>;

    fn confirm_summary(&mut self, summary: &[SlotSummary]) -> UserChoice;
    fn select_save_method(&mut self) -> SaveMethod;
    fn confirm(&mut self, question: &str) -> bool;
    fn prompt_filename(&mut self, default: &str) -> String;
}
