//! LED document data model.
//!
//! This module wires together the document model (`Configuration`, `Page`,
//! `FrameSet`, `Frame`), the frame merger, and the closed choice enums that
//! drive the interactive workflow. Import from here for a stable API.
//!
//! Example:
//! use ledmerge::model::{Configuration, combine_pages};

pub mod choices;
pub mod led;
pub mod merger;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export the document model
pub use led::{Configuration, Frame, FrameSet, Page};

// Re-export the merger
pub use merger::{MergeError, combine_pages};

// Re-export workflow choice enums
pub use choices::{LedAction, NextAction, NoFilesAction, SaveMethod, SlotMapping, UserChoice};

/// Number of pages every CYBERBOARD document carries.
pub const PAGE_COUNT: usize = 8;

/// Page index of the first custom LED slot (slots occupy pages 5..8).
pub const CUSTOM_LED_START_PAGE: usize = 5;

/// Number of user-customizable LED slots.
pub const CUSTOM_LED_SLOTS: usize = 3;

/// Exact number of color entries per frame (40x5 LED grid).
pub const FRAME_RGB_LEN: usize = 200;

/// LED matrix dimensions.
pub const LED_WIDTH: usize = 40;
pub const LED_HEIGHT: usize = 5;

/// Hardware-imposed default cap on frames per custom LED slot.
pub const DEFAULT_MAX_FRAMES: usize = 300;

/// Preview playback rate.
pub const ANIMATION_FPS: u64 = 10;

/// Page index backing a custom LED slot (slots are numbered 1..=3).
#[inline]
pub const fn slot_page_index(slot: usize) -> usize {
    CUSTOM_LED_START_PAGE - 1 + slot
}
