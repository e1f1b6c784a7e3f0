//! Terminal implementation of the presentation collaborator.
//!
//! Menus are plain numbered lists read from stdin; previews render each
//! frame as a 40x5 grid of colored block characters and play the sequence
//! through once at the configured frame rate.
//!
//! Input handling rules:
//! - Invalid input re-prompts in a loop.
//! - `q` (or end-of-input) answers back/cancel.
//! - Entries flagged ineligible are shown dimmed and cannot be selected.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use crossterm::cursor::MoveToPreviousLine;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::{execute, queue};

use crate::model::{
    ANIMATION_FPS, LED_HEIGHT, LED_WIDTH, LedAction, NextAction, NoFilesAction, SaveMethod,
    UserChoice,
};
use crate::validate::is_rgb_color;

use super::{Preview, SlotSummary, SourceChoice, Ui};

/// Crossterm-backed terminal UI.
#[derive(Debug, Default)]
pub struct TerminalUi;

impl TerminalUi {
    pub fn new() -> Self {
        Self
    }

    /// Read one trimmed line from stdin; `None` on end-of-input.
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(_) => None,
        }
    }

    /// Numbered menu over `items`; disabled entries are shown but rejected.
    /// Returns `None` when the user cancels (`q` or end-of-input).
    fn menu(&mut self, title: &str, items: &[(String, bool)]) -> Option<usize> {
        let mut out = io::stdout();
        let _ = execute!(out, Print(format!("\n{title}\n")));
        for (i, (label, enabled)) in items.iter().enumerate() {
            if *enabled {
                let _ = execute!(out, Print(format!("  {}. {label}\n", i + 1)));
            } else {
                let _ = execute!(
                    out,
                    SetAttribute(Attribute::Dim),
                    Print(format!("  {}. {label}\n", i + 1)),
                    SetAttribute(Attribute::Reset),
                );
            }
        }

        loop {
            let _ = execute!(out, Print("> "));
            let _ = out.flush();
            let line = self.read_line()?;
            if line.eq_ignore_ascii_case("q") {
                return None;
            }
            match line.parse::<usize>() {
                Ok(n) if n >= 1 && n <= items.len() => {
                    if items[n - 1].1 {
                        return Some(n - 1);
                    }
                    self.warning("That entry exceeds the remaining frame limit.");
                }
                _ => self.warning("Enter a number from the list, or 'q' to go back."),
            }
        }
    }

    fn message(&mut self, prefix: &str, color: Color, message: &str) {
        let mut out = io::stdout();
        let _ = execute!(
            out,
            SetForegroundColor(color),
            Print(prefix),
            ResetColor,
            Print(format!(" {message}\n")),
        );
    }

    fn draw_frame(&mut self, out: &mut io::Stdout, rgb: &[String]) {
        for row in 0..LED_HEIGHT {
            for col in 0..LED_WIDTH {
                match rgb
                    .get(row * LED_WIDTH + col)
                    .and_then(|c| parse_hex_color(c))
                {
                    Some((r, g, b)) => {
                        let _ = queue!(
                            out,
                            SetForegroundColor(Color::Rgb { r, g, b }),
                            Print("█"),
                        );
                    }
                    // Non-color sentinel tokens render as an empty cell.
                    None => {
                        let _ = queue!(
                            out,
                            SetAttribute(Attribute::Dim),
                            Print("·"),
                            SetAttribute(Attribute::Reset),
                        );
                    }
                }
            }
            let _ = queue!(out, ResetColor, Print("\n"));
        }
        let _ = out.flush();
    }
}

impl Ui for TerminalUi {
    fn step(&mut self, title: &str) {
        let mut out = io::stdout();
        let _ = execute!(
            out,
            Print("\n"),
            SetAttribute(Attribute::Bold),
            Print(format!("=== {title} ===\n")),
            SetAttribute(Attribute::Reset),
        );
    }

    fn info(&mut self, message: &str) {
        self.message("[i]", Color::Cyan, message);
    }

    fn success(&mut self, message: &str) {
        self.message("[ok]", Color::Green, message);
    }

    fn warning(&mut self, message: &str) {
        self.message("[!]", Color::Yellow, message);
    }

    fn error(&mut self, message: &str) {
        self.message("[x]", Color::Red, message);
    }

    fn preview(&mut self, previews: &[Preview]) {
        let mut out = io::stdout();
        let delay = Duration::from_millis(1000 / ANIMATION_FPS);

        for preview in previews {
            let accent = if preview.eligible {
                Color::Green
            } else {
                Color::Red
            };
            let _ = execute!(
                out,
                SetForegroundColor(accent),
                Print(format!("-- {} --\n", preview.title)),
                ResetColor,
            );
            if preview.frames.is_empty() {
                let _ = execute!(out, Print("   (no frames)\n"));
                continue;
            }
            for (i, frame) in preview.frames.iter().enumerate() {
                if i > 0 {
                    let _ = queue!(out, MoveToPreviousLine(LED_HEIGHT as u16));
                }
                self.draw_frame(&mut out, frame);
                thread::sleep(delay);
            }
        }
    }

    fn select_base_file(&mut self, files: &[String]) -> Option<String> {
        let items: Vec<(String, bool)> = files.iter().map(|f| (f.clone(), true)).collect();
        self.menu("Select the base configuration file:", &items)
            .map(|i| files[i].clone())
    }

    fn no_files_action(&mut self) -> NoFilesAction {
        let items = [
            ("Retry after adding files".to_string(), true),
            ("Reload settings".to_string(), true),
            ("Exit".to_string(), true),
        ];
        match self.menu("No configuration files were found:", &items) {
            Some(0) => NoFilesAction::Retry,
            Some(1) => NoFilesAction::ReloadSettings,
            _ => NoFilesAction::Exit,
        }
    }

    fn select_led_action(&mut self, slot: usize) -> LedAction {
        let items = [
            ("Keep the base animation".to_string(), true),
            ("Replace from another file".to_string(), true),
            ("Combine frames from multiple files".to_string(), true),
            ("Back".to_string(), true),
        ];
        match self.menu(&format!("Custom LED {slot}:"), &items) {
            Some(0) => LedAction::KeepBase,
            Some(1) => LedAction::Replace,
            Some(2) => LedAction::Combine,
            _ => LedAction::Back,
        }
    }

    fn select_next_action(&mut self) -> NextAction {
        let items = [
            ("Add another LED".to_string(), true),
            ("Finish this LED".to_string(), true),
            ("Back (reset to base)".to_string(), true),
        ];
        match self.menu("Next:", &items) {
            Some(0) => NextAction::AddAnother,
            Some(1) => NextAction::Finish,
            _ => NextAction::Back,
        }
    }

    fn select_source_file(&mut self, files: &[String]) -> Option<String> {
        let items: Vec<(String, bool)> = files.iter().map(|f| (f.clone(), true)).collect();
        self.menu("Select a source file:", &items)
            .map(|i| files[i].clone())
    }

    fn select_source_slot(&mut self, choices: &[SourceChoice]) -> Option<usize> {
        let items: Vec<(String, bool)> = choices
            .iter()
            .map(|c| {
                let marker = if c.eligible { "✓" } else { "✗ exceeds limit" };
                (format!("{} {marker}", c.label), c.eligible)
            })
            .collect();
        self.menu("Select a source LED:", &items)
    }

    fn confirm_summary(&mut self, summary: &[SlotSummary]) -> UserChoice {
        for row in summary {
            let detail = if row.sources.is_empty() {
                "keep base".to_string()
            } else {
                row.sources.join(" + ")
            };
            self.info(&format!(
                "LED {}: {detail} ({} frames)",
                row.slot, row.frame_count
            ));
        }
        let items = [
            ("Proceed to save".to_string(), true),
            ("Back to LED mapping".to_string(), true),
            ("Restart from scratch".to_string(), true),
            ("Cancel".to_string(), true),
        ];
        match self.menu("Apply this configuration?", &items) {
            Some(0) => UserChoice::Proceed,
            Some(1) => UserChoice::BackToMapping,
            Some(2) => UserChoice::Restart,
            _ => UserChoice::Cancelled,
        }
    }

    fn select_save_method(&mut self) -> SaveMethod {
        let items = [
            ("Save as a new file".to_string(), true),
            ("Overwrite the base file".to_string(), true),
            ("Back".to_string(), true),
        ];
        match self.menu("How should the result be saved?", &items) {
            Some(0) => SaveMethod::NewFile,
            Some(1) => SaveMethod::Overwrite,
            _ => SaveMethod::Back,
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        let mut out = io::stdout();
        loop {
            let _ = execute!(out, Print(format!("{question} (y/n) > ")));
            let _ = out.flush();
            let Some(line) = self.read_line() else {
                return false;
            };
            match line.to_lowercase().as_str() {
                "y" | "yes" => return true,
                "n" | "no" => return false,
                _ => self.warning("Answer 'y' or 'n'."),
            }
        }
    }

    fn prompt_filename(&mut self, default: &str) -> String {
        let mut out = io::stdout();
        let _ = execute!(out, Print(format!("Filename [{default}] > ")));
        let _ = out.flush();
        match self.read_line() {
            Some(line) if !line.is_empty() => line,
            _ => default.to_string(),
        }
    }
}

/// Parse `#RRGGBB` into its channels; `None` for sentinel tokens.
fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    if !is_rgb_color(s) {
        return None;
    }
    let r = u8::from_str_radix(&s[1..3], 16).ok()?;
    let g = u8::from_str_radix(&s[3..5], 16).ok()?;
    let b = u8::from_str_radix(&s[5..7], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_parsing() {
        assert_eq!(parse_hex_color("#FF0000"), Some((255, 0, 0)));
        assert_eq!(parse_hex_color("#00ff7f"), Some((0, 255, 127)));
        assert_eq!(parse_hex_color("off"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }
}
