//! The interactive merge session state machine.
//!
//! A session walks one user through: base-file selection, the three custom
//! LED slots (keep / replace / combine, with back navigation), a summary
//! confirmation, the actual merge, and saving. The session owns all mutable
//! state — the loaded base document and the per-slot mappings — and talks to
//! the terminal only through the [`Ui`] trait.
//!
//! Error policy: anything caused by user input (missing file, bad JSON,
//! schema violations) is reported and re-prompted, never propagated. Errors
//! that indicate a workflow bug (no base loaded, slots resolved out of
//! order) fail fast through `anyhow`.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, info, warn};

use crate::model::{
    CUSTOM_LED_SLOTS, CUSTOM_LED_START_PAGE, Configuration, LedAction, NextAction, NoFilesAction,
    Page, SaveMethod, SlotMapping, UserChoice, combine_pages, slot_page_index,
};
use crate::settings::Settings;
use crate::store::{FileStore, LoadError};
use crate::ui::{Preview, SlotSummary, SourceChoice, Ui};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// A merged configuration was written.
    Completed,
    /// The user asked for a fresh session.
    Restart,
    /// The user backed all the way out.
    Aborted,
}

/// The base document together with the filename it came from.
#[derive(Debug, Clone)]
struct LoadedBase {
    filename: String,
    config: Configuration,
}

/// Resolution of a single custom LED slot.
#[derive(Debug, Clone, PartialEq)]
enum SlotResolution {
    /// Navigate to the previous slot (or abandon base selection at slot 1).
    Back,
    Resolved(SlotMapping),
}

/// A source page picked for replace/add-another.
#[derive(Debug, Clone)]
struct SourceSelection {
    page: Page,
    frame_count: usize,
    description: String,
}

/// Budget eligibility over a source file's three custom LED slots.
///
/// Every slot is listed (for visibility); only those whose frame count fits
/// within `budget` are selectable.
pub fn source_choices(config: &Configuration, budget: usize) -> Vec<SourceChoice> {
    config
        .custom_led_pages()
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let frame_count = page.frame_count();
            SourceChoice {
                label: format!("LED {} ({frame_count} frames)", i + 1),
                frame_count,
                eligible: frame_count <= budget,
            }
        })
        .collect()
}

/// The merge session: owns the base document, the per-slot mappings, and the
/// collaborators (store, settings, presentation).
pub struct MergeSession<U: Ui> {
    settings: Settings,
    settings_path: PathBuf,
    store: FileStore,
    ui: U,
    base: Option<LoadedBase>,
    mappings: [Option<SlotMapping>; CUSTOM_LED_SLOTS],
}

impl<U: Ui> MergeSession<U> {
    pub fn new(settings: Settings, settings_path: PathBuf, ui: U) -> Self {
        let store = FileStore::from_settings(&settings);
        Self {
            settings,
            settings_path,
            store,
            ui,
            base: None,
            mappings: [None, None, None],
        }
    }

    /// Create the configured directories, reporting any that were missing.
    pub fn initialize_directories(&mut self) -> Result<()> {
        let created = self
            .settings
            .ensure_directories()
            .context("Failed to create configured directories")?;
        for dir in created {
            self.ui.info(&format!("Created directory '{}'", dir.display()));
        }
        Ok(())
    }

    /// Run one full session.
    pub fn run(&mut self) -> Result<SessionOutcome> {
        loop {
            if !self.select_base()? {
                return Ok(SessionOutcome::Aborted);
            }

            let proceed = loop {
                if !self.configure_all_mappings()? {
                    // Back out of slot 1: abandon this base file.
                    break false;
                }
                match self.show_summary()? {
                    UserChoice::Proceed => break true,
                    UserChoice::BackToMapping => {
                        self.mappings = [None, None, None];
                        continue;
                    }
                    UserChoice::Restart => return Ok(SessionOutcome::Restart),
                    UserChoice::Cancelled => break false,
                }
            };

            if proceed {
                break;
            }
            self.mappings = [None, None, None];
            self.base = None;
        }

        let merged = self.perform_merge()?;
        self.save_merged(&merged)
    }

    /// Step 1: pick and load the base configuration. Returns `false` when
    /// the user backs out of the session entirely.
    fn select_base(&mut self) -> Result<bool> {
        let files = loop {
            let files = self.available_files()?;
            if !files.is_empty() {
                break files;
            }
            self.ui.warning(&format!(
                "No usable JSON files found in source directory '{}'",
                self.store.source_dir().display()
            ));
            match self.ui.no_files_action() {
                NoFilesAction::Retry => continue,
                NoFilesAction::ReloadSettings => {
                    self.settings = Settings::load(&self.settings_path);
                    self.store = FileStore::from_settings(&self.settings);
                    self.initialize_directories()?;
                }
                NoFilesAction::Exit => return Ok(false),
            }
        };

        self.ui.step("Step 1: Select Base Configuration");
        loop {
            let Some(selected) = self.ui.select_base_file(&files) else {
                return Ok(false);
            };
            match self.store.load(&selected) {
                Ok(config) => {
                    info!(file = %selected, "Base configuration selected");
                    if let Ok(info) = self.store.file_info(&selected) {
                        debug!(
                            product = ?info.product_id,
                            frames = ?info.custom_led_frames,
                            total = info.total_custom_frames,
                            "Base configuration summary"
                        );
                    }
                    self.ui.success(&format!("Base file selected: {selected}"));
                    self.base = Some(LoadedBase {
                        filename: selected,
                        config,
                    });
                    self.preview_base();
                    return Ok(true);
                }
                Err(err) => {
                    self.report_load_error("Failed to load base configuration", &err);
                }
            }
        }
    }

    /// Step 2: resolve all three slots, honoring back navigation.
    fn configure_all_mappings(&mut self) -> Result<bool> {
        self.ui.step("Step 2: Configure LED Mappings");

        let mut slot = 1;
        while slot <= CUSTOM_LED_SLOTS {
            match self.configure_slot(slot)? {
                SlotResolution::Back => {
                    if slot > 1 {
                        slot -= 1;
                    } else {
                        return Ok(false);
                    }
                }
                SlotResolution::Resolved(mapping) => {
                    debug!(slot, keep = mapping.is_keep(), "Slot resolved");
                    self.mappings[slot - 1] = Some(mapping);
                    slot += 1;
                }
            }
        }
        Ok(true)
    }

    /// The per-slot state machine: initial action, then (for combine) the
    /// add-another loop with frame-budget accounting.
    fn configure_slot(&mut self, slot: usize) -> Result<SlotResolution> {
        let page_index = slot_page_index(slot);
        let base_page = self
            .base()?
            .config
            .page(page_index)
            .cloned()
            .ok_or_else(|| anyhow!("base configuration has no page {page_index}"))?;

        'initial: loop {
            let base_frames = base_page.frame_count();
            self.preview_slot(slot, &base_page, base_frames);

            match self.ui.select_led_action(slot) {
                LedAction::Back => return Ok(SlotResolution::Back),
                LedAction::KeepBase => return Ok(SlotResolution::Resolved(SlotMapping::Keep)),
                LedAction::Replace => {
                    match self.select_source(self.settings.max_frames)? {
                        Some(sel) => {
                            return Ok(SlotResolution::Resolved(SlotMapping::Combined {
                                page: sel.page,
                                sources: vec![sel.description],
                                frame_count: sel.frame_count,
                            }));
                        }
                        // Recoverable selection failure: back to the menu.
                        None => continue 'initial,
                    }
                }
                LedAction::Combine => {
                    let mut page = base_page.clone();
                    let mut frames = base_frames;
                    let mut sources = vec![format!("Base LED {slot}")];

                    loop {
                        self.ui.info(&format!(
                            "Current configuration: {} ({frames} / {} frames)",
                            sources.join(" + "),
                            self.settings.max_frames
                        ));
                        self.preview_slot(slot, &page, frames);

                        if frames >= self.settings.max_frames {
                            self.ui.warning(&format!(
                                "Maximum frame limit ({}) reached",
                                self.settings.max_frames
                            ));
                            break;
                        }

                        match self.ui.select_next_action() {
                            NextAction::Back => continue 'initial,
                            NextAction::Finish => break,
                            NextAction::AddAnother => {
                                let budget = self.settings.max_frames - frames;
                                if let Some(sel) = self.select_source(budget)? {
                                    page = combine_pages(&[page.clone(), sel.page])?;
                                    frames += sel.frame_count;
                                    sources.push(sel.description);
                                }
                            }
                        }
                    }

                    return Ok(SlotResolution::Resolved(SlotMapping::Combined {
                        page,
                        sources,
                        frame_count: frames,
                    }));
                }
            }
        }
    }

    /// Offer the three LEDs of a source file, constrained by `budget`.
    fn select_source(&mut self, budget: usize) -> Result<Option<SourceSelection>> {
        let files = self.available_files()?;
        if files.is_empty() {
            self.ui.error("No usable source files available.");
            return Ok(None);
        }
        let Some(file) = self.ui.select_source_file(&files) else {
            return Ok(None);
        };
        let source = match self.store.load(&file) {
            Ok(config) => config,
            Err(err) => {
                self.report_load_error("Failed to load source configuration", &err);
                return Ok(None);
            }
        };

        self.ui.info(&format!("LED configurations from {file}:"));
        let choices = source_choices(&source, budget);
        let previews: Vec<Preview> = source
            .custom_led_pages()
            .iter()
            .zip(&choices)
            .map(|(page, choice)| Preview {
                title: if choice.eligible {
                    choice.label.clone()
                } else {
                    format!("{} (exceeds limit)", choice.label)
                },
                frames: page.rgb_data(),
                eligible: choice.eligible,
            })
            .collect();
        self.ui.preview(&previews);

        if !choices.iter().any(|c| c.eligible) {
            self.ui
                .error("No LEDs fit within the remaining frame limit.");
            return Ok(None);
        }

        let Some(index) = self.ui.select_source_slot(&choices) else {
            return Ok(None);
        };
        if !choices.get(index).is_some_and(|c| c.eligible) {
            self.ui
                .warning("Selected LED does not fit the remaining frame limit.");
            return Ok(None);
        }

        let page_index = CUSTOM_LED_START_PAGE + index;
        let Some(page) = source.page(page_index) else {
            self.ui.error("Selected LED page is missing from the source file.");
            return Ok(None);
        };
        Ok(Some(SourceSelection {
            frame_count: page.frame_count(),
            description: format!("{file} -> LED {}", index + 1),
            page: page.clone(),
        }))
    }

    /// Step 3: summary table, final preview, and the confirmation choice.
    fn show_summary(&mut self) -> Result<UserChoice> {
        self.ui.step("Step 3: Configuration Summary");

        let mut rows = Vec::with_capacity(CUSTOM_LED_SLOTS);
        let mut previews = Vec::with_capacity(CUSTOM_LED_SLOTS);
        let base = self
            .base
            .as_ref()
            .ok_or_else(|| anyhow!("no base configuration loaded"))?;
        for (i, mapping) in self.mappings.iter().enumerate() {
            let slot = i + 1;
            let Some(mapping) = mapping else {
                bail!("slot {slot} was not resolved before the summary step");
            };
            let (sources, page) = match mapping {
                SlotMapping::Keep => (Vec::new(), base.config.page(slot_page_index(slot))),
                SlotMapping::Combined { page, sources, .. } => (sources.clone(), Some(page)),
            };
            let frame_count = page.map_or(0, |p| p.frame_count());
            rows.push(SlotSummary {
                slot,
                sources,
                frame_count,
            });
            previews.push(Preview {
                title: format!("Final LED {slot} ({frame_count} frames)"),
                frames: page.map(Page::rgb_data).unwrap_or_default(),
                eligible: true,
            });
        }

        self.ui.info("Final LED configuration preview:");
        self.ui.preview(&previews);
        Ok(self.ui.confirm_summary(&rows))
    }

    /// Step 4: clone the base once and write the combined slots into it.
    ///
    /// Placement here is authoritative: each slot lands at page `4 + slot`
    /// regardless of what index its page carried before.
    fn perform_merge(&mut self) -> Result<Configuration> {
        self.ui.step("Step 4: Merging Configuration");

        let base = self
            .base
            .as_ref()
            .ok_or_else(|| anyhow!("no base configuration loaded"))?;
        let mut merged = base.config.clone();
        for (i, mapping) in self.mappings.iter().enumerate() {
            if let Some(SlotMapping::Combined { page, .. }) = mapping {
                merged.set_page(CUSTOM_LED_START_PAGE + i, page.clone());
            }
            // Kept slots need no write; the base already holds that data.
        }
        info!("Merged configuration assembled");
        Ok(merged)
    }

    /// Step 5: persist, offering retry on failure.
    fn save_merged(&mut self, merged: &Configuration) -> Result<SessionOutcome> {
        loop {
            if self.save_flow(merged)? {
                self.ui
                    .success("Configuration merge completed successfully.");
                return Ok(SessionOutcome::Completed);
            }
            if !self.ui.confirm("Retry the save process?") {
                return Ok(SessionOutcome::Aborted);
            }
        }
    }

    fn save_flow(&mut self, merged: &Configuration) -> Result<bool> {
        self.ui.step("Step 5: Save Configuration");

        loop {
            match self.ui.select_save_method() {
                SaveMethod::Back => return Ok(false),
                SaveMethod::Overwrite => {
                    let filename = self.base()?.filename.clone();
                    if !self.ui.confirm(&format!("Overwrite '{filename}'?")) {
                        continue;
                    }
                    return Ok(self.try_save(merged, &filename, true));
                }
                SaveMethod::NewFile => {
                    let default = self.store.default_filename();
                    let entered = self.ui.prompt_filename(&default);
                    let filename = if entered.trim().is_empty() {
                        default
                    } else {
                        entered
                    };
                    return Ok(self.try_save(merged, &filename, false));
                }
            }
        }
    }

    fn try_save(&mut self, merged: &Configuration, filename: &str, overwrite: bool) -> bool {
        match self.store.save(merged, filename, overwrite) {
            Ok(path) => {
                self.ui
                    .success(&format!("Configuration saved: {}", path.display()));
                true
            }
            Err(err) => {
                warn!(error = %err, "Save failed");
                self.ui.error(&format!("Failed to save file: {err}"));
                false
            }
        }
    }

    /// Candidate files, treating a missing source directory as empty.
    fn available_files(&mut self) -> Result<Vec<String>> {
        match self.store.valid_candidates() {
            Ok(files) => Ok(files),
            Err(LoadError::NotFound { .. }) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn preview_base(&mut self) {
        let Some(base) = &self.base else { return };
        let previews: Vec<Preview> = base
            .config
            .custom_led_pages()
            .iter()
            .enumerate()
            .map(|(i, page)| Preview {
                title: format!("Custom LED {}", i + 1),
                frames: page.rgb_data(),
                eligible: true,
            })
            .collect();
        self.ui.info("Base LED configuration preview:");
        self.ui.preview(&previews);
    }

    fn preview_slot(&mut self, slot: usize, page: &Page, frame_count: usize) {
        let preview = Preview {
            title: format!("LED {slot} ({frame_count} frames)"),
            frames: page.rgb_data(),
            eligible: true,
        };
        self.ui.info(&format!("Current LED {slot} preview:"));
        self.ui.preview(std::slice::from_ref(&preview));
    }

    fn report_load_error(&mut self, what: &str, err: &LoadError) {
        self.ui.error(&format!("{what}: {err}"));
        if let LoadError::Schema { violations, .. } = err {
            for violation in violations {
                self.ui.error(&format!("  - {violation}"));
            }
        }
    }

    fn base(&self) -> Result<&LoadedBase> {
        self.base
            .as_ref()
            .ok_or_else(|| anyhow!("no base configuration loaded"))
    }
}
