//! Application settings: directory pair and frame cap.
//!
//! Settings come from a small JSON file next to the binary. A missing file
//! means defaults; an unreadable or malformed file is reported and defaults
//! are used, so a broken settings file never blocks a merge session.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::DEFAULT_MAX_FRAMES;

/// Startup configuration for a merge session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned for candidate configuration files.
    pub source_dir: PathBuf,

    /// Directory new merged files are written to.
    pub output_dir: PathBuf,

    /// Cap on frames per custom LED slot.
    pub max_frames: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file is
    /// absent or unusable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Settings file absent; using defaults");
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Loaded settings");
                    settings
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Invalid settings file; using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to read settings file; using defaults");
                Self::default()
            }
        }
    }

    /// Create the source and output directories when missing.
    ///
    /// Returns the directories that had to be created.
    pub fn ensure_directories(&self) -> io::Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        if !self.source_dir.exists() {
            fs::create_dir_all(&self.source_dir)?;
            created.push(self.source_dir.clone());
        }
        if self.output_dir != self.source_dir && !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)?;
            created.push(self.output_dir.clone());
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_file() {
        let settings = Settings::load(Path::new("definitely/not/here/settings.json"));
        assert_eq!(settings.source_dir, PathBuf::from("."));
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert_eq!(settings.max_frames, 300);
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "source_dir": "configs" }"#).unwrap();
        assert_eq!(settings.source_dir, PathBuf::from("configs"));
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert_eq!(settings.max_frames, 300);
    }

    #[test]
    fn full_settings_round_trip() {
        let settings = Settings {
            source_dir: PathBuf::from("in"),
            output_dir: PathBuf::from("out"),
            max_frames: 150,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_frames, 150);
        assert_eq!(back.output_dir, PathBuf::from("out"));
    }
}
