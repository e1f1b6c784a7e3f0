//! Configuration file store.
//!
//! Owns the source/output directory pair: lists candidate JSON files, loads
//! and schema-checks documents, and writes merged results. Load failures are
//! split into the distinct kinds the workflow needs to report and recover
//! from (`NotFound` / `Io` / `Parse` / `Schema`).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::Configuration;
use crate::settings::Settings;
use crate::validate::{Violation, validate_configuration};

/// Why a configuration file could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("configuration file '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' fails schema validation with {} issue(s)", path.display(), violations.len())]
    Schema {
        path: PathBuf,
        violations: Vec<Violation>,
    },
}

/// Basic information about a stored configuration file.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub filename: String,
    pub product_id: Option<String>,
    pub custom_led_frames: Vec<usize>,
    pub total_custom_frames: usize,
}

/// File operations over the source/output directory pair.
#[derive(Debug, Clone)]
pub struct FileStore {
    source_dir: PathBuf,
    output_dir: PathBuf,
}

impl FileStore {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.source_dir, &settings.output_dir)
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Names of all `.json` files in the source directory, sorted.
    pub fn candidates(&self) -> Result<Vec<String>, LoadError> {
        let entries = fs::read_dir(&self.source_dir).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound {
                    path: self.source_dir.clone(),
                }
            } else {
                LoadError::Io {
                    path: self.source_dir.clone(),
                    source,
                }
            }
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Io {
                path: self.source_dir.clone(),
                source,
            })?;
            let path = entry.path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if path.is_file() && is_json {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Candidate files that load and pass schema validation. Files that fail
    /// are logged and excluded rather than aborting the listing.
    pub fn valid_candidates(&self) -> Result<Vec<String>, LoadError> {
        let mut valid = Vec::new();
        for name in self.candidates()? {
            match self.load(&name) {
                Ok(_) => valid.push(name),
                Err(err) => {
                    warn!(file = %name, error = %err, "Excluding unusable candidate file");
                }
            }
        }
        Ok(valid)
    }

    /// Load and validate a configuration from the source directory.
    pub fn load(&self, filename: &str) -> Result<Configuration, LoadError> {
        let path = self.source_dir.join(filename);
        if !path.exists() {
            return Err(LoadError::NotFound { path });
        }

        let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let config: Configuration =
            serde_json::from_str(&content).map_err(|source| LoadError::Parse {
                path: path.clone(),
                source,
            })?;

        let violations = validate_configuration(&config);
        if !violations.is_empty() {
            return Err(LoadError::Schema { path, violations });
        }

        debug!(file = %filename, "Loaded configuration");
        Ok(config)
    }

    /// Save a configuration as pretty-printed JSON.
    ///
    /// Overwrites go back into the source directory; new files land in the
    /// output directory, which is created on demand.
    pub fn save(&self, config: &Configuration, filename: &str, overwrite: bool) -> Result<PathBuf> {
        let path = if overwrite {
            self.source_dir.join(filename)
        } else {
            fs::create_dir_all(&self.output_dir).with_context(|| {
                format!(
                    "Failed to create output directory '{}'",
                    self.output_dir.display()
                )
            })?;
            self.output_dir.join(filename)
        };

        let json = serde_json::to_string_pretty(config)
            .context("Failed to serialize merged configuration")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to '{}'", path.display()))?;

        info!(path = %path.display(), overwrite, "Saved configuration");
        Ok(path)
    }

    /// Timestamped default name for a merged file.
    pub fn default_filename(&self) -> String {
        format!("merged_{}.json", Local::now().format("%Y%m%d_%H%M%S"))
    }

    /// Summary of a stored file, for logging and diagnostics.
    pub fn file_info(&self, filename: &str) -> Result<FileInfo, LoadError> {
        let config = self.load(filename)?;
        let custom_led_frames = config.custom_led_frame_counts();
        Ok(FileInfo {
            filename: filename.to_string(),
            product_id: config
                .product_info
                .get("product_id")
                .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string)),
            total_custom_frames: custom_led_frames.iter().sum(),
            custom_led_frames,
        })
    }
}
