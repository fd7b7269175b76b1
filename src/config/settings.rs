use crate::error::{Result, RetrofitError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the scanned directory when no `--config` is given
pub const CONFIG_FILE_NAME: &str = ".i18n-retrofit.json";

/// Project-level scan settings, loaded from `.i18n-retrofit.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory names (substring match on path segments) to skip
    pub exclude_dirs: Vec<String>,
    /// File names or path suffixes to skip
    pub exclude_files: Vec<String>,
    /// Glob patterns; when non-empty only matching files are scanned
    pub include: Vec<String>,
    /// Keyed candidates below this confidence are not reported
    pub min_confidence: Option<u8>,
}

impl Settings {
    /// Load settings from an explicit path
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RetrofitError::invalid_config(path, e.to_string()))
    }

    /// Look for `.i18n-retrofit.json` in `base_dir`; a missing file is not an error
    pub fn discover(base_dir: &Path) -> Result<Option<(PathBuf, Self)>> {
        let candidate = base_dir.join(CONFIG_FILE_NAME);
        if !candidate.is_file() {
            return Ok(None);
        }
        let settings = Self::load(&candidate)?;
        Ok(Some((candidate, settings)))
    }

    /// Append CLI-provided values to the file-provided ones
    pub fn merge(mut self, other: Settings) -> Self {
        self.exclude_dirs.extend(other.exclude_dirs);
        self.exclude_files.extend(other.exclude_files);
        self.include.extend(other.include);
        if other.min_confidence.is_some() {
            self.min_confidence = other.min_confidence;
        }
        self
    }
}
