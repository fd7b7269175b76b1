pub mod config;
pub mod error;
pub mod keys;
pub mod output;
pub mod rewrite;
pub mod scan;

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

// Re-export commonly used types
pub use config::Settings;
pub use error::{Result, RetrofitError};
pub use keys::{
    analyze, apply_parameters, calculate_confidence, detect_parameters, generate_key,
    KeyedCandidate, RiskLevel,
};
pub use output::SimpleFormatter;
pub use rewrite::{ApprovedChange, ChangeLocation, FileOutcome, RewriteResult, Rewriter};
pub use scan::{
    Candidate, CandidateMetadata, DialectScanner, ElementType, FileContext, FileType, ScanResult,
    SkipReason, SkippedString, SourceScanner,
};

/// Query parameters for a scan
#[derive(Debug, Clone)]
pub struct ScanQuery {
    /// Files or directories; empty means the current directory
    pub paths: Vec<PathBuf>,
    pub exclude_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
    pub include_patterns: Vec<String>,
    /// Add the project type's default excluded directories
    pub default_exclusions: bool,
    /// Explicit settings file instead of discovering `.i18n-retrofit.json`
    pub config_file: Option<PathBuf>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for ScanQuery {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ScanQuery {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            exclude_dirs: Vec::new(),
            exclude_files: Vec::new(),
            include_patterns: Vec::new(),
            default_exclusions: true,
            config_file: None,
            cancel: None,
        }
    }

    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclude_dirs = exclusions;
        self
    }

    pub fn with_excluded_files(mut self, files: Vec<String>) -> Self {
        self.exclude_files = files;
        self
    }

    pub fn with_includes(mut self, includes: Vec<String>) -> Self {
        self.include_patterns = includes;
        self
    }

    pub fn with_default_exclusions(mut self, enabled: bool) -> Self {
        self.default_exclusions = enabled;
        self
    }

    pub fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Paths to scan, defaulting to the current directory
    pub fn resolved_paths(&self) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
        } else {
            self.paths.clone()
        }
    }

    /// Directory used for project detection and settings discovery
    fn project_dir(&self) -> PathBuf {
        let first = self
            .resolved_paths()
            .into_iter()
            .next()
            .unwrap_or_else(|| PathBuf::from("."));
        if first.is_file() {
            first
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            first
        }
    }

    /// Settings from `--config` or the discovered project file, with the query's own values appended
    pub fn settings(&self) -> Result<Settings> {
        let from_file = match &self.config_file {
            Some(path) => Settings::load(path)?,
            None => match Settings::discover(&self.project_dir())? {
                Some((path, settings)) => {
                    debug!(config = %path.display(), "loaded project settings");
                    settings
                }
                None => Settings::default(),
            },
        };
        Ok(from_file.merge(Settings {
            exclude_dirs: self.exclude_dirs.clone(),
            exclude_files: self.exclude_files.clone(),
            include: self.include_patterns.clone(),
            min_confidence: None,
        }))
    }
}

/// Run a scan for `query`, loading project settings on the way
#[must_use = "this function returns a Result that should be handled"]
pub fn run_scan(query: ScanQuery) -> Result<ScanResult> {
    let settings = query.settings()?;
    run_scan_with(&query, &settings)
}

/// Run a scan with already resolved settings
#[must_use = "this function returns a Result that should be handled"]
pub fn run_scan_with(query: &ScanQuery, settings: &Settings) -> Result<ScanResult> {
    let default_exclude_dirs: Vec<String> = if query.default_exclusions {
        let project_type = config::detect_project_type(&query.project_dir());
        debug!(?project_type, "detected project type");
        config::get_default_exclusions(project_type)
            .iter()
            .map(|&s| s.to_string())
            .collect()
    } else {
        Vec::new()
    };

    let mut scanner = SourceScanner::new()
        .default_exclude_dirs(default_exclude_dirs)
        .exclude_dirs(settings.exclude_dirs.clone())
        .exclude_files(settings.exclude_files.clone())
        .include(&settings.include)?;
    if let Some(flag) = &query.cancel {
        scanner = scanner.cancel_flag(Arc::clone(flag));
    }

    let result = scanner.scan_paths(&query.resolved_paths());
    info!(
        files = result.total_files,
        candidates = result.candidates.len(),
        skipped = result.skipped.len(),
        "scan finished"
    );
    Ok(result)
}

/// Scan files and directories with explicit exclusions and no project defaults
pub fn scan(paths: &[PathBuf], excluded_dirs: &[String], excluded_files: &[String]) -> ScanResult {
    SourceScanner::new()
        .exclude_dirs(excluded_dirs.to_vec())
        .exclude_files(excluded_files.to_vec())
        .scan_paths(paths)
}

/// Apply approved changes with locations resolved against the current directory
pub fn apply(changes: &[ApprovedChange]) -> RewriteResult {
    Rewriter::new().apply(changes)
}
