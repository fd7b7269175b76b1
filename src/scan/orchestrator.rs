use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, RetrofitError};

use super::blade::BladeScanner;
use super::candidate::ScanResult;
use super::dialect::{has_extension, DialectScanner};
use super::php::PhpScanner;
use super::volt::VoltScanner;

/// Walks source trees and dispatches each file to the first dialect scanner that claims it
pub struct SourceScanner {
    scanners: Vec<Box<dyn DialectScanner + Send + Sync>>,
    /// Matched against whole path segments
    default_exclude_dirs: Vec<String>,
    /// Matched anywhere inside a path segment
    exclude_dirs: Vec<String>,
    exclude_files: Vec<String>,
    include: Option<GlobSet>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for SourceScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceScanner {
    /// Variants are probed most specific first: Volt, then Blade, then PHP
    pub fn new() -> Self {
        Self::with_scanners(vec![
            Box::new(VoltScanner::new()),
            Box::new(BladeScanner::new()),
            Box::new(PhpScanner::new()),
        ])
    }

    pub fn with_scanners(scanners: Vec<Box<dyn DialectScanner + Send + Sync>>) -> Self {
        Self {
            scanners,
            default_exclude_dirs: Vec::new(),
            exclude_dirs: Vec::new(),
            exclude_files: Vec::new(),
            include: None,
            cancel: None,
        }
    }

    /// Project-type defaults: `public` skips `public/` but not `publications/`
    pub fn default_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.default_exclude_dirs.extend(dirs);
        self
    }

    pub fn exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs.extend(dirs);
        self
    }

    pub fn exclude_files(mut self, files: Vec<String>) -> Self {
        self.exclude_files.extend(files);
        self
    }

    /// Restrict scanning to paths matching at least one glob (relative to the scan root)
    pub fn include(mut self, patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(self);
        }
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob =
                Glob::new(pattern).map_err(|e| RetrofitError::invalid_glob(pattern, e.to_string()))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|e| RetrofitError::invalid_glob(patterns.join(", "), e.to_string()))?;
        self.include = Some(set);
        Ok(self)
    }

    /// Checked between files; a raised flag ends the walk with what was collected so far
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Scan one directory tree
    pub fn scan(&self, dir: &Path) -> ScanResult {
        let mut result = ScanResult::default();
        self.scan_dir_into(dir, &mut result, &mut HashSet::new());
        result.dedup();
        result
    }

    /// Scan a mix of files and directories; a file reached through several entries is
    /// scanned once
    pub fn scan_paths(&self, entries: &[PathBuf]) -> ScanResult {
        let mut result = ScanResult::default();
        let mut scanned = HashSet::new();
        for entry in entries {
            if self.is_cancelled() {
                break;
            }
            if entry.is_dir() {
                self.scan_dir_into(entry, &mut result, &mut scanned);
            } else if entry.is_file() {
                if !self.is_excluded_file(entry) {
                    self.scan_file_into(entry, &mut result, &mut scanned);
                }
            } else {
                warn!(path = %entry.display(), "path does not exist, skipping");
            }
        }
        result.dedup();
        result
    }

    fn scan_dir_into(&self, root: &Path, result: &mut ScanResult, scanned: &mut HashSet<PathBuf>) {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded_dir(root, e));

        for entry in walker {
            if self.is_cancelled() {
                info!(files = result.total_files, "scan cancelled");
                return;
            }
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "cannot read directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if self.is_excluded_file(path) || !self.is_included(root, path) {
                continue;
            }
            self.scan_file_into(path, result, scanned);
        }
    }

    fn scan_file_into(&self, path: &Path, result: &mut ScanResult, scanned: &mut HashSet<PathBuf>) {
        if !self
            .scanners
            .iter()
            .any(|s| has_extension(path, s.extensions()))
        {
            return;
        }
        if !scanned.insert(path.to_path_buf()) {
            debug!(path = %path.display(), "already scanned");
            return;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read file, skipping");
                return;
            }
        };

        let Some(scanner) = self.scanners.iter().find(|s| s.can_handle(path, &content)) else {
            return;
        };

        let scan = scanner.scan_file(path, &content);
        debug!(
            path = %path.display(),
            file_type = %scanner.file_type(),
            candidates = scan.candidates.len(),
            skipped = scan.skipped.len(),
            "scanned file"
        );
        result.record_file(scanner.file_type(), scan);
    }

    fn is_excluded_dir(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        relative.components().any(|component| {
            let segment = component.as_os_str().to_string_lossy();
            self.default_exclude_dirs.iter().any(|excl| segment == excl.as_str())
                || self
                    .exclude_dirs
                    .iter()
                    .any(|excl| !excl.is_empty() && segment.contains(excl.as_str()))
        })
    }

    fn is_excluded_file(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let full = path.to_string_lossy().replace('\\', "/");
        self.exclude_files
            .iter()
            .any(|excl| !excl.is_empty() && (name == *excl || full.ends_with(excl.as_str())))
    }

    fn is_included(&self, root: &Path, path: &Path) -> bool {
        match &self.include {
            Some(set) => set.is_match(path.strip_prefix(root).unwrap_or(path)),
            None => true,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
