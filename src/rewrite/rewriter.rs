use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Result, RetrofitError};

use super::change::{ApprovedChange, FileOutcome, RewriteResult};
use super::strategy::rewrite_line;

/// Extensions tried when a location names a view without its file extension
const IMPLIED_EXTENSIONS: &[&str] = &["blade.php", "php"];

/// Applies approved changes to source files, one atomic write per file
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    base_dir: Option<PathBuf>,
    dry_run: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against `dir`
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Compute outcomes without touching any file
    pub fn dry_run(mut self, value: bool) -> Self {
        self.dry_run = value;
        self
    }

    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Apply every change; per-file failures are reported in the result, never returned
    pub fn apply(&self, changes: &[ApprovedChange]) -> RewriteResult {
        let mut by_file: BTreeMap<PathBuf, Vec<(usize, &ApprovedChange)>> = BTreeMap::new();
        for change in changes {
            for location in &change.locations {
                by_file
                    .entry(location.file.clone())
                    .or_default()
                    .push((location.line, change));
            }
        }

        let mut result = RewriteResult::new();
        for (file, edits) in by_file {
            if self
                .cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                info!(processed = result.files.len(), "rewrite cancelled");
                break;
            }
            result.push(self.apply_file(&file, edits));
        }

        info!(
            files = result.files.len(),
            changes = result.total_changes,
            success = result.success,
            dry_run = self.dry_run,
            "rewrite finished"
        );
        result
    }

    fn apply_file(&self, file: &Path, mut edits: Vec<(usize, &ApprovedChange)>) -> FileOutcome {
        let path = match self.resolve(file) {
            Ok(path) => path,
            Err(e) => {
                warn!(file = %file.display(), "file not found");
                return FileOutcome::failed(file.to_path_buf(), &e);
            }
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "cannot read file");
                return FileOutcome::failed(path, &RetrofitError::Io(e));
            }
        };

        let mut lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();
        let mut applied = 0;
        let mut applied_ids: Vec<String> = Vec::new();

        // stable sort keeps batch order among changes targeting the same line
        edits.sort_by(|a, b| b.0.cmp(&a.0));
        for (line_no, change) in edits {
            let Some(line) = line_no.checked_sub(1).and_then(|idx| lines.get_mut(idx)) else {
                debug!(file = %path.display(), line = line_no, "line out of range");
                continue;
            };
            let (body, ending) = split_line_ending(line);
            let rewritten = rewrite_line(body, change)
                .map(|(body, strategy)| (format!("{}{}", body, ending), strategy));
            match rewritten {
                Some((rewritten, strategy)) => {
                    debug!(file = %path.display(), line = line_no, key = %change.key, ?strategy, "rewrote line");
                    *line = rewritten;
                    applied += 1;
                    if !applied_ids.contains(&change.id) {
                        applied_ids.push(change.id.clone());
                    }
                }
                None => {
                    debug!(file = %path.display(), line = line_no, key = %change.key, "no strategy matched");
                }
            }
        }

        if applied > 0 && !self.dry_run {
            if let Err(e) = write_atomic(&path, &lines.concat()) {
                warn!(file = %path.display(), error = %e, "write failed");
                return FileOutcome::failed(path, &e);
            }
        }

        FileOutcome {
            file: path,
            success: true,
            changes_applied: applied,
            error: None,
            applied_ids,
        }
    }

    /// The location as given, then with an implied view extension
    fn resolve(&self, file: &Path) -> Result<PathBuf> {
        let path = match &self.base_dir {
            Some(base) if file.is_relative() => base.join(file),
            _ => file.to_path_buf(),
        };
        if path.is_file() {
            return Ok(path);
        }
        let name = path.to_string_lossy();
        IMPLIED_EXTENSIONS
            .iter()
            .map(|ext| PathBuf::from(format!("{}.{}", name, ext)))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| RetrofitError::file_not_found(&path))
    }
}

/// Split a line into its body and its `\n` / `\r\n` terminator
fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Write through a temporary file in the same directory, then rename over `path`
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let to_write_error = |e: io::Error| RetrofitError::write_failed(path, e.to_string());
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir).map_err(to_write_error)?;
    tmp.write_all(content.as_bytes()).map_err(to_write_error)?;
    tmp.as_file().sync_all().map_err(to_write_error)?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), metadata.permissions()).map_err(to_write_error)?;
    }
    tmp.persist(path).map_err(|e| to_write_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::change::ChangeLocation;
    use tempfile::TempDir;

    fn change(id: &str, key: &str, value: &str, file: &str, lines: &[usize]) -> ApprovedChange {
        ApprovedChange {
            id: id.into(),
            key: key.into(),
            value: value.into(),
            params: Vec::new(),
            locations: lines
                .iter()
                .map(|&line| ChangeLocation {
                    file: file.into(),
                    line,
                })
                .collect(),
            original: None,
        }
    }

    #[test]
    fn test_view_name_resolves_to_blade_file() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("auth");
        fs::create_dir_all(&dir).unwrap();
        let mut content: String = (1..12).map(|i| format!("<!-- line {} -->\n", i)).collect();
        content.push_str("<button>Log In</button>\n");
        fs::write(dir.join("login.blade.php"), &content).unwrap();

        let changes = vec![change("c1", "auth.buttons.login", "Log In", "auth/login", &[12])];
        let result = Rewriter::new().base_dir(temp_dir.path()).apply(&changes);

        assert!(result.success);
        assert_eq!(result.total_changes, 1);
        assert_eq!(result.files[0].changes_applied, 1);
        let written = fs::read_to_string(dir.join("login.blade.php")).unwrap();
        assert!(written.ends_with("<button>{{ __('auth.buttons.login') }}</button>\n"));
        assert_eq!(result.applied_ids(), vec!["c1".to_string()]);
    }

    #[test]
    fn test_descending_order_and_crlf_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.blade.php");
        fs::write(&path, "<h1>Title text</h1>\r\n<p>Body text</p>\r\n<p>Body text</p>").unwrap();

        let changes = vec![
            change("a", "page.content.title-text", "Title text", "page.blade.php", &[1]),
            change("b", "page.content.body-text", "Body text", "page.blade.php", &[2, 3]),
        ];
        let result = Rewriter::new().base_dir(temp_dir.path()).apply(&changes);

        assert_eq!(result.total_changes, 3);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<h1>{{ __('page.content.title-text') }}</h1>\r\n<p>{{ __('page.content.body-text') }}</p>\r\n<p>{{ __('page.content.body-text') }}</p>"
        );
    }

    #[test]
    fn test_missing_file_does_not_stop_others() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("ok.blade.php"), "<p>Still applied</p>\n").unwrap();

        let changes = vec![
            change("gone", "x.y.z", "Whatever", "missing.blade.php", &[1]),
            change("ok", "ok.content.still-applied", "Still applied", "ok.blade.php", &[1]),
        ];
        let result = Rewriter::new().base_dir(temp_dir.path()).apply(&changes);

        assert!(!result.success);
        assert_eq!(result.total_changes, 1);
        let missing = result.files.iter().find(|f| !f.success).unwrap();
        assert!(missing.error.as_deref().unwrap().contains("File not found"));
        assert_eq!(result.applied_ids(), vec!["ok".to_string()]);
    }

    #[test]
    fn test_unmatched_change_is_still_success() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.php");
        fs::write(&path, "<?php\n$x = 'Other text';\n").unwrap();

        let changes = vec![change("c", "a.misc.text", "Not there", "a.php", &[2, 99])];
        let result = Rewriter::new().base_dir(temp_dir.path()).apply(&changes);

        assert!(result.success);
        assert_eq!(result.files[0].changes_applied, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<?php\n$x = 'Other text';\n");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.blade.php");
        fs::write(&path, "<p>Keep me</p>\n").unwrap();

        let changes = vec![change("c", "a.content.keep-me", "Keep me", "a.blade.php", &[1])];
        let result = Rewriter::new().base_dir(temp_dir.path()).dry_run(true).apply(&changes);

        assert_eq!(result.total_changes, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "<p>Keep me</p>\n");
    }

    #[test]
    fn test_second_apply_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.blade.php");
        fs::write(&path, "<p>Apply once</p>\n").unwrap();
        let changes = vec![change("c", "a.content.apply-once", "Apply once", "a.blade.php", &[1])];
        let rewriter = Rewriter::new().base_dir(temp_dir.path());

        assert_eq!(rewriter.apply(&changes).total_changes, 1);
        let after_first = fs::read_to_string(&path).unwrap();
        let second = rewriter.apply(&changes);
        assert!(second.success);
        assert_eq!(second.total_changes, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions_preserved() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.blade.php");
        fs::write(&path, "<p>Mode check</p>\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        let changes = vec![change("c", "a.content.mode-check", "Mode check", "a.blade.php", &[1])];
        Rewriter::new().base_dir(temp_dir.path()).apply(&changes);

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_is_reported_per_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("a.blade.php"), "<p>Cannot write</p>\n").unwrap();
        fs::write(temp_dir.path().join("b.blade.php"), "<p>Can write</p>\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // a privileged user ignores directory permissions
        let check = locked.join(".writable");
        if fs::write(&check, "").is_ok() {
            fs::remove_file(&check).unwrap();
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let changes = vec![
            change("a", "a.content.cannot-write", "Cannot write", "locked/a.blade.php", &[1]),
            change("b", "b.content.can-write", "Can write", "b.blade.php", &[1]),
        ];
        let result = Rewriter::new().base_dir(temp_dir.path()).apply(&changes);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(!result.success);
        let failed = result.files.iter().find(|f| !f.success).unwrap();
        assert!(failed.file.ends_with("locked/a.blade.php"));
        assert!(failed.error.is_some());
        assert_eq!(failed.changes_applied, 0);
        assert_eq!(
            fs::read_to_string(locked.join("a.blade.php")).unwrap(),
            "<p>Cannot write</p>\n"
        );

        assert_eq!(result.applied_ids(), vec!["b".to_string()]);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("b.blade.php")).unwrap(),
            "<p>{{ __('b.content.can-write') }}</p>\n"
        );
    }

    #[test]
    fn test_cancelled_before_first_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.blade.php"), "<p>Not touched</p>\n").unwrap();
        let changes = vec![change("c", "a.b.c", "Not touched", "a.blade.php", &[1])];

        let result = Rewriter::new()
            .base_dir(temp_dir.path())
            .cancel_flag(Arc::new(AtomicBool::new(true)))
            .apply(&changes);
        assert!(result.files.is_empty());
        assert!(result.success);
    }
}
