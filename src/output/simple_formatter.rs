use colored::Colorize;

use crate::keys::{KeyedCandidate, RiskLevel};
use crate::rewrite::RewriteResult;
use crate::scan::{ScanResult, SkippedString};

/// Formatter for line-oriented output: `file:line: [confidence] key = "text"`
pub struct SimpleFormatter {
    color: bool,
}

impl SimpleFormatter {
    pub fn new() -> Self {
        Self { color: false }
    }

    /// Highlight keys and risk levels with terminal colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// One line per keyed candidate
    pub fn format_candidates(&self, keyed: &[KeyedCandidate]) -> String {
        let mut output = String::new();
        for k in keyed {
            let confidence = format!("[{:>3}]", k.confidence);
            let (confidence, key) = if self.color {
                let confidence = match k.risk {
                    RiskLevel::Safe => confidence.green(),
                    RiskLevel::Warning => confidence.yellow(),
                    RiskLevel::Danger => confidence.red(),
                };
                (confidence.to_string(), k.key.bold().to_string())
            } else {
                (confidence, k.key.clone())
            };
            output.push_str(&format!(
                "{}:{}: {} {} = \"{}\"",
                k.candidate.file.display(),
                k.candidate.line,
                confidence,
                key,
                k.value
            ));
            output.push('\n');
        }
        output
    }

    /// One line per skipped string with its reason
    pub fn format_skipped(&self, skipped: &[SkippedString]) -> String {
        let mut output = String::new();
        for s in skipped {
            let reason = if self.color {
                s.reason.to_string().dimmed().to_string()
            } else {
                s.reason.to_string()
            };
            output.push_str(&format!(
                "{}:{}: skipped \"{}\" ({})",
                s.file.display(),
                s.line,
                s.text,
                reason
            ));
            output.push('\n');
        }
        output
    }

    pub fn format_summary(&self, result: &ScanResult, shown: usize) -> String {
        let per_type = result
            .by_file_type
            .iter()
            .map(|(file_type, count)| format!("{} {}", count, file_type.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let mut summary = format!(
            "{} candidates ({} shown), {} skipped, {} strings in {} files",
            result.candidates.len(),
            shown,
            result.skipped.len(),
            result.total_strings,
            result.total_files
        );
        if !per_type.is_empty() {
            summary.push_str(&format!(" ({})", per_type));
        }
        summary.push('\n');
        summary
    }

    /// Per-file outcome of an apply run followed by the total
    pub fn format_rewrite(&self, result: &RewriteResult) -> String {
        let mut output = String::new();
        for outcome in &result.files {
            let line = match &outcome.error {
                Some(error) => {
                    let status = if self.color {
                        "error".red().to_string()
                    } else {
                        "error".to_string()
                    };
                    format!("{}: {}: {}", outcome.file.display(), status, error)
                }
                None => format!(
                    "{}: {} change(s) applied",
                    outcome.file.display(),
                    outcome.changes_applied
                ),
            };
            output.push_str(&line);
            output.push('\n');
        }
        output.push_str(&format!(
            "{} change(s) applied in {} file(s)\n",
            result.total_changes,
            result.files.iter().filter(|f| f.success).count()
        ));
        output
    }
}

impl Default for SimpleFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::FileOutcome;
    use crate::scan::{Candidate, CandidateMetadata, ElementType, FileType, SkipReason};
    use std::path::PathBuf;

    fn keyed(text: &str) -> KeyedCandidate {
        let candidate = Candidate {
            file: PathBuf::from("resources/views/auth/login.blade.php"),
            line: 12,
            column: 8,
            text: text.to_string(),
            context: format!("<button>{}</button>", text),
            element_type: ElementType::Button,
            file_type: FileType::Blade,
            metadata: CandidateMetadata::default(),
        };
        KeyedCandidate::new(candidate, "auth.login.buttons.log-in".to_string())
    }

    #[test]
    fn test_format_candidate_line() {
        let formatter = SimpleFormatter::new();
        let output = formatter.format_candidates(&[keyed("Log In")]);
        assert_eq!(
            output,
            "resources/views/auth/login.blade.php:12: [100] auth.login.buttons.log-in = \"Log In\"\n"
        );
    }

    #[test]
    fn test_format_skipped_line() {
        let formatter = SimpleFormatter::new();
        let output = formatter.format_skipped(&[SkippedString {
            file: PathBuf::from("app/Models/User.php"),
            text: "id".to_string(),
            reason: SkipReason::TooShort,
            line: 4,
        }]);
        assert_eq!(
            output,
            "app/Models/User.php:4: skipped \"id\" (shorter than 3 characters)\n"
        );
    }

    #[test]
    fn test_format_summary_counts_file_types() {
        let mut result = ScanResult::default();
        result.total_files = 3;
        result.total_strings = 5;
        result.by_file_type.insert(FileType::Blade, 2);
        result.by_file_type.insert(FileType::Php, 1);
        let summary = SimpleFormatter::new().format_summary(&result, 0);
        assert!(summary.starts_with("0 candidates (0 shown), 0 skipped, 5 strings in 3 files"));
        assert!(summary.contains("1 php"));
        assert!(summary.contains("2 blade"));
    }

    #[test]
    fn test_format_rewrite_outcomes() {
        let mut result = RewriteResult::new();
        result.push(FileOutcome {
            file: PathBuf::from("a.blade.php"),
            success: true,
            changes_applied: 2,
            error: None,
            applied_ids: vec!["x".into()],
        });
        result.push(FileOutcome::failed(
            PathBuf::from("gone.php"),
            &crate::RetrofitError::file_not_found("gone.php"),
        ));
        let output = SimpleFormatter::new().format_rewrite(&result);
        assert!(output.contains("a.blade.php: 2 change(s) applied\n"));
        assert!(output.contains("gone.php: error:"));
        assert!(output.ends_with("2 change(s) applied in 1 file(s)\n"));
    }
}
