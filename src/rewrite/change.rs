use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, RetrofitError};
use crate::keys::{echo_bindings, KeyedCandidate};

/// One place an approved change should be applied
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeLocation {
    pub file: PathBuf,
    /// Line number (1-indexed)
    pub line: usize,
}

/// A reviewer-approved replacement of a literal by a translation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedChange {
    pub id: String,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub params: Vec<String>,
    pub locations: Vec<ChangeLocation>,
    /// Literal as written in the source, when `value` has been parameterized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
}

impl ApprovedChange {
    /// Text searched for on the target lines
    pub fn needle(&self) -> &str {
        self.original.as_deref().unwrap_or(&self.value)
    }

    /// Parameter names without their leading colon, restricted to valid PHP variable names
    pub fn param_names(&self) -> Vec<&str> {
        self.params
            .iter()
            .map(|p| p.trim_start_matches(':'))
            .filter(|name| {
                let mut chars = name.chars();
                chars
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            })
            .collect()
    }

    /// Each parameter name with the PHP expression passed for it.
    ///
    /// A parameter that stands in for an echo in the original text keeps that echo's
    /// expression; any other `name` is bound to `$name`.
    pub fn param_bindings(&self) -> Vec<(&str, String)> {
        let echoes = echo_bindings(self.needle());
        self.param_names()
            .into_iter()
            .map(|name| {
                let expression = echoes
                    .iter()
                    .find(|b| b.name == name)
                    .map_or_else(|| format!("${}", name), |b| b.expression.clone());
                (name, expression)
            })
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(RetrofitError::InvalidChanges(format!(
                "change '{}' has an empty key",
                self.id
            )));
        }
        if self.key.contains(['\'', '"', '\\']) || self.key.chars().any(char::is_whitespace) {
            return Err(RetrofitError::InvalidChanges(format!(
                "change '{}' has key '{}' with quotes, backslashes or whitespace",
                self.id, self.key
            )));
        }
        if self.needle().trim().is_empty() {
            return Err(RetrofitError::InvalidChanges(format!(
                "change '{}' has nothing to search for",
                self.id
            )));
        }
        if let Some(location) = self.locations.iter().find(|l| l.line == 0) {
            return Err(RetrofitError::InvalidChanges(format!(
                "change '{}' targets line 0 of {}",
                self.id,
                location.file.display()
            )));
        }
        Ok(())
    }

    /// Parse and validate a batch exchanged as JSON
    pub fn from_json(json: &str) -> Result<Vec<Self>> {
        let changes: Vec<Self> =
            serde_json::from_str(json).map_err(|e| RetrofitError::InvalidChanges(e.to_string()))?;
        for change in &changes {
            change.validate()?;
        }
        Ok(changes)
    }

    pub fn load(path: &Path) -> Result<Vec<Self>> {
        if !path.is_file() {
            return Err(RetrofitError::file_not_found(path));
        }
        Self::from_json(&fs::read_to_string(path)?)
    }
}

impl From<&KeyedCandidate> for ApprovedChange {
    fn from(keyed: &KeyedCandidate) -> Self {
        let text = &keyed.candidate.text;
        Self {
            id: keyed.id.clone(),
            key: keyed.key.clone(),
            value: keyed.value.clone(),
            params: keyed.params.clone(),
            locations: vec![ChangeLocation {
                file: keyed.candidate.file.clone(),
                line: keyed.candidate.line,
            }],
            original: (*text != keyed.value).then(|| text.clone()),
        }
    }
}

/// Outcome of applying changes to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub file: PathBuf,
    pub success: bool,
    pub changes_applied: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Ids of the changes that modified at least one line of this file
    pub applied_ids: Vec<String>,
}

impl FileOutcome {
    pub(crate) fn failed(file: PathBuf, error: &RetrofitError) -> Self {
        Self {
            file,
            success: false,
            changes_applied: 0,
            error: Some(error.to_string()),
            applied_ids: Vec::new(),
        }
    }
}

/// Outcome of a whole batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteResult {
    pub files: Vec<FileOutcome>,
    pub total_changes: usize,
    /// False iff at least one file failed outright
    pub success: bool,
}

impl Default for RewriteResult {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteResult {
    /// An empty batch is a success
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            total_changes: 0,
            success: true,
        }
    }

    pub(crate) fn push(&mut self, outcome: FileOutcome) {
        self.total_changes += outcome.changes_applied;
        self.files.push(outcome);
        self.success = self.files.iter().all(|f| f.success);
    }

    /// Ids of every change applied anywhere, first occurrence order
    pub fn applied_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.files.iter().flat_map(|f| &f.applied_ids) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exchange_format() {
        let json = r#"[{"id": "c1", "key": "auth.buttons.login", "value": "Log In", "params": [],
                       "locations": [{"file": "auth/login", "line": 12}]}]"#;
        let changes = ApprovedChange::from_json(json).unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].needle(), "Log In");
        assert_eq!(changes[0].locations[0].line, 12);
        assert_eq!(changes[0].original, None);
    }

    #[test]
    fn test_params_default_and_names() {
        let json = r#"[{"id": "c2", "key": "home.content.greeting", "value": "Hello :name",
                       "params": [":name", ":bad-name"], "original": "Hello John",
                       "locations": [{"file": "home.blade.php", "line": 1}]}]"#;
        let changes = ApprovedChange::from_json(json).unwrap();
        assert_eq!(changes[0].needle(), "Hello John");
        assert_eq!(changes[0].param_names(), vec!["name"]);

        let echoed = r#"[{"id": "c4", "key": "home.content.welcome", "value": "Hello :name, welcome back",
                       "params": [":name"], "original": "Hello {{ $user->name }}, welcome back",
                       "locations": [{"file": "home.blade.php", "line": 3}]}]"#;
        let changes = ApprovedChange::from_json(echoed).unwrap();
        assert_eq!(changes[0].param_bindings(), vec![("name", "$user->name".to_string())]);

        let no_params = r#"[{"id": "c3", "key": "a.b.c", "value": "Text here", "locations": []}]"#;
        assert!(ApprovedChange::from_json(no_params).unwrap()[0].params.is_empty());
    }

    #[test]
    fn test_invalid_batches() {
        let missing_key = r#"[{"id": "c1", "value": "x", "locations": []}]"#;
        assert!(matches!(
            ApprovedChange::from_json(missing_key),
            Err(RetrofitError::InvalidChanges(_))
        ));

        let quoted_key = r#"[{"id": "c1", "key": "a.b'c", "value": "Hi there", "locations": []}]"#;
        assert!(ApprovedChange::from_json(quoted_key).is_err());

        let line_zero = r#"[{"id": "c1", "key": "a.b", "value": "Hi there",
                            "locations": [{"file": "x.php", "line": 0}]}]"#;
        assert!(ApprovedChange::from_json(line_zero).is_err());
    }

    #[test]
    fn test_result_success_and_ids() {
        let mut result = RewriteResult::new();
        assert!(result.success);
        result.push(FileOutcome {
            file: "a.php".into(),
            success: true,
            changes_applied: 2,
            error: None,
            applied_ids: vec!["x".into(), "y".into()],
        });
        result.push(FileOutcome {
            file: "b.php".into(),
            success: true,
            changes_applied: 1,
            error: None,
            applied_ids: vec!["x".into()],
        });
        assert!(result.success);
        assert_eq!(result.total_changes, 3);
        assert_eq!(result.applied_ids(), vec!["x".to_string(), "y".to_string()]);

        result.push(FileOutcome::failed("c.php".into(), &RetrofitError::file_not_found("c.php")));
        assert!(!result.success);
    }
}
