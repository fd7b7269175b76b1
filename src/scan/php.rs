use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::config::patterns::{
    contains_non_translatable_call, contains_translation_call, is_technical_string,
    is_validation_rule_list, LABEL_ARRAY_KEYS, USER_FACING_METHODS,
};

use super::candidate::{
    Candidate, CandidateMetadata, ElementType, FileScan, FileType, SkipReason, SkippedString,
    Verdict,
};
use super::context::FileContext;
use super::dialect::{has_extension, DialectScanner};
use super::lexer::{char_len, preceding, quoted_literals, QuotedLiteral};

/// Bytes before a literal searched for an existing translation call
const TRANSLATION_WINDOW: usize = 30;
/// Bytes before a literal searched when classifying it
const CLASSIFY_WINDOW: usize = 50;

static HEREDOC_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<<<\s*['"]?([A-Za-z_][A-Za-z0-9_]*)['"]?\s*$"#).expect("heredoc pattern")
});

static FUNCTION_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bfunction\s+&?([A-Za-z_][A-Za-z0-9_]*)\s*\(").expect("function pattern")
});

static USER_METHOD_CALL: Lazy<Regex> = Lazy::new(|| {
    let names = USER_FACING_METHODS.join("|");
    Regex::new(&format!(r"(?:->|::)?\b({})\s*\(", names)).expect("user method pattern")
});

/// `'message' => ` array key or `message: ` named argument
static MESSAGE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:['"]message['"]\s*=>|(?:^|[(,\s])message\s*:)\s*$"#).expect("message key pattern")
});

static LABEL_KEY: Lazy<Regex> = Lazy::new(|| {
    let keys = LABEL_ARRAY_KEYS.join("|");
    Regex::new(&format!(r#"['"](?:{})['"]\s*=>\s*$"#, keys)).expect("label key pattern")
});

static ARROW_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"=>\s*$").expect("arrow pattern"));

static EXCEPTION_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\bnew\s+\\?(?:[A-Za-z_][A-Za-z0-9_]*\\)*[A-Za-z_]*(?:Exception|Error)\s*\(|\bthrow\s+new\b|\babort(?:_if|_unless)?\s*\()",
    )
    .expect("exception pattern")
});

/// Scanner for plain PHP files (classes, controllers, config-free code)
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpScanner;

impl PhpScanner {
    pub fn new() -> Self {
        Self
    }
}

impl DialectScanner for PhpScanner {
    fn extensions(&self) -> &'static [&'static str] {
        &["php"]
    }

    fn file_type(&self) -> FileType {
        FileType::Php
    }

    fn can_handle(&self, path: &Path, _content: &str) -> bool {
        has_extension(path, self.extensions()) && !has_extension(path, &["blade.php"])
    }

    fn scan_file(&self, path: &Path, content: &str) -> FileScan {
        let context = FileContext::detect(path, content);
        let mut state = LineState::default();
        let mut scan = FileScan::default();

        for (idx, line) in content.lines().enumerate() {
            if state.skip_line(line) {
                continue;
            }

            for literal in quoted_literals(line) {
                let verdict = classify_literal(line, &literal, state.method.as_deref(), context);
                match verdict {
                    Verdict::Keep(element_type) => scan.candidates.push(Candidate {
                        file: path.to_path_buf(),
                        line: idx + 1,
                        column: literal.start,
                        text: literal.text.to_string(),
                        context: line.trim().to_string(),
                        element_type,
                        file_type: FileType::Php,
                        metadata: CandidateMetadata {
                            quote: Some(literal.quote),
                            in_attribute: false,
                            attribute: None,
                            method: state.method.clone(),
                            file_context: Some(context),
                        },
                    }),
                    Verdict::Skip(reason) => scan.skipped.push(SkippedString {
                        file: path.to_path_buf(),
                        text: literal.text.to_string(),
                        reason,
                        line: idx + 1,
                    }),
                    Verdict::Drop => {}
                }
            }
        }

        scan
    }
}

/// Forward-only state for one file: comments, heredocs and the enclosing method
#[derive(Debug, Default)]
struct LineState {
    in_block_comment: bool,
    heredoc: Option<String>,
    method: Option<String>,
}

impl LineState {
    /// Advance over `line`, returning true when none of its literals may be scanned
    fn skip_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();

        if let Some(terminator) = &self.heredoc {
            let closes = trimmed.strip_prefix(terminator.as_str()).is_some_and(|rest| {
                !rest.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_')
            });
            if closes {
                self.heredoc = None;
            }
            return true;
        }

        if self.in_block_comment {
            if trimmed.contains("*/") {
                self.in_block_comment = false;
            }
            return true;
        }

        if let Some(rest) = trimmed.strip_prefix("/*") {
            if !rest.contains("*/") {
                self.in_block_comment = true;
            }
            return true;
        }

        let hash_comment = trimmed.starts_with('#') && !trimmed.starts_with("#[");
        if trimmed.starts_with("//") || hash_comment || trimmed.starts_with('*') {
            return true;
        }

        if trimmed.starts_with("use ") || trimmed.starts_with("namespace ") {
            return true;
        }

        if let Some(caps) = HEREDOC_START.captures(line) {
            self.heredoc = Some(caps[1].to_string());
            return true;
        }

        if let Some(caps) = FUNCTION_DEF.captures(line) {
            self.method = Some(caps[1].to_string());
        }

        false
    }
}

/// Decide whether a literal on a PHP line is kept, skipped with a reason, or dropped.
///
/// Guards run in a fixed order; the first one that fires decides.
pub fn classify_literal(
    line: &str,
    literal: &QuotedLiteral<'_>,
    method: Option<&str>,
    context: FileContext,
) -> Verdict {
    let text = literal.text.trim();

    if char_len(text) < 3 {
        return Verdict::Skip(SkipReason::TooShort);
    }
    if is_technical_string(text) {
        return Verdict::Skip(SkipReason::Technical);
    }
    if is_validation_rule_list(text) {
        return Verdict::Skip(SkipReason::ValidationRule);
    }
    if contains_translation_call(preceding(line, literal.start, TRANSLATION_WINDOW)) {
        return Verdict::Skip(SkipReason::AlreadyTranslated);
    }
    if contains_non_translatable_call(line) {
        return Verdict::Skip(SkipReason::NonTranslatableCall);
    }

    let prefix = preceding(line, literal.start, CLASSIFY_WINDOW);

    if let Some(name) = open_user_method(prefix) {
        return Verdict::Keep(ElementType::Method(name.to_string()));
    }
    if MESSAGE_KEY.is_match(prefix) || (method == Some("messages") && ARROW_END.is_match(prefix)) {
        return Verdict::Keep(ElementType::ValidationMessage);
    }
    if LABEL_KEY.is_match(prefix) {
        return Verdict::Keep(ElementType::ArrayLabel);
    }
    if is_open_call(prefix, &EXCEPTION_CALL) {
        return Verdict::Keep(ElementType::ExceptionMessage);
    }
    if context.is_user_facing() {
        return Verdict::Keep(ElementType::UserFacingString);
    }

    Verdict::Drop
}

/// Name of the innermost user-facing method call still open at the end of `prefix`
fn open_user_method(prefix: &str) -> Option<&str> {
    USER_METHOD_CALL
        .captures_iter(prefix)
        .filter(|caps| caps.get(0).is_some_and(|m| !prefix[m.end()..].contains(')')))
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Is there a match of `re` in `prefix` whose call has not been closed yet
fn is_open_call(prefix: &str, re: &Regex) -> bool {
    re.find_iter(prefix)
        .any(|m| !prefix[m.end()..].contains(')'))
}
