use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use xxhash_rust::xxh3::xxh3_64;

use super::context::FileContext;

/// Source dialect a candidate was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Plain PHP script
    Php,
    /// Blade template mixing HTML and embedded PHP expressions
    Blade,
    /// Volt single-file component: a PHP class segment followed by a Blade segment
    Volt,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Php => "php",
            FileType::Blade => "blade",
            FileType::Volt => "volt",
        }
    }

    /// Templates and mixed files render their text directly
    pub fn is_template(&self) -> bool {
        matches!(self, FileType::Blade | FileType::Volt)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a candidate was found, coarse enough to drive key generation and scoring
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementType {
    Heading(u8),
    Button,
    Label,
    Link,
    Paragraph,
    Span,
    TableCell,
    ListItem,
    Option,
    HtmlText,
    PlaceholderAttribute,
    TitleAttribute,
    AltAttribute,
    AriaLabelAttribute,
    AriaDescriptionAttribute,
    LabelAttribute,
    ValidationMessage,
    ExceptionMessage,
    ArrayLabel,
    UserFacingString,
    /// Literal embedded in a template expression or directive
    String,
    /// Argument of a user-facing method call such as `->with()` or `flash()`
    Method(String),
}

impl ElementType {
    /// Stable string tag, also the serialized form
    pub fn tag(&self) -> String {
        match self {
            ElementType::Heading(level) => format!("h{}", level),
            ElementType::Method(name) => format!("method_{}", name),
            other => other.simple_tag().to_string(),
        }
    }

    fn simple_tag(&self) -> &'static str {
        match self {
            ElementType::Button => "button",
            ElementType::Label => "label",
            ElementType::Link => "link",
            ElementType::Paragraph => "paragraph",
            ElementType::Span => "span",
            ElementType::TableCell => "table_cell",
            ElementType::ListItem => "list_item",
            ElementType::Option => "option",
            ElementType::HtmlText => "html_text",
            ElementType::PlaceholderAttribute => "placeholder_attribute",
            ElementType::TitleAttribute => "title_attribute",
            ElementType::AltAttribute => "alt_attribute",
            ElementType::AriaLabelAttribute => "aria_label_attribute",
            ElementType::AriaDescriptionAttribute => "aria_description_attribute",
            ElementType::LabelAttribute => "label_attribute",
            ElementType::ValidationMessage => "validation_message",
            ElementType::ExceptionMessage => "exception_message",
            ElementType::ArrayLabel => "array_label",
            ElementType::UserFacingString => "user_facing_string",
            ElementType::String => "string",
            ElementType::Heading(_) | ElementType::Method(_) => "",
        }
    }

    /// Parse a tag produced by [`ElementType::tag`]
    pub fn from_tag(tag: &str) -> Option<Self> {
        if let Some(name) = tag.strip_prefix("method_") {
            return (!name.is_empty()).then(|| ElementType::Method(name.to_string()));
        }
        if let Some(level) = tag.strip_prefix('h').and_then(|l| l.parse::<u8>().ok()) {
            return (1..=6).contains(&level).then_some(ElementType::Heading(level));
        }
        let element = match tag {
            "button" => ElementType::Button,
            "label" => ElementType::Label,
            "link" => ElementType::Link,
            "paragraph" => ElementType::Paragraph,
            "span" => ElementType::Span,
            "table_cell" => ElementType::TableCell,
            "list_item" => ElementType::ListItem,
            "option" => ElementType::Option,
            "html_text" => ElementType::HtmlText,
            "placeholder_attribute" => ElementType::PlaceholderAttribute,
            "title_attribute" => ElementType::TitleAttribute,
            "alt_attribute" => ElementType::AltAttribute,
            "aria_label_attribute" => ElementType::AriaLabelAttribute,
            "aria_description_attribute" => ElementType::AriaDescriptionAttribute,
            "label_attribute" => ElementType::LabelAttribute,
            "validation_message" => ElementType::ValidationMessage,
            "exception_message" => ElementType::ExceptionMessage,
            "array_label" => ElementType::ArrayLabel,
            "user_facing_string" => ElementType::UserFacingString,
            "string" => ElementType::String,
            _ => return None,
        };
        Some(element)
    }

    /// Element type for a whitelisted attribute name
    pub fn for_attribute(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "placeholder" => Some(ElementType::PlaceholderAttribute),
            "title" => Some(ElementType::TitleAttribute),
            "alt" => Some(ElementType::AltAttribute),
            "aria-label" => Some(ElementType::AriaLabelAttribute),
            "aria-description" => Some(ElementType::AriaDescriptionAttribute),
            "label" => Some(ElementType::LabelAttribute),
            _ => None,
        }
    }

    /// Element type for the nearest enclosing HTML tag
    pub fn for_tag(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                ElementType::Heading(tag.as_bytes()[1] - b'0')
            }
            "button" | "x-button" | "x-primary-button" | "x-secondary-button"
            | "x-danger-button" => ElementType::Button,
            "label" | "x-label" | "x-input-label" => ElementType::Label,
            "a" | "x-nav-link" | "x-dropdown-link" => ElementType::Link,
            "p" => ElementType::Paragraph,
            "span" => ElementType::Span,
            "td" | "th" => ElementType::TableCell,
            "li" => ElementType::ListItem,
            "option" => ElementType::Option,
            _ => ElementType::HtmlText,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl From<ElementType> for String {
    fn from(element: ElementType) -> Self {
        element.tag()
    }
}

impl TryFrom<String> for ElementType {
    type Error = String;

    fn try_from(tag: String) -> std::result::Result<Self, Self::Error> {
        ElementType::from_tag(&tag).ok_or_else(|| format!("unknown element type '{}'", tag))
    }
}

/// Scanner-specific details attached to a candidate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMetadata {
    /// Quote character around the literal, if it was quoted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<char>,
    /// Whether the text is an attribute value
    pub in_attribute: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    /// Name of the enclosing PHP method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_context: Option<FileContext>,
}

/// A located string literal judged possibly user-facing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub file: PathBuf,
    /// Line number (1-indexed)
    pub line: usize,
    /// Byte offset within the line
    pub column: usize,
    pub text: String,
    /// The trimmed source line
    pub context: String,
    pub element_type: ElementType,
    pub file_type: FileType,
    pub metadata: CandidateMetadata,
}

impl Candidate {
    /// Identity used for deduplication: hash of (file, line, text)
    pub fn id(&self) -> u64 {
        let mut buf = Vec::with_capacity(self.text.len() + 64);
        buf.extend_from_slice(self.file.to_string_lossy().as_bytes());
        buf.push(0);
        buf.extend_from_slice(self.line.to_string().as_bytes());
        buf.push(0);
        buf.extend_from_slice(self.text.as_bytes());
        xxh3_64(&buf)
    }

    /// Hex form of [`Candidate::id`], used when exchanging candidates
    pub fn id_hex(&self) -> String {
        format!("{:016x}", self.id())
    }
}

/// Why a literal was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooShort,
    Technical,
    ValidationRule,
    AlreadyTranslated,
    NonTranslatableCall,
    TemplateVocabulary,
    Interpolated,
    NoLetters,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::TooShort => "shorter than 3 characters",
            SkipReason::Technical => "looks like an identifier, path, number or format",
            SkipReason::ValidationRule => "validation rule list",
            SkipReason::AlreadyTranslated => "already passed to a translation call",
            SkipReason::NonTranslatableCall => "argument of a non-translatable call",
            SkipReason::TemplateVocabulary => "template directive, icon or view reference",
            SkipReason::Interpolated => "contains interpolation or directive syntax",
            SkipReason::NoLetters => "contains no letters",
        };
        f.write_str(reason)
    }
}

/// A literal that was looked at and rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedString {
    pub file: PathBuf,
    pub text: String,
    pub reason: SkipReason,
    /// Line number (1-indexed)
    pub line: usize,
}

/// Outcome of the keep / skip / drop decision table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Keep(ElementType),
    Skip(SkipReason),
    /// Rejected without a record
    Drop,
}

/// Results of scanning a single file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<SkippedString>,
}

impl FileScan {
    /// Shift every line number by `offset`, for segments of a larger file
    pub fn rebase(&mut self, offset: usize) {
        for candidate in &mut self.candidates {
            candidate.line += offset;
        }
        for skipped in &mut self.skipped {
            skipped.line += offset;
        }
    }

    pub fn retag(&mut self, file_type: FileType) {
        for candidate in &mut self.candidates {
            candidate.file_type = file_type;
        }
    }

    pub fn extend(&mut self, other: FileScan) {
        self.candidates.extend(other.candidates);
        self.skipped.extend(other.skipped);
    }
}

/// Aggregated result of a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<SkippedString>,
    /// Files handed to a dialect scanner
    pub total_files: usize,
    /// candidates + skipped
    pub total_strings: usize,
    /// Scanned files per file type
    pub by_file_type: BTreeMap<FileType, usize>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty() && self.skipped.is_empty()
    }

    pub(crate) fn record_file(&mut self, file_type: FileType, scan: FileScan) {
        self.total_files += 1;
        *self.by_file_type.entry(file_type).or_insert(0) += 1;
        self.candidates.extend(scan.candidates);
        self.skipped.extend(scan.skipped);
    }

    /// Drop candidates sharing an identity with an earlier one and repeated skips, then recount
    pub(crate) fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.candidates.retain(|c| seen.insert(c.id()));
        let mut seen = std::collections::HashSet::new();
        self.skipped
            .retain(|s| seen.insert((s.file.clone(), s.line, s.text.clone(), s.reason)));
        self.total_strings = self.candidates.len() + self.skipped.len();
    }
}
