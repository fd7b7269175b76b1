use std::path::Path;

use crate::config::patterns::{
    contained_action_verb, normalize_words, ACTION_VERBS, FORM_LABELS, STRUCTURAL_PREFIXES,
};
use crate::scan::candidate::{Candidate, ElementType};

/// Longest description slug
const DESCRIPTION_MAX: usize = 50;
/// Longest slug after a message-kind prefix
const MESSAGE_SLUG_MAX: usize = 40;
/// Texts up to this many words may match an action verb by prefix
const VERB_PREFIX_WORDS: usize = 3;
/// Action verbs matched on the whole text only
const EXACT_ONLY_VERBS: &[&str] = &["yes", "no", "ok"];

/// Keyword classes of message-like texts, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Confirm,
    Error,
    Warning,
    Success,
    Info,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Confirm => "confirm",
            MessageKind::Error => "error",
            MessageKind::Warning => "warning",
            MessageKind::Success => "success",
            MessageKind::Info => "info",
        }
    }

    fn from_method(name: &str) -> Option<Self> {
        match name {
            "success" => Some(MessageKind::Success),
            "error" => Some(MessageKind::Error),
            "warning" => Some(MessageKind::Warning),
            "info" => Some(MessageKind::Info),
            _ => None,
        }
    }
}

const MESSAGE_KEYWORDS: &[(MessageKind, &[&str])] = &[
    (
        MessageKind::Confirm,
        &["are you sure", "confirm", "do you want", "do you really"],
    ),
    (
        MessageKind::Error,
        &[
            "error", "failed", "fail", "unable", "cannot", "can't", "could not", "invalid",
            "not found", "denied", "wrong", "problem", "unauthorized", "forbidden",
        ],
    ),
    (
        MessageKind::Warning,
        &["warning", "caution", "careful", "attention", "expire", "expiring", "limit"],
    ),
    (
        MessageKind::Success,
        &[
            "success", "successfully", "saved", "updated", "created", "deleted", "removed",
            "added", "sent", "completed", "thank", "welcome",
        ],
    ),
    (MessageKind::Info, &["info", "note", "notice", "please", "remember"]),
];

/// Classify a message text by keyword, confirm winning over error over warning and so on
pub fn classify_message(text: &str) -> Option<MessageKind> {
    let padded = format!(" {} ", text.to_lowercase());
    MESSAGE_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords.iter().any(|kw| {
                padded.match_indices(kw).any(|(pos, _)| {
                    let before = padded[..pos].chars().next_back();
                    let after = padded[pos + kw.len()..].chars().next();
                    !before.is_some_and(char::is_alphanumeric)
                        && !after.is_some_and(char::is_alphanumeric)
                })
            })
        })
        .map(|(kind, _)| *kind)
}

/// Semantic key `section.type.description` for a candidate
pub fn generate_key(candidate: &Candidate) -> String {
    let section = section_for(&candidate.file);
    let bucket = type_bucket(&candidate.element_type, &candidate.text);
    let description = description_for(&candidate.element_type, &candidate.text);
    sanitize_key(&format!("{}.{}.{}", section, bucket, description))
}

/// Key section derived from the file path
pub fn section_for(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");

    if let Some(rest) = after(&path, "resources/views/livewire/") {
        return prefixed("livewire", rest);
    }
    if let Some(rest) = after(&path, "resources/views/components/") {
        return prefixed("components", rest);
    }
    if let Some(rest) = after(&path, "resources/views/") {
        return dotted(rest, |s| s);
    }
    if let Some(rest) = after(&path, "app/Http/Livewire/").or_else(|| after(&path, "app/Livewire/")) {
        return prefixed("livewire", rest);
    }
    if let Some(rest) = after(&path, "app/View/Components/") {
        return prefixed("components", rest);
    }
    if let Some(rest) = after(&path, "app/Http/Controllers/") {
        return dotted(rest, |s| s.strip_suffix("Controller").filter(|b| !b.is_empty()).unwrap_or(s));
    }
    if let Some(rest) = after(&path, "app/") {
        return dotted(rest, |s| s);
    }

    let name = path.rsplit('/').next().unwrap_or(&path);
    let section = kebab_case(strip_extension(name));
    if section.is_empty() {
        "app".to_string()
    } else {
        section
    }
}

/// Part of `path` after the last occurrence of `marker` as a whole segment run
fn after<'a>(path: &'a str, marker: &str) -> Option<&'a str> {
    path.match_indices(marker)
        .filter(|(pos, _)| *pos == 0 || path.as_bytes()[pos - 1] == b'/')
        .last()
        .map(|(pos, _)| &path[pos + marker.len()..])
}

fn strip_extension(name: &str) -> &str {
    name.strip_suffix(".blade.php")
        .or_else(|| name.strip_suffix(".php"))
        .unwrap_or(name)
}

/// `prefix.<last segment>`
fn prefixed(prefix: &str, rest: &str) -> String {
    let last = rest.rsplit('/').next().unwrap_or(rest);
    let last = kebab_case(strip_extension(last));
    if last.is_empty() {
        prefix.to_string()
    } else {
        format!("{}.{}", prefix, last)
    }
}

/// Dotted, kebab-cased path without structural segments, capped to its last two segments
fn dotted(rest: &str, last_segment: impl Fn(&str) -> &str) -> String {
    let raw: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    let count = raw.len();
    let segments: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            if i + 1 == count {
                kebab_case(last_segment(strip_extension(s)))
            } else {
                kebab_case(s)
            }
        })
        .filter(|s| !s.is_empty() && !STRUCTURAL_PREFIXES.contains(&s.as_str()))
        .collect();

    let start = segments.len().saturating_sub(2);
    let section = segments[start..].join(".");
    if section.is_empty() {
        "app".to_string()
    } else {
        section
    }
}

/// `ProfileController` → `profile-controller`, `update_profile` → `update-profile`
pub fn kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1);
            let boundary = prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
                || (prev.is_some_and(char::is_uppercase) && next.is_some_and(|n| n.is_lowercase()));
            if boundary {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else if c.is_alphanumeric() {
            out.push(c);
        } else {
            out.push('-');
        }
    }

    collapse_separators(&out)
}

/// Type bucket for an element type; message buckets carry a kind sub-bucket
pub fn type_bucket(element: &ElementType, text: &str) -> String {
    let bucket = match element {
        ElementType::Heading(_)
        | ElementType::Paragraph
        | ElementType::Span
        | ElementType::HtmlText
        | ElementType::String => "content",
        ElementType::Button => "buttons",
        ElementType::Label | ElementType::LabelAttribute | ElementType::ArrayLabel => "labels",
        ElementType::PlaceholderAttribute => "placeholders",
        ElementType::TitleAttribute => "tooltips",
        ElementType::AltAttribute => "images",
        ElementType::AriaLabelAttribute | ElementType::AriaDescriptionAttribute => {
            "accessibility"
        }
        ElementType::Link => "links",
        ElementType::ListItem => "lists",
        ElementType::TableCell => "tables",
        ElementType::Option => "options",
        ElementType::ValidationMessage => "validation",
        ElementType::ExceptionMessage => "errors",
        ElementType::UserFacingString => "misc",
        ElementType::Method(name) => match name.as_str() {
            "addError" | "withErrors" => "validation",
            "dispatch" => "events",
            "notify" => "notifications",
            other => {
                let kind = MessageKind::from_method(other)
                    .or_else(|| match classify_message(text) {
                        Some(MessageKind::Confirm) | None => None,
                        kind => kind,
                    })
                    .unwrap_or(MessageKind::Info);
                return format!("messages.{}", kind.as_str());
            }
        },
    };
    bucket.to_string()
}

fn is_message_like(element: &ElementType) -> bool {
    matches!(
        element,
        ElementType::ValidationMessage | ElementType::ExceptionMessage | ElementType::Method(_)
    )
}

/// Description slug for the last key segment
pub fn description_for(element: &ElementType, text: &str) -> String {
    let normalized = normalize_words(text);
    if normalized.is_empty() {
        return "text".to_string();
    }

    if normalized.split(' ').count() <= VERB_PREFIX_WORDS {
        let verb = ACTION_VERBS.iter().find(|(phrase, _)| {
            normalized == *phrase
                || (!EXACT_ONLY_VERBS.contains(phrase)
                    && normalized.starts_with(&format!("{} ", phrase)))
        });
        if let Some((_, slug)) = verb {
            return slug.to_string();
        }
    }

    if FORM_LABELS.contains(&normalized.as_str()) {
        return slugify(&normalized, DESCRIPTION_MAX);
    }

    if is_message_like(element) {
        let kind = classify_message(text).or_else(|| match element {
            ElementType::Method(name) => MessageKind::from_method(name),
            _ => None,
        });
        let slug = slugify(&normalized, MESSAGE_SLUG_MAX);
        return match kind {
            Some(kind) => format!("{}-{}", kind.as_str(), slug),
            None => slug,
        };
    }

    if *element == ElementType::Button {
        if let Some(verb) = contained_action_verb(text) {
            return verb.to_string();
        }
    }

    let slug = slugify(&normalized, DESCRIPTION_MAX);
    if slug.is_empty() {
        "text".to_string()
    } else {
        slug
    }
}

/// Dash-joined words, cut at a word boundary so the result is at most `max` characters
pub fn slugify(text: &str, max: usize) -> String {
    let mut slug = String::new();
    for word in normalize_words(text).split(' ').filter(|w| !w.is_empty()) {
        let extra = if slug.is_empty() { 0 } else { 1 } + word.chars().count();
        if slug.chars().count() + extra > max {
            if slug.is_empty() {
                slug = word.chars().take(max).collect();
            }
            break;
        }
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(word);
    }
    slug
}

/// Collapse repeated separators, trim them per segment and drop empty segments
pub fn sanitize_key(key: &str) -> String {
    key.split('.')
        .map(collapse_separators)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

fn collapse_separators(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut last_sep: Option<char> = None;
    for c in segment.chars() {
        if c == '-' || c == '_' {
            if last_sep.is_none() {
                out.push(c);
            }
            last_sep = Some(c);
        } else {
            out.push(c);
            last_sep = None;
        }
    }
    out.trim_matches(|c| c == '-' || c == '_').to_string()
}
