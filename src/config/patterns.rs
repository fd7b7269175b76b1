//! Heuristic vocabularies shared by the dialect scanners, the key generator
//! and the rewriter. Everything here is immutable process-wide data.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens that mark a literal as already passed to the translation function
pub const TRANSLATION_CALLS: &[&str] = &[
    "__(",
    "trans(",
    "trans_choice(",
    "@lang(",
    "@choice(",
    "Lang::get(",
    "Lang::choice(",
];

/// Methods whose string arguments end up in front of a user
pub const USER_FACING_METHODS: &[&str] = &[
    "flash",
    "success",
    "error",
    "warning",
    "info",
    "notify",
    "dispatch",
    "with",
    "withErrors",
    "toast",
    "alert",
    "addError",
    "message",
];

/// A line containing any of these never carries user-facing text
pub const NON_TRANSLATABLE_CALLS: &[&str] = &[
    // query builder / ORM
    "DB::",
    "->where(",
    "->orWhere(",
    "->whereIn(",
    "->whereNull(",
    "->whereHas(",
    "->orderBy(",
    "->orderByDesc(",
    "->groupBy(",
    "->having(",
    "->select(",
    "->join(",
    "->leftJoin(",
    "->pluck(",
    "->firstWhere(",
    "->hasMany(",
    "->hasOne(",
    "->belongsTo(",
    "->belongsToMany(",
    "->morphTo(",
    "Schema::",
    "$table->",
    // routing
    "Route::",
    "->middleware(",
    "->name(",
    // configuration and environment
    "config(",
    "Config::",
    "env(",
    // logging and debugging
    "Log::",
    "logger(",
    "->log(",
    "error_log(",
    "dd(",
    "dump(",
    "var_dump(",
    // queues, cache, storage, http clients
    "Queue::",
    "->onQueue(",
    "Cache::",
    "cache(",
    "Storage::",
    "Http::",
    "Artisan::",
    "Gate::",
    // console output
    "$this->line(",
    "$this->comment(",
    "$this->table(",
    // string plumbing
    "->format(",
    "date(",
    "json_decode(",
    "preg_match(",
    "preg_replace(",
    "str_replace(",
    "explode(",
    "implode(",
    "->header(",
];

/// Laravel validation rule names, used to recognise `required|email|max:255`
pub const VALIDATION_RULES: &[&str] = &[
    "accepted",
    "active_url",
    "after",
    "after_or_equal",
    "alpha",
    "alpha_dash",
    "alpha_num",
    "array",
    "bail",
    "before",
    "before_or_equal",
    "between",
    "boolean",
    "confirmed",
    "current_password",
    "date",
    "date_equals",
    "date_format",
    "decimal",
    "different",
    "digits",
    "digits_between",
    "dimensions",
    "distinct",
    "email",
    "ends_with",
    "exists",
    "file",
    "filled",
    "gt",
    "gte",
    "image",
    "in",
    "integer",
    "ip",
    "ipv4",
    "ipv6",
    "json",
    "lt",
    "lte",
    "max",
    "mimes",
    "mimetypes",
    "min",
    "multiple_of",
    "not_in",
    "not_regex",
    "nullable",
    "numeric",
    "password",
    "present",
    "prohibited",
    "regex",
    "required",
    "required_if",
    "required_unless",
    "required_with",
    "required_without",
    "same",
    "size",
    "sometimes",
    "starts_with",
    "string",
    "timezone",
    "unique",
    "uploaded",
    "url",
    "uuid",
];

/// HTML attributes whose values are shown to users
pub const TRANSLATABLE_ATTRIBUTES: &[&str] = &[
    "placeholder",
    "title",
    "alt",
    "aria-label",
    "aria-description",
    "label",
];

/// Icon component/class prefixes used in Blade templates
pub const ICON_PREFIXES: &[&str] = &[
    "fa-", "fas ", "far ", "fab ", "bi-", "bi ", "heroicon-", "icon-", "lucide-", "mdi-", "ti-",
];

/// Array keys whose values are labels shown to users (`'label' => 'Name'`)
pub const LABEL_ARRAY_KEYS: &[&str] = &[
    "label",
    "title",
    "description",
    "placeholder",
    "help",
    "hint",
    "heading",
    "subtitle",
    "text",
    "tooltip",
    "caption",
];

/// Action verbs recognised on buttons and short labels, as (phrase, key slug)
pub const ACTION_VERBS: &[(&str, &str)] = &[
    ("log in", "login"),
    ("login", "login"),
    ("log out", "logout"),
    ("logout", "logout"),
    ("sign in", "sign-in"),
    ("sign up", "sign-up"),
    ("sign out", "sign-out"),
    ("save", "save"),
    ("cancel", "cancel"),
    ("delete", "delete"),
    ("edit", "edit"),
    ("update", "update"),
    ("create", "create"),
    ("submit", "submit"),
    ("close", "close"),
    ("confirm", "confirm"),
    ("back", "back"),
    ("next", "next"),
    ("previous", "previous"),
    ("continue", "continue"),
    ("search", "search"),
    ("filter", "filter"),
    ("reset", "reset"),
    ("register", "register"),
    ("add", "add"),
    ("remove", "remove"),
    ("upload", "upload"),
    ("download", "download"),
    ("send", "send"),
    ("view", "view"),
    ("export", "export"),
    ("import", "import"),
    ("apply", "apply"),
    ("refresh", "refresh"),
    ("retry", "retry"),
    ("done", "done"),
    ("finish", "finish"),
    ("start", "start"),
    ("select", "select"),
    ("show", "show"),
    ("hide", "hide"),
    ("copy", "copy"),
    ("share", "share"),
    ("publish", "publish"),
    ("archive", "archive"),
    ("restore", "restore"),
    ("approve", "approve"),
    ("reject", "reject"),
    ("yes", "yes"),
    ("no", "no"),
    ("ok", "ok"),
];

/// Common form labels that get a stable key regardless of context
pub const FORM_LABELS: &[&str] = &[
    "name",
    "full name",
    "first name",
    "last name",
    "email",
    "email address",
    "password",
    "confirm password",
    "current password",
    "new password",
    "username",
    "phone",
    "phone number",
    "address",
    "city",
    "state",
    "country",
    "zip code",
    "postal code",
    "company",
    "website",
    "message",
    "subject",
    "description",
    "title",
    "date",
    "amount",
    "quantity",
    "price",
    "status",
    "role",
    "notes",
    "comments",
    "remember me",
];

/// Path segments that carry no meaning in a key section
pub const STRUCTURAL_PREFIXES: &[&str] = &["app", "http", "controllers", "resources", "views", "src"];

/// Patterns for literals that look like code rather than prose
static TECHNICAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // snake_case / single lowercase identifiers
        r"^[a-z_][a-z0-9_]*$",
        // camelCase
        r"^[a-z][a-z0-9]*(?:[A-Z][a-z0-9]*)+$",
        // PascalCase class names
        r"^[A-Z][a-z0-9]+(?:[A-Z][a-z0-9]+)+$",
        // namespaced classes
        r"^\\?[A-Z][A-Za-z0-9_]*(?:\\[A-Z][A-Za-z0-9_]*)+$",
        // CONSTANT_NAMES
        r"^[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)+$",
        // static / member access
        r"^[\w\\]+(?:::|->)[\w\\]*$",
        // urls, paths, anchors
        r"^(?:https?://|//|/|\./|\.\./|mailto:|tel:|#|www\.)",
        // file names
        r"(?i)^[\w./-]*\.(?:php|js|ts|css|scss|png|jpe?g|gif|svg|html?|json|xml|txt|pdf|csv|ico|webp|md)$",
        // mime types
        r"^(?:application|text|image|audio|video|font|multipart)/[\w.+-]+$",
        // numbers, percentages, times
        r"^[-+]?[\d.,:%\s]*\d[\d.,:%\s]*$",
        // dotted translation keys and view names
        r"^[A-Za-z0-9_-]+(?:\.[A-Za-z0-9_-]+)+$",
        // namespaced view references
        r"^[A-Za-z0-9_-]+::[A-Za-z0-9_.-]+$",
        // PHP date() formats
        r"^[dDjlNSwzWFmMntLoYyaABgGhHisuvIeOPTZcrU]{1,2}(?:[\s:/.,-]+[dDjlNSwzWFmMntLoYyaABgGhHisuvIeOPTZcrU]{1,2})+$",
        // variables and interpolation
        r"^(?:\$[A-Za-z_]|\{\$|\{\{)",
        // email addresses on their own
        r"^[\w.+-]+@[\w-]+\.[\w.-]+$",
        // raw SQL
        r"(?i)^\s*(?:select\s|insert\s+into\s|update\s+\w+\s+set\s|delete\s+from\s)",
        // a lone html tag
        r"^<[^>]+>$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("technical pattern must compile"))
    .collect()
});

/// The subset of the technical patterns that also applies to rendered element text
static NON_PROSE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // urls, paths, anchors
        r"^(?:https?://|//|/|\./|\.\./|mailto:|tel:|#|www\.)\S*$",
        // numbers, percentages, times
        r"^[-+]?[\d.,:%\s]*\d[\d.,:%\s]*$",
        // email addresses on their own
        r"^[\w.+-]+@[\w-]+\.[\w.-]+$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("non-prose pattern must compile"))
    .collect()
});

/// Template-only vocabulary: directive-prefixed tokens and icon names
static TEMPLATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:wire:|x-|@|:)[\w.:-]+$").expect("template token pattern must compile")
});

/// Code-like punctuation lowering the confidence of a candidate
pub static CODE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[{}\[\];<>$\\]|->|=>|::|\(\)").expect("code punctuation pattern must compile")
});

/// Does the literal look like an identifier, class, css, url, number, key or format
pub fn is_technical_string(text: &str) -> bool {
    let text = text.trim();
    TECHNICAL_PATTERNS.iter().any(|re| re.is_match(text)) || is_css_class_list(text)
}

/// Element text that is a url, a number or an email rather than words.
///
/// Lowercase words such as `cancel` are prose between tags, so identifier shapes are not checked.
pub fn is_non_prose_text(text: &str) -> bool {
    let text = text.trim();
    NON_PROSE_PATTERNS.iter().any(|re| re.is_match(text))
}

/// `btn btn-primary`, `text-sm md:flex`: every token lowercase css, one with a dash or colon
fn is_css_class_list(text: &str) -> bool {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return false;
    }
    let all_css = tokens.iter().all(|t| {
        t.chars().all(|c| {
            c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || matches!(c, '-' | '_' | ':' | '/' | '[' | ']' | '.' | '!' | '#' | '%')
        })
    });
    all_css && tokens.iter().any(|t| t.contains('-') || t.contains(':'))
}

/// `required|email|max:255` or `required,string`
pub fn is_validation_rule_list(text: &str) -> bool {
    let text = text.trim();
    if !text.contains('|') && !text.contains(':') && !text.contains(',') {
        return false;
    }
    let segments: Vec<&str> = text
        .split(['|', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return false;
    }
    segments.iter().all(|segment| {
        let rule = segment.split(':').next().unwrap_or(segment);
        VALIDATION_RULES.contains(&rule)
    })
}

/// Does `prefix` contain a call to the translation function
pub fn contains_translation_call(prefix: &str) -> bool {
    TRANSLATION_CALLS.iter().any(|call| prefix.contains(call))
}

/// Does the line call an API whose string arguments are never shown to users
pub fn contains_non_translatable_call(line: &str) -> bool {
    NON_TRANSLATABLE_CALLS.iter().any(|call| contains_call(line, call))
}

/// Occurrence of `call` not glued to a preceding identifier (`dd(` inside `add(`)
fn contains_call(line: &str, call: &str) -> bool {
    let starts_with_word = call
        .as_bytes()
        .first()
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'_');
    if !starts_with_word {
        return line.contains(call);
    }
    line.match_indices(call).any(|(pos, _)| {
        pos == 0 || {
            let prev = line.as_bytes()[pos - 1];
            !(prev.is_ascii_alphanumeric() || prev == b'_' || prev == b'$')
        }
    })
}

/// Directive-prefixed tokens, icon names and view references inside templates
pub fn is_template_vocabulary(text: &str) -> bool {
    let text = text.trim();
    if TEMPLATE_TOKEN.is_match(text) {
        return true;
    }
    let lower = text.to_lowercase();
    ICON_PREFIXES.iter().any(|prefix| lower.starts_with(prefix)) && !text.contains(". ")
}

/// Action verb slug for a phrase occurring as whole words in `text`
pub fn contained_action_verb(text: &str) -> Option<&'static str> {
    let normalized = normalize_words(text);
    let padded = format!(" {} ", normalized);
    ACTION_VERBS
        .iter()
        .find(|(phrase, _)| padded.contains(&format!(" {} ", phrase)))
        .map(|(_, slug)| *slug)
}

/// Lowercase, punctuation replaced by spaces, whitespace collapsed
pub fn normalize_words(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert!(!TECHNICAL_PATTERNS.is_empty());
        assert!(CODE_PUNCTUATION.is_match("$user->name"));
    }

    #[test]
    fn test_technical_strings() {
        for text in [
            "user_id",
            "createdAt",
            "UserController",
            "App\\Models\\User",
            "MAX_RETRIES",
            "btn btn-primary",
            "text-sm md:flex",
            "https://example.com",
            "/dashboard",
            "logo.png",
            "application/json",
            "42",
            "12:30",
            "auth.failed",
            "mail::message",
            "Y-m-d",
            "H:i:s",
            "$value",
            "admin@example.com",
            "SELECT * FROM users",
        ] {
            assert!(is_technical_string(text), "expected technical: {}", text);
        }
    }

    #[test]
    fn test_prose_is_not_technical() {
        for text in [
            "Welcome Home",
            "Profile updated successfully",
            "Enter your email",
            "Save",
            "Are you sure?",
            "Done.",
        ] {
            assert!(!is_technical_string(text), "expected prose: {}", text);
        }
    }

    #[test]
    fn test_validation_rule_lists() {
        assert!(is_validation_rule_list("required|email|max:255"));
        assert!(is_validation_rule_list("nullable|string"));
        assert!(is_validation_rule_list("required,string"));
        assert!(is_validation_rule_list("min:8"));
        assert!(!is_validation_rule_list("Email"));
        assert!(!is_validation_rule_list("required|pizza"));
        assert!(!is_validation_rule_list("Hello, world"));
    }

    #[test]
    fn test_translation_call_detection() {
        assert!(contains_translation_call("{{ __("));
        assert!(contains_translation_call("@lang("));
        assert!(!contains_translation_call("->with("));
    }

    #[test]
    fn test_non_translatable_calls_respect_word_boundaries() {
        assert!(contains_non_translatable_call("Log::info('User logged in');"));
        assert!(contains_non_translatable_call("$d = date('Y');"));
        assert!(contains_non_translatable_call("dd('here');"));
        assert!(!contains_non_translatable_call("$user->update(['bio' => 'Hi there']);"));
        assert!(!contains_non_translatable_call("$cart->add('Item added to cart');"));
    }

    #[test]
    fn test_template_vocabulary() {
        assert!(is_template_vocabulary("wire:click"));
        assert!(is_template_vocabulary("fa-user"));
        assert!(is_template_vocabulary("heroicon-o-user"));
        assert!(!is_template_vocabulary("Dashboard"));
    }

    #[test]
    fn test_non_prose_text() {
        for text in ["https://example.com/docs", "/dashboard", "12:30", "99.5%", "help@example.com"] {
            assert!(is_non_prose_text(text), "expected non-prose: {}", text);
        }
        for text in ["cancel", "home", "createdAt", "Read more", "/ Back"] {
            assert!(!is_non_prose_text(text), "expected prose: {}", text);
        }
    }

    #[test]
    fn test_contained_action_verb() {
        assert_eq!(contained_action_verb("Click to save"), Some("save"));
        assert_eq!(contained_action_verb("Log In"), Some("login"));
        assert_eq!(contained_action_verb("Savings account"), None);
    }
}
