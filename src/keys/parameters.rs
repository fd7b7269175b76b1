use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub const NAME: &str = ":name";
pub const COUNT: &str = ":count";
pub const EMAIL: &str = ":email";
pub const DATE: &str = ":date";
pub const AMOUNT: &str = ":amount";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\w:/])(:[A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern"));

static GREETING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:hello|hi|hey|dear|greetings),?\s+([A-Z][\w'-]*)").expect("greeting pattern")
});

static EMAIL_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)+").expect("email pattern"));

static DATE_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{1,2}[/.-]\d{1,2}[/.-]\d{2,4}|\d{4}-\d{2}-\d{2})\b").expect("date pattern")
});

static MONEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[$€£¥]\s?\d[\d,]*(?:\.\d+)?|\b\d[\d,]*(?:\.\d+)?\s?(?:USD|EUR|GBP|JPY|CAD|AUD|CHF)\b|\b(?:USD|EUR|GBP|JPY|CAD|AUD|CHF)\s?\d[\d,]*(?:\.\d+)?)",
    )
    .expect("amount pattern")
});

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").expect("integer pattern"));

static ECHO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*(.*?)\s*\}\}|\{!!\s*(.*?)\s*!!\}").expect("echo pattern")
});

static PROPERTY_CHAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\$[A-Za-z_]\w*(?:\??->[A-Za-z_]\w*)*$").expect("property chain pattern")
});

/// A Blade echo inside a text and the parameter standing in for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoBinding {
    /// Parameter name without its colon
    pub name: String,
    /// PHP expression the echo printed
    pub expression: String,
}

impl EchoBinding {
    pub fn token(&self) -> String {
        format!(":{}", self.name)
    }
}

/// One binding per distinct echoed expression, in order of appearance.
///
/// `$user->name` binds as `name`; anything other than a variable or property chain binds
/// as `value`. A name already taken by another expression gets a numeric suffix.
pub fn echo_bindings(text: &str) -> Vec<EchoBinding> {
    let mut bindings: Vec<EchoBinding> = Vec::new();
    for caps in ECHO.captures_iter(text) {
        let Some(expression) = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str()) else {
            continue;
        };
        if expression.is_empty() || bindings.iter().any(|b| b.expression == expression) {
            continue;
        }
        let base = if PROPERTY_CHAIN.is_match(expression) {
            expression
                .rsplit(['>', '$'])
                .next()
                .unwrap_or("value")
                .to_string()
        } else {
            "value".to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while bindings.iter().any(|b| b.name == name) {
            suffix += 1;
            name = format!("{}{}", base, suffix);
        }
        bindings.push(EchoBinding {
            name,
            expression: expression.to_string(),
        });
    }
    bindings
}

/// Tokens a translation of `text` would need, deduplicated in detection order
pub fn detect_parameters(text: &str) -> Vec<String> {
    let mut params: Vec<String> = Vec::new();
    let mut push = |token: &str| {
        if !params.iter().any(|p| p == token) {
            params.push(token.to_string());
        }
    };

    for binding in echo_bindings(text) {
        push(&binding.token());
    }
    let text = ECHO.replace_all(text, " ");
    let text = text.as_ref();

    for caps in PLACEHOLDER.captures_iter(text) {
        push(&caps[1]);
    }
    if GREETING.is_match(text) {
        push(NAME);
    }
    if INTEGER.is_match(&without_values(text)) {
        push(COUNT);
    }
    if EMAIL_ADDRESS.is_match(text) {
        push(EMAIL);
    }
    if DATE_VALUE.is_match(text) {
        push(DATE);
    }
    if MONEY.is_match(text) {
        push(AMOUNT);
    }

    params
}

/// Replace detected values with their tokens.
///
/// Echoes are substituted first, then email, date, amount, name and count, so the digits of a
/// date or an amount never turn into `:count`.
pub fn apply_parameters(text: &str, params: &[String]) -> String {
    let has = |token: &str| params.iter().any(|p| p == token);
    let mut out = text.to_string();

    for binding in echo_bindings(text) {
        let token = binding.token();
        if !has(&token) {
            continue;
        }
        out = ECHO
            .replace_all(&out, |caps: &Captures<'_>| {
                let expression = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
                if expression == Some(binding.expression.as_str()) {
                    token.clone()
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned();
    }

    if has(EMAIL) {
        out = EMAIL_ADDRESS.replace_all(&out, EMAIL).into_owned();
    }
    if has(DATE) {
        out = DATE_VALUE.replace_all(&out, DATE).into_owned();
    }
    if has(AMOUNT) {
        out = MONEY.replace_all(&out, AMOUNT).into_owned();
    }
    if has(NAME) {
        out = GREETING
            .replace_all(&out, |caps: &Captures<'_>| match (caps.get(0), caps.get(1)) {
                (Some(whole), Some(name)) => {
                    format!("{}{}", &whole.as_str()[..name.start() - whole.start()], NAME)
                }
                _ => caps[0].to_string(),
            })
            .into_owned();
    }
    if has(COUNT) {
        out = INTEGER.replace_all(&out, COUNT).into_owned();
    }

    out
}

/// Text with emails, dates and amounts blanked out
fn without_values(text: &str) -> String {
    let text = EMAIL_ADDRESS.replace_all(text, " ");
    let text = DATE_VALUE.replace_all(&text, " ");
    MONEY.replace_all(&text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_name() {
        assert_eq!(detect_parameters("Hello John"), vec![":name".to_string()]);
        assert_eq!(apply_parameters("Hello John", &[":name".to_string()]), "Hello :name");
    }

    #[test]
    fn test_label_without_values_has_no_parameters() {
        assert!(detect_parameters("Enter your email").is_empty());
        assert!(detect_parameters("Welcome Home").is_empty());
    }

    #[test]
    fn test_existing_placeholders_kept() {
        assert_eq!(
            detect_parameters("Welcome back, :user! You have :items items"),
            vec![":user".to_string(), ":items".to_string()]
        );
        assert!(detect_parameters("Meeting at 12:30").contains(&COUNT.to_string()));
        assert!(!detect_parameters("Visit https://example.com").iter().any(|p| p == ":example"));
    }

    #[test]
    fn test_dates_and_amounts_are_not_counts() {
        let params = detect_parameters("Paid $25.00 on 12/05/2024");
        assert_eq!(params, vec![":date".to_string(), ":amount".to_string()]);
        assert_eq!(apply_parameters("Paid $25.00 on 12/05/2024", &params), "Paid :amount on :date");
    }

    #[test]
    fn test_count_and_email() {
        let text = "Sent 3 invites to admin@example.com";
        let params = detect_parameters(text);
        assert_eq!(params, vec![":count".to_string(), ":email".to_string()]);
        assert_eq!(apply_parameters(text, &params), "Sent :count invites to :email");
    }

    #[test]
    fn test_amount_with_currency_code() {
        let params = detect_parameters("Your balance is 1,200.50 EUR");
        assert_eq!(params, vec![":amount".to_string()]);
        assert_eq!(apply_parameters("Your balance is 1,200.50 EUR", &params), "Your balance is :amount");
    }

    #[test]
    fn test_echoes_become_named_parameters() {
        let text = "Hello {{ $user->name }}, you have {{ $count }} new messages";
        let params = detect_parameters(text);
        assert_eq!(params, vec![":name".to_string(), ":count".to_string()]);
        assert_eq!(apply_parameters(text, &params), "Hello :name, you have :count new messages");
    }

    #[test]
    fn test_echo_bindings_keep_expressions() {
        let bindings = echo_bindings("{{ $team->name }} by {{ $owner->name }} on {!! $post?->published_at !!} ({{ count($items) }})");
        let pairs: Vec<_> = bindings
            .iter()
            .map(|b| (b.name.as_str(), b.expression.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("name", "$team->name"),
                ("name2", "$owner->name"),
                ("published_at", "$post?->published_at"),
                ("value", "count($items)"),
            ]
        );
    }

    #[test]
    fn test_apply_only_listed_tokens() {
        assert_eq!(apply_parameters("Hello John, 3 new", &[":count".to_string()]), "Hello John, :count new");
    }
}
