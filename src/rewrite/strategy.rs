use regex::Regex;

use crate::config::patterns::TRANSLATABLE_ATTRIBUTES;
use crate::scan::lexer::quoted_literals;

use super::change::ApprovedChange;

/// Which replacement matched a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Text between `>` and `<`
    ElementText,
    /// Value of a translatable attribute
    Attribute,
    /// A standalone quoted literal
    Literal,
}

/// `__('key')` or `__('key', ['name' => $name])`
pub fn translation_call(key: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return format!("__('{}')", key);
    }
    let map = params
        .iter()
        .map(|(name, expression)| format!("'{}' => {}", name, expression))
        .collect::<Vec<_>>()
        .join(", ");
    format!("__('{}', [{}])", key, map)
}

/// `{{ __('key') }}`
pub fn template_call(key: &str, params: &[(&str, String)]) -> String {
    format!("{{{{ {} }}}}", translation_call(key, params))
}

/// Try each strategy in order against `line`; `None` leaves the line untouched
pub fn rewrite_line(line: &str, change: &ApprovedChange) -> Option<(String, Strategy)> {
    let needle = change.needle();
    let params = change.param_bindings();

    element_text(line, needle, &change.key, &params)
        .map(|l| (l, Strategy::ElementText))
        .or_else(|| attribute_value(line, needle, &change.key, &params).map(|l| (l, Strategy::Attribute)))
        .or_else(|| quoted_literal(line, needle, &change.key, &params).map(|l| (l, Strategy::Literal)))
}

fn element_text(line: &str, needle: &str, key: &str, params: &[(&str, String)]) -> Option<String> {
    let re = Regex::new(&format!(r">(\s*){}(\s*)<", regex::escape(needle))).ok()?;
    let caps = re.captures(line)?;
    let whole = caps.get(0)?;
    let replacement = format!(
        ">{}{}{}<",
        &caps[1],
        template_call(key, params),
        &caps[2]
    );
    Some(splice(line, whole.start(), whole.end(), &replacement))
}

fn attribute_value(line: &str, needle: &str, key: &str, params: &[(&str, String)]) -> Option<String> {
    let escaped = regex::escape(needle);
    let re = Regex::new(&format!(
        r#"(?i)(?:^|[^\w:.@-])(?:{0})\s*=\s*(?:"({1})"|'({1})')"#,
        TRANSLATABLE_ATTRIBUTES.join("|"),
        escaped
    ))
    .ok()?;
    let caps = re.captures(line)?;
    let value = caps.get(1).or_else(|| caps.get(2))?;
    Some(splice(line, value.start(), value.end(), &template_call(key, params)))
}

fn quoted_literal(line: &str, needle: &str, key: &str, params: &[(&str, String)]) -> Option<String> {
    let literal = quoted_literals(line).into_iter().find(|literal| {
        literal.text == needle && !line[literal.end..].trim_start().starts_with("=>")
    })?;
    Some(splice(line, literal.start, literal.end, &translation_call(key, params)))
}

fn splice(line: &str, start: usize, end: usize, replacement: &str) -> String {
    let mut out = String::with_capacity(line.len() + replacement.len());
    out.push_str(&line[..start]);
    out.push_str(replacement);
    out.push_str(&line[end..]);
    out
}
