//! Line-level lexing helpers shared by the dialect scanners.

/// A quoted string literal found on a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotedLiteral<'a> {
    /// Byte offset of the opening quote
    pub start: usize,
    /// Byte offset just past the closing quote
    pub end: usize,
    /// Raw text between the quotes, escapes untouched
    pub text: &'a str,
    pub quote: char,
}

/// Find every single- or double-quoted literal on `line`.
///
/// Scanning stops at a `//` or `/*` comment outside a literal; a literal left
/// unterminated at the end of the line is ignored.
pub fn quoted_literals(line: &str) -> Vec<QuotedLiteral<'_>> {
    let bytes = line.as_bytes();
    let mut literals = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if matches!(bytes.get(i + 1), Some(b'/') | Some(b'*')) => break,
            quote @ (b'\'' | b'"') => {
                let start = i;
                let mut j = i + 1;
                let mut closed = None;
                while j < bytes.len() {
                    match bytes[j] {
                        b'\\' => j += 2,
                        b if b == quote => {
                            closed = Some(j);
                            break;
                        }
                        _ => j += 1,
                    }
                }
                match closed {
                    Some(close) => {
                        literals.push(QuotedLiteral {
                            start,
                            end: close + 1,
                            text: &line[start + 1..close],
                            quote: quote as char,
                        });
                        i = close + 1;
                    }
                    None => break,
                }
            }
            _ => i += 1,
        }
    }

    literals
}

/// Up to `max_bytes` of `line` ending at `end`, cut on a char boundary
pub fn preceding(line: &str, end: usize, max_bytes: usize) -> &str {
    let end = end.min(line.len());
    let mut start = end.saturating_sub(max_bytes);
    while !line.is_char_boundary(start) {
        start += 1;
    }
    &line[start..end]
}

/// Number of characters, the unit for every length threshold
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Decode the HTML entities that commonly appear in template text
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "laquo" => '«',
        "raquo" => '»',
        "euro" => '€',
        "pound" => '£',
        _ => return None,
    };
    Some(c)
}
