use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::config::patterns::{
    contains_non_translatable_call, contains_translation_call, is_non_prose_text,
    is_technical_string, is_template_vocabulary, TRANSLATABLE_ATTRIBUTES,
};

use super::candidate::{
    Candidate, CandidateMetadata, ElementType, FileScan, FileType, SkipReason, SkippedString,
    Verdict,
};
use super::dialect::DialectScanner;
use super::lexer::{char_len, decode_entities, preceding, quoted_literals};

const TRANSLATION_WINDOW: usize = 30;

/// Marker byte replacing echo regions when looking for text nodes
const ECHO_MASK: u8 = 0x01;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

static TRANSLATABLE_ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"(?i)(?:^|[^\w:.@-])({})\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
        TRANSLATABLE_ATTRIBUTES.join("|")
    ))
    .expect("attribute pattern")
});

static DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z][A-Za-z0-9_]*)").expect("directive pattern"));

/// Scanner for Blade templates
#[derive(Debug, Default, Clone, Copy)]
pub struct BladeScanner;

impl BladeScanner {
    pub fn new() -> Self {
        Self
    }
}

impl DialectScanner for BladeScanner {
    fn extensions(&self) -> &'static [&'static str] {
        &["blade.php"]
    }

    fn file_type(&self) -> FileType {
        FileType::Blade
    }

    fn scan_file(&self, path: &Path, content: &str) -> FileScan {
        let mut state = TemplateState::default();
        let mut out = Collector {
            path,
            scan: FileScan::default(),
        };

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let visible = state.visible(line);
            if visible.trim().is_empty() {
                continue;
            }

            let echoes = state.echo_spans(&visible);
            scan_expression_literals(&visible, &echoes, line, line_no, &mut out);
            scan_attributes(&visible, line, line_no, &mut out);
            for segment in state.text_segments(&visible, &echoes) {
                classify_text(&segment, &visible, line, line_no, &mut out);
            }
        }

        out.scan
    }
}

struct Collector<'p> {
    path: &'p Path,
    scan: FileScan,
}

impl Collector<'_> {
    fn record(
        &mut self,
        verdict: Verdict,
        text: &str,
        line: &str,
        line_no: usize,
        column: usize,
        metadata: CandidateMetadata,
    ) {
        match verdict {
            Verdict::Keep(element_type) => self.scan.candidates.push(Candidate {
                file: self.path.to_path_buf(),
                line: line_no,
                column,
                text: text.to_string(),
                context: line.trim().to_string(),
                element_type,
                file_type: FileType::Blade,
                metadata,
            }),
            Verdict::Skip(reason) => self.scan.skipped.push(SkippedString {
                file: self.path.to_path_buf(),
                text: text.to_string(),
                reason,
                line: line_no,
            }),
            Verdict::Drop => {}
        }
    }
}

/// Regions whose content never reaches the rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    BladeComment,
    HtmlComment,
    PhpDirective,
    PhpTag,
    Script,
    Style,
}

impl Region {
    fn terminator(self) -> &'static str {
        match self {
            Region::BladeComment => "--}}",
            Region::HtmlComment => "-->",
            Region::PhpDirective => "@endphp",
            Region::PhpTag => "?>",
            Region::Script => "</script",
            Region::Style => "</style",
        }
    }
}

const OPENERS: &[(&str, Region)] = &[
    ("{{--", Region::BladeComment),
    ("<!--", Region::HtmlComment),
    ("<?php", Region::PhpTag),
    ("<?=", Region::PhpTag),
    ("<script", Region::Script),
    ("<style", Region::Style),
];

/// A tag whose `>` has not been seen yet
#[derive(Debug, Clone)]
struct OpenTag {
    name: String,
    closing: bool,
    quote: Option<u8>,
    last: u8,
}

/// An echo or the part of one that lies on the current line
#[derive(Debug, Clone, Copy)]
struct EchoSpan {
    start: usize,
    end: usize,
    /// Opens and closes on this line
    whole: bool,
}

/// Text between tags on one line
#[derive(Debug, Clone)]
struct TextSegment {
    start: usize,
    raw: String,
    enclosing: Option<String>,
}

#[derive(Debug, Default)]
struct TemplateState {
    region: Option<Region>,
    /// Closing braces of an echo still open at the end of the previous line
    echo: Option<&'static str>,
    tag: Option<OpenTag>,
    stack: Vec<String>,
}

impl TemplateState {
    /// The line with every excluded region blanked out, byte offsets preserved
    fn visible(&mut self, line: &str) -> String {
        let lower = line.to_ascii_lowercase();
        let mut bytes = line.as_bytes().to_vec();
        let mut i = 0;

        loop {
            match self.region {
                Some(region) => {
                    let terminator = region.terminator();
                    match lower[i..].find(terminator) {
                        Some(rel) => {
                            let mut end = i + rel + terminator.len();
                            if matches!(region, Region::Script | Region::Style) {
                                if let Some(gt) = lower[end..].find('>') {
                                    end += gt + 1;
                                }
                            }
                            blank(&mut bytes, i, end, b' ');
                            self.region = None;
                            i = end;
                        }
                        None => {
                            blank(&mut bytes, i, line.len(), b' ');
                            break;
                        }
                    }
                }
                None => match find_opener(&lower, i) {
                    Some((pos, region)) => {
                        self.region = Some(region);
                        i = pos;
                    }
                    None => break,
                },
            }
        }

        into_string(bytes)
    }

    /// `{{ ... }}` and `{!! ... !!}` spans of a visible line, braces included.
    ///
    /// An echo left open continues from the start of the next line until its closer.
    fn echo_spans(&mut self, visible: &str) -> Vec<EchoSpan> {
        let mut spans = Vec::new();
        let mut i = 0;

        if let Some(close) = self.echo {
            let Some(pos) = visible.find(close) else {
                return vec![EchoSpan {
                    start: 0,
                    end: visible.len(),
                    whole: false,
                }];
            };
            i = pos + close.len();
            spans.push(EchoSpan {
                start: 0,
                end: i,
                whole: false,
            });
            self.echo = None;
        }

        while i < visible.len() {
            let rest = &visible[i..];
            let (open, close) = if rest.starts_with("{!!") {
                ("{!!", "!!}")
            } else if rest.starts_with("{{") {
                ("{{", "}}")
            } else {
                i += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            };
            match rest[open.len()..].find(close) {
                Some(rel) => {
                    let end = i + open.len() + rel + close.len();
                    spans.push(EchoSpan {
                        start: i,
                        end,
                        whole: true,
                    });
                    i = end;
                }
                None => {
                    spans.push(EchoSpan {
                        start: i,
                        end: visible.len(),
                        whole: false,
                    });
                    self.echo = Some(close);
                    break;
                }
            }
        }
        spans
    }

    /// Split a visible line into text nodes, tracking tags across lines.
    ///
    /// Whole echoes are masked so they can be restored into the text; pieces of an echo
    /// spanning lines are blanked.
    fn text_segments(&mut self, visible: &str, echoes: &[EchoSpan]) -> Vec<TextSegment> {
        let mut bytes = visible.as_bytes().to_vec();
        for echo in echoes {
            let fill = if echo.whole { ECHO_MASK } else { b' ' };
            blank(&mut bytes, echo.start, echo.end, fill);
        }

        let mut segments = Vec::new();
        let mut seg_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];

            if let Some(mut tag) = self.tag.take() {
                match tag.quote {
                    Some(q) if b == q => tag.quote = None,
                    Some(_) => {}
                    None if b == b'"' || b == b'\'' => tag.quote = Some(b),
                    None if b == b'>' => {
                        self.close_tag(&tag);
                        seg_start = i + 1;
                        i += 1;
                        continue;
                    }
                    None => {}
                }
                if !b.is_ascii_whitespace() {
                    tag.last = b;
                }
                self.tag = Some(tag);
                i += 1;
                continue;
            }

            let starts_tag = b == b'<'
                && bytes
                    .get(i + 1)
                    .is_some_and(|n| n.is_ascii_alphabetic() || *n == b'/' || *n == b'!');
            if !starts_tag {
                i += 1;
                continue;
            }

            self.push_segment(&mut segments, &bytes, seg_start, i);

            let mut j = i + 1;
            let closing = bytes.get(j) == Some(&b'/');
            if closing {
                j += 1;
            }
            let name_start = j;
            while j < bytes.len()
                && (bytes[j].is_ascii_alphanumeric() || matches!(bytes[j], b'-' | b':' | b'.' | b'!'))
            {
                j += 1;
            }
            let name = String::from_utf8_lossy(&bytes[name_start..j]).to_ascii_lowercase();
            self.tag = Some(OpenTag {
                name,
                closing,
                quote: None,
                last: 0,
            });
            i = j;
        }

        if self.tag.is_none() {
            self.push_segment(&mut segments, &bytes, seg_start, bytes.len());
        }
        segments
    }

    fn push_segment(&self, segments: &mut Vec<TextSegment>, bytes: &[u8], start: usize, end: usize) {
        if start >= end {
            return;
        }
        let raw = String::from_utf8_lossy(&bytes[start..end]).into_owned();
        if raw.trim().is_empty() {
            return;
        }
        segments.push(TextSegment {
            start,
            raw,
            enclosing: self.stack.last().cloned(),
        });
    }

    fn close_tag(&mut self, tag: &OpenTag) {
        if tag.closing {
            if let Some(pos) = self.stack.iter().rposition(|open| *open == tag.name) {
                self.stack.truncate(pos);
            }
            return;
        }
        let self_closing = tag.last == b'/';
        if !self_closing && !tag.name.starts_with('!') && !VOID_TAGS.contains(&tag.name.as_str()) {
            self.stack.push(tag.name.clone());
        }
    }
}

/// Pass (a): quoted literals inside echoes and directive arguments
fn scan_expression_literals(
    visible: &str,
    echoes: &[EchoSpan],
    line: &str,
    line_no: usize,
    out: &mut Collector<'_>,
) {
    let regions = echoes
        .iter()
        .map(|echo| (echo.start, echo.end))
        .chain(directive_calls(visible).into_iter().filter_map(|d| d.args));

    for (start, end) in regions {
        let region = &visible[start..end];
        for literal in quoted_literals(region) {
            let column = start + literal.start;
            let text = literal.text.trim();
            let verdict = if char_len(text) < 3 {
                Verdict::Skip(SkipReason::TooShort)
            } else if is_technical_string(text) {
                Verdict::Skip(SkipReason::Technical)
            } else if is_template_vocabulary(text) {
                Verdict::Skip(SkipReason::TemplateVocabulary)
            } else if contains_translation_call(preceding(visible, column, TRANSLATION_WINDOW)) {
                Verdict::Skip(SkipReason::AlreadyTranslated)
            } else if contains_non_translatable_call(region) {
                Verdict::Skip(SkipReason::NonTranslatableCall)
            } else {
                Verdict::Keep(ElementType::String)
            };
            let metadata = CandidateMetadata {
                quote: Some(literal.quote),
                ..CandidateMetadata::default()
            };
            out.record(verdict, literal.text, line, line_no, column, metadata);
        }
    }
}

/// Pass (b): values of the whitelisted translatable attributes
fn scan_attributes(visible: &str, line: &str, line_no: usize, out: &mut Collector<'_>) {
    for caps in TRANSLATABLE_ATTRIBUTE.captures_iter(visible) {
        let Some(value) = caps.get(2).or_else(|| caps.get(3)) else {
            continue;
        };
        let name = caps[1].to_ascii_lowercase();
        let text = value.as_str();
        let trimmed = text.trim();

        let verdict = if ["{{", "{!!", "@", "$"].iter().any(|m| text.contains(m)) {
            Verdict::Skip(SkipReason::Interpolated)
        } else if char_len(trimmed) < 3 {
            Verdict::Skip(SkipReason::TooShort)
        } else if is_technical_string(trimmed) {
            Verdict::Skip(SkipReason::Technical)
        } else {
            match ElementType::for_attribute(&name) {
                Some(element_type) => Verdict::Keep(element_type),
                None => Verdict::Drop,
            }
        };

        let quote = visible[..value.start()].chars().next_back();
        let metadata = CandidateMetadata {
            quote,
            in_attribute: true,
            attribute: Some(name),
            ..CandidateMetadata::default()
        };
        out.record(verdict, text, line, line_no, value.start(), metadata);
    }
}

/// Pass (c): a text node between tags.
///
/// Guards see the node with echoes and directives blanked; the recorded text keeps its echoes
/// so it still matches the source line.
fn classify_text(
    segment: &TextSegment,
    visible: &str,
    line: &str,
    line_no: usize,
    out: &mut Collector<'_>,
) {
    let stripped = strip_directives(&segment.raw);
    let words = decode_entities(&stripped.replace(ECHO_MASK as char, " "));
    let words = words.split_whitespace().collect::<Vec<_>>().join(" ");
    if words.is_empty() {
        return;
    }

    let source = visible.as_bytes().get(segment.start..).unwrap_or_default();
    let restored = into_string(
        stripped
            .bytes()
            .zip(source)
            .map(|(b, original)| if b == ECHO_MASK { *original } else { b })
            .collect(),
    );
    let text = restored.trim();
    let leading = restored.len() - restored.trim_start().len();

    let verdict = if char_len(&words) < 3 {
        Verdict::Skip(SkipReason::TooShort)
    } else if !words.chars().any(char::is_alphabetic) {
        Verdict::Skip(SkipReason::NoLetters)
    } else if is_template_vocabulary(&words) {
        Verdict::Skip(SkipReason::TemplateVocabulary)
    } else if is_non_prose_text(&words) {
        Verdict::Skip(SkipReason::Technical)
    } else {
        let element_type = segment
            .enclosing
            .as_deref()
            .map(ElementType::for_tag)
            .unwrap_or(ElementType::HtmlText);
        Verdict::Keep(element_type)
    };

    out.record(
        verdict,
        text,
        line,
        line_no,
        segment.start + leading,
        CandidateMetadata::default(),
    );
}

#[derive(Debug, Clone, Copy)]
struct DirectiveCall {
    start: usize,
    end: usize,
    /// Span inside the parentheses, when the directive takes arguments
    args: Option<(usize, usize)>,
}

/// `@name` and `@name(...)` occurrences that are not part of a word or email
fn directive_calls(text: &str) -> Vec<DirectiveCall> {
    let bytes = text.as_bytes();
    let mut calls = Vec::new();

    for m in DIRECTIVE.find_iter(text) {
        let glued = m.start() > 0 && {
            let prev = bytes[m.start() - 1];
            prev.is_ascii_alphanumeric() || matches!(prev, b'_' | b'@' | b'.')
        };
        if glued || calls.last().is_some_and(|c: &DirectiveCall| c.end > m.start()) {
            continue;
        }

        let mut j = m.end();
        while j < bytes.len() && bytes[j] == b' ' {
            j += 1;
        }
        if bytes.get(j) != Some(&b'(') {
            calls.push(DirectiveCall {
                start: m.start(),
                end: m.end(),
                args: None,
            });
            continue;
        }

        let close = matching_paren(bytes, j);
        calls.push(DirectiveCall {
            start: m.start(),
            end: close.map_or(bytes.len(), |c| c + 1),
            args: Some((j + 1, close.unwrap_or(bytes.len()))),
        });
    }
    calls
}

fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(_) if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' | b'"' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

fn strip_directives(text: &str) -> String {
    let mut bytes = text.as_bytes().to_vec();
    for call in directive_calls(text) {
        blank(&mut bytes, call.start, call.end, b' ');
    }
    into_string(bytes)
}

fn find_opener(lower: &str, from: usize) -> Option<(usize, Region)> {
    let haystack = &lower[from..];
    let mut best = OPENERS
        .iter()
        .filter_map(|(token, region)| haystack.find(token).map(|pos| (from + pos, *region)))
        .min_by_key(|(pos, _)| *pos);

    let bytes = lower.as_bytes();
    for (pos, _) in haystack.match_indices("@php") {
        let pos = from + pos;
        let next = bytes.get(pos + 4);
        let is_block = pos.checked_sub(1).map_or(true, |p| bytes[p] != b'@')
            && !next.is_some_and(|n| n.is_ascii_alphanumeric() || *n == b'_' || *n == b'(');
        if is_block {
            if best.map_or(true, |(b, _)| pos < b) {
                best = Some((pos, Region::PhpDirective));
            }
            break;
        }
    }
    best
}

/// Overwrite `bytes[start..end]` with `fill`; callers only pass ASCII-aligned spans
fn blank(bytes: &mut [u8], start: usize, end: usize, fill: u8) {
    let end = end.min(bytes.len());
    if start < end {
        bytes[start..end].fill(fill);
    }
}

fn into_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
