use crate::config::patterns::{contained_action_verb, CODE_PUNCTUATION};
use crate::scan::candidate::{Candidate, ElementType};
use crate::scan::lexer::char_len;

const BASE: i32 = 50;

/// Heuristic score in [0, 100] of how safe it is to translate a candidate
pub fn calculate_confidence(candidate: &Candidate) -> u8 {
    let text = candidate.text.trim();
    let mut score = BASE;

    if matches!(
        candidate.element_type,
        ElementType::Heading(_)
            | ElementType::Button
            | ElementType::Label
            | ElementType::LabelAttribute
            | ElementType::ArrayLabel
            | ElementType::PlaceholderAttribute
    ) {
        score += 20;
    }

    match char_len(text) {
        0..=4 => score -= 15,
        5..=80 => score += 15,
        201.. => score -= 20,
        _ => {}
    }

    if !candidate.metadata.in_attribute {
        score += 10;
    }
    if candidate.file_type.is_template() {
        score += 10;
    }
    if CODE_PUNCTUATION.is_match(text) {
        score -= 20;
    }
    if candidate.element_type == ElementType::Button && contained_action_verb(text).is_some() {
        score += 15;
    }

    score.clamp(0, 100) as u8
}
