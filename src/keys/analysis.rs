use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::scan::candidate::Candidate;

use super::confidence::calculate_confidence;
use super::generator::generate_key;
use super::parameters::{apply_parameters, detect_parameters};

/// How safe a keyed candidate is to rewrite without a second look
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Warning,
    Danger,
}

impl RiskLevel {
    pub fn from_confidence(confidence: u8) -> Self {
        match confidence {
            80.. => RiskLevel::Safe,
            50..=79 => RiskLevel::Warning,
            _ => RiskLevel::Danger,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Warning => "warning",
            RiskLevel::Danger => "danger",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate enriched with everything a reviewer needs to approve it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedCandidate {
    /// Hex identity of the candidate
    pub id: String,
    #[serde(flatten)]
    pub candidate: Candidate,
    pub key: String,
    /// Text with detected values replaced by parameter tokens
    pub value: String,
    pub confidence: u8,
    pub params: Vec<String>,
    pub risk: RiskLevel,
}

impl KeyedCandidate {
    pub fn new(candidate: Candidate, key: String) -> Self {
        let params = detect_parameters(&candidate.text);
        let value = apply_parameters(&candidate.text, &params);
        let confidence = calculate_confidence(&candidate);
        Self {
            id: candidate.id_hex(),
            key,
            value,
            confidence,
            params,
            risk: RiskLevel::from_confidence(confidence),
            candidate,
        }
    }
}

/// Key, parameterize and score every candidate.
///
/// Two different texts never end up sharing a key: the later one gets a `-2`, `-3`, ...
/// suffix on its description. Identical texts share one key.
pub fn analyze(candidates: &[Candidate]) -> Vec<KeyedCandidate> {
    let mut owners: HashMap<String, String> = HashMap::new();

    candidates
        .iter()
        .map(|candidate| {
            let base = generate_key(candidate);
            let text = candidate.text.trim();
            let mut key = base.clone();
            let mut suffix = 1;
            loop {
                match owners.get(&key) {
                    None => {
                        owners.insert(key.clone(), text.to_string());
                        break;
                    }
                    Some(owner) if owner == text => break,
                    Some(_) => {
                        suffix += 1;
                        key = format!("{}-{}", base, suffix);
                    }
                }
            }
            KeyedCandidate::new(candidate.clone(), key)
        })
        .collect()
}
