//! Key derivation, parameter detection and confidence scoring.
//!
//! Every function here is pure: the same candidate always yields the same key, value and score.

pub mod analysis;
pub mod confidence;
pub mod generator;
pub mod parameters;

pub use analysis::{analyze, KeyedCandidate, RiskLevel};
pub use confidence::calculate_confidence;
pub use generator::{classify_message, generate_key, MessageKind};
pub use parameters::{apply_parameters, detect_parameters, echo_bindings, EchoBinding};
