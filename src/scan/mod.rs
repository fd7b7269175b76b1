pub mod blade;
pub mod candidate;
pub mod context;
pub mod dialect;
pub mod lexer;
pub mod orchestrator;
pub mod php;
pub mod volt;

pub use blade::BladeScanner;
pub use candidate::{
    Candidate, CandidateMetadata, ElementType, FileScan, FileType, ScanResult, SkipReason,
    SkippedString, Verdict,
};
pub use context::FileContext;
pub use dialect::DialectScanner;
pub use orchestrator::SourceScanner;
pub use php::PhpScanner;
pub use volt::VoltScanner;
