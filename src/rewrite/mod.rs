pub mod change;
pub mod rewriter;
pub mod strategy;

pub use change::{ApprovedChange, ChangeLocation, FileOutcome, RewriteResult};
pub use rewriter::Rewriter;
pub use strategy::{rewrite_line, Strategy};
