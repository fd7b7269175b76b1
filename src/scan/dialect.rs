use std::path::Path;

use super::candidate::{FileScan, FileType};

/// Capability shared by every source dialect scanner.
///
/// The orchestrator probes variants in order and hands a file to the first one
/// whose [`can_handle`](DialectScanner::can_handle) returns true.
pub trait DialectScanner {
    /// File name suffixes this scanner may accept, without the leading dot
    fn extensions(&self) -> &'static [&'static str];

    fn file_type(&self) -> FileType;

    /// Whether this scanner claims the file. The content is passed so that a
    /// scanner can sniff it; the default only checks the extension.
    fn can_handle(&self, path: &Path, _content: &str) -> bool {
        has_extension(path, self.extensions())
    }

    fn scan_file(&self, path: &Path, content: &str) -> FileScan;
}

/// Does the file name end with `.<ext>` for one of `extensions`
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    extensions.iter().any(|ext| {
        name.len() > ext.len() + 1
            && name.ends_with(ext)
            && name.as_bytes()[name.len() - ext.len() - 1] == b'.'
    })
}
